// src/handlers/mod.rs

pub mod catalog;
pub mod quiz;
pub mod system;
