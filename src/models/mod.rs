// src/models/mod.rs

pub mod catalog;
pub mod session;
