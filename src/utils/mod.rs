// src/utils/mod.rs

pub mod score;
