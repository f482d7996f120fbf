// src/utils/mod.rs

pub mod data_uri;
pub mod hash;
