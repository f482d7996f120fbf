// src/handlers/mod.rs

pub mod completions;
pub mod questions;
pub mod users;
