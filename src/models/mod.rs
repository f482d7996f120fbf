// src/models/mod.rs

pub mod completion;
pub mod question;
pub mod user;
