// src/store/mod.rs

//! Persistence components. Each one owns a handle to the shared pool, handed
//! in at construction.

pub mod bulk;
pub mod completions;
pub mod questions;
pub mod users;

pub use bulk::BulkIngest;
pub use completions::CompletionTracker;
pub use questions::QuestionStore;
pub use users::UserStore;
