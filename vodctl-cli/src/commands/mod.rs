//! Command implementations for vodctl CLI

pub mod catalog;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use catalog::{run_list, run_remove, run_search, run_show};
pub use serve::run_serve;
