//! Domain models with validation
//!
//! Invalid input returns ValidationError, not panic.

pub mod entry;
pub mod validation;

pub use entry::{Entry, EntryUpdate, NewEntry};
pub use validation::ValidationError;
