//! Database layer - one shared session and the catalog store on top of it
//!
//! # Design Principles
//!
//! - Exactly one connection per process, no pool
//! - One global critical section; submit and drain happen inside it
//! - Parameterized statements only

pub mod connection;
pub mod store;

pub use connection::{ConnectionManager, DatabaseLocation};
pub use store::MetadataStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) > 0),
    description TEXT NOT NULL,
    video_path TEXT NOT NULL,
    image_path TEXT NOT NULL
);
"#;
