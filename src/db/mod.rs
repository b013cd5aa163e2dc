//! Database module: SQLite adapter and schema for persistent storage.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the production implementation of the store ports

pub mod schema;
pub mod sqlite;

pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, SqliteStorage};
