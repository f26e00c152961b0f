//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and insert payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the storage handle shared by handlers

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Car, Driver, FleetCounts, Manufacturer, NewCar, NewDriver, NewManufacturer};
pub use schema::SQLITE_INIT;
pub use sqlite::{FleetStorage, SqlitePool, unique_violation_column};
