pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod templates;

pub use error::FleetError;
