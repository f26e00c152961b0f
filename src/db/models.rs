use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Driver {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl Driver {
    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A car row joined with its manufacturer's name.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub manufacturer_id: i64,
    pub manufacturer_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewManufacturer {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDriver {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub model: String,
    pub manufacturer_id: i64,
    pub driver_ids: Vec<i64>,
}

/// Row totals shown on the index page.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FleetCounts {
    pub drivers: i64,
    pub cars: i64,
    pub manufacturers: i64,
}
