//! SQL DDL for initializing the fleet database.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `manufacturers.name` UNIQUE
/// - `drivers.username` UNIQUE, `drivers.license_number` UNIQUE but NULL-able
///   (accounts created without a license, e.g. the bootstrap admin)
/// - `cars.manufacturer_id` cascading on manufacturer delete
/// - `car_drivers` join table cascading on both sides
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS manufacturers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    country TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS drivers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    license_number TEXT NULL UNIQUE,
    date_joined TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model TEXT NOT NULL,
    manufacturer_id INTEGER NOT NULL REFERENCES manufacturers(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_cars_manufacturer_id ON cars(manufacturer_id);

CREATE TABLE IF NOT EXISTS car_drivers (
    car_id INTEGER NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
    driver_id INTEGER NOT NULL REFERENCES drivers(id) ON DELETE CASCADE,
    PRIMARY KEY (car_id, driver_id)
);

CREATE INDEX IF NOT EXISTS idx_car_drivers_driver_id ON car_drivers(driver_id);
"#;
