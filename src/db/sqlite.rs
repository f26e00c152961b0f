use crate::db::models::{
    Car, Driver, FleetCounts, Manufacturer, NewCar, NewDriver, NewManufacturer,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::FleetError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const DRIVER_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, license_number, date_joined";

const CAR_SELECT: &str = r#"
    SELECT c.id, c.model, c.manufacturer_id, m.name AS manufacturer_name
    FROM cars c JOIN manufacturers m ON m.id = c.manufacturer_id"#;

/// Turn a search term into a `LIKE ... ESCAPE '\'` substring pattern.
/// Blank terms mean "no filter".
fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Column named by a `UNIQUE constraint failed: table.column` error, if `err` is one.
pub fn unique_violation_column(err: &FleetError) -> Option<String> {
    let FleetError::DatabaseError(sqlx::Error::Database(db)) = err else {
        return None;
    };
    if !db.is_unique_violation() {
        return None;
    }
    db.message().rsplit('.').next().map(str::to_string)
}

#[derive(Clone)]
pub struct FleetStorage {
    pool: SqlitePool,
}

impl FleetStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    ///
    /// In-memory databases live as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(database_url: &str) -> Result<Self, FleetError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let mut pool_opts = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_opts.connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), FleetError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn counts(&self) -> Result<FleetCounts, FleetError> {
        let (drivers, cars, manufacturers): (i64, i64, i64) = sqlx::query_as(
            r#"SELECT
                (SELECT COUNT(*) FROM drivers),
                (SELECT COUNT(*) FROM cars),
                (SELECT COUNT(*) FROM manufacturers)"#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(FleetCounts {
            drivers,
            cars,
            manufacturers,
        })
    }

    // ---- manufacturers ----

    pub async fn create_manufacturer(&self, new: &NewManufacturer) -> Result<i64, FleetError> {
        let res = sqlx::query("INSERT INTO manufacturers (name, country) VALUES (?, ?)")
            .bind(&new.name)
            .bind(&new.country)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn get_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>, FleetError> {
        let row = sqlx::query_as::<_, Manufacturer>(
            "SELECT id, name, country FROM manufacturers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns false when no row has this id.
    pub async fn update_manufacturer(
        &self,
        id: i64,
        new: &NewManufacturer,
    ) -> Result<bool, FleetError> {
        let res = sqlx::query("UPDATE manufacturers SET name = ?, country = ? WHERE id = ?")
            .bind(&new.name)
            .bind(&new.country)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Deletes the manufacturer and, through the foreign key, its cars.
    pub async fn delete_manufacturer(&self, id: i64) -> Result<bool, FleetError> {
        let res = sqlx::query("DELETE FROM manufacturers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn manufacturer_name_taken(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, FleetError> {
        let hit: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM manufacturers WHERE name = ? AND (? IS NULL OR id <> ?) LIMIT 1",
        )
        .bind(name)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hit.is_some())
    }

    pub async fn count_manufacturers(&self, name: Option<&str>) -> Result<usize, FleetError> {
        let pattern = like_pattern(name);
        let n: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM manufacturers
               WHERE (? IS NULL OR name LIKE ? ESCAPE '\')"#,
        )
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(n as usize)
    }

    /// Manufacturers whose name contains `name` (case-insensitive), ordered by name.
    pub async fn list_manufacturers(
        &self,
        name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Manufacturer>, FleetError> {
        let pattern = like_pattern(name);
        let rows = sqlx::query_as::<_, Manufacturer>(
            r#"SELECT id, name, country FROM manufacturers
               WHERE (? IS NULL OR name LIKE ? ESCAPE '\')
               ORDER BY name, id LIMIT ? OFFSET ?"#,
        )
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn all_manufacturers(&self) -> Result<Vec<Manufacturer>, FleetError> {
        let rows = sqlx::query_as::<_, Manufacturer>(
            "SELECT id, name, country FROM manufacturers ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---- drivers ----

    pub async fn create_driver(&self, new: &NewDriver) -> Result<i64, FleetError> {
        let res = sqlx::query(
            r#"INSERT INTO drivers (
                username, password_hash, first_name, last_name, license_number, date_joined
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.license_number.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn get_driver(&self, id: i64) -> Result<Option<Driver>, FleetError> {
        let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE id = ?");
        let row = sqlx::query_as::<_, Driver>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get_driver_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Driver>, FleetError> {
        let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE username = ?");
        let row = sqlx::query_as::<_, Driver>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Case-insensitive, matching how usernames are compared at sign-up.
    pub async fn username_taken(&self, username: &str) -> Result<bool, FleetError> {
        let hit: Option<i64> =
            sqlx::query_scalar("SELECT id FROM drivers WHERE lower(username) = lower(?) LIMIT 1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(hit.is_some())
    }

    pub async fn license_taken(
        &self,
        license_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, FleetError> {
        let hit: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM drivers WHERE license_number = ? AND (? IS NULL OR id <> ?) LIMIT 1",
        )
        .bind(license_number)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hit.is_some())
    }

    /// Only the license number changes; the rest of the row is left alone.
    pub async fn update_license(&self, id: i64, license_number: &str) -> Result<bool, FleetError> {
        let res = sqlx::query("UPDATE drivers SET license_number = ? WHERE id = ?")
            .bind(license_number)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn delete_driver(&self, id: i64) -> Result<bool, FleetError> {
        let res = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn count_drivers(&self, username: Option<&str>) -> Result<usize, FleetError> {
        let pattern = like_pattern(username);
        let n: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM drivers
               WHERE (? IS NULL OR username LIKE ? ESCAPE '\')"#,
        )
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(n as usize)
    }

    pub async fn list_drivers(
        &self,
        username: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Driver>, FleetError> {
        let pattern = like_pattern(username);
        let sql = format!(
            r#"SELECT {DRIVER_COLUMNS} FROM drivers
               WHERE (? IS NULL OR username LIKE ? ESCAPE '\')
               ORDER BY username, id LIMIT ? OFFSET ?"#
        );
        let rows = sqlx::query_as::<_, Driver>(&sql)
            .bind(pattern.as_deref())
            .bind(pattern.as_deref())
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn all_drivers(&self) -> Result<Vec<Driver>, FleetError> {
        let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers ORDER BY username, id");
        let rows = sqlx::query_as::<_, Driver>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// The subset of `ids` that name existing drivers.
    pub async fn existing_driver_ids(&self, ids: &[i64]) -> Result<Vec<i64>, FleetError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM drivers WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let found: Vec<i64> = qb.build_query_scalar().fetch_all(&self.pool).await?;
        Ok(found)
    }

    pub async fn cars_for_driver(&self, driver_id: i64) -> Result<Vec<Car>, FleetError> {
        let sql = format!(
            r#"{CAR_SELECT}
               JOIN car_drivers cd ON cd.car_id = c.id
               WHERE cd.driver_id = ?
               ORDER BY c.model, c.id"#
        );
        let rows = sqlx::query_as::<_, Car>(&sql)
            .bind(driver_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ---- cars ----

    /// Insert the car and its driver links in one transaction.
    pub async fn create_car(&self, new: &NewCar) -> Result<i64, FleetError> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("INSERT INTO cars (model, manufacturer_id) VALUES (?, ?)")
            .bind(&new.model)
            .bind(new.manufacturer_id)
            .execute(&mut *tx)
            .await?;
        let id = res.last_insert_rowid();
        Self::replace_car_drivers(&mut *tx, id, &new.driver_ids).await?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn get_car(&self, id: i64) -> Result<Option<Car>, FleetError> {
        let sql = format!("{CAR_SELECT} WHERE c.id = ?");
        let row = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replace model, manufacturer and the whole driver set.
    pub async fn update_car(&self, id: i64, new: &NewCar) -> Result<bool, FleetError> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("UPDATE cars SET model = ?, manufacturer_id = ? WHERE id = ?")
            .bind(&new.model)
            .bind(new.manufacturer_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Ok(false);
        }
        Self::replace_car_drivers(&mut *tx, id, &new.driver_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn delete_car(&self, id: i64) -> Result<bool, FleetError> {
        let res = sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn car_drivers(&self, car_id: i64) -> Result<Vec<Driver>, FleetError> {
        let rows = sqlx::query_as::<_, Driver>(
            r#"SELECT d.id, d.username, d.password_hash, d.first_name, d.last_name,
                      d.license_number, d.date_joined
               FROM drivers d JOIN car_drivers cd ON cd.driver_id = d.id
               WHERE cd.car_id = ?
               ORDER BY d.username, d.id"#,
        )
            .bind(car_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Link the driver to the car, or unlink if already linked.
    /// Returns true when the driver is assigned afterwards.
    pub async fn toggle_car_driver(&self, car_id: i64, driver_id: i64) -> Result<bool, FleetError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM car_drivers WHERE car_id = ? AND driver_id = ?")
            .bind(car_id)
            .bind(driver_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            sqlx::query("INSERT INTO car_drivers (car_id, driver_id) VALUES (?, ?)")
                .bind(car_id)
                .bind(driver_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(removed == 0)
    }

    pub async fn count_cars(&self, model: Option<&str>) -> Result<usize, FleetError> {
        let pattern = like_pattern(model);
        let n: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM cars
               WHERE (? IS NULL OR model LIKE ? ESCAPE '\')"#,
        )
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(n as usize)
    }

    pub async fn list_cars(
        &self,
        model: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Car>, FleetError> {
        let pattern = like_pattern(model);
        let sql = format!(
            r#"{CAR_SELECT}
               WHERE (? IS NULL OR c.model LIKE ? ESCAPE '\')
               ORDER BY c.model, c.id LIMIT ? OFFSET ?"#
        );
        let rows = sqlx::query_as::<_, Car>(&sql)
            .bind(pattern.as_deref())
            .bind(pattern.as_deref())
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn replace_car_drivers(
        conn: &mut SqliteConnection,
        car_id: i64,
        driver_ids: &[i64],
    ) -> Result<(), FleetError> {
        sqlx::query("DELETE FROM car_drivers WHERE car_id = ?")
            .bind(car_id)
            .execute(&mut *conn)
            .await?;
        for driver_id in driver_ids {
            sqlx::query("INSERT OR IGNORE INTO car_drivers (car_id, driver_id) VALUES (?, ?)")
                .bind(car_id)
                .bind(driver_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> FleetStorage {
        FleetStorage::connect("sqlite::memory:")
            .await
            .expect("in-memory database")
    }

    fn driver(username: &str, license: Option<&str>) -> NewDriver {
        NewDriver {
            username: username.to_string(),
            password_hash: "!".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            license_number: license.map(str::to_string),
        }
    }

    async fn manufacturer(storage: &FleetStorage, name: &str) -> i64 {
        storage
            .create_manufacturer(&NewManufacturer {
                name: name.to_string(),
                country: "Japan".to_string(),
            })
            .await
            .expect("create manufacturer")
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("  ")), None);
        assert_eq!(like_pattern(Some("Test")).as_deref(), Some("%Test%"));
        assert_eq!(like_pattern(Some("50%_a\\")).as_deref(), Some("%50\\%\\_a\\\\%"));
    }

    #[tokio::test]
    async fn unique_violations_name_their_column() {
        let storage = storage().await;
        storage.create_driver(&driver("alice", Some("ABC12345"))).await.unwrap();

        let err = storage
            .create_driver(&driver("bob", Some("ABC12345")))
            .await
            .unwrap_err();
        assert_eq!(unique_violation_column(&err).as_deref(), Some("license_number"));

        manufacturer(&storage, "Lancia").await;
        let err = storage
            .create_manufacturer(&NewManufacturer {
                name: "Lancia".to_string(),
                country: "Italy".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(unique_violation_column(&err).as_deref(), Some("name"));
        assert_eq!(unique_violation_column(&FleetError::NotFound("Car")), None);
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let storage = storage().await;
        storage.init_schema().await.expect("second init");
        assert_eq!(storage.counts().await.unwrap(), FleetCounts::default());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let storage = storage().await;
        manufacturer(&storage, "Test Manufacturer").await;
        manufacturer(&storage, "Other").await;

        assert_eq!(storage.count_manufacturers(Some("test")).await.unwrap(), 1);
        assert_eq!(storage.count_manufacturers(Some("MANUF")).await.unwrap(), 1);
        assert_eq!(storage.count_manufacturers(None).await.unwrap(), 2);

        let rows = storage.list_manufacturers(Some("t"), 5, 0).await.unwrap();
        let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Other", "Test Manufacturer"]);
    }

    #[tokio::test]
    async fn percent_in_search_is_literal() {
        let storage = storage().await;
        manufacturer(&storage, "100% Motors").await;
        manufacturer(&storage, "100 Motors").await;
        assert_eq!(storage.count_manufacturers(Some("0%")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn car_drivers_round_trip_and_toggle() {
        let storage = storage().await;
        let m = manufacturer(&storage, "Toyota").await;
        let a = storage.create_driver(&driver("alice", Some("ABC12345"))).await.unwrap();
        let b = storage.create_driver(&driver("bob", None)).await.unwrap();

        let car = storage
            .create_car(&NewCar {
                model: "Corolla".to_string(),
                manufacturer_id: m,
                driver_ids: vec![a],
            })
            .await
            .unwrap();

        let fetched = storage.get_car(car).await.unwrap().expect("car exists");
        assert_eq!(fetched.manufacturer_name, "Toyota");

        assert!(storage.toggle_car_driver(car, b).await.unwrap());
        let usernames: Vec<_> = storage
            .car_drivers(car)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.username)
            .collect();
        assert_eq!(usernames, vec!["alice", "bob"]);

        assert!(!storage.toggle_car_driver(car, b).await.unwrap());
        assert_eq!(storage.car_drivers(car).await.unwrap().len(), 1);
        assert_eq!(storage.cars_for_driver(a).await.unwrap().len(), 1);
        assert!(storage.cars_for_driver(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_car_replaces_driver_set() {
        let storage = storage().await;
        let m = manufacturer(&storage, "Honda").await;
        let a = storage.create_driver(&driver("alice", None)).await.unwrap();
        let b = storage.create_driver(&driver("bob", None)).await.unwrap();
        let car = storage
            .create_car(&NewCar {
                model: "Civic".to_string(),
                manufacturer_id: m,
                driver_ids: vec![a],
            })
            .await
            .unwrap();

        let updated = storage
            .update_car(
                car,
                &NewCar {
                    model: "Accord".to_string(),
                    manufacturer_id: m,
                    driver_ids: vec![b],
                },
            )
            .await
            .unwrap();
        assert!(updated);
        let drivers = storage.car_drivers(car).await.unwrap();
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].id, b);
        assert_eq!(storage.get_car(car).await.unwrap().unwrap().model, "Accord");

        let ghost = NewCar {
            model: "Ghost".to_string(),
            manufacturer_id: m,
            driver_ids: vec![],
        };
        assert!(!storage.update_car(car + 100, &ghost).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_manufacturer_cascades_to_cars() {
        let storage = storage().await;
        let m = manufacturer(&storage, "Lada").await;
        storage
            .create_car(&NewCar {
                model: "Niva".to_string(),
                manufacturer_id: m,
                driver_ids: vec![],
            })
            .await
            .unwrap();
        assert!(storage.delete_manufacturer(m).await.unwrap());
        assert_eq!(storage.count_cars(None).await.unwrap(), 0);
        assert!(!storage.delete_manufacturer(m).await.unwrap());
    }

    #[tokio::test]
    async fn uniqueness_lookups() {
        let storage = storage().await;
        let id = storage.create_driver(&driver("Alice", Some("ABC12345"))).await.unwrap();
        assert!(storage.username_taken("alice").await.unwrap());
        assert!(!storage.username_taken("bob").await.unwrap());
        assert!(storage.license_taken("ABC12345", None).await.unwrap());
        assert!(!storage.license_taken("ABC12345", Some(id)).await.unwrap());

        let m = manufacturer(&storage, "Kia").await;
        assert!(storage.manufacturer_name_taken("Kia", None).await.unwrap());
        assert!(!storage.manufacturer_name_taken("Kia", Some(m)).await.unwrap());
    }

    #[tokio::test]
    async fn license_update_touches_only_license() {
        let storage = storage().await;
        let id = storage.create_driver(&driver("carol", Some("ABC12345"))).await.unwrap();
        assert!(storage.update_license(id, "DEF67890").await.unwrap());
        let d = storage.get_driver(id).await.unwrap().unwrap();
        assert_eq!(d.license_number.as_deref(), Some("DEF67890"));
        assert_eq!(d.username, "carol");
        assert_eq!(d.password_hash, "!");
    }

    #[tokio::test]
    async fn existing_driver_ids_filters_unknown() {
        let storage = storage().await;
        let a = storage.create_driver(&driver("alice", None)).await.unwrap();
        let found = storage.existing_driver_ids(&[a, a + 42]).await.unwrap();
        assert_eq!(found, vec![a]);
        assert!(storage.existing_driver_ids(&[]).await.unwrap().is_empty());
    }
}
