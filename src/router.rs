use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tracing::warn;

use crate::db::FleetStorage;
use crate::handlers::{accounts, cars, drivers, index, manufacturers};
use crate::templates::Templates;

/// Minimum master key length accepted by the cookie encryption.
pub const MIN_SECRET_KEY_LEN: usize = 64;

#[derive(Clone)]
pub struct FleetState {
    pub storage: FleetStorage,
    pub templates: Arc<Templates>,
    pub key: Key,
    /// Mark cookies `Secure`.
    pub secure_cookies: bool,
}

impl FleetState {
    pub fn new(
        storage: FleetStorage,
        templates: Templates,
        secret_key: &str,
        insecure_cookie: bool,
    ) -> Self {
        let key = match Key::try_from(secret_key.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                warn!(
                    min_len = MIN_SECRET_KEY_LEN,
                    "secret_key missing or too short; sessions will not survive a restart"
                );
                Key::generate()
            }
        };
        Self {
            storage,
            templates: Arc::new(templates),
            key,
            secure_cookies: !insecure_cookie,
        }
    }
}

impl FromRef<FleetState> for Key {
    fn from_ref(state: &FleetState) -> Self {
        state.key.clone()
    }
}

pub const INDEX: &str = "/";
pub const LOGIN: &str = "/accounts/login/";
pub const LOGOUT: &str = "/accounts/logout/";
pub const MANUFACTURER_LIST: &str = "/manufacturers/";
pub const MANUFACTURER_CREATE: &str = "/manufacturers/create/";
pub const MANUFACTURER_UPDATE: &str = "/manufacturers/{id}/update/";
pub const MANUFACTURER_DELETE: &str = "/manufacturers/{id}/delete/";
pub const CAR_LIST: &str = "/cars/";
pub const CAR_CREATE: &str = "/cars/create/";
pub const CAR_DETAIL: &str = "/cars/{id}/";
pub const CAR_UPDATE: &str = "/cars/{id}/update/";
pub const CAR_DELETE: &str = "/cars/{id}/delete/";
pub const CAR_TOGGLE_ASSIGN: &str = "/cars/{id}/toggle-assign/";
pub const DRIVER_LIST: &str = "/drivers/";
pub const DRIVER_CREATE: &str = "/drivers/create/";
pub const DRIVER_DETAIL: &str = "/drivers/{id}/";
pub const DRIVER_UPDATE: &str = "/drivers/{id}/update/";
pub const DRIVER_DELETE: &str = "/drivers/{id}/delete/";

const NAMED_ROUTES: &[(&str, &str)] = &[
    ("taxi:index", INDEX),
    ("login", LOGIN),
    ("logout", LOGOUT),
    ("taxi:manufacturer-list", MANUFACTURER_LIST),
    ("taxi:manufacturer-create", MANUFACTURER_CREATE),
    ("taxi:manufacturer-update", MANUFACTURER_UPDATE),
    ("taxi:manufacturer-delete", MANUFACTURER_DELETE),
    ("taxi:car-list", CAR_LIST),
    ("taxi:car-create", CAR_CREATE),
    ("taxi:car-detail", CAR_DETAIL),
    ("taxi:car-update", CAR_UPDATE),
    ("taxi:car-delete", CAR_DELETE),
    ("taxi:toggle-car-assign", CAR_TOGGLE_ASSIGN),
    ("taxi:driver-list", DRIVER_LIST),
    ("taxi:driver-create", DRIVER_CREATE),
    ("taxi:driver-detail", DRIVER_DETAIL),
    ("taxi:driver-update", DRIVER_UPDATE),
    ("taxi:driver-delete", DRIVER_DELETE),
];

/// Fill the `{id}` segment of a route pattern.
pub fn path_for(pattern: &str, id: i64) -> String {
    pattern.replace("{id}", &id.to_string())
}

/// Path of a named route. `id` must be given exactly when the route has an
/// `{id}` segment.
pub fn reverse(name: &str, id: Option<i64>) -> Option<String> {
    let (_, pattern) = NAMED_ROUTES.iter().find(|(n, _)| *n == name)?;
    match (pattern.contains("{id}"), id) {
        (true, Some(id)) => Some(path_for(pattern, id)),
        (false, None) => Some(pattern.to_string()),
        _ => None,
    }
}

pub fn fleet_router(state: FleetState) -> Router {
    Router::new()
        .route(INDEX, get(index::index))
        .route(LOGIN, get(accounts::login_page).post(accounts::login_submit))
        .route(LOGOUT, get(accounts::logout).post(accounts::logout))
        .route(MANUFACTURER_LIST, get(manufacturers::list))
        .route(
            MANUFACTURER_CREATE,
            get(manufacturers::create_page).post(manufacturers::create_submit),
        )
        .route(
            MANUFACTURER_UPDATE,
            get(manufacturers::update_page).post(manufacturers::update_submit),
        )
        .route(
            MANUFACTURER_DELETE,
            get(manufacturers::delete_page).post(manufacturers::delete_submit),
        )
        .route(CAR_LIST, get(cars::list))
        .route(CAR_CREATE, get(cars::create_page).post(cars::create_submit))
        .route(CAR_DETAIL, get(cars::detail))
        .route(CAR_UPDATE, get(cars::update_page).post(cars::update_submit))
        .route(CAR_DELETE, get(cars::delete_page).post(cars::delete_submit))
        .route(CAR_TOGGLE_ASSIGN, post(cars::toggle_assign))
        .route(DRIVER_LIST, get(drivers::list))
        .route(
            DRIVER_CREATE,
            get(drivers::create_page).post(drivers::create_submit),
        )
        .route(DRIVER_DETAIL, get(drivers::detail))
        .route(
            DRIVER_UPDATE,
            get(drivers::update_page).post(drivers::update_submit),
        )
        .route(
            DRIVER_DELETE,
            get(drivers::delete_page).post(drivers::delete_submit),
        )
        .with_state(state)
}
