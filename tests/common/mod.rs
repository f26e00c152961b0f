#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use taxi_service::db::{FleetStorage, NewCar, NewDriver, NewManufacturer};
use taxi_service::router::{FleetState, fleet_router};
use taxi_service::service::password::hash_password;
use taxi_service::templates::Templates;
use tower::ServiceExt;

pub const TEST_USERNAME: &str = "testuser";
pub const TEST_PASSWORD: &str = "password12345";

const SECRET_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub storage: FleetStorage,
    /// `sessionid=...` for the logged-in test user.
    pub session: String,
    pub user_id: i64,
}

/// Router over a fresh in-memory database, without anybody logged in.
pub async fn spawn_app() -> (Router, FleetStorage) {
    let storage = FleetStorage::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    let templates = Templates::new().expect("templates compile");
    let state = FleetState::new(storage.clone(), templates, SECRET_KEY, true);
    (fleet_router(state), storage)
}

/// Router plus a session cookie for `testuser`.
pub async fn logged_in_app() -> TestApp {
    let (router, storage) = spawn_app().await;
    let user_id = create_driver(&storage, TEST_USERNAME, TEST_PASSWORD, None).await;
    let resp = post_form(
        &router,
        "/accounts/login/",
        &format!("username={TEST_USERNAME}&password={TEST_PASSWORD}"),
        None,
    )
    .await;
    let session = session_cookie(&resp).expect("login sets a session cookie");
    TestApp {
        router,
        storage,
        session,
        user_id,
    }
}

pub async fn create_driver(
    storage: &FleetStorage,
    username: &str,
    password: &str,
    license_number: Option<&str>,
) -> i64 {
    let password_hash = hash_password(password).await.expect("hash password");
    storage
        .create_driver(&NewDriver {
            username: username.to_string(),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            license_number: license_number.map(str::to_string),
        })
        .await
        .expect("create driver")
}

pub async fn create_manufacturer(storage: &FleetStorage, name: &str) -> i64 {
    storage
        .create_manufacturer(&NewManufacturer {
            name: name.to_string(),
            country: "Germany".to_string(),
        })
        .await
        .expect("create manufacturer")
}

pub async fn create_car(storage: &FleetStorage, model: &str, manufacturer_id: i64) -> i64 {
    storage
        .create_car(&NewCar {
            model: model.to_string(),
            manufacturer_id,
            driver_ids: vec![],
        })
        .await
        .expect("create car")
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(req.body(Body::empty()).expect("failed to build request"))
        .await
        .expect("request failed")
}

pub async fn post_form(
    router: &Router,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(
            req.body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// `name=value` of the `sessionid` cookie set by a response.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("sessionid=") && pair.len() > "sessionid=".len())
        .map(str::to_string)
}
