use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

use crate::db::Driver;
use crate::router::{FleetState, LOGIN};

pub const SESSION_COOKIE: &str = "sessionid";
const SESSION_MAX_AGE_DAYS: i64 = 14;

/// The logged-in driver. Requests without a valid session are redirected
/// to the login page with `next` pointing back at the original URL.
#[derive(Debug, Clone)]
pub struct CurrentDriver(pub Driver);

impl<S> FromRequestParts<S> for CurrentDriver
where
    S: Send + Sync,
    FleetState: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = FleetState::from_ref(state);
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.key.clone());
        let session_id = jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok());

        if let Some(id) = session_id {
            match state.storage.get_driver(id).await {
                Ok(Some(driver)) => return Ok(Self(driver)),
                Ok(None) => {}
                Err(e) => return Err(e.into_response()),
            }
        }

        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Err(Redirect::to(&login_redirect(next)).into_response())
    }
}

/// `/accounts/login/?next=<next>`
pub fn login_redirect(next: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{LOGIN}?{query}")
}

/// Only same-site absolute paths are followed after login; anything else goes home.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => "/",
    }
}

pub fn start_session(jar: PrivateCookieJar, driver_id: i64, secure: bool) -> PrivateCookieJar {
    jar.add(build_cookie(SESSION_COOKIE, driver_id.to_string(), secure))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

pub fn build_cookie(name: &str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
