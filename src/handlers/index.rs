use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::PrivateCookieJar;

use super::base_context;
use crate::middleware::auth::{CurrentDriver, build_cookie};
use crate::router::FleetState;
use crate::FleetError;

const VISITS_COOKIE: &str = "num_visits";

/// Home page: fleet totals and how often this browser has been here.
pub async fn index(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Html<String>), FleetError> {
    let counts = state.storage.counts().await?;
    let num_visits = jar
        .get(VISITS_COOKIE)
        .and_then(|c| c.value().parse::<u64>().ok())
        .unwrap_or(0)
        + 1;

    let mut ctx = base_context(Some(&user));
    ctx.insert("num_drivers", &counts.drivers);
    ctx.insert("num_cars", &counts.cars);
    ctx.insert("num_manufacturers", &counts.manufacturers);
    ctx.insert("num_visits", &num_visits);
    let page = state.templates.render("index.html", &ctx)?;

    let jar = jar.add(build_cookie(
        VISITS_COOKIE,
        num_visits.to_string(),
        state.secure_cookies,
    ));
    Ok((jar, page))
}
