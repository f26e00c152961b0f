use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use super::base_context;
use crate::forms::{Form, FormContext, FormData, LoginForm};
use crate::middleware::auth::{end_session, safe_next, start_session};
use crate::router::FleetState;
use crate::FleetError;

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    next: Option<String>,
}

pub async fn login_page(
    State(state): State<FleetState>,
    Query(params): Query<NextParam>,
) -> Result<Html<String>, FleetError> {
    render_login(&state, &LoginForm::empty(), params.next.as_deref())
}

/// POST /accounts/login/
pub async fn login_submit(
    State(state): State<FleetState>,
    jar: PrivateCookieJar,
    data: FormData,
) -> Result<Response, FleetError> {
    let next = data.get("next").map(str::to_string);
    let mut form = LoginForm::bind(data);
    match form.authenticate(&state.storage).await? {
        Some(driver) => {
            info!(username = %driver.username, "driver logged in");
            let jar = start_session(jar, driver.id, state.secure_cookies);
            Ok((jar, Redirect::to(safe_next(next.as_deref()))).into_response())
        }
        None => {
            warn!(
                username = form.data().text("username").unwrap_or_default(),
                "login rejected"
            );
            Ok(render_login(&state, &form, next.as_deref())?.into_response())
        }
    }
}

/// Clears the session; accepts GET and POST.
pub async fn logout(
    State(state): State<FleetState>,
    jar: PrivateCookieJar,
) -> Result<Response, FleetError> {
    let page = state
        .templates
        .render("registration/logged_out.html", &base_context(None))?;
    Ok((end_session(jar), page).into_response())
}

fn render_login(
    state: &FleetState,
    form: &LoginForm,
    next: Option<&str>,
) -> Result<Html<String>, FleetError> {
    let mut ctx = base_context(None);
    ctx.insert("form", &FormContext::of(form));
    ctx.insert("next", next.unwrap_or_default());
    state.templates.render("registration/login.html", &ctx)
}
