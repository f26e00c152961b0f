use axum::{
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::{base_context, confirm_delete_context, list_context};
use crate::db::Driver;
use crate::forms::{
    DriverCreationForm, DriverLicenseUpdateForm, DriverSearchForm, Form, FormContext, FormData,
};
use crate::middleware::auth::CurrentDriver;
use crate::router::{DRIVER_DETAIL, DRIVER_LIST, FleetState, path_for};
use crate::service::listing;
use crate::FleetError;

/// GET /drivers/?username=<substring>&page=<n>
pub async fn list(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, FleetError> {
    let data = FormData::from_query(query.as_deref());
    let page = data.get("page").map(str::to_string);
    let search = DriverSearchForm::bind(data);
    let list = listing::driver_list(&state.storage, &search, page.as_deref()).await?;
    let ctx = list_context(&user, "driver_list", &list, &search);
    state.templates.render("taxi/driver_list.html", &ctx)
}

pub async fn detail(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let driver = load(&state, id).await?;
    let cars = state.storage.cars_for_driver(id).await?;

    let mut ctx = base_context(Some(&user));
    ctx.insert("driver", &driver);
    ctx.insert("cars", &cars);
    state.templates.render("taxi/driver_detail.html", &ctx)
}

pub async fn create_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
) -> Result<Html<String>, FleetError> {
    let form = DriverCreationForm::empty();
    let mut ctx = base_context(Some(&user));
    ctx.insert("form", &FormContext::of(&form));
    state.templates.render("taxi/driver_form.html", &ctx)
}

pub async fn create_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    data: FormData,
) -> Result<Response, FleetError> {
    let mut form = DriverCreationForm::bind(data);
    form.validate_unique(&state.storage).await?;
    if let Some(id) = form.save(&state.storage).await? {
        info!(id, by = %user.username, "driver created");
        return Ok(Redirect::to(&path_for(DRIVER_DETAIL, id)).into_response());
    }
    let mut ctx = base_context(Some(&user));
    ctx.insert("form", &FormContext::of(&form));
    Ok(state
        .templates
        .render("taxi/driver_form.html", &ctx)?
        .into_response())
}

/// License update page.
pub async fn update_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let driver = load(&state, id).await?;
    render_license_form(&state, &user, &DriverLicenseUpdateForm::initial(&driver), &driver)
}

pub async fn update_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
    data: FormData,
) -> Result<Response, FleetError> {
    let driver = load(&state, id).await?;
    let mut form = DriverLicenseUpdateForm::bind(data, &driver);
    form.validate_unique(&state.storage).await?;
    let saved = form.save(&state.storage).await?;
    if !form.is_valid() {
        return Ok(render_license_form(&state, &user, &form, &driver)?.into_response());
    }
    if !saved {
        return Err(FleetError::NotFound("Driver"));
    }
    info!(id, by = %user.username, "driver license updated");
    Ok(Redirect::to(&path_for(DRIVER_DETAIL, id)).into_response())
}

pub async fn delete_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let driver = load(&state, id).await?;
    let cancel = path_for(DRIVER_DETAIL, id);
    let ctx = confirm_delete_context(&user, "driver", &driver.username, &cancel);
    state.templates.render("taxi/confirm_delete.html", &ctx)
}

pub async fn delete_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Redirect, FleetError> {
    if !state.storage.delete_driver(id).await? {
        return Err(FleetError::NotFound("Driver"));
    }
    info!(id, by = %user.username, "driver deleted");
    Ok(Redirect::to(DRIVER_LIST))
}

async fn load(state: &FleetState, id: i64) -> Result<Driver, FleetError> {
    state
        .storage
        .get_driver(id)
        .await?
        .ok_or(FleetError::NotFound("Driver"))
}

fn render_license_form(
    state: &FleetState,
    user: &Driver,
    form: &DriverLicenseUpdateForm,
    object: &Driver,
) -> Result<Html<String>, FleetError> {
    let mut ctx = base_context(Some(user));
    ctx.insert("form", &FormContext::of(form));
    ctx.insert("object", object);
    state.templates.render("taxi/driver_license_form.html", &ctx)
}
