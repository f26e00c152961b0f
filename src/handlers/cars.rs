use axum::{
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::{base_context, confirm_delete_context, list_context};
use crate::db::{Car, Driver};
use crate::forms::{CarForm, CarSearchForm, FormContext, FormData};
use crate::middleware::auth::CurrentDriver;
use crate::router::{CAR_DETAIL, CAR_LIST, FleetState, path_for};
use crate::service::listing;
use crate::FleetError;

/// GET /cars/?model=<substring>&page=<n>
pub async fn list(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, FleetError> {
    let data = FormData::from_query(query.as_deref());
    let page = data.get("page").map(str::to_string);
    let search = CarSearchForm::bind(data);
    let list = listing::car_list(&state.storage, &search, page.as_deref()).await?;
    let ctx = list_context(&user, "car_list", &list, &search);
    state.templates.render("taxi/car_list.html", &ctx)
}

pub async fn detail(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let car = load(&state, id).await?;
    let drivers = state.storage.car_drivers(id).await?;
    let is_assigned = drivers.iter().any(|d| d.id == user.id);

    let mut ctx = base_context(Some(&user));
    ctx.insert("car", &car);
    ctx.insert("drivers", &drivers);
    ctx.insert("is_assigned", &is_assigned);
    state.templates.render("taxi/car_detail.html", &ctx)
}

pub async fn create_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
) -> Result<Html<String>, FleetError> {
    render_form(&state, &user, &CarForm::empty(), None).await
}

pub async fn create_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    data: FormData,
) -> Result<Response, FleetError> {
    let mut form = CarForm::bind(data);
    form.validate_choices(&state.storage).await?;
    if let Some(id) = form.save(&state.storage).await? {
        info!(id, by = %user.username, "car created");
        return Ok(Redirect::to(CAR_LIST).into_response());
    }
    Ok(render_form(&state, &user, &form, None).await?.into_response())
}

pub async fn update_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let car = load(&state, id).await?;
    let driver_ids: Vec<i64> = state
        .storage
        .car_drivers(id)
        .await?
        .iter()
        .map(|d| d.id)
        .collect();
    render_form(&state, &user, &CarForm::initial(&car, &driver_ids), Some(&car)).await
}

pub async fn update_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
    data: FormData,
) -> Result<Response, FleetError> {
    let car = load(&state, id).await?;
    let mut form = CarForm::bind(data);
    form.validate_choices(&state.storage).await?;
    if form.cleaned().is_none() {
        return Ok(render_form(&state, &user, &form, Some(&car)).await?.into_response());
    }
    if !form.update(&state.storage, id).await? {
        return Err(FleetError::NotFound("Car"));
    }
    info!(id, by = %user.username, "car updated");
    Ok(Redirect::to(CAR_LIST).into_response())
}

pub async fn delete_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let car = load(&state, id).await?;
    let cancel = path_for(CAR_DETAIL, id);
    let ctx = confirm_delete_context(&user, "car", &car.model, &cancel);
    state.templates.render("taxi/confirm_delete.html", &ctx)
}

pub async fn delete_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Redirect, FleetError> {
    if !state.storage.delete_car(id).await? {
        return Err(FleetError::NotFound("Car"));
    }
    info!(id, by = %user.username, "car deleted");
    Ok(Redirect::to(CAR_LIST))
}

/// POST /cars/{id}/toggle-assign/
///
/// Adds the current driver to the car, or removes them when already assigned.
pub async fn toggle_assign(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Redirect, FleetError> {
    load(&state, id).await?;
    let assigned = state.storage.toggle_car_driver(id, user.id).await?;
    info!(car = id, driver = user.id, assigned, "car assignment toggled");
    Ok(Redirect::to(&path_for(CAR_DETAIL, id)))
}

async fn load(state: &FleetState, id: i64) -> Result<Car, FleetError> {
    state
        .storage
        .get_car(id)
        .await?
        .ok_or(FleetError::NotFound("Car"))
}

/// The form page needs every manufacturer and driver as choices.
async fn render_form(
    state: &FleetState,
    user: &Driver,
    form: &CarForm,
    object: Option<&Car>,
) -> Result<Html<String>, FleetError> {
    let manufacturers = state.storage.all_manufacturers().await?;
    let drivers = state.storage.all_drivers().await?;

    let mut ctx = base_context(Some(user));
    ctx.insert("form", &FormContext::of(form));
    ctx.insert("object", &object);
    ctx.insert("manufacturers", &manufacturers);
    ctx.insert("drivers", &drivers);
    ctx.insert("selected_manufacturer", &form.selected_manufacturer());
    ctx.insert("selected_drivers", &form.selected_drivers());
    state.templates.render("taxi/car_form.html", &ctx)
}
