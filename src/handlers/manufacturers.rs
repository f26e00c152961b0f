use axum::{
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::{base_context, confirm_delete_context, list_context};
use crate::db::{Driver, Manufacturer};
use crate::forms::{FormContext, FormData, ManufacturerForm, ManufacturerSearchForm};
use crate::middleware::auth::CurrentDriver;
use crate::router::{FleetState, MANUFACTURER_LIST};
use crate::service::listing;
use crate::FleetError;

/// GET /manufacturers/?name=<substring>&page=<n>
pub async fn list(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, FleetError> {
    let data = FormData::from_query(query.as_deref());
    let page = data.get("page").map(str::to_string);
    let search = ManufacturerSearchForm::bind(data);
    let list = listing::manufacturer_list(&state.storage, &search, page.as_deref()).await?;
    let ctx = list_context(&user, "manufacturer_list", &list, &search);
    state.templates.render("taxi/manufacturer_list.html", &ctx)
}

pub async fn create_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
) -> Result<Html<String>, FleetError> {
    render_form(&state, &user, &ManufacturerForm::empty(), None)
}

pub async fn create_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    data: FormData,
) -> Result<Response, FleetError> {
    let mut form = ManufacturerForm::bind(data);
    form.validate_unique(&state.storage, None).await?;
    if let Some(id) = form.save(&state.storage).await? {
        info!(id, by = %user.username, "manufacturer created");
        return Ok(Redirect::to(MANUFACTURER_LIST).into_response());
    }
    Ok(render_form(&state, &user, &form, None)?.into_response())
}

pub async fn update_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let manufacturer = load(&state, id).await?;
    render_form(
        &state,
        &user,
        &ManufacturerForm::initial(&manufacturer),
        Some(&manufacturer),
    )
}

pub async fn update_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
    data: FormData,
) -> Result<Response, FleetError> {
    let manufacturer = load(&state, id).await?;
    let mut form = ManufacturerForm::bind(data);
    form.validate_unique(&state.storage, Some(id)).await?;
    if form.update(&state.storage, id).await? {
        info!(id, by = %user.username, "manufacturer updated");
        return Ok(Redirect::to(MANUFACTURER_LIST).into_response());
    }
    Ok(render_form(&state, &user, &form, Some(&manufacturer))?.into_response())
}

pub async fn delete_page(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Html<String>, FleetError> {
    let manufacturer = load(&state, id).await?;
    let ctx = confirm_delete_context(&user, "manufacturer", &manufacturer.name, MANUFACTURER_LIST);
    state.templates.render("taxi/confirm_delete.html", &ctx)
}

pub async fn delete_submit(
    State(state): State<FleetState>,
    CurrentDriver(user): CurrentDriver,
    Path(id): Path<i64>,
) -> Result<Redirect, FleetError> {
    if !state.storage.delete_manufacturer(id).await? {
        return Err(FleetError::NotFound("Manufacturer"));
    }
    info!(id, by = %user.username, "manufacturer deleted");
    Ok(Redirect::to(MANUFACTURER_LIST))
}

async fn load(state: &FleetState, id: i64) -> Result<Manufacturer, FleetError> {
    state
        .storage
        .get_manufacturer(id)
        .await?
        .ok_or(FleetError::NotFound("Manufacturer"))
}

fn render_form(
    state: &FleetState,
    user: &Driver,
    form: &ManufacturerForm,
    object: Option<&Manufacturer>,
) -> Result<Html<String>, FleetError> {
    let mut ctx = base_context(Some(user));
    ctx.insert("form", &FormContext::of(form));
    ctx.insert("object", &object);
    state.templates.render("taxi/manufacturer_form.html", &ctx)
}
