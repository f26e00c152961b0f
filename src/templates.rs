//! HTML templates compiled into the binary and rendered with tera.

use std::collections::HashMap;

use axum::response::Html;
use tera::{Context, Tera, Value};

use crate::error::FleetError;
use crate::router::reverse;

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../templates/", $name)))),*]
    };
}

const TEMPLATES: &[(&str, &str)] = embedded![
    "base.html",
    "index.html",
    "includes/non_field_errors.html",
    "includes/pagination.html",
    "includes/search.html",
    "registration/logged_out.html",
    "registration/login.html",
    "taxi/car_detail.html",
    "taxi/car_form.html",
    "taxi/car_list.html",
    "taxi/confirm_delete.html",
    "taxi/driver_detail.html",
    "taxi/driver_form.html",
    "taxi/driver_license_form.html",
    "taxi/driver_list.html",
    "taxi/manufacturer_form.html",
    "taxi/manufacturer_list.html",
];

pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse every embedded template; fails on the first syntax error.
    pub fn new() -> Result<Self, FleetError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.register_function("url", url_for);
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<Html<String>, FleetError> {
        Ok(Html(self.tera.render(name, context)?))
    }
}

/// `{{ url(name="taxi:car-detail", id=car.id) | safe }}`
fn url_for(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("url: missing `name`"))?;
    let id = args.get("id").and_then(Value::as_i64);
    reverse(name, id)
        .map(Value::String)
        .ok_or_else(|| tera::Error::msg(format!("url: cannot resolve `{name}`")))
}
