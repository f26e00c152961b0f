//! Input binding and validation for every page that accepts user data.
//!
//! A form is bound to [`FormData`] (urlencoded body or query string) and
//! validates field rules immediately. Rules that need the database
//! (uniqueness, foreign keys) run in a separate async step so the field
//! rules stay usable without storage.

pub mod car;
pub mod driver;
pub mod login;
pub mod manufacturer;
pub mod search;

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer, ser::SerializeMap};

pub use car::CarForm;
pub use driver::{DriverCreationForm, DriverLicenseUpdateForm, validate_license_number};
pub use login::LoginForm;
pub use manufacturer::ManufacturerForm;
pub use search::{CarSearchForm, DriverSearchForm, ManufacturerSearchForm, SearchForm};

/// Error key for messages that don't belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Raw submitted key/value pairs. Keys may repeat (multi-selects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(input: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    pub fn from_query(query: Option<&str>) -> Self {
        query.map(|q| Self::parse(q.as_bytes())).unwrap_or_default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value submitted under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Templates see the first value of every key.
impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut firsts: BTreeMap<&str, &str> = BTreeMap::new();
        for (k, v) in &self.pairs {
            firsts.entry(k.as_str()).or_insert(v.as_str());
        }
        let mut map = serializer.serialize_map(Some(firsts.len()))?;
        for (k, v) in firsts {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(FormData::parse(&body))
    }
}

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What every bound form exposes to handlers and templates.
pub trait Form {
    fn data(&self) -> &FormData;
    fn errors(&self) -> &FormErrors;

    fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Serializable `{ data, errors }` view of a bound form.
#[derive(Debug, Serialize)]
pub struct FormContext<'a> {
    pub data: &'a FormData,
    pub errors: &'a FormErrors,
}

impl<'a> FormContext<'a> {
    pub fn of<F: Form>(form: &'a F) -> Self {
        Self {
            data: form.data(),
            errors: form.errors(),
        }
    }
}

/// Required text field with a maximum length in characters.
pub(crate) fn clean_char(
    data: &FormData,
    errors: &mut FormErrors,
    field: &str,
    max_length: usize,
) -> Option<String> {
    let Some(value) = data.text(field) else {
        errors.add(field, REQUIRED);
        return None;
    };
    clean_max_length(errors, field, value, max_length)
}

/// Optional text field; blank becomes the empty string.
pub(crate) fn clean_optional_char(
    data: &FormData,
    errors: &mut FormErrors,
    field: &str,
    max_length: usize,
) -> Option<String> {
    let value = data.text(field).unwrap_or_default();
    clean_max_length(errors, field, value, max_length)
}

fn clean_max_length(
    errors: &mut FormErrors,
    field: &str,
    value: &str,
    max_length: usize,
) -> Option<String> {
    let len = value.chars().count();
    if len > max_length {
        errors.add(
            field,
            format!("Ensure this value has at most {max_length} characters (it has {len})."),
        );
        return None;
    }
    Some(value.to_string())
}

/// Parse a single primary-key choice.
pub(crate) fn clean_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
