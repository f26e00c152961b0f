use std::sync::LazyLock;

use regex::Regex;

use super::{Form, FormData, FormErrors, clean_char, clean_optional_char};
use crate::db::{Driver, FleetStorage, NewDriver, unique_violation_column};
use crate::error::FleetError;
use crate::service::password::{hash_password, validate_password};

pub const LICENSE_NUMBER_LENGTH: usize = 8;
const USERNAME_MAX_LENGTH: usize = 150;
const NAME_MAX_LENGTH: usize = 150;

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const LICENSE_TAKEN: &str = "Driver with this License number already exists.";

static LICENSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[0-9]{5}$").expect("license number pattern"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern"));

/// Check the `AAA00000` shape, explaining the first rule that fails.
pub fn validate_license_number(value: &str) -> Result<(), String> {
    if LICENSE_NUMBER_RE.is_match(value) {
        return Ok(());
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != LICENSE_NUMBER_LENGTH {
        return Err(format!(
            "License number should consist of {LICENSE_NUMBER_LENGTH} characters."
        ));
    }
    if !chars[..3].iter().all(char::is_ascii_uppercase) {
        return Err("First 3 characters should be uppercase letters.".to_string());
    }
    Err("Last 5 characters should be digits.".to_string())
}

fn clean_license_number(data: &FormData, errors: &mut FormErrors) -> Option<String> {
    let value = clean_char(data, errors, "license_number", LICENSE_NUMBER_LENGTH * 4)?;
    match validate_license_number(&value) {
        Ok(()) => Some(value),
        Err(msg) => {
            errors.add("license_number", msg);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverSignup {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
}

/// New driver account: credentials, profile names and license number.
#[derive(Debug, Clone)]
pub struct DriverCreationForm {
    data: FormData,
    errors: FormErrors,
    cleaned: Option<DriverSignup>,
}

impl DriverCreationForm {
    pub fn bind(data: FormData) -> Self {
        let mut errors = FormErrors::default();

        let username = clean_char(&data, &mut errors, "username", USERNAME_MAX_LENGTH).filter(|u| {
            let ok = USERNAME_RE.is_match(u);
            if !ok {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            }
            ok
        });
        let first_name = clean_optional_char(&data, &mut errors, "first_name", NAME_MAX_LENGTH);
        let last_name = clean_optional_char(&data, &mut errors, "last_name", NAME_MAX_LENGTH);
        let license_number = clean_license_number(&data, &mut errors);

        // passwords are never trimmed
        let password1 = data.get("password1").filter(|p| !p.is_empty());
        let password2 = data.get("password2").filter(|p| !p.is_empty());
        if password1.is_none() {
            errors.add("password1", super::REQUIRED);
        }
        if password2.is_none() {
            errors.add("password2", super::REQUIRED);
        }
        let password = match (password1, password2) {
            (Some(p1), Some(p2)) if p1 != p2 => {
                errors.add("password2", "The two password fields didn't match.");
                None
            }
            (Some(p1), Some(_)) => {
                let attrs = [
                    username.as_deref().unwrap_or_default(),
                    first_name.as_deref().unwrap_or_default(),
                    last_name.as_deref().unwrap_or_default(),
                ];
                let problems = validate_password(p1, &attrs);
                let ok = problems.is_empty();
                for msg in problems {
                    errors.add("password2", msg);
                }
                ok.then(|| p1.to_string())
            }
            _ => None,
        };

        let cleaned = match (username, password, first_name, last_name, license_number) {
            (Some(username), Some(password), Some(first_name), Some(last_name), Some(license))
                if errors.is_empty() =>
            {
                Some(DriverSignup {
                    username,
                    password,
                    first_name,
                    last_name,
                    license_number: license,
                })
            }
            _ => None,
        };

        Self {
            data,
            errors,
            cleaned,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: FormData::default(),
            errors: FormErrors::default(),
            cleaned: None,
        }
    }

    pub fn cleaned(&self) -> Option<&DriverSignup> {
        self.cleaned.as_ref().filter(|_| self.is_valid())
    }

    /// Username and license number must not belong to another driver.
    pub async fn validate_unique(&mut self, storage: &FleetStorage) -> Result<(), FleetError> {
        let Some(signup) = self.cleaned.as_ref() else {
            return Ok(());
        };
        if storage.username_taken(&signup.username).await? {
            self.errors.add("username", USERNAME_TAKEN);
        }
        if storage.license_taken(&signup.license_number, None).await? {
            self.errors.add("license_number", LICENSE_TAKEN);
        }
        Ok(())
    }

    /// Hash the password and insert the driver. `None` when the form is
    /// invalid, including a username or license taken since validation.
    pub async fn save(&mut self, storage: &FleetStorage) -> Result<Option<i64>, FleetError> {
        let Some(signup) = self.cleaned() else {
            return Ok(None);
        };
        let password_hash = hash_password(&signup.password).await?;
        let new = NewDriver {
            username: signup.username.clone(),
            password_hash,
            first_name: signup.first_name.clone(),
            last_name: signup.last_name.clone(),
            license_number: Some(signup.license_number.clone()),
        };
        match storage.create_driver(&new).await {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                record_unique_violation(&mut self.errors, e)?;
                Ok(None)
            }
        }
    }
}

/// Turn a lost uniqueness race into the same field error `validate_unique` gives.
fn record_unique_violation(errors: &mut FormErrors, err: FleetError) -> Result<(), FleetError> {
    match unique_violation_column(&err).as_deref() {
        Some("username") => errors.add("username", USERNAME_TAKEN),
        Some("license_number") => errors.add("license_number", LICENSE_TAKEN),
        _ => return Err(err),
    }
    Ok(())
}

impl Form for DriverCreationForm {
    fn data(&self) -> &FormData {
        &self.data
    }

    fn errors(&self) -> &FormErrors {
        &self.errors
    }
}

/// Changes the license number of one existing driver.
#[derive(Debug, Clone)]
pub struct DriverLicenseUpdateForm {
    data: FormData,
    errors: FormErrors,
    instance_id: i64,
    license_number: Option<String>,
}

impl DriverLicenseUpdateForm {
    pub fn bind(data: FormData, instance: &Driver) -> Self {
        let mut errors = FormErrors::default();
        let license_number = clean_license_number(&data, &mut errors);
        Self {
            data,
            errors,
            instance_id: instance.id,
            license_number,
        }
    }

    /// Unbound form showing the driver's current license.
    pub fn initial(instance: &Driver) -> Self {
        let mut data = FormData::default();
        data.set(
            "license_number",
            instance.license_number.clone().unwrap_or_default(),
        );
        Self {
            data,
            errors: FormErrors::default(),
            instance_id: instance.id,
            license_number: None,
        }
    }

    pub fn license_number(&self) -> Option<&str> {
        self.license_number.as_deref().filter(|_| self.is_valid())
    }

    pub async fn validate_unique(&mut self, storage: &FleetStorage) -> Result<(), FleetError> {
        let Some(license) = self.license_number.as_deref() else {
            return Ok(());
        };
        if storage.license_taken(license, Some(self.instance_id)).await? {
            self.errors.add("license_number", LICENSE_TAKEN);
        }
        Ok(())
    }

    /// Writes only `license_number`; returns false when invalid or when the
    /// driver no longer exists.
    pub async fn save(&mut self, storage: &FleetStorage) -> Result<bool, FleetError> {
        let Some(license) = self.license_number() else {
            return Ok(false);
        };
        match storage.update_license(self.instance_id, license).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                record_unique_violation(&mut self.errors, e)?;
                Ok(false)
            }
        }
    }
}

impl Form for DriverLicenseUpdateForm {
    fn data(&self) -> &FormData {
        &self.data
    }

    fn errors(&self) -> &FormErrors {
        &self.errors
    }
}
