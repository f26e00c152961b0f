use super::{Form, FormData, FormErrors, NON_FIELD_ERRORS, REQUIRED};
use crate::db::{Driver, FleetStorage};
use crate::error::FleetError;
use crate::service::password::verify_password;

pub const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Clone)]
pub struct LoginForm {
    data: FormData,
    errors: FormErrors,
}

impl LoginForm {
    pub fn bind(data: FormData) -> Self {
        let mut errors = FormErrors::default();
        if data.text("username").is_none() {
            errors.add("username", REQUIRED);
        }
        if data.get("password").is_none_or(str::is_empty) {
            errors.add("password", REQUIRED);
        }
        Self { data, errors }
    }

    pub fn empty() -> Self {
        Self {
            data: FormData::default(),
            errors: FormErrors::default(),
        }
    }

    /// Resolve the credentials to a driver, recording a non-field error on failure.
    pub async fn authenticate(
        &mut self,
        storage: &FleetStorage,
    ) -> Result<Option<Driver>, FleetError> {
        if !self.is_valid() {
            return Ok(None);
        }
        let username = self.data.text("username").unwrap_or_default();
        let password = self.data.get("password").unwrap_or_default();
        let driver = match storage.get_driver_by_username(username).await? {
            Some(d) => verify_password(password, &d.password_hash)
                .await?
                .then_some(d),
            None => None,
        };
        if driver.is_none() {
            self.errors.add(NON_FIELD_ERRORS, INVALID_LOGIN);
        }
        Ok(driver)
    }
}

impl Form for LoginForm {
    fn data(&self) -> &FormData {
        &self.data
    }

    fn errors(&self) -> &FormErrors {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewDriver;
    use crate::service::password::hash_password;

    #[test]
    fn both_fields_required() {
        let form = LoginForm::bind(FormData::default());
        assert!(form.errors().contains("username"));
        assert!(form.errors().contains("password"));
    }

    #[tokio::test]
    async fn authenticates_against_stored_hash() {
        let storage = FleetStorage::connect("sqlite::memory:").await.unwrap();
        storage
            .create_driver(&NewDriver {
                username: "testuser".to_string(),
                password_hash: hash_password("password12345").await.unwrap(),
                first_name: String::new(),
                last_name: String::new(),
                license_number: None,
            })
            .await
            .unwrap();

        let mut ok = LoginForm::bind(FormData::from_pairs([
            ("username", "testuser"),
            ("password", "password12345"),
        ]));
        let driver = ok.authenticate(&storage).await.unwrap();
        assert_eq!(driver.map(|d| d.username).as_deref(), Some("testuser"));

        let mut bad = LoginForm::bind(FormData::from_pairs([
            ("username", "testuser"),
            ("password", "nope"),
        ]));
        assert!(bad.authenticate(&storage).await.unwrap().is_none());
        assert_eq!(bad.errors().get(NON_FIELD_ERRORS), [INVALID_LOGIN.to_string()]);

        let mut unknown = LoginForm::bind(FormData::from_pairs([
            ("username", "ghost"),
            ("password", "password12345"),
        ]));
        assert!(unknown.authenticate(&storage).await.unwrap().is_none());
    }
}
