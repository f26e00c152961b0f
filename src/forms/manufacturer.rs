use super::{Form, FormData, FormErrors, clean_char};
use crate::db::{FleetStorage, Manufacturer, NewManufacturer, unique_violation_column};
use crate::error::FleetError;

const FIELD_MAX_LENGTH: usize = 255;
const NAME_TAKEN: &str = "Manufacturer with this Name already exists.";

#[derive(Debug, Clone)]
pub struct ManufacturerForm {
    data: FormData,
    errors: FormErrors,
    cleaned: Option<NewManufacturer>,
}

impl ManufacturerForm {
    pub fn bind(data: FormData) -> Self {
        let mut errors = FormErrors::default();
        let name = clean_char(&data, &mut errors, "name", FIELD_MAX_LENGTH);
        let country = clean_char(&data, &mut errors, "country", FIELD_MAX_LENGTH);
        let cleaned = name
            .zip(country)
            .map(|(name, country)| NewManufacturer { name, country });
        Self {
            data,
            errors,
            cleaned,
        }
    }

    pub fn initial(manufacturer: &Manufacturer) -> Self {
        Self {
            data: FormData::from_pairs([
                ("name", manufacturer.name.as_str()),
                ("country", manufacturer.country.as_str()),
            ]),
            errors: FormErrors::default(),
            cleaned: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: FormData::default(),
            errors: FormErrors::default(),
            cleaned: None,
        }
    }

    pub fn cleaned(&self) -> Option<&NewManufacturer> {
        self.cleaned.as_ref().filter(|_| self.is_valid())
    }

    /// Names are unique; `instance_id` is the row being edited, if any.
    pub async fn validate_unique(
        &mut self,
        storage: &FleetStorage,
        instance_id: Option<i64>,
    ) -> Result<(), FleetError> {
        let Some(new) = self.cleaned.as_ref() else {
            return Ok(());
        };
        if storage.manufacturer_name_taken(&new.name, instance_id).await? {
            self.errors.add("name", NAME_TAKEN);
        }
        Ok(())
    }

    pub async fn save(&mut self, storage: &FleetStorage) -> Result<Option<i64>, FleetError> {
        let Some(new) = self.cleaned() else {
            return Ok(None);
        };
        match storage.create_manufacturer(new).await {
            Ok(id) => Ok(Some(id)),
            Err(e) => self.record_unique_violation(e).map(|()| None),
        }
    }

    pub async fn update(&mut self, storage: &FleetStorage, id: i64) -> Result<bool, FleetError> {
        let Some(new) = self.cleaned() else {
            return Ok(false);
        };
        match storage.update_manufacturer(id, new).await {
            Ok(updated) => Ok(updated),
            Err(e) => self.record_unique_violation(e).map(|()| false),
        }
    }

    fn record_unique_violation(&mut self, err: FleetError) -> Result<(), FleetError> {
        if unique_violation_column(&err).as_deref() != Some("name") {
            return Err(err);
        }
        self.errors.add("name", NAME_TAKEN);
        Ok(())
    }
}

impl Form for ManufacturerForm {
    fn data(&self) -> &FormData {
        &self.data
    }

    fn errors(&self) -> &FormErrors {
        &self.errors
    }
}
