use super::{Form, FormData, FormErrors, INVALID_CHOICE, REQUIRED, clean_char, clean_id};
use crate::db::{Car, FleetStorage, NewCar};
use crate::error::FleetError;

const MODEL_MAX_LENGTH: usize = 255;

/// Car create/update: model, one manufacturer, at least one driver.
#[derive(Debug, Clone)]
pub struct CarForm {
    data: FormData,
    errors: FormErrors,
    cleaned: Option<NewCar>,
}

impl CarForm {
    pub fn bind(data: FormData) -> Self {
        let mut errors = FormErrors::default();

        let model = clean_char(&data, &mut errors, "model", MODEL_MAX_LENGTH);

        let manufacturer_id = match data.text("manufacturer") {
            None => {
                errors.add("manufacturer", REQUIRED);
                None
            }
            Some(raw) => {
                let id = clean_id(raw);
                if id.is_none() {
                    errors.add("manufacturer", INVALID_CHOICE);
                }
                id
            }
        };

        let raw_drivers: Vec<&str> = data
            .get_all("drivers")
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        let driver_ids = if raw_drivers.is_empty() {
            errors.add("drivers", REQUIRED);
            None
        } else {
            let mut ids = Vec::with_capacity(raw_drivers.len());
            for raw in raw_drivers {
                match clean_id(raw) {
                    Some(id) if !ids.contains(&id) => ids.push(id),
                    Some(_) => {}
                    None => errors.add("drivers", format!("“{raw}” is not a valid value.")),
                }
            }
            Some(ids).filter(|_| !errors.contains("drivers"))
        };

        let cleaned = match (model, manufacturer_id, driver_ids) {
            (Some(model), Some(manufacturer_id), Some(driver_ids)) => Some(NewCar {
                model,
                manufacturer_id,
                driver_ids,
            }),
            _ => None,
        };

        Self {
            data,
            errors,
            cleaned,
        }
    }

    /// Unbound form pre-filled from an existing car.
    pub fn initial(car: &Car, driver_ids: &[i64]) -> Self {
        let mut pairs = vec![
            ("model".to_string(), car.model.clone()),
            ("manufacturer".to_string(), car.manufacturer_id.to_string()),
        ];
        pairs.extend(driver_ids.iter().map(|id| ("drivers".to_string(), id.to_string())));
        Self {
            data: FormData::from_pairs(pairs),
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

    pub fn cleaned(&self) -> Option<&NewCar> {
        self.cleaned.as_ref().filter(|_| self.is_valid())
    }

    /// Submitted manufacturer id, for re-selecting it in the form.
    pub fn selected_manufacturer(&self) -> Option<i64> {
        self.data.get("manufacturer").and_then(clean_id)
    }

    pub fn selected_drivers(&self) -> Vec<i64> {
        self.data
            .get_all("drivers")
            .into_iter()
            .filter_map(clean_id)
            .collect()
    }

    /// The chosen manufacturer and drivers must exist.
    pub async fn validate_choices(&mut self, storage: &FleetStorage) -> Result<(), FleetError> {
        let Some(car) = self.cleaned.as_ref() else {
            return Ok(());
        };
        if storage.get_manufacturer(car.manufacturer_id).await?.is_none() {
            self.errors.add("manufacturer", INVALID_CHOICE);
        }
        let found = storage.existing_driver_ids(&car.driver_ids).await?;
        if let Some(missing) = car.driver_ids.iter().find(|id| !found.contains(id)) {
            self.errors.add(
                "drivers",
                format!("Select a valid choice. {missing} is not one of the available choices."),
            );
        }
        Ok(())
    }

    pub async fn save(&self, storage: &FleetStorage) -> Result<Option<i64>, FleetError> {
        match self.cleaned() {
            Some(car) => Ok(Some(storage.create_car(car).await?)),
            None => Ok(None),
        }
    }

    pub async fn update(&self, storage: &FleetStorage, id: i64) -> Result<bool, FleetError> {
        match self.cleaned() {
            Some(car) => storage.update_car(id, car).await,
            None => Ok(false),
        }
    }
}

impl Form for CarForm {
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
    use crate::db::{NewDriver, NewManufacturer};

    #[test]
    fn car_form_empty_drivers() {
        let form = CarForm::bind(FormData::from_pairs([
            ("model", "Test Model"),
            ("manufacturer", "1"),
        ]));
        assert!(!form.is_valid());
        assert_eq!(form.errors().get("drivers"), [REQUIRED.to_string()]);
    }

    #[test]
    fn blank_driver_entries_count_as_empty() {
        let form = CarForm::bind(FormData::from_pairs([
            ("model", "Test Model"),
            ("manufacturer", "1"),
            ("drivers", ""),
        ]));
        assert!(!form.is_valid());
        assert!(form.errors().contains("drivers"));
    }

    #[test]
    fn car_form_no_data() {
        let form = CarForm::bind(FormData::default());
        assert!(!form.is_valid());
        for field in ["model", "manufacturer", "drivers"] {
            assert!(form.errors().contains(field), "{field}");
        }
    }

    #[test]
    fn valid_submission_dedups_drivers() {
        let form = CarForm::bind(FormData::parse(
            b"model=Corolla&manufacturer=2&drivers=3&drivers=4&drivers=3",
        ));
        assert!(form.is_valid());
        let car = form.cleaned().unwrap();
        assert_eq!(car.manufacturer_id, 2);
        assert_eq!(car.driver_ids, vec![3, 4]);
        assert_eq!(form.selected_drivers(), vec![3, 4, 3]);
    }

    #[test]
    fn non_numeric_choices_are_invalid() {
        let form = CarForm::bind(FormData::parse(b"model=X&manufacturer=abc&drivers=z"));
        assert_eq!(form.errors().get("manufacturer"), [INVALID_CHOICE.to_string()]);
        assert!(form.errors().contains("drivers"));
    }

    #[tokio::test]
    async fn unknown_ids_fail_choice_validation() {
        let storage = FleetStorage::connect("sqlite::memory:").await.unwrap();
        let m = storage
            .create_manufacturer(&NewManufacturer {
                name: "Test Manufacturer".to_string(),
                country: "Italy".to_string(),
            })
            .await
            .unwrap();
        let d = storage
            .create_driver(&NewDriver {
                username: "testdriver".to_string(),
                password_hash: "!".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                license_number: None,
            })
            .await
            .unwrap();

        let data = format!("model=Test+Model&manufacturer={}&drivers={}&drivers=999", m + 50, d);
        let mut form = CarForm::bind(FormData::parse(data.as_bytes()));
        form.validate_choices(&storage).await.unwrap();
        assert!(form.errors().contains("manufacturer"));
        assert!(form.errors().contains("drivers"));
        assert_eq!(form.save(&storage).await.unwrap(), None);

        let data = format!("model=Test+Model&manufacturer={m}&drivers={d}");
        let mut form = CarForm::bind(FormData::parse(data.as_bytes()));
        form.validate_choices(&storage).await.unwrap();
        assert!(form.is_valid());
        let id = form.save(&storage).await.unwrap().expect("saved");
        assert_eq!(storage.car_drivers(id).await.unwrap()[0].id, d);
    }
}
