//! Search + pagination for the three list pages.

use serde::Serialize;

use crate::db::{Car, Driver, FleetStorage, Manufacturer};
use crate::error::FleetError;
use crate::forms::{CarSearchForm, DriverSearchForm, ManufacturerSearchForm, SearchForm};
use crate::service::pagination::{PageMeta, Paginator};

/// Rows per list page.
pub const PAGINATE_BY: usize = 5;

/// One rendered page of a list view.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    pub object_list: Vec<T>,
    pub page_obj: PageMeta,
    pub is_paginated: bool,
}

impl<T> ListPage<T> {
    fn from_page(paginator: Paginator, number: usize, rows: Vec<T>) -> Self {
        let page = paginator.page(rows, number);
        let page_obj = page.meta();
        let is_paginated = page.has_other_pages();
        Self {
            object_list: page.object_list,
            page_obj,
            is_paginated,
        }
    }
}

pub async fn car_list(
    storage: &FleetStorage,
    search: &CarSearchForm,
    page: Option<&str>,
) -> Result<ListPage<Car>, FleetError> {
    let term = search.term();
    let paginator = Paginator::new(storage.count_cars(term).await?, PAGINATE_BY);
    let number = paginator.validate_number(page)?;
    let rows = storage
        .list_cars(term, paginator.per_page(), paginator.offset(number))
        .await?;
    Ok(ListPage::from_page(paginator, number, rows))
}

pub async fn driver_list(
    storage: &FleetStorage,
    search: &DriverSearchForm,
    page: Option<&str>,
) -> Result<ListPage<Driver>, FleetError> {
    let term = search.term();
    let paginator = Paginator::new(storage.count_drivers(term).await?, PAGINATE_BY);
    let number = paginator.validate_number(page)?;
    let rows = storage
        .list_drivers(term, paginator.per_page(), paginator.offset(number))
        .await?;
    Ok(ListPage::from_page(paginator, number, rows))
}

pub async fn manufacturer_list(
    storage: &FleetStorage,
    search: &ManufacturerSearchForm,
    page: Option<&str>,
) -> Result<ListPage<Manufacturer>, FleetError> {
    let term = search.term();
    let paginator = Paginator::new(storage.count_manufacturers(term).await?, PAGINATE_BY);
    let number = paginator.validate_number(page)?;
    let rows = storage
        .list_manufacturers(term, paginator.per_page(), paginator.offset(number))
        .await?;
    Ok(ListPage::from_page(paginator, number, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewCar, NewManufacturer};
    use crate::forms::FormData;
    use crate::service::pagination::PaginationError;

    async fn seeded_cars(n: usize) -> FleetStorage {
        let storage = FleetStorage::connect("sqlite::memory:").await.unwrap();
        let m = storage
            .create_manufacturer(&NewManufacturer {
                name: "Test Manufacturer".to_string(),
                country: "Germany".to_string(),
            })
            .await
            .unwrap();
        for i in 0..n {
            storage
                .create_car(&NewCar {
                    model: format!("Test Model {i}"),
                    manufacturer_id: m,
                    driver_ids: vec![],
                })
                .await
                .unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn first_page_holds_five_of_thirteen() {
        let storage = seeded_cars(13).await;
        let search = CarSearchForm::bind(FormData::default());
        let page = car_list(&storage, &search, None).await.unwrap();
        assert!(page.is_paginated);
        assert_eq!(page.object_list.len(), 5);
        assert_eq!(page.page_obj.num_pages, 3);

        let last = car_list(&storage, &search, Some("last")).await.unwrap();
        assert_eq!(last.object_list.len(), 3);
        assert_eq!(last.page_obj.number, 3);
    }

    #[tokio::test]
    async fn single_page_is_not_paginated() {
        let storage = seeded_cars(5).await;
        let search = CarSearchForm::bind(FormData::default());
        let page = car_list(&storage, &search, None).await.unwrap();
        assert!(!page.is_paginated);
        assert_eq!(page.object_list.len(), 5);
    }

    #[tokio::test]
    async fn search_narrows_and_repeats_identically() {
        let storage = seeded_cars(13).await;
        let search = CarSearchForm::bind(FormData::from_pairs([("model", "model 1")]));
        let first = car_list(&storage, &search, None).await.unwrap();
        let models: Vec<_> = first.object_list.iter().map(|c| c.model.clone()).collect();
        assert_eq!(
            models,
            vec!["Test Model 1", "Test Model 10", "Test Model 11", "Test Model 12"]
        );
        let again = car_list(&storage, &search, None).await.unwrap();
        assert_eq!(again.object_list, first.object_list);
    }

    #[tokio::test]
    async fn out_of_range_page_is_an_error() {
        let storage = seeded_cars(3).await;
        let search = CarSearchForm::bind(FormData::default());
        let err = car_list(&storage, &search, Some("9")).await.unwrap_err();
        assert!(matches!(
            err,
            FleetError::InvalidPage(PaginationError::EmptyPage)
        ));
    }

    #[tokio::test]
    async fn empty_tables_render_one_empty_page() {
        let storage = FleetStorage::connect("sqlite::memory:").await.unwrap();
        let page = manufacturer_list(
            &storage,
            &ManufacturerSearchForm::bind(FormData::default()),
            None,
        )
        .await
        .unwrap();
        assert!(page.object_list.is_empty());
        assert!(!page.is_paginated);

        let drivers = driver_list(&storage, &DriverSearchForm::bind(FormData::default()), None)
            .await
            .unwrap();
        assert!(drivers.object_list.is_empty());
    }
}
