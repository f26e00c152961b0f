//! Single-field search boxes for the list pages. Nothing is required: an
//! empty submission lists everything.

use super::{Form, FormData, FormErrors, clean_optional_char};

const SEARCH_MAX_LENGTH: usize = 255;

/// A list page's search box.
pub trait SearchForm: Form {
    /// Name of the single filter field.
    const FIELD: &'static str;

    /// The filter to apply, `None` for "show all" (also when invalid).
    fn term(&self) -> Option<&str>;

    /// `field=value` for carrying the search into pagination links.
    fn query_suffix(&self) -> String {
        match self.term() {
            Some(term) => url::form_urlencoded::Serializer::new(String::new())
                .append_pair(Self::FIELD, term)
                .finish(),
            None => String::new(),
        }
    }
}

macro_rules! search_form {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            data: FormData,
            errors: FormErrors,
            term: Option<String>,
        }

        impl $name {
            pub fn bind(data: FormData) -> Self {
                let mut errors = FormErrors::default();
                let term = clean_optional_char(&data, &mut errors, $field, SEARCH_MAX_LENGTH)
                    .filter(|t| !t.is_empty());
                Self { data, errors, term }
            }
        }

        impl SearchForm for $name {
            const FIELD: &'static str = $field;

            fn term(&self) -> Option<&str> {
                if self.is_valid() {
                    self.term.as_deref()
                } else {
                    None
                }
            }
        }

        impl Form for $name {
            fn data(&self) -> &FormData {
                &self.data
            }

            fn errors(&self) -> &FormErrors {
                &self.errors
            }
        }
    };
}

search_form!(
    /// Filters drivers by username.
    DriverSearchForm,
    "username"
);
search_form!(
    /// Filters cars by model.
    CarSearchForm,
    "model"
);
search_form!(
    /// Filters manufacturers by name.
    ManufacturerSearchForm,
    "name"
);
