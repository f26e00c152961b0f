//! Page handlers. Every handler except login/logout takes [`CurrentDriver`],
//! so unauthenticated requests never reach them.
//!
//! [`CurrentDriver`]: crate::middleware::auth::CurrentDriver

pub mod accounts;
pub mod cars;
pub mod drivers;
pub mod index;
pub mod manufacturers;

use serde::Serialize;
use tera::Context;

use crate::db::Driver;
use crate::forms::{FormContext, SearchForm};
use crate::service::listing::ListPage;

pub(crate) fn base_context(user: Option<&Driver>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("user", &user);
    ctx
}

/// Context for a list page: objects under `key` (and `object_list`),
/// pagination data and the search box state.
pub(crate) fn list_context<T, F>(user: &Driver, key: &str, list: &ListPage<T>, search: &F) -> Context
where
    T: Serialize,
    F: SearchForm,
{
    let mut ctx = base_context(Some(user));
    ctx.insert(key, &list.object_list);
    ctx.insert("object_list", &list.object_list);
    ctx.insert("is_paginated", &list.is_paginated);
    ctx.insert("page_obj", &list.page_obj);
    ctx.insert("search_form", &FormContext::of(search));
    ctx.insert("search_field", F::FIELD);
    ctx.insert(
        "search_value",
        search.data().get(F::FIELD).unwrap_or_default(),
    );
    ctx.insert("search_query", &search.query_suffix());
    ctx
}

pub(crate) fn confirm_delete_context(
    user: &Driver,
    object_kind: &str,
    object_label: &str,
    cancel_url: &str,
) -> Context {
    let mut ctx = base_context(Some(user));
    ctx.insert("object_kind", object_kind);
    ctx.insert("object_label", object_label);
    ctx.insert("cancel_url", cancel_url);
    ctx
}
