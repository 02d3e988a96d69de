//! Handler: files.list
//!
//! Each session keeps its own filters and page. Records are shared.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RegistryError;
use crate::filter::{FilterField, FilterSet};
use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.list";

/// Every key is optional; omitted keys keep the session's view settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Input {
    /// Replaces all column filters and the search term when present.
    pub filters: Option<BTreeMap<String, String>>,
    pub search: Option<String>,
    pub page_size: Option<usize>,
    pub page_index: Option<usize>,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.raw_input().is_object() || ctx.raw_input().is_null()
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    let caller = ctx.caller()?;
    let input: Input = if ctx.raw_input().is_null() {
        Input::default()
    } else {
        ctx.input()?
    };

    // Reject bad keys and sizes before the view changes
    let filters = input
        .filters
        .map(|map| -> Result<FilterSet, RegistryError> {
            let mut filters = FilterSet::new();
            for (key, value) in map {
                filters.set(key.parse::<FilterField>()?, value);
            }
            Ok(filters)
        })
        .transpose()?;
    let page_sizes = &ctx.state().config().page_sizes;
    if let Some(size) = input.page_size.filter(|size| !page_sizes.contains(size)) {
        return Err(RegistryError::Validation(format!(
            "page size {} is not one of {:?}",
            size, page_sizes
        ))
        .into());
    }

    let store = ctx.store()?;
    ctx.state().with_view(&caller.token, |view| {
        if let Some(filters) = filters {
            view.filters = filters;
        }
        if let Some(term) = input.search {
            view.filters.set_search(term);
        }
        if let Some(size) = input.page_size {
            view.pagination.set_page_size(size);
        }

        let rows = view.filters.apply(store.records());
        match input.page_index {
            Some(index) => view.pagination.set_page_index(index, rows.len()),
            None => view.pagination.clamp(rows.len()),
        }

        let page = view.pagination.page(rows);
        json!({
            "records": page.records,
            "pageIndex": page.page_index,
            "pageSize": page.page_size,
            "pageCount": page.page_count,
            "total": page.total,
            "filters": &view.filters,
        })
    })
}
