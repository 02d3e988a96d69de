//! Handler: files.export

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};
use crate::transfer::{export_file_name, export_sheet, Exporter, JsonExporter};

pub const COMMAND: &str = "files.export";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Only records whose start date falls in this year.
    pub year: Option<i32>,
    /// Export the whole collection instead of the caller's filtered view.
    pub all: bool,
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

    let export = &ctx.state().config().export;
    let store = ctx.store()?;
    let sheet = if input.all {
        export_sheet(&export.sheet_name, store.records(), input.year)
    } else {
        let filters = ctx.state().with_view(&caller.token, |view| view.filters.clone())?;
        export_sheet(&export.sheet_name, filters.apply(store.records()), input.year)
    };
    drop(store);

    let exporter = JsonExporter;
    let content = exporter.export(&sheet)?;
    Ok(json!({
        "fileName": export_file_name(&export.file_stem, input.year, exporter.extension()),
        "rows": sheet.len(),
        "content": String::from_utf8_lossy(&content),
    }))
}
