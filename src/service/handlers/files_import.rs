//! Handler: files.import

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};
use crate::transfer::{parse_rows, RawRow};

pub const COMMAND: &str = "files.import";

#[derive(Debug, Deserialize)]
pub struct Input {
    /// Spreadsheet rows, column label to cell text.
    pub rows: Vec<RawRow>,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.raw_input()["rows"].is_array()
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<Input>()?;
    let summary = ctx.store()?.import_rows(parse_rows(&input.rows));
    Ok(json!(summary))
}
