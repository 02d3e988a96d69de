//! Handler: files.update

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::record::FileRecordPatch;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.update";

#[derive(Debug, Deserialize)]
pub struct Input {
    pub id: String,
    pub patch: FileRecordPatch,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.has_fields(&["id", "patch"])
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<Input>()?;
    let record = ctx.store()?.update(&input.id, input.patch)?;
    Ok(json!(record))
}
