//! Handler: files.retain

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.retain";

#[derive(Debug, Deserialize)]
pub struct Input {
    pub id: String,
    pub reason: String,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.has_fields(&["id", "reason"])
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<Input>()?;
    let record = ctx.store()?.retain(&input.id, &input.reason)?;
    Ok(json!(record))
}
