//! Handler: files.release

use serde_json::{json, Value};

use super::IdInput;
use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.release";

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<IdInput>()?;
    let record = ctx.store()?.release(&input.id)?;
    Ok(json!(record))
}
