//! Handler: files.add

use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::record::NewFileRecord;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.add";

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.raw_input().is_object()
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<NewFileRecord>()?;
    let record = ctx.store()?.add(input)?;
    Ok(json!(record))
}
