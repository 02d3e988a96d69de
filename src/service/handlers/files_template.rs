//! Handler: files.template

use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};
use crate::transfer::import_template;

pub const COMMAND: &str = "files.template";

pub fn guard<S: ModelStore>(_ctx: &Context<Registry<S>>) -> bool {
    true
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.caller()?;
    Ok(json!(import_template()))
}
