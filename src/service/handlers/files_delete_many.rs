//! Handler: files.delete_many
//!
//! Partial failure is not an error: the response lists what went through
//! and what did not.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.delete_many";

#[derive(Debug, Deserialize)]
pub struct Input {
    pub ids: Vec<String>,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.raw_input()["ids"].is_array()
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.require_editor()?;
    let input = ctx.input::<Input>()?;
    let summary = ctx.store()?.remove_many(input.ids);
    Ok(json!(summary))
}
