//! Handler: files.load

use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "files.load";

pub fn guard<S: ModelStore>(_ctx: &Context<Registry<S>>) -> bool {
    true
}

/// Refetch the whole collection from the backend.
pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    ctx.caller()?;
    let count = ctx.store()?.load_all()?;
    Ok(json!({ "count": count }))
}
