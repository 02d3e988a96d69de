//! Handler: auth.me

use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "auth.me";

pub fn guard<S: ModelStore>(_ctx: &Context<Registry<S>>) -> bool {
    true
}

/// The caller's current profile, role included.
pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    let caller = ctx.caller()?;
    Ok(json!(caller.profile))
}
