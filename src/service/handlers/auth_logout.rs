//! Handler: auth.logout

use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "auth.logout";

pub fn guard<S: ModelStore>(_ctx: &Context<Registry<S>>) -> bool {
    true
}

pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    let caller = ctx.caller()?;
    ctx.state().logout(&caller)?;
    Ok(json!({ "ok": true }))
}
