//! Handler: auth.login

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::service::{Context, HandlerError, Registry};

pub const COMMAND: &str = "auth.login";

#[derive(Debug, Deserialize)]
pub struct Input {
    pub email: String,
    pub password: String,
}

pub fn guard<S: ModelStore>(ctx: &Context<Registry<S>>) -> bool {
    ctx.raw_input()["email"].is_string() && ctx.raw_input()["password"].is_string()
}

/// Exchange credentials for a bearer token.
pub fn handle<S: ModelStore>(ctx: &Context<Registry<S>>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let caller = ctx.state().login(&input.email, &input.password)?;
    Ok(json!({
        "token": caller.token,
        "profile": caller.profile,
    }))
}
