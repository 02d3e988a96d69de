//! Command service over the record store.
//!
//! Register command handlers on a `Service`. Each handler receives a
//! `Context<R>` with the JSON input, the caller's session variables and the
//! shared state. `registry_service` wires the `auth.*` and `files.*`
//! commands to a `RecordStore` and an `Authenticator`.
//!
//! Callers sign in with `auth.login` and present the returned token as
//! `authorization: Bearer <token>`. The role behind a token is looked up on
//! every request.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use archive_registry::{service, InMemoryAuthenticator, InMemoryModelStore, RecordStore, RegistryConfig};
//! use serde_json::json;
//!
//! let store = RecordStore::new(InMemoryModelStore::new());
//! let auth = Arc::new(InMemoryAuthenticator::new());
//! let service = Arc::new(service::registry_service(store, auth, RegistryConfig::default()));
//!
//! let login = service.dispatch(
//!     "auth.login",
//!     json!({ "email": "jefe@archivo.org", "password": "..." }),
//!     service::Session::new(),
//! )?;
//! let session = service::Session::with_token(login["token"].as_str().unwrap_or_default());
//!
//! service.dispatch("files.borrow", json!({ "id": "f1", "borrower": "Ana" }), session)?;
//!
//! // HTTP transport (requires "http" feature)
//! // service::serve(service, "0.0.0.0:3000").await?;
//! ```
//!
//! ## Handler Convention
//!
//! Each file under `handlers/` exports:
//!
//! - `COMMAND: &str` the command name
//! - `guard(ctx) -> bool` input shape check
//! - `handle(ctx) -> Result<Value, HandlerError>` the handler

mod context;
mod error;
pub mod handlers;
mod registry;
#[allow(clippy::module_inception)]
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use registry::{registry_service, Caller, ListView, Registry};
pub use service::{CommandRequest, CommandResponse, Service};
pub use session::{Session, AUTHORIZATION_HEADER};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register handler modules with a service using the convention pattern.
///
/// # Example
/// ```ignore
/// let service = archive_registry::register_handlers!(
///     Service::new(registry),
///     handlers::files_add,
///     handlers::files_delete,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
