//! Error type for command handlers.

use thiserror::Error;

use crate::auth::AuthError;
use crate::error::RegistryError;
use crate::transfer::ExportError;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Payload decode / deserialization failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Guard rejected the command (input shape check failed).
    #[error("guard rejected command: {0}")]
    GuardRejected(String),

    /// No signed-in user.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but the role may not run this command.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Another handler panicked while holding the store.
    #[error("record store unavailable")]
    StoreUnavailable,
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Forbidden(_) => 403,
            HandlerError::Registry(err) => match err {
                RegistryError::Validation(_) => 400,
                RegistryError::NotFound(_) => 404,
                RegistryError::InvalidTransition { .. } => 409,
                RegistryError::Persistence(_) => 502,
            },
            HandlerError::Export(_) => 500,
            HandlerError::Auth(err) => match err {
                AuthError::InvalidCredentials => 401,
                AuthError::AlreadyRegistered(_) => 409,
                AuthError::UnknownUser(_) => 404,
                AuthError::UnknownRole(_) => 400,
                AuthError::Storage(_) => 500,
            },
            HandlerError::StoreUnavailable => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;
    use crate::record::FileStatus;
    use crate::status::StatusAction;

    #[test]
    fn registry_errors_map_to_status_codes() {
        let cases = [
            (RegistryError::Validation("x".into()), 400),
            (RegistryError::NotFound("f1".into()), 404),
            (
                RegistryError::InvalidTransition {
                    id: "f1".into(),
                    from: FileStatus::Prestado,
                    action: StatusAction::Borrow,
                },
                409,
            ),
            (RegistryError::Persistence(ModelError::Storage("down".into())), 502),
        ];
        for (err, code) in cases {
            assert_eq!(HandlerError::from(err).status_code(), code);
        }
        assert_eq!(HandlerError::Forbidden("viewer".into()).status_code(), 403);
        assert_eq!(HandlerError::from(AuthError::InvalidCredentials).status_code(), 401);
        assert_eq!(
            HandlerError::from(AuthError::AlreadyRegistered("ana@archivo.org".into())).status_code(),
            409
        );
    }
}
