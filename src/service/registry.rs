use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::context::Context;
use super::error::HandlerError;
use super::handlers;
use super::service::Service;
use super::session::Session;
use crate::auth::{AuthError, Authenticator, SessionTokens, UserProfile};
use crate::config::RegistryConfig;
use crate::filter::{FilterSet, Pagination};
use crate::model::ModelStore;
use crate::store::RecordStore;

/// Shared state behind the `files.*` and `auth.*` commands.
///
/// Records are shared by every caller. Filters and page position are kept
/// per signed-in session, keyed by its token.
pub struct Registry<S> {
    store: Mutex<RecordStore<S>>,
    views: Mutex<HashMap<String, ListView>>,
    auth: Arc<dyn Authenticator>,
    tokens: SessionTokens,
    config: RegistryConfig,
}

/// One session's filters and page over the shared record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub filters: FilterSet,
    pub pagination: Pagination,
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: FilterSet::new(),
            pagination: Pagination::new(page_size),
        }
    }
}

/// A caller whose token resolved to a known user.
#[derive(Debug, Clone)]
pub struct Caller {
    pub token: String,
    pub profile: UserProfile,
}

impl<S: ModelStore> Registry<S> {
    pub fn new(store: RecordStore<S>, auth: Arc<dyn Authenticator>, config: RegistryConfig) -> Self {
        Self {
            store: Mutex::new(store),
            views: Mutex::new(HashMap::new()),
            auth,
            tokens: SessionTokens::new(),
            config,
        }
    }

    /// Exclusive access to the record store.
    pub fn store(&self) -> Result<MutexGuard<'_, RecordStore<S>>, HandlerError> {
        self.store.lock().map_err(|_| HandlerError::StoreUnavailable)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.auth.as_ref()
    }

    /// Check credentials and open a session.
    pub fn login(&self, email: &str, password: &str) -> Result<Caller, HandlerError> {
        let profile = self.auth.login(email, password).inspect_err(|err| {
            warn!(%err, "login failed");
        })?;
        let token = self.tokens.issue(&profile.uid)?;
        info!(uid = %profile.uid, role = %profile.role, "session opened");
        Ok(Caller { token, profile })
    }

    /// Close the caller's session and drop its view.
    pub fn logout(&self, caller: &Caller) -> Result<(), HandlerError> {
        self.tokens.revoke(&caller.token)?;
        self.views()?.remove(&caller.token);
        debug!(uid = %caller.profile.uid, "session closed");
        Ok(())
    }

    /// Identify the caller from the bearer token in their session.
    ///
    /// The profile, role included, is read from the authenticator on every
    /// call, so a role change applies to open sessions.
    pub fn caller(&self, session: &Session) -> Result<Caller, HandlerError> {
        let token = session
            .bearer_token()
            .ok_or_else(|| HandlerError::Unauthorized("missing bearer token".into()))?;
        let uid = self
            .tokens
            .resolve(token)?
            .ok_or_else(|| HandlerError::Unauthorized("unknown or revoked session token".into()))?;

        let profile = match self.auth.profile(&uid) {
            Ok(profile) => profile,
            Err(AuthError::UnknownUser(_)) => {
                return Err(HandlerError::Unauthorized("session user no longer exists".into()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Caller {
            token: token.to_string(),
            profile,
        })
    }

    /// Run `f` on the view of the session holding `token`, creating it on
    /// first use with the configured page size.
    pub fn with_view<T>(
        &self,
        token: &str,
        f: impl FnOnce(&mut ListView) -> T,
    ) -> Result<T, HandlerError> {
        let mut views = self.views()?;
        let view = views
            .entry(token.to_string())
            .or_insert_with(|| ListView::new(self.config.page_size));
        Ok(f(view))
    }

    fn views(&self) -> Result<MutexGuard<'_, HashMap<String, ListView>>, HandlerError> {
        self.views.lock().map_err(|_| HandlerError::StoreUnavailable)
    }
}

impl<'a, S: ModelStore> Context<'a, Registry<S>> {
    pub fn store(&self) -> Result<MutexGuard<'_, RecordStore<S>>, HandlerError> {
        self.state().store()
    }

    /// The signed-in caller. `Unauthorized` without a valid token.
    pub fn caller(&self) -> Result<Caller, HandlerError> {
        self.state().caller(self.session())
    }

    /// Require a signed-in caller whose role may edit records.
    pub fn require_editor(&self) -> Result<Caller, HandlerError> {
        let caller = self.caller()?;
        if !caller.profile.role.can_edit() {
            return Err(HandlerError::Forbidden(format!(
                "{} requires the admin role, {} is {}",
                self.command_name(),
                caller.profile.email,
                caller.profile.role
            )));
        }
        Ok(caller)
    }
}

/// A service with every `auth.*` and `files.*` command registered.
pub fn registry_service<S>(
    store: RecordStore<S>,
    auth: Arc<dyn Authenticator>,
    config: RegistryConfig,
) -> Service<Registry<S>>
where
    S: ModelStore + 'static,
{
    crate::register_handlers!(
        Service::new(Registry::new(store, auth, config)),
        handlers::auth_login,
        handlers::auth_logout,
        handlers::auth_me,
        handlers::files_load,
        handlers::files_list,
        handlers::files_add,
        handlers::files_update,
        handlers::files_delete,
        handlers::files_delete_many,
        handlers::files_borrow,
        handlers::files_return,
        handlers::files_retain,
        handlers::files_release,
        handlers::files_export,
        handlers::files_import,
        handlers::files_template,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{InMemoryAuthenticator, Role};
    use crate::model::InMemoryModelStore;

    fn registry() -> (Registry<InMemoryModelStore>, InMemoryAuthenticator) {
        let auth = InMemoryAuthenticator::new();
        let registry = Registry::new(
            RecordStore::new(InMemoryModelStore::new()),
            Arc::new(auth.clone()),
            RegistryConfig::default(),
        );
        (registry, auth)
    }

    #[test]
    fn caller_needs_an_issued_token() {
        let (registry, auth) = registry();
        auth.register("ana@archivo.org", "clave", None).unwrap();

        assert!(matches!(registry.caller(&Session::new()), Err(HandlerError::Unauthorized(_))));
        assert!(matches!(
            registry.caller(&Session::with_token("forged")),
            Err(HandlerError::Unauthorized(_))
        ));

        let opened = registry.login("ana@archivo.org", "clave").unwrap();
        let caller = registry.caller(&Session::with_token(&opened.token)).unwrap();
        assert_eq!(caller.profile.email, "ana@archivo.org");
    }

    #[test]
    fn role_changes_apply_to_open_sessions() {
        let (registry, auth) = registry();
        let user = auth.register("luis@archivo.org", "clave", None).unwrap();
        let opened = registry.login("luis@archivo.org", "clave").unwrap();
        assert_eq!(opened.profile.role, Role::Viewer);

        auth.set_role(&user.uid, Role::Admin).unwrap();
        let caller = registry.caller(&Session::with_token(&opened.token)).unwrap();
        assert_eq!(caller.profile.role, Role::Admin);
    }

    #[test]
    fn logout_revokes_token_and_view() {
        let (registry, auth) = registry();
        auth.register("ana@archivo.org", "clave", None).unwrap();
        let caller = registry.login("ana@archivo.org", "clave").unwrap();
        registry
            .with_view(&caller.token, |view| view.pagination.set_page_size(20))
            .unwrap();

        registry.logout(&caller).unwrap();
        assert!(registry.caller(&Session::with_token(&caller.token)).is_err());
        let page_size = registry
            .with_view(&caller.token, |view| view.pagination.page_size())
            .unwrap();
        assert_eq!(page_size, 10);
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let (registry, auth) = registry();
        auth.register("ana@archivo.org", "clave", None).unwrap();
        let err = registry.login("ana@archivo.org", "otra").unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
