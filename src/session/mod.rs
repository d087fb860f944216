//! Session state machine.
//!
//! The session is the pair (credential, identity) plus the transient
//! `loading` and `last_error` flags. [`SessionCore`] owns the state, the
//! persistence vault, and the locale registry; it is shared between the
//! public [`SessionStore`] and the transport gateway so both sides mutate
//! the same session through the same code paths. The core upholds one
//! invariant at all times: an identity is only ever held together with a
//! credential, and clearing the credential clears the identity in the
//! same state write.

pub mod vault;

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{auth::AuthErrorKind, Error},
    locale::Locales,
    model::identity::{IdentityDto, IdentityPatch},
    navigator::Navigator,
    session::vault::SessionVault,
    transport::TransportGateway,
};

/// Vault key for the raw bearer credential.
///
/// Namespaced under "portcullis:session:" to avoid collisions with other
/// state the host application may keep in the same vault.
pub const CREDENTIAL_KEY: &str = "portcullis:session:credential";

/// Vault key for the serialized identity.
pub const IDENTITY_KEY: &str = "portcullis:session:identity";

#[derive(Default)]
struct SessionState {
    credential: Option<String>,
    identity: Option<IdentityDto>,
    loading: bool,
    last_error: Option<AuthErrorKind>,
}

/// Shared owner of the session state, vault, and locale registry.
///
/// Created once per process and shared between the store and the
/// transport gateway. All state writes go through methods here so the
/// credential/identity invariant cannot be violated from outside.
pub struct SessionCore {
    state: RwLock<SessionState>,
    vault: Box<dyn SessionVault>,
    locales: Locales,
}

impl SessionCore {
    pub fn new(vault: Box<dyn SessionVault>, locales: Locales) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            vault,
            locales,
        }
    }

    pub fn credential(&self) -> Option<String> {
        self.read(|state| state.credential.clone())
    }

    pub fn identity(&self) -> Option<IdentityDto> {
        self.read(|state| state.identity.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.credential.is_some())
    }

    pub fn is_loading(&self) -> bool {
        self.read(|state| state.loading)
    }

    pub fn last_error(&self) -> Option<AuthErrorKind> {
        self.read(|state| state.last_error)
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Installs a freshly authenticated session: persists the pair first,
    /// then sets both halves in one state write, then propagates the
    /// identity's locale preference. Prior state is untouched when
    /// persistence fails.
    pub(crate) async fn establish(
        &self,
        credential: String,
        identity: IdentityDto,
    ) -> Result<(), Error> {
        self.vault.set(CREDENTIAL_KEY, &credential).await?;
        self.persist_identity(&identity).await?;

        self.write(|state| {
            state.credential = Some(credential);
            state.identity = Some(identity.clone());
        });
        self.locales.apply_preference(identity.locale.as_deref());

        debug!(username = %identity.username, "session established");

        Ok(())
    }

    /// Replaces the identity of an already-authenticated session,
    /// re-persisting it before the state write so a restart observes the
    /// same identity the caller was returned.
    pub(crate) async fn replace_identity(&self, identity: IdentityDto) -> Result<(), Error> {
        self.persist_identity(&identity).await?;

        self.write(|state| state.identity = Some(identity.clone()));
        self.locales.apply_preference(identity.locale.as_deref());

        Ok(())
    }

    /// Tears the session down: credential and identity are cleared in one
    /// state write and both vault keys are erased. Never fails; vault
    /// errors are logged and swallowed because teardown is the recovery
    /// path for authorization failures and must always complete.
    pub(crate) async fn invalidate(&self) {
        self.write(|state| {
            state.credential = None;
            state.identity = None;
        });

        for key in [CREDENTIAL_KEY, IDENTITY_KEY] {
            if let Err(err) = self.vault.clear(key).await {
                warn!(key, %err, "failed to erase persisted session key");
            }
        }
    }

    /// Restores the session pair from the vault without a network call.
    ///
    /// An identity found without a credential is discarded (it violates
    /// the session invariant and can only be the residue of a partial
    /// teardown), as is an identity that no longer deserializes. A
    /// restored identity's locale preference becomes the active locale.
    pub(crate) async fn hydrate(&self) -> Result<(), Error> {
        let credential = self.vault.get(CREDENTIAL_KEY).await?;
        let identity_json = self.vault.get(IDENTITY_KEY).await?;

        let Some(credential) = credential else {
            if identity_json.is_some() {
                warn!("discarding persisted identity found without a credential");
                self.invalidate().await;
            }
            return Ok(());
        };

        let identity = match identity_json {
            Some(json) => match serde_json::from_str::<IdentityDto>(&json) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(%err, "discarding persisted identity that no longer deserializes");
                    None
                }
            },
            None => None,
        };

        self.write(|state| {
            state.credential = Some(credential);
            state.identity = identity.clone();
        });

        if let Some(identity) = identity {
            self.locales.apply_preference(identity.locale.as_deref());
            debug!(username = %identity.username, "session restored from vault");
        }

        Ok(())
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.write(|state| state.loading = loading);
    }

    pub(crate) fn record_error(&self, kind: Option<AuthErrorKind>) {
        self.write(|state| state.last_error = kind);
    }

    async fn persist_identity(&self, identity: &IdentityDto) -> Result<(), Error> {
        let json = serde_json::to_string(identity)
            .map_err(crate::error::persist::PersistError::from)?;
        self.vault.set(IDENTITY_KEY, &json).await?;

        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }
}

/// Public handle to the session, cheap to clone.
///
/// Wraps the shared [`SessionCore`] and the [`TransportGateway`] and
/// exposes the four session mutations plus the read accessors the
/// navigation layer consumes.
#[derive(Clone)]
pub struct SessionStore {
    core: Arc<SessionCore>,
    gateway: Arc<TransportGateway>,
}

impl SessionStore {
    /// Wires up the session core, the transport gateway, and the store,
    /// then hydrates from the vault so a restarted process comes back
    /// authenticated without a network call.
    ///
    /// # Arguments
    /// - `config` - API base URL, routes, default locale, storage paths
    /// - `vault` - Persistence backend for the session pair
    /// - `navigator` - The host UI's router seam
    ///
    /// # Returns
    /// - `Ok(SessionStore)` - Ready-to-use store, hydrated
    /// - `Err(Error)` - HTTP client construction or vault read failed
    pub async fn open(
        config: &Config,
        vault: Box<dyn SessionVault>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let locales = Locales::new(&config.default_locale);
        let core = Arc::new(SessionCore::new(vault, locales));
        let gateway = Arc::new(TransportGateway::new(config, core.clone(), navigator)?);

        let store = Self { core, gateway };
        store.core.hydrate().await?;

        Ok(store)
    }

    /// Exchanges a username/password for a credential and identity.
    ///
    /// On success both halves of the session are set atomically and
    /// persisted before the identity is returned. On failure the prior
    /// session state is left untouched and the failure kind is recorded
    /// as `last_error`. The `loading` flag is true for the duration of
    /// the call and reset on every exit path.
    ///
    /// # Returns
    /// - `Ok(IdentityDto)` - Authenticated; session established
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))` - Rejected
    /// - `Err(Error::AuthError(AuthError::Network))` - Transport failure
    pub async fn login(&self, username: &str, password: &str) -> Result<IdentityDto, Error> {
        self.core.set_loading(true);
        self.core.record_error(None);

        let result = self.perform_login(username, password).await;

        self.core.set_loading(false);
        if let Err(err) = &result {
            self.core.record_error(err.auth_kind());
        }

        result
    }

    async fn perform_login(&self, username: &str, password: &str) -> Result<IdentityDto, Error> {
        let login = self.gateway.login(username, password).await?;

        self.core
            .establish(login.access_token, login.user.clone())
            .await?;

        Ok(login.user)
    }

    /// Clears the session and erases the persisted pair. Idempotent and
    /// infallible.
    pub async fn logout(&self) {
        self.core.invalidate().await;
        debug!("session cleared");
    }

    /// Fetches the operator's identity from the API and replaces the
    /// cached one.
    ///
    /// Returns `Ok(None)` immediately when no credential is held. On any
    /// failure the session is logged out before the error is re-signaled:
    /// an identity the API refuses to confirm means the credential can no
    /// longer be trusted. Callers (the navigation guard) rely on the
    /// teardown being complete by the time they observe the error.
    ///
    /// # Returns
    /// - `Ok(Some(IdentityDto))` - Identity refreshed and persisted
    /// - `Ok(None)` - Unauthenticated; nothing to fetch
    /// - `Err(Error::AuthError(AuthError::Unauthorized))` - Credential
    ///   rejected; session already cleared
    /// - `Err(Error::AuthError(AuthError::Network))` - Transport failure;
    ///   session already cleared
    pub async fn fetch_identity(&self) -> Result<Option<IdentityDto>, Error> {
        if !self.core.is_authenticated() {
            return Ok(None);
        }

        match self.try_fetch_identity().await {
            Ok(identity) => Ok(Some(identity)),
            Err(err) => {
                self.core.record_error(err.auth_kind());
                self.core.invalidate().await;
                Err(err)
            }
        }
    }

    async fn try_fetch_identity(&self) -> Result<IdentityDto, Error> {
        let identity = self.gateway.fetch_identity().await?;
        self.core.replace_identity(identity.clone()).await?;

        Ok(identity)
    }

    /// Submits a profile patch and replaces the cached identity with the
    /// API's response.
    ///
    /// A failure here is not a credential problem: the previous identity
    /// stays intact and the session is NOT logged out, unlike
    /// [`SessionStore::fetch_identity`].
    ///
    /// # Returns
    /// - `Ok(IdentityDto)` - Updated identity, persisted, locale applied
    /// - `Err(Error::AuthError(AuthError::Validation))` - Patch rejected
    /// - `Err(Error::AuthError(AuthError::Network))` - Transport failure
    pub async fn update_profile(&self, patch: &IdentityPatch) -> Result<IdentityDto, Error> {
        let result = self.try_update_profile(patch).await;

        if let Err(err) = &result {
            self.core.record_error(err.auth_kind());
        }

        result
    }

    async fn try_update_profile(&self, patch: &IdentityPatch) -> Result<IdentityDto, Error> {
        let identity = self.gateway.update_identity(patch).await?;
        self.core.replace_identity(identity.clone()).await?;

        Ok(identity)
    }

    pub fn is_authenticated(&self) -> bool {
        self.core.is_authenticated()
    }

    pub fn current_identity(&self) -> Option<IdentityDto> {
        self.core.identity()
    }

    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    pub fn last_error(&self) -> Option<AuthErrorKind> {
        self.core.last_error()
    }

    pub fn active_locale(&self) -> String {
        self.core.locales().active()
    }

    /// The transport gateway, for the console's other REST calls; every
    /// request through it inherits bearer injection and 401 recovery.
    pub fn gateway(&self) -> &TransportGateway {
        &self.gateway
    }
}
