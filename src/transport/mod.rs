//! Transport gateway.
//!
//! Every outbound request the console makes goes through [`TransportGateway`],
//! which wraps the HTTP client with a symmetric hook pair:
//!
//! - Outbound: attach the session's credential as a bearer authorization
//!   header when one is held.
//! - Inbound: treat HTTP 401 as credential invalidation. When the
//!   operator is not already on the login view, clear the session (state
//!   and vault, fully, before anything else) and redirect to login; in
//!   every case re-signal the failure so call sites can react.
//!
//! The hook pair is cross-cutting: the typed auth endpoints and the
//! generic verb helpers all funnel through the same [`TransportGateway::execute`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{auth::AuthError, Error},
    model::{
        api::{ErrorDto, LoginDto},
        identity::{IdentityDto, IdentityPatch},
    },
    navigator::Navigator,
    session::SessionCore,
};

/// Request timeout, matching the original console's client configuration.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TransportGateway {
    http: reqwest::Client,
    base_url: String,
    login_route: String,
    core: Arc<SessionCore>,
    navigator: Arc<dyn Navigator>,
}

impl TransportGateway {
    pub fn new(
        config: &Config,
        core: Arc<SessionCore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            login_route: config.login_route.clone(),
            core,
            navigator,
        })
    }

    /// Exchanges a username/password for a credential and identity.
    ///
    /// A 401 here means the credentials were wrong, not that an existing
    /// session expired, so it surfaces as
    /// [`AuthError::InvalidCredentials`]. The inbound hook still runs
    /// uniformly; its clearing is conditional on not being on the login
    /// view, which is where login attempts originate.
    pub(crate) async fn login(&self, username: &str, password: &str) -> Result<LoginDto, Error> {
        let form = [("username", username), ("password", password)];
        let request = self.http.post(self.endpoint("/auth/login")).form(&form);

        let response = match self.execute(request).await {
            Err(Error::AuthError(AuthError::Unauthorized)) => {
                return Err(AuthError::InvalidCredentials.into())
            }
            other => other?,
        };

        let login = response.json::<LoginDto>().await.map_err(AuthError::from)?;

        Ok(login)
    }

    /// Asks the API who the current credential belongs to.
    pub(crate) async fn fetch_identity(&self) -> Result<IdentityDto, Error> {
        let request = self.http.get(self.endpoint("/auth/me"));
        let response = self.execute(request).await?;

        let identity = response
            .json::<IdentityDto>()
            .await
            .map_err(AuthError::from)?;

        Ok(identity)
    }

    /// Submits a profile patch and returns the updated identity.
    pub(crate) async fn update_identity(&self, patch: &IdentityPatch) -> Result<IdentityDto, Error> {
        let request = self.http.put(self.endpoint("/auth/me")).json(patch);
        let response = self.execute(request).await?;

        let identity = response
            .json::<IdentityDto>()
            .await
            .map_err(AuthError::from)?;

        Ok(identity)
    }

    /// GET a JSON resource through the hook pair.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self.execute(self.http.get(self.endpoint(path))).await?;

        Ok(response.json::<T>().await.map_err(AuthError::from)?)
    }

    /// POST a JSON body through the hook pair.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let request = self.http.post(self.endpoint(path)).json(body);
        let response = self.execute(request).await?;

        Ok(response.json::<T>().await.map_err(AuthError::from)?)
    }

    /// PUT a JSON body through the hook pair.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let request = self.http.put(self.endpoint(path)).json(body);
        let response = self.execute(request).await?;

        Ok(response.json::<T>().await.map_err(AuthError::from)?)
    }

    /// DELETE a resource through the hook pair.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute(self.http.delete(self.endpoint(path))).await?;

        Ok(())
    }

    /// Runs one request through the before/after hook pair. Every
    /// outbound call in the crate funnels through here.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, Error> {
        let request = match self.core.credential() {
            Some(credential) => request.bearer_auth(credential),
            None => request,
        };

        let response = request.send().await.map_err(AuthError::from)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized().await;
            return Err(AuthError::Unauthorized.into());
        }

        Self::check_status(response).await
    }

    /// The single authorization-failure handler: clears the session and
    /// sends the operator back to login, unless they are already there.
    /// The teardown completes before the redirect is issued so no stale
    /// credential is observable afterwards.
    async fn handle_unauthorized(&self) {
        let current = self.navigator.current_route();
        if current == self.login_route {
            debug!("authorization failure on the login view, nothing to clear");
            return;
        }

        warn!(route = %current, "authorization failure, clearing session");
        self.core.invalidate().await;
        self.navigator.redirect(&self.login_route);
    }

    /// Maps non-success statuses (401 is handled earlier) onto the error
    /// taxonomy: 400/422 carry a validation detail, everything else is
    /// reported as a transport-level failure.
    async fn check_status(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = error_detail(response).await;
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(AuthError::Validation(detail).into())
            }
            _ => Err(AuthError::Network(format!("unexpected status {status}: {detail}")).into()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn error_detail(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorDto>().await {
        Ok(body) => body.detail,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
