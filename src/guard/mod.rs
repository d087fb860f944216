//! Navigation guard.
//!
//! Evaluated before every route transition. The guard reads the session,
//! lazily loads the identity when a credential is held but no identity
//! is cached yet, and maps the target route's policy onto one of three
//! terminal outcomes. It never redirects by itself; the host router
//! applies the returned outcome.

use tracing::debug;

use crate::{
    model::route::{RoutePolicy, RouteTable},
    session::SessionStore,
};

/// Terminal outcome of a guarded route transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The transition may proceed.
    Allow,
    /// The operator must (re-)authenticate first.
    RedirectLogin,
    /// The operator is authenticated but not authorized; silent downgrade
    /// to the home view, not an error page.
    RedirectHome,
}

impl GuardOutcome {
    /// Resolves a redirect outcome to its concrete path.
    pub fn target<'a>(&self, routes: &'a RouteTable) -> Option<&'a str> {
        match self {
            Self::Allow => None,
            Self::RedirectLogin => Some(routes.login_route()),
            Self::RedirectHome => Some(routes.home_route()),
        }
    }
}

pub struct NavigationGuard {
    store: SessionStore,
    routes: RouteTable,
}

impl NavigationGuard {
    pub fn new(store: SessionStore, routes: RouteTable) -> Self {
        Self { store, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decides whether the transition from `from` to `to` may proceed.
    ///
    /// Decision order:
    /// 1. Target is the login view: authenticated operators are bounced
    ///    home, everyone else is let through.
    /// 2. Unauthenticated operators only reach public routes; everything
    ///    else redirects to login.
    /// 3. Authenticated with no cached identity: the identity fetch is
    ///    fully awaited before any further decision. A failed fetch has
    ///    already torn the session down, so the only sane outcome is the
    ///    login view; no optimistic entry happens in the meantime.
    /// 4. Admin-only targets require the admin role.
    /// 5. Allow.
    pub async fn before_each(&self, to: &str, from: &str) -> GuardOutcome {
        debug!(%to, %from, "evaluating route transition");

        if self.routes.is_login(to) {
            return if self.store.is_authenticated() {
                GuardOutcome::RedirectHome
            } else {
                GuardOutcome::Allow
            };
        }

        let policy = self.routes.policy(to);

        if !self.store.is_authenticated() {
            return if policy == RoutePolicy::Public {
                GuardOutcome::Allow
            } else {
                GuardOutcome::RedirectLogin
            };
        }

        if self.store.current_identity().is_none() {
            match self.store.fetch_identity().await {
                Ok(Some(_)) => {}
                // The store logged itself out on failure; Ok(None) means
                // the credential vanished between the check and the call.
                Ok(None) | Err(_) => return GuardOutcome::RedirectLogin,
            }
        }

        if policy == RoutePolicy::AdminOnly {
            let is_admin = self
                .store
                .current_identity()
                .map(|identity| identity.is_admin())
                .unwrap_or(false);

            if !is_admin {
                debug!(%to, "non-admin identity, downgrading to home");
                return GuardOutcome::RedirectHome;
            }
        }

        GuardOutcome::Allow
    }
}
