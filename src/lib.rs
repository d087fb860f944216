//! Session, transport, and navigation-guard core for an administrative
//! web console.
//!
//! The crate owns the authentication state machine of the console: a
//! [`session::SessionStore`] that holds the bearer credential and the
//! operator's identity across restarts, a [`transport::TransportGateway`]
//! that injects the credential into every outbound request and reacts to
//! authorization failures, and a [`guard::NavigationGuard`] that decides
//! whether a route transition may proceed. Views, message catalogs, and
//! the REST backend itself are external collaborators reached through the
//! [`navigator::Navigator`] and [`session::vault::SessionVault`] seams.

pub mod config;
pub mod error;
pub mod guard;
pub mod locale;
pub mod model;
pub mod navigator;
pub mod session;
pub mod transport;
