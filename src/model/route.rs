use std::collections::HashMap;

/// Access level a route demands, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Reachable without a credential (the login view).
    Public,
    /// Requires a credential and a loaded identity.
    Authenticated,
    /// Requires an identity with the admin role on top.
    AdminOnly,
}

/// Immutable registry of route policies.
///
/// Built once when the console boots and handed to the navigation guard.
/// Paths that were never registered are treated as [`RoutePolicy::Authenticated`]:
/// the console protects everything it does not explicitly open up.
#[derive(Clone, Debug)]
pub struct RouteTable {
    login_route: String,
    home_route: String,
    policies: HashMap<String, RoutePolicy>,
}

impl RouteTable {
    /// Creates a table with the given login and home paths. The login
    /// route is registered as public; the home route as authenticated.
    pub fn new(login_route: &str, home_route: &str) -> Self {
        let mut policies = HashMap::new();
        policies.insert(login_route.to_string(), RoutePolicy::Public);
        policies.insert(home_route.to_string(), RoutePolicy::Authenticated);

        Self {
            login_route: login_route.to_string(),
            home_route: home_route.to_string(),
            policies,
        }
    }

    /// Registers a policy for a path. Last registration wins.
    pub fn register(mut self, path: &str, policy: RoutePolicy) -> Self {
        self.policies.insert(path.to_string(), policy);
        self
    }

    pub fn policy(&self, path: &str) -> RoutePolicy {
        self.policies
            .get(path)
            .copied()
            .unwrap_or(RoutePolicy::Authenticated)
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn home_route(&self) -> &str {
        &self.home_route
    }

    pub fn is_login(&self, path: &str) -> bool {
        path == self.login_route
    }
}
