/// Seam between the session core and the host UI's router.
///
/// The transport gateway consults the current location before reacting to
/// an authorization failure and issues the redirect through this trait;
/// the navigation guard itself never redirects directly, it returns a
/// decision instead.
pub trait Navigator: Send + Sync {
    /// Path of the view currently being displayed.
    fn current_route(&self) -> String;

    /// Replaces the current view with the given path.
    fn redirect(&self, path: &str);
}
