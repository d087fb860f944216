use std::collections::HashMap;
use std::path::Path;

use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

use crate::{
    constant::{CREDENTIAL_KEY, IDENTITY_KEY, VAULT_FILE},
    error::TestError,
};

/// A built test environment: a mock API server, a scratch storage
/// directory for the file vault, and the endpoint mocks registered
/// through the builder.
pub struct TestSetup {
    pub server: ServerGuard,
    pub storage: TempDir,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    /// Base URL of the mock API, to hand to the crate under test.
    pub fn api_url(&self) -> String {
        self.server.url()
    }

    pub fn storage_dir(&self) -> &Path {
        self.storage.path()
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of
    /// times.
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }

    /// Reads the vault file back as a key/value map. Returns an empty map
    /// when the vault was never written or has been fully cleared.
    pub fn read_vault(&self) -> Result<HashMap<String, String>, TestError> {
        let path = self.storage.path().join(VAULT_FILE);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn persisted_credential(&self) -> Result<Option<String>, TestError> {
        Ok(self.read_vault()?.remove(CREDENTIAL_KEY))
    }

    pub fn persisted_identity(&self) -> Result<Option<String>, TestError> {
        Ok(self.read_vault()?.remove(IDENTITY_KEY))
    }
}
