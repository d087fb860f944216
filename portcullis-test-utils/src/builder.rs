//! Declarative test environment builder.
//!
//! Configuration methods queue endpoint mocks and persisted-session
//! fixtures; everything is materialized during the final `build()` call,
//! which starts the mock server and lays out the storage directory.

use serde_json::Value;

use crate::{
    constant::{CREDENTIAL_KEY, IDENTITY_KEY, VAULT_FILE},
    error::TestError,
    fixtures::identity,
    setup::TestSetup,
};

struct EndpointSpec {
    method: &'static str,
    path: String,
    status: usize,
    body: String,
    expect: Option<usize>,
}

pub struct TestBuilder {
    endpoints: Vec<EndpointSpec>,
    persisted: Vec<(String, String)>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            persisted: Vec::new(),
        }
    }

    /// Queue an arbitrary JSON endpoint mock.
    pub fn with_endpoint(
        mut self,
        method: &'static str,
        path: &str,
        status: usize,
        body: &Value,
    ) -> Self {
        self.endpoints.push(EndpointSpec {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            expect: None,
        });
        self
    }

    /// Like `with_endpoint`, additionally asserting the endpoint is hit
    /// exactly `hits` times when `assert_mocks()` runs.
    pub fn with_expected_endpoint(
        mut self,
        method: &'static str,
        path: &str,
        status: usize,
        body: &Value,
        hits: usize,
    ) -> Self {
        self.endpoints.push(EndpointSpec {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            expect: Some(hits),
        });
        self
    }

    /// Login endpoint answering 200 with a token and the given user.
    pub fn with_login_success(self, user: &Value) -> Self {
        self.with_endpoint("POST", "/auth/login", 200, &identity::login_response(user))
    }

    /// Login endpoint answering 401, the wrong-password case.
    pub fn with_login_rejected(self) -> Self {
        self.with_endpoint(
            "POST",
            "/auth/login",
            401,
            &identity::error_body("Incorrect username or password"),
        )
    }

    /// Who-am-I endpoint answering 200 with the given identity.
    pub fn with_identity(self, user: &Value) -> Self {
        self.with_endpoint("GET", "/auth/me", 200, user)
    }

    /// Who-am-I endpoint answering 200, asserting it is hit exactly
    /// `hits` times.
    pub fn with_identity_expected(self, user: &Value, hits: usize) -> Self {
        self.with_expected_endpoint("GET", "/auth/me", 200, user, hits)
    }

    /// Who-am-I endpoint answering 401, the expired-credential case.
    pub fn with_identity_unauthorized(self) -> Self {
        self.with_endpoint(
            "GET",
            "/auth/me",
            401,
            &identity::error_body("Could not validate credentials"),
        )
    }

    /// Profile update endpoint answering 200 with the given identity.
    pub fn with_update_success(self, user: &Value) -> Self {
        self.with_endpoint("PUT", "/auth/me", 200, user)
    }

    /// Profile update endpoint answering 400 with a validation detail.
    pub fn with_update_rejected(self, detail: &str) -> Self {
        self.with_endpoint("PUT", "/auth/me", 400, &identity::error_body(detail))
    }

    /// Seed the storage directory with a persisted session pair, the
    /// state a previous process run would have left behind.
    pub fn with_persisted_session(mut self, token: &str, user: &Value) -> Self {
        self.persisted
            .push((CREDENTIAL_KEY.to_string(), token.to_string()));
        self.persisted
            .push((IDENTITY_KEY.to_string(), user.to_string()));
        self
    }

    /// Seed the storage directory with a credential but no identity.
    pub fn with_persisted_credential(mut self, token: &str) -> Self {
        self.persisted
            .push((CREDENTIAL_KEY.to_string(), token.to_string()));
        self
    }

    /// Seed the storage directory with an identity but no credential, an
    /// invariant-violating residue the crate must discard on hydration.
    pub fn with_persisted_orphan_identity(mut self, user: &Value) -> Self {
        self.persisted
            .push((IDENTITY_KEY.to_string(), user.to_string()));
        self
    }

    /// Materialize the environment: start the mock server, create the
    /// queued endpoint mocks, and write any persisted-session fixture
    /// into a fresh storage directory.
    pub async fn build(self) -> Result<TestSetup, TestError> {
        let mut server = mockito::Server::new_async().await;
        let storage = tempfile::tempdir()?;

        if !self.persisted.is_empty() {
            let map: std::collections::HashMap<_, _> = self.persisted.into_iter().collect();
            let path = storage.path().join(VAULT_FILE);
            std::fs::write(&path, serde_json::to_string(&map)?)?;
        }

        let mut mocks = Vec::new();
        for spec in self.endpoints {
            let mut mock = server
                .mock(spec.method, spec.path.as_str())
                .with_status(spec.status)
                .with_header("content-type", "application/json")
                .with_body(&spec.body);
            if let Some(hits) = spec.expect {
                mock = mock.expect(hits);
            }
            mocks.push(mock.create_async().await);
        }

        Ok(TestSetup {
            server,
            storage,
            mocks,
        })
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
