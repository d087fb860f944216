pub const TEST_TOKEN: &str = "test-bearer-token-0001";
pub const TEST_STALE_TOKEN: &str = "test-bearer-token-stale";
pub const TEST_USERNAME: &str = "operator";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Vault keys as persisted by the session core. Duplicated here (rather
/// than imported) so this crate stays free of a dependency cycle with the
/// crate under test; the values are part of the persisted-format
/// contract.
pub const CREDENTIAL_KEY: &str = "portcullis:session:credential";
pub const IDENTITY_KEY: &str = "portcullis:session:identity";

/// File name the file vault writes inside its storage directory.
pub const VAULT_FILE: &str = "session.json";
