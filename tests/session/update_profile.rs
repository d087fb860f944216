//! Tests for SessionStore::update_profile. Failures here are not
//! credential problems: the session must survive them.

use portcullis::{
    error::{auth::AuthError, auth::AuthErrorKind, Error},
    model::identity::IdentityPatch,
};
use portcullis_test_utils::prelude::*;

use crate::util::{open_store, open_store_unreachable, RecordingNavigator};

#[tokio::test]
/// Tests that a successful update replaces the identity, persists it,
/// and propagates the changed locale preference.
///
/// Expected: Ok; active locale follows the updated identity
async fn replaces_identity_and_locale() -> Result<(), TestError> {
    let updated = factory::identity(1, "admin", "admin", Some("ja"));
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .with_update_success(&updated)
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/");
    let store = open_store(&setup, navigator).await;
    assert_eq!(store.active_locale(), "zh-CN");

    let result = store.update_profile(&IdentityPatch::locale("ja")).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().locale.as_deref(), Some("ja"));
    assert_eq!(store.active_locale(), "ja");
    assert_eq!(
        store.current_identity().unwrap().locale.as_deref(),
        Some("ja")
    );

    Ok(())
}

#[tokio::test]
/// Tests that a validation rejection surfaces to the caller with the
/// previous identity intact and the session still authenticated.
///
/// Expected: Err(Validation); identity unchanged; no logout
async fn validation_failure_keeps_identity() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .with_update_rejected("Language is required")
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/");
    let store = open_store(&setup, navigator).await;

    let result = store.update_profile(&IdentityPatch::default()).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::Validation(_)))
    ));
    assert!(store.is_authenticated());
    assert_eq!(store.current_identity().unwrap().username, "admin");
    assert_eq!(store.last_error(), Some(AuthErrorKind::Validation));

    Ok(())
}

#[tokio::test]
/// Tests that a network failure leaves the previous identity intact and
/// does not log the operator out, unlike fetch_identity.
///
/// Expected: Err(Network); still authenticated; identity and vault intact
async fn network_failure_keeps_identity_and_session() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/");
    let store = open_store_unreachable(&setup, navigator).await;

    let result = store.update_profile(&IdentityPatch::locale("ja")).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::Network(_)))
    ));
    assert!(store.is_authenticated());
    assert_eq!(store.current_identity().unwrap().username, "admin");
    assert_eq!(setup.persisted_credential()?.as_deref(), Some(TEST_TOKEN));
    assert!(setup.persisted_identity()?.is_some());
    assert_eq!(store.active_locale(), "zh-CN");

    Ok(())
}
