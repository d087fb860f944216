//! Tests for SessionStore::login.

use portcullis::error::{auth::AuthError, auth::AuthErrorKind, Error};
use portcullis_test_utils::prelude::*;

use crate::util::{open_store, open_store_unreachable, RecordingNavigator};

#[tokio::test]
/// Tests that a successful login sets both halves of the session,
/// persists them, and applies the identity's locale preference.
///
/// Expected: Ok with the identity; credential and identity in the vault
async fn establishes_and_persists_session() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_login_success(&factory::admin())
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store(&setup, navigator).await;

    let result = store.login(TEST_USERNAME, TEST_PASSWORD).await;

    assert!(result.is_ok());
    let identity = result.unwrap();
    assert_eq!(identity.username, "admin");
    assert!(identity.is_admin());

    assert!(store.is_authenticated());
    assert_eq!(store.current_identity().unwrap().username, "admin");
    assert_eq!(store.active_locale(), "zh-CN");
    assert!(!store.is_loading());
    assert_eq!(store.last_error(), None);

    assert_eq!(setup.persisted_credential()?.as_deref(), Some(TEST_TOKEN));
    assert!(setup.persisted_identity()?.is_some());

    Ok(())
}

#[tokio::test]
/// Tests that rejected credentials surface as InvalidCredentials and
/// leave the pre-call session state untouched.
///
/// Expected: Err(InvalidCredentials); nothing in state or vault; no
/// redirect issued
async fn rejected_credentials_leave_state_untouched() -> Result<(), TestError> {
    let setup = TestBuilder::new().with_login_rejected().build().await?;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store(&setup, navigator.clone()).await;

    let result = store.login(TEST_USERNAME, "wrong password").await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::InvalidCredentials))
    ));

    assert!(!store.is_authenticated());
    assert_eq!(store.current_identity(), None);
    assert_eq!(setup.persisted_credential()?, None);
    assert_eq!(setup.persisted_identity()?, None);
    assert!(navigator.redirects().is_empty());

    Ok(())
}

#[tokio::test]
/// Tests that the loading flag is reset and the failure kind recorded
/// when login fails.
///
/// Expected: loading == false, last_error == InvalidCredentials
async fn failure_resets_loading_and_records_error() -> Result<(), TestError> {
    let setup = TestBuilder::new().with_login_rejected().build().await?;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store(&setup, navigator).await;

    let _ = store.login(TEST_USERNAME, "wrong password").await;

    assert!(!store.is_loading());
    assert_eq!(store.last_error(), Some(AuthErrorKind::InvalidCredentials));

    Ok(())
}

#[tokio::test]
/// Tests that an unreachable API surfaces as a network failure without
/// touching session state.
///
/// Expected: Err(Network); unauthenticated; last_error == Network
async fn network_failure_surfaces_without_side_effects() -> Result<(), TestError> {
    let setup = TestBuilder::new().build().await?;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store_unreachable(&setup, navigator).await;

    let result = store.login(TEST_USERNAME, TEST_PASSWORD).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::Network(_)))
    ));
    assert!(!store.is_authenticated());
    assert!(!store.is_loading());
    assert_eq!(store.last_error(), Some(AuthErrorKind::Network));

    Ok(())
}

#[tokio::test]
/// Tests that a successful login clears an error recorded by an earlier
/// failed operation.
///
/// Expected: last_error == None after the login succeeds
async fn success_clears_previous_error() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::member())
        .with_update_rejected("Language is required")
        .with_login_success(&factory::member())
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/");
    let store = open_store(&setup, navigator).await;

    // Prime last_error with a rejected profile update.
    let patch = portcullis::model::identity::IdentityPatch::default();
    let _ = store.update_profile(&patch).await;
    assert_eq!(store.last_error(), Some(AuthErrorKind::Validation));

    let result = store.login(TEST_USERNAME, TEST_PASSWORD).await;

    assert!(result.is_ok());
    assert_eq!(store.last_error(), None);
    assert_eq!(store.active_locale(), "en");

    Ok(())
}
