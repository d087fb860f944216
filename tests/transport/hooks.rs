//! Tests for the transport gateway's cross-cutting hook pair: bearer
//! injection on the way out, authorization-failure recovery on the way
//! back in. The generic verb helpers are exercised here too, since every
//! console call is supposed to inherit both hooks without opting in.

use portcullis::error::{auth::AuthError, Error};
use portcullis_test_utils::{mockito::Matcher, prelude::*};
use serde_json::{json, Value};

use crate::util::{open_store, RecordingNavigator};

#[tokio::test]
/// Tests that a held credential is attached as a bearer authorization
/// header on a generic GET.
///
/// Expected: the endpoint only matches with the header present and is hit
async fn attaches_bearer_header_when_authenticated() -> Result<(), TestError> {
    let mut setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .build()
        .await?;
    let mock = setup
        .server
        .mock("GET", "/stats")
        .match_header("authorization", format!("Bearer {TEST_TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"tasks": 3}).to_string())
        .create_async()
        .await;
    let navigator = RecordingNavigator::at("/stats");
    let store = open_store(&setup, navigator).await;

    let result = store.gateway().get_json::<Value>("/stats").await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap()["tasks"], 3);
    mock.assert_async().await;

    Ok(())
}

#[tokio::test]
/// Tests that requests go out without an authorization header when no
/// credential is held.
///
/// Expected: the endpoint only matches with the header missing and is hit
async fn sends_unauthenticated_without_credential() -> Result<(), TestError> {
    let mut setup = TestBuilder::new().build().await?;
    let mock = setup
        .server
        .mock("GET", "/stats")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"tasks": 0}).to_string())
        .create_async()
        .await;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store(&setup, navigator).await;

    let result = store.gateway().get_json::<Value>("/stats").await;

    assert!(result.is_ok());
    mock.assert_async().await;

    Ok(())
}

#[tokio::test]
/// Tests that a 401 on any generic call while on a protected view clears
/// the session (state and vault) and redirects to the login view, while
/// the original failure still reaches the caller.
///
/// Expected: Err(Unauthorized); session cleared; one redirect to /login
async fn unauthorized_clears_session_and_redirects() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_STALE_TOKEN, &factory::admin())
        .with_endpoint("GET", "/stats", 401, &factory::error_body("expired"))
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/stats");
    let store = open_store(&setup, navigator.clone()).await;

    let result = store.gateway().get_json::<Value>("/stats").await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::Unauthorized))
    ));
    assert!(!store.is_authenticated());
    assert_eq!(store.current_identity(), None);
    assert_eq!(setup.persisted_credential()?, None);
    assert_eq!(setup.persisted_identity()?, None);
    assert_eq!(navigator.redirects(), vec!["/login".to_string()]);

    Ok(())
}

#[tokio::test]
/// Tests that the same 401 received while already on the login view
/// performs no redirect and mutates nothing; the error still surfaces.
///
/// Expected: Err(Unauthorized); no redirect; session untouched
async fn unauthorized_on_login_view_is_passive() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .with_endpoint("GET", "/stats", 401, &factory::error_body("expired"))
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/login");
    let store = open_store(&setup, navigator.clone()).await;

    let result = store.gateway().get_json::<Value>("/stats").await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::Unauthorized))
    ));
    assert!(navigator.redirects().is_empty());
    assert!(store.is_authenticated());
    assert_eq!(setup.persisted_credential()?.as_deref(), Some(TEST_TOKEN));

    Ok(())
}

#[tokio::test]
/// Tests that a 400 on a generic POST surfaces the API's validation
/// detail without touching the session.
///
/// Expected: Err(Validation) carrying the detail string
async fn validation_detail_is_surfaced() -> Result<(), TestError> {
    let setup = TestBuilder::new()
        .with_persisted_session(TEST_TOKEN, &factory::admin())
        .with_endpoint(
            "POST",
            "/proxies",
            400,
            &factory::error_body("address is required"),
        )
        .build()
        .await?;
    let navigator = RecordingNavigator::at("/proxies");
    let store = open_store(&setup, navigator).await;

    let result = store
        .gateway()
        .post_json::<_, Value>("/proxies", &json!({}))
        .await;

    match result {
        Err(Error::AuthError(AuthError::Validation(detail))) => {
            assert_eq!(detail, "address is required");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(store.is_authenticated());

    Ok(())
}
