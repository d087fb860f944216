//! JSON factories for identity and login payloads, shaped like the real
//! API's responses.

use serde_json::{json, Value};

use crate::constant::TEST_TOKEN;

pub fn identity(id: i64, username: &str, role: &str, locale: Option<&str>) -> Value {
    let mut value = json!({
        "id": id,
        "username": username,
        "role": role,
    });
    if let Some(tag) = locale {
        value["locale"] = json!(tag);
    }

    value
}

/// An administrator with a Chinese locale preference, the console's
/// default seeded account.
pub fn admin() -> Value {
    identity(1, "admin", "admin", Some("zh-CN"))
}

/// A regular member with an English locale preference.
pub fn member() -> Value {
    identity(2, "operator", "member", Some("en"))
}

pub fn login_response(user: &Value) -> Value {
    login_response_with_token(TEST_TOKEN, user)
}

pub fn login_response_with_token(token: &str, user: &Value) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user,
    })
}

pub fn error_body(detail: &str) -> Value {
    json!({ "detail": detail })
}
