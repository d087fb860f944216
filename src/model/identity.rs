use serde::{Deserialize, Serialize};

/// The authenticated operator's profile as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityDto {
    pub id: i64,
    pub username: String,
    pub role: Role,
    /// Preferred UI locale tag (e.g. "zh-CN"). Absent when the operator
    /// has never picked one; the locale registry falls back to its
    /// default tag.
    #[serde(default)]
    pub locale: Option<String>,
}

impl IdentityDto {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Access role attached to an identity.
///
/// Roles the API introduces after this crate ships deserialize as
/// [`Role::Unknown`] instead of failing; they are treated as
/// non-administrative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    #[serde(other)]
    Unknown,
}

/// Partial profile update submitted to the API.
///
/// Only set fields are serialized; the original console uses this mostly
/// to change the operator's locale preference.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IdentityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl IdentityPatch {
    pub fn locale(tag: &str) -> Self {
        Self {
            locale: Some(tag.to_string()),
            ..Self::default()
        }
    }
}
