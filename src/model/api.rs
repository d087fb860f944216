use serde::Deserialize;

use crate::model::identity::IdentityDto;

/// Successful login response: the bearer credential plus the identity it
/// belongs to.
#[derive(Clone, Deserialize)]
pub struct LoginDto {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: IdentityDto,
}

/// Error body the API attaches to non-success responses.
#[derive(Deserialize)]
pub struct ErrorDto {
    pub detail: String,
}
