use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use timeline_core::{AccountUpdate, AuthSession};

/// Accept any JSON value for a role; only strings are kept, so a number or an
/// array is treated like any other unknown role.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(role) => Some(role),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /auth/register` and `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<String>,
    pub email_confirmed: Option<bool>,
    pub avatar_url: Option<String>,
}

impl From<UpdateUserRequest> for AccountUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        AccountUpdate {
            full_name: request.full_name,
            email: request.email,
            // unknown roles leave the stored role alone
            role: request.role.and_then(|role| role.parse().ok()),
            email_confirmed: request.email_confirmed,
            avatar_url: request.avatar_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub data: AuthSession,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
