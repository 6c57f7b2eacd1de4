use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::AuthError;

pub(crate) const SCOPE_CONSENT_REQUIRED: &str = "scope_consent_required";

const DEFAULT_ERROR_DESCRIPTION: &str = "No description provided";
const CONSENT_HINT: &str =
    " If this is a game or a service then the user should launch it at least once.";

/// JSON body returned by the account and deployment OAuth endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_description: Option<String>,
    pub code: Option<String>,
    pub access_token: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProviderResponse {
    /// Parses a response body. The HTTP status is not consulted: the provider
    /// reports OAuth errors as JSON on 4xx responses.
    pub fn from_body(body: &str) -> Result<Self, AuthError> {
        serde_json::from_str(body).map_err(|err| AuthError::InvalidResponse {
            message: err.to_string(),
            body: body.to_string(),
        })
    }

    fn provider_error(&self) -> Option<AuthError> {
        let error = self.error.as_deref().filter(|error| !error.is_empty())?;
        let mut description = self
            .error_description
            .clone()
            .unwrap_or_else(|| DEFAULT_ERROR_DESCRIPTION.to_string());
        if error == SCOPE_CONSENT_REQUIRED {
            description.push_str(CONSENT_HINT);
        }
        Some(AuthError::Provider {
            error: error.to_string(),
            description,
        })
    }
}

/// Accepts any JSON value. Non-string values keep their JSON text so an
/// unexpected error shape still surfaces as a provider error.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(value) => Some(value),
        other => Some(other.to_string()),
    })
}

/// Single normalization point for every token grant response.
pub fn get_token_from_response(response: &ProviderResponse) -> Result<String, AuthError> {
    if let Some(error) = response.provider_error() {
        return Err(error);
    }

    match response.access_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MissingAccessToken),
    }
}

pub(crate) fn get_exchange_code_from_response(
    response: &ProviderResponse,
) -> Result<String, AuthError> {
    if let Some(error) = response.provider_error() {
        return Err(error);
    }

    match response.code.as_deref() {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err(AuthError::MissingExchangeCode),
    }
}
