use thiserror::Error;

use crate::response::SCOPE_CONSENT_REQUIRED;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider answered with an OAuth `error` payload.
    #[error("{error} - {description}")]
    Provider { error: String, description: String },

    #[error("no access token found in the response")]
    MissingAccessToken,

    #[error("no exchange code found in the response")]
    MissingExchangeCode,

    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid response: {message}")]
    InvalidResponse { message: String, body: String },

    #[error("missing authorization code")]
    MissingAuthorizationCode,
}

impl AuthError {
    /// The user has not yet granted the requested scopes to this application.
    pub fn is_consent_required(&self) -> bool {
        matches!(self, Self::Provider { error, .. } if error == SCOPE_CONSENT_REQUIRED)
    }
}
