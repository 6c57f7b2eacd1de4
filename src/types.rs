use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::AuthError;

pub const DEFAULT_SCOPE: &[&str] = &["basic_profile"];

/// A client id and secret, sent as HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
}

/// JSON document served at the redirect polling URL. Every field is `null`
/// except `redirectUrl` when the user is not signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectPage {
    pub redirect_url: Option<String>,
    pub authorization_code: Option<String>,
    pub exchange_code: Option<String>,
    pub sid: Option<String>,
}

impl RedirectPage {
    pub fn from_body(body: &str) -> Result<Self, AuthError> {
        serde_json::from_str(body).map_err(|err| AuthError::InvalidResponse {
            message: err.to_string(),
            body: body.to_string(),
        })
    }
}

impl AuthorizationResponse {
    /// Reads `code` from the query of a sign-in redirect callback.
    pub fn from_url(callback_url: &str) -> Result<Self, AuthError> {
        let url = Url::parse(callback_url)?;
        let code = url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingAuthorizationCode)?;
        Ok(Self { code })
    }

    /// Reads `authorizationCode` from the JSON document served at the redirect
    /// polling URL. The field is `null` when the user is not signed in.
    pub fn from_redirect_json(body: &str) -> Result<Self, AuthError> {
        RedirectPage::from_body(body)?
            .authorization_code
            .filter(|code| !code.is_empty())
            .map(|code| Self { code })
            .ok_or(AuthError::MissingAuthorizationCode)
    }

    /// Accepts a bare code, a callback URL, or the redirect polling JSON.
    pub fn parse(input: &str) -> Result<Self, AuthError> {
        let input = input.trim();
        if input.starts_with('{') {
            return Self::from_redirect_json(input);
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            return Self::from_url(input);
        }
        if input.is_empty() {
            return Err(AuthError::MissingAuthorizationCode);
        }
        Ok(Self {
            code: input.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthorizationResponse, ClientCredentials, RedirectPage};
    use crate::AuthError;

    #[test]
    fn from_url_parses_query_params() {
        let response =
            AuthorizationResponse::from_url("http://localhost/callback?code=abc123&state=xyz")
                .unwrap();
        assert_eq!(response.code, "abc123");
    }

    #[test]
    fn from_url_requires_code() {
        let result = AuthorizationResponse::from_url("http://localhost/callback?state=xyz");
        assert!(matches!(result, Err(AuthError::MissingAuthorizationCode)));
    }

    #[test]
    fn from_redirect_json_reads_authorization_code() {
        let body = r#"{"warning":"Do not share this code with any 3rd party service.","redirectUrl":"https://localhost/?code=f00d","authorizationCode":"f00d","exchangeCode":null,"sid":null}"#;
        let response = AuthorizationResponse::from_redirect_json(body).unwrap();
        assert_eq!(response.code, "f00d");
    }

    #[test]
    fn redirect_page_keeps_every_field() {
        let body = r#"{"warning":"Do not share this code.","redirectUrl":"https://localhost/?code=f00d","authorizationCode":"f00d","exchangeCode":"e11","sid":"s22"}"#;
        let page = RedirectPage::from_body(body).unwrap();
        assert_eq!(
            page,
            RedirectPage {
                redirect_url: Some("https://localhost/?code=f00d".to_string()),
                authorization_code: Some("f00d".to_string()),
                exchange_code: Some("e11".to_string()),
                sid: Some("s22".to_string()),
            }
        );
    }

    #[test]
    fn redirect_page_signed_out_has_only_url() {
        let body = r#"{"redirectUrl":"https://localhost/","authorizationCode":null,"exchangeCode":null,"sid":null}"#;
        let page = RedirectPage::from_body(body).unwrap();
        assert_eq!(page.redirect_url.as_deref(), Some("https://localhost/"));
        assert_eq!(page.authorization_code, None);
        assert_eq!(page.exchange_code, None);
        assert_eq!(page.sid, None);
    }

    #[test]
    fn from_redirect_json_signed_out_has_no_code() {
        let body = r#"{"redirectUrl":"https://localhost/","authorizationCode":null,"sid":null}"#;
        let result = AuthorizationResponse::from_redirect_json(body);
        assert!(matches!(result, Err(AuthError::MissingAuthorizationCode)));
    }

    #[test]
    fn parse_accepts_all_input_shapes() {
        assert_eq!(AuthorizationResponse::parse(" raw-code\n").unwrap().code, "raw-code");
        assert_eq!(
            AuthorizationResponse::parse("https://example.com/cb?code=from-url")
                .unwrap()
                .code,
            "from-url"
        );
        assert_eq!(
            AuthorizationResponse::parse(r#"{"authorizationCode":"from-json"}"#)
                .unwrap()
                .code,
            "from-json"
        );
        assert!(AuthorizationResponse::parse("   ").is_err());
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let credentials = ClientCredentials::new("client", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
    }
}
