use url::Url;

use crate::AuthError;

const AUTHORIZE_URL: &str = "https://www.epicgames.com/id/authorize";
const REDIRECT_URL: &str = "https://www.epicgames.com/id/api/redirect";
const EXCHANGE_URL: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/oauth/exchange";
const ACCOUNT_TOKEN_URL: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/oauth/token";
const DEPLOYMENT_TOKEN_URL: &str = "https://api.epicgames.dev/epic/oauth/v1/token";

/// Provider URLs used by [`crate::AuthClient`]. Defaults to the production
/// Epic Games endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Browser sign-in page. Only used to build URLs.
    pub authorize: String,
    /// Page serving the signed-in session's code as JSON. Only used to build URLs.
    pub redirect: String,
    pub exchange: String,
    pub account_token: String,
    pub deployment_token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::epic()
    }
}

impl Endpoints {
    pub fn epic() -> Self {
        Self {
            authorize: AUTHORIZE_URL.to_string(),
            redirect: REDIRECT_URL.to_string(),
            exchange: EXCHANGE_URL.to_string(),
            account_token: ACCOUNT_TOKEN_URL.to_string(),
            deployment_token: DEPLOYMENT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_authorize(mut self, url: impl Into<String>) -> Self {
        self.authorize = url.into();
        self
    }

    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = url.into();
        self
    }

    pub fn with_exchange(mut self, url: impl Into<String>) -> Self {
        self.exchange = url.into();
        self
    }

    pub fn with_account_token(mut self, url: impl Into<String>) -> Self {
        self.account_token = url.into();
        self
    }

    pub fn with_deployment_token(mut self, url: impl Into<String>) -> Self {
        self.deployment_token = url.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AuthError> {
        for url in [
            &self.authorize,
            &self.redirect,
            &self.exchange,
            &self.account_token,
            &self.deployment_token,
        ] {
            Url::parse(url)?;
        }
        Ok(())
    }
}
