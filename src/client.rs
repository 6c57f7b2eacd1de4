use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::{
    AuthError, ClientCredentials, DEFAULT_SCOPE, Endpoints, GrantType, ProviderResponse,
    grant::code_field,
    response::{get_exchange_code_from_response, get_token_from_response},
};

#[derive(Debug, Clone, Default)]
pub struct AuthClientConfig {
    pub endpoints: Endpoints,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl AuthClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Epic Games sign-in helper.
///
/// Holds only transport configuration. Credentials, codes and tokens are
/// passed to each call and never retained, so one client can be shared across
/// any number of users and applications.
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthClientConfig,
    http: Client,
}

impl AuthClient {
    pub fn new(config: AuthClientConfig) -> Result<Self, AuthError> {
        config.endpoints.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn with_http_client(config: AuthClientConfig, http: Client) -> Result<Self, AuthError> {
        config.endpoints.validate()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AuthClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    /// Sign-in URL with `response_type=code` and the default scope.
    pub fn make_auth_url(&self, client_id: &str, redirect_uri: &str) -> String {
        self.make_auth_url_with(client_id, redirect_uri, "code", DEFAULT_SCOPE)
    }

    /// Builds the sign-in URL. Values are inserted verbatim; the caller is
    /// responsible for percent-encoding `redirect_uri` if it needs it.
    pub fn make_auth_url_with<S: AsRef<str>>(
        &self,
        client_id: &str,
        redirect_uri: &str,
        response_type: &str,
        scope: &[S],
    ) -> String {
        format!(
            "{}?client_id={client_id}&redirect_uri={redirect_uri}&response_type={response_type}&scope={}",
            self.config.endpoints.authorize,
            join_scope(scope, "%20"),
        )
    }

    pub fn make_redirect_url(&self, client_id: &str) -> String {
        self.make_redirect_url_with(client_id, "code")
    }

    /// URL that answers with the signed-in session's code as JSON, for
    /// applications that cannot host a redirect URI. See
    /// [`crate::AuthorizationResponse::from_redirect_json`].
    pub fn make_redirect_url_with(&self, client_id: &str, response_type: &str) -> String {
        format!(
            "{}?clientId={client_id}&responseType={response_type}",
            self.config.endpoints.redirect
        )
    }

    pub async fn get_exchange_token_from_access(
        &self,
        access_token: &str,
    ) -> Result<String, AuthError> {
        let url = &self.config.endpoints.exchange;
        debug!(endpoint = %url, "requesting exchange code");

        let response = self.http.get(url).bearer_auth(access_token).send().await?;
        let body = read_body(response).await?;
        get_exchange_code_from_response(&body).inspect_err(|err| {
            warn!(endpoint = %url, error = %err, "exchange code request failed");
        })
    }

    pub async fn get_access_token(
        &self,
        code: &str,
        credentials: &ClientCredentials,
        grant_type: &str,
    ) -> Result<String, AuthError> {
        let code_field = code_field(grant_type)?;
        let form = [("grant_type", grant_type), (code_field, code)];

        self.request_token(&self.config.endpoints.account_token, credentials, &form)
            .await
    }

    pub async fn get_jwt_token<S: AsRef<str>>(
        &self,
        code: &str,
        credentials: &ClientCredentials,
        deployment_id: &str,
        grant_type: &str,
        scope: &[S],
    ) -> Result<String, AuthError> {
        let code_field = code_field(grant_type)?;
        let scope = join_scope(scope, " ");
        let form = [
            ("grant_type", grant_type),
            (code_field, code),
            ("deployment_id", deployment_id),
            ("scope", scope.as_str()),
        ];

        self.request_token(&self.config.endpoints.deployment_token, credentials, &form)
            .await
    }

    /// Redeems an authorization code issued to the requesting client for a
    /// deployment JWT.
    pub async fn auth<S: AsRef<str>>(
        &self,
        code: &str,
        credentials: &ClientCredentials,
        deployment_id: &str,
        scope: &[S],
    ) -> Result<String, AuthError> {
        self.get_jwt_token(
            code,
            credentials,
            deployment_id,
            GrantType::AuthorizationCode.as_str(),
            scope,
        )
        .await
    }

    /// Redeems an authorization code issued to `issuing` for a deployment JWT
    /// belonging to `requesting`, via an access token and an exchange code.
    /// The first failing step ends the chain and its error is returned as is.
    pub async fn auth_with_exchange<S: AsRef<str>>(
        &self,
        code: &str,
        issuing: &ClientCredentials,
        requesting: &ClientCredentials,
        requesting_deployment_id: &str,
        scope: &[S],
    ) -> Result<String, AuthError> {
        let access_token = self
            .get_access_token(code, issuing, GrantType::AuthorizationCode.as_str())
            .await?;
        let exchange_code = self.get_exchange_token_from_access(&access_token).await?;
        self.get_jwt_token(
            &exchange_code,
            requesting,
            requesting_deployment_id,
            GrantType::ExchangeCode.as_str(),
            scope,
        )
        .await
    }

    async fn request_token(
        &self,
        url: &str,
        credentials: &ClientCredentials,
        form: &[(&str, &str)],
    ) -> Result<String, AuthError> {
        debug!(
            endpoint = %url,
            client_id = %credentials.client_id,
            grant_type = form.first().map(|(_, value)| *value).unwrap_or_default(),
            "requesting token"
        );

        let response = self
            .http
            .post(url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(form)
            .send()
            .await?;
        let body = read_body(response).await?;
        get_token_from_response(&body).inspect_err(|err| {
            warn!(endpoint = %url, client_id = %credentials.client_id, error = %err, "token request failed");
        })
    }
}

async fn read_body(response: Response) -> Result<ProviderResponse, AuthError> {
    let status = response.status();
    let body = response.text().await?;
    ProviderResponse::from_body(&body).inspect_err(|_| {
        warn!(status = status.as_u16(), "provider returned a non-json body");
    })
}

fn join_scope<S: AsRef<str>>(scope: &[S], delimiter: &str) -> String {
    scope
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use url::Url;

    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(AuthClientConfig::new()).unwrap()
    }

    #[test]
    fn auth_url_includes_required_params() {
        let auth_url = client().make_auth_url_with(
            "client-id",
            "http://localhost:8765/callback",
            "code",
            &["basic_profile", "friends_list", "presence"],
        );

        assert_eq!(auth_url.matches('?').count(), 1);
        assert!(auth_url.starts_with("https://www.epicgames.com/id/authorize?"));
        assert!(auth_url.ends_with("&scope=basic_profile%20friends_list%20presence"));

        let url = Url::parse(&auth_url).unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs.get("client_id"), Some(&"client-id".to_string()));
        assert_eq!(
            pairs.get("redirect_uri"),
            Some(&"http://localhost:8765/callback".to_string())
        );
        assert_eq!(pairs.get("response_type"), Some(&"code".to_string()));
        assert_eq!(
            pairs.get("scope"),
            Some(&"basic_profile friends_list presence".to_string())
        );
    }

    #[test]
    fn auth_url_defaults_to_basic_profile() {
        let auth_url = client().make_auth_url("abc", "https://example.com/cb");
        assert_eq!(
            auth_url,
            "https://www.epicgames.com/id/authorize?client_id=abc&redirect_uri=https://example.com/cb&response_type=code&scope=basic_profile"
        );
    }

    #[test]
    fn auth_url_inserts_values_verbatim() {
        let auth_url = client().make_auth_url_with::<&str>("a b", "x?y=1", "token", &[]);
        assert!(auth_url.contains("client_id=a b&"));
        assert!(auth_url.contains("redirect_uri=x?y=1&"));
        assert!(auth_url.ends_with("response_type=token&scope="));
    }

    #[test]
    fn redirect_url_uses_camel_case_params() {
        let client = client();
        assert_eq!(
            client.make_redirect_url("abc"),
            "https://www.epicgames.com/id/api/redirect?clientId=abc&responseType=code"
        );
        assert!(
            client
                .make_redirect_url_with("abc", "token")
                .ends_with("?clientId=abc&responseType=token")
        );
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        let config =
            AuthClientConfig::new().with_endpoints(Endpoints::epic().with_account_token("nope"));
        assert!(matches!(AuthClient::new(config), Err(AuthError::Url(_))));
    }
}
