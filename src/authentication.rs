pub mod middleware;
mod signature;

use std::time::Duration;

use anyhow::Context;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{header::AUTHORIZATION, Client, ClientBuilder, Method, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

pub use signature::{authorization_header, base_string, sign};

#[derive(thiserror::Error, Debug)]
pub enum OAuthError {
    #[error("The login provider refused the request")]
    Rejected(#[source] anyhow::Error),
    #[error("This login attempt does not belong to your session, please log in again")]
    TokenMismatch,
    #[error("No login attempt is in progress, please log in again")]
    MissingRequestToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// A request or access token together with its secret.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub key: String,
    secret: String,
}

impl Token {
    pub fn new(key: String, secret: String) -> Self {
        Self { key, secret }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    oauth_token: String,
    oauth_token_secret: String,
}

#[derive(Deserialize)]
struct UserInfoResponse {
    query: UserInfoQuery,
}

#[derive(Deserialize)]
struct UserInfoQuery {
    userinfo: UserInfo,
}

#[derive(Deserialize)]
struct UserInfo {
    name: String,
    // present (as "") when the provider did not recognise the access token
    anon: Option<serde_json::Value>,
}

/// OAuth 1.0a consumer of a MediaWiki installation (`Special:OAuth`).
#[derive(Debug)]
pub struct WikiOAuth {
    http_client: Client,
    index_url: Url,
    api_url: Url,
    consumer_key: String,
    consumer_secret: Secret<String>,
}

impl WikiOAuth {
    pub fn new(
        base_url: &str,
        consumer_key: String,
        consumer_secret: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let base_url = base_url.trim_end_matches('/');
        let index_url = Url::parse(&format!("{base_url}/index.php"))
            .with_context(|| format!("invalid OAuth base url {base_url}"))?;
        let api_url = Url::parse(&format!("{base_url}/api.php"))
            .with_context(|| format!("invalid OAuth base url {base_url}"))?;
        let http_client = ClientBuilder::new().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            index_url,
            api_url,
            consumer_key,
            consumer_secret,
        })
    }

    fn special_page(&self, title: &str) -> Url {
        let mut url = self.index_url.clone();
        url.query_pairs_mut().append_pair("title", title);
        url
    }

    /// Signs and sends one request, returning the raw response body.
    async fn signed(
        &self,
        method: Method,
        url: Url,
        token: Option<&Token>,
        extra_params: &[(&str, &str)],
    ) -> Result<String, OAuthError> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .map(char::from)
            .take(32)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_version", "1.0"),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token", token.key.as_str()));
        }
        oauth_params.extend_from_slice(extra_params);

        let base = base_string(&method, &url, &oauth_params);
        let signature = sign(
            &base,
            self.consumer_secret.expose_secret(),
            token.map(|t| t.secret.as_str()).unwrap_or_default(),
        )
        .map_err(|e| anyhow::anyhow!("failed to sign the OAuth request: {e}"))?;

        let response = self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, authorization_header(&oauth_params, &signature))
            .send()
            .await
            .context("failed to reach the login provider")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read the login provider's response")?;
        if !status.is_success() {
            return Err(OAuthError::Rejected(anyhow::anyhow!(
                "provider answered {status}: {}",
                body.chars().take(256).collect::<String>()
            )));
        }
        Ok(body)
    }

    #[tracing::instrument(name = "initiate OAuth handshake", skip(self))]
    pub async fn initiate(&self) -> Result<Token, OAuthError> {
        let url = self.special_page("Special:OAuth/initiate");
        let body = self
            .signed(Method::POST, url, None, &[("oauth_callback", "oob")])
            .await?;
        parse_token(&body)
    }

    /// Where the user is sent to approve the request token.
    pub fn authorize_url(&self, request_token: &Token) -> Url {
        let mut url = self.special_page("Special:OAuth/authorize");
        url.query_pairs_mut()
            .append_pair("oauth_token", &request_token.key)
            .append_pair("oauth_consumer_key", &self.consumer_key);
        url
    }

    #[tracing::instrument(name = "exchange OAuth request token", skip(self, verifier))]
    pub async fn complete(&self, request_token: &Token, verifier: &str) -> Result<Token, OAuthError> {
        let url = self.special_page("Special:OAuth/token");
        let body = self
            .signed(
                Method::POST,
                url,
                Some(request_token),
                &[("oauth_verifier", verifier)],
            )
            .await?;
        parse_token(&body)
    }

    /// Name of the user the access token belongs to.
    #[tracing::instrument(name = "identify OAuth user", skip(self, access_token))]
    pub async fn identify(&self, access_token: &Token) -> Result<String, OAuthError> {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("meta", "userinfo")
            .append_pair("format", "json");
        let body = self
            .signed(Method::GET, url, Some(access_token), &[])
            .await?;

        let response: UserInfoResponse = serde_json::from_str(&body)
            .context("unexpected userinfo response")
            .map_err(OAuthError::Rejected)?;
        let user = response.query.userinfo;
        if user.anon.is_some() {
            return Err(OAuthError::Rejected(anyhow::anyhow!(
                "the access token was not accepted"
            )));
        }
        Ok(user.name)
    }
}

/// Token endpoints answer with a form-encoded body.
fn parse_token(body: &str) -> Result<Token, OAuthError> {
    let response: TokenResponse = serde_urlencoded::from_str(body.trim())
        .with_context(|| {
            format!(
                "unexpected token response: {}",
                body.chars().take(256).collect::<String>()
            )
        })
        .map_err(OAuthError::Rejected)?;
    Ok(Token::new(response.oauth_token, response.oauth_token_secret))
}
