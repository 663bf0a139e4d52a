//! Google API access with an OAuth2 refresh token.
//!
//! The bot authenticates as a single Google account. An access token is
//! exchanged from the configured refresh token and cached until shortly before
//! it expires.

pub mod docs;
pub mod sheets;

use std::time::{Duration, Instant};

use dioxus_logger::tracing;
use oauth2::basic::BasicClient;
use oauth2::{
    ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken, TokenResponse, TokenUrl,
};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use crate::config::GoogleConfig;
use crate::error::google::GoogleError;

/// OAuth2 client with only the token endpoint configured.
pub type GoogleOAuthClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    secret: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_usable(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

pub struct GoogleClient {
    http: reqwest::Client,
    oauth: GoogleOAuthClient,
    refresh_token: RefreshToken,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleClient {
    /// Creates a client from the configured credentials.
    ///
    /// # Returns
    /// - `Ok(GoogleClient)` - Client ready to request tokens lazily
    /// - `Err(GoogleError::Url)` - The token URL is malformed
    pub fn new(config: &GoogleConfig, http: reqwest::Client) -> Result<Self, GoogleError> {
        let oauth = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_token_uri(TokenUrl::new(config.token_url.clone())?);

        Ok(Self {
            http,
            oauth,
            refresh_token: RefreshToken::new(config.refresh_token.clone()),
            token: Mutex::new(None),
        })
    }

    /// Returns a cached access token or exchanges the refresh token for a new one.
    async fn access_token(&self) -> Result<String, GoogleError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_usable(Instant::now())) {
            return Ok(token.secret.clone());
        }

        let response = self
            .oauth
            .exchange_refresh_token(&self.refresh_token)
            .request_async(&self.http)
            .await
            .map_err(|e| GoogleError::Token(e.to_string()))?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let secret = response.access_token().secret().clone();
        *cached = Some(AccessToken {
            secret: secret.clone(),
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!("Refreshed Google access token, valid for {:?}", lifetime);
        Ok(secret)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GoogleError> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Self::parse_response(response).await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, GoogleError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GoogleError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// Appends path segments to `base`, percent-encoding each one.
fn api_url(base: &str, segments: &[&str]) -> Result<Url, GoogleError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| GoogleError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
