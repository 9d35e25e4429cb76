//! Provider token-exchange client.
//!
//! One operation: trade an authorization code for an access token at the
//! provider's token endpoint. Deliberately no retry and no middleware:
//! authorization codes are single-use, so a blind retry could never
//! succeed. The exchange either completes or fails within the configured
//! timeouts.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{ExchangeError, ExchangeResult};

/// Client for the provider's OAuth2 token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// Provider response to a successful code exchange.
///
/// `access_token` is optional on purpose: a 200 with the field absent is
/// passed through unvalidated, and the session layer decides what an
/// absent token means.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    /// Opaque bearer token, if the provider supplied one.
    pub access_token: Option<String>,

    /// Token type, usually `Bearer`.
    pub token_type: Option<String>,

    /// Lifetime in seconds. Informational only; nothing here refreshes.
    pub expires_in: Option<u64>,
}

impl OAuthClient {
    /// Create a new client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Sends a form-encoded `authorization_code` grant request. Any non-200
    /// answer becomes [`ExchangeError::Upstream`] carrying the provider's
    /// raw response body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-200 provider response, or a
    /// 200 body that is not valid JSON.
    pub async fn exchange_code(&self, code: &str) -> ExchangeResult<TokenExchangeResponse> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Provider rejected code exchange");
            return Err(ExchangeError::upstream(status.as_u16(), body));
        }

        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(value).map_err(ExchangeError::from)
    }
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_missing_token() {
        let parsed: TokenExchangeResponse =
            serde_json::from_str(r#"{"token_type": "Bearer"}"#).expect("valid json");
        assert!(parsed.access_token.is_none());
        assert_eq!(parsed.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn test_response_full_payload() {
        let parsed: TokenExchangeResponse = serde_json::from_str(
            r#"{"access_token": "tok123", "token_type": "Bearer", "expires_in": 3600}"#,
        )
        .expect("valid json");
        assert_eq!(parsed.access_token.as_deref(), Some("tok123"));
        assert_eq!(parsed.expires_in, Some(3600));
    }

    #[test]
    fn test_debug_omits_secret() {
        let config = Config::for_testing("http://localhost:1");
        let client = OAuthClient::new(&config).expect("client builds");
        assert!(!format!("{client:?}").contains("test-client-secret"));
    }
}
