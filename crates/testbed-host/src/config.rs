//! Configuration for the testbed host.
//!
//! Everything is collected into one immutable [`Config`] built at startup
//! and injected into the router state; no handler reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256};

/// Built-in defaults, overridable through the environment.
pub mod defaults {
    use std::time::Duration;

    /// Provider token endpoint (Autodesk Platform Services).
    pub const TOKEN_URL: &str = "https://developer.api.autodesk.com/authentication/v2/token";

    /// Redirect URI registered with the provider.
    pub const REDIRECT_URI: &str = "http://localhost:5000/oauth/callback";

    /// Listen port.
    pub const PORT: u16 = 5000;

    /// Root directory of the static frontend.
    pub const STATIC_DIR: &str = "static";

    /// Session cookie name.
    pub const SESSION_COOKIE: &str = "testbed_session";

    /// Insecure development placeholder for the cookie signing secret.
    /// Must be overridden in any real deployment.
    pub const SESSION_SECRET: &str = "dev_secret_key";

    /// Request timeout for the token exchange.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout for the token exchange.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Idle lifetime after which in-memory sessions are evicted.
    pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(24 * 3600);

    /// Interval between session janitor sweeps.
    pub const JANITOR_INTERVAL: Duration = Duration::from_secs(600);
}

/// Server configuration, immutable for the process lifetime.
#[derive(Clone)]
pub struct Config {
    /// Provider client identifier.
    pub client_id: String,

    /// Provider client secret. Never exposed to clients.
    pub client_secret: String,

    /// Redirect URI sent along with the code exchange.
    pub redirect_uri: String,

    /// Provider token endpoint (overridable for testing with mock servers).
    pub token_url: String,

    /// Secret the session cookie is signed with.
    pub session_secret: String,

    /// Session cookie name.
    pub session_cookie: String,

    /// Whether to set the `Secure` attribute on the session cookie.
    pub secure_cookies: bool,

    /// Root directory of the static frontend.
    pub static_dir: PathBuf,

    /// Token exchange request timeout.
    pub request_timeout: Duration,

    /// Token exchange connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration with the given provider credentials and
    /// defaults for everything else.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri: defaults::REDIRECT_URI.to_string(),
            token_url: defaults::TOKEN_URL.to_string(),
            session_secret: defaults::SESSION_SECRET.to_string(),
            session_cookie: defaults::SESSION_COOKIE.to_string(),
            secure_cookies: false,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration pointed at a mock provider.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: defaults::REDIRECT_URI.to_string(),
            token_url: format!("{base_url}/authentication/v2/token"),
            session_secret: "test-session-secret".to_string(),
            session_cookie: defaults::SESSION_COOKIE.to_string(),
            secure_cookies: false,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Whether the insecure default signing secret is still in place.
    #[must_use]
    pub fn has_default_secret(&self) -> bool {
        self.session_secret == defaults::SESSION_SECRET
    }

    /// Derive the cookie signing key from the session secret.
    ///
    /// `Key::from` wants 64 bytes of key material; the secret is stretched
    /// with two domain-separated SHA-256 digests so operators can supply
    /// secrets of any length.
    #[must_use]
    pub fn signing_key(&self) -> Key {
        let mut material = [0u8; 64];

        let mut hasher = Sha256::new();
        hasher.update(b"testbed-host.cookie-key.1|");
        hasher.update(self.session_secret.as_bytes());
        material[..32].copy_from_slice(&hasher.finalize());

        let mut hasher = Sha256::new();
        hasher.update(b"testbed-host.cookie-key.2|");
        hasher.update(self.session_secret.as_bytes());
        material[32..].copy_from_slice(&hasher.finalize());

        Key::from(&material)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("session_cookie", &self.session_cookie)
            .field("secure_cookies", &self.secure_cookies)
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("id".into(), "secret".into());
        assert_eq!(config.token_url, defaults::TOKEN_URL);
        assert_eq!(config.redirect_uri, defaults::REDIRECT_URI);
        assert!(config.has_default_secret());
    }

    #[test]
    fn test_for_testing_points_at_mock() {
        let config = Config::for_testing("http://localhost:9999");
        assert_eq!(config.token_url, "http://localhost:9999/authentication/v2/token");
        assert!(!config.has_default_secret());
    }

    #[test]
    fn test_signing_key_is_deterministic() {
        let a = Config::for_testing("http://localhost:1").signing_key();
        let b = Config::for_testing("http://localhost:2").signing_key();
        assert_eq!(a.master(), b.master());

        let mut other = Config::for_testing("http://localhost:1");
        other.session_secret = "different".to_string();
        assert_ne!(a.master(), other.signing_key().master());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new("id".into(), "hunter2".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
