//! Testbed Host
//!
//! A small web server for the Tandem testbed frontend: serves the static
//! assets and brokers a single OAuth2 authorization-code exchange against
//! Autodesk Platform Services, keeping the resulting access token in a
//! cookie-keyed server-side session.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use testbed_host::{Config, OAuthClient, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::new("client-id".into(), "client-secret".into()));
//!     let oauth = OAuthClient::new(&config)?;
//!     let router = server::create_router(Arc::clone(&config), oauth);
//!     server::serve(router, testbed_host::config::defaults::PORT).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod oauth;
pub mod server;
pub mod session;

pub use config::Config;
pub use error::{ApiError, ExchangeError};
pub use oauth::{OAuthClient, TokenExchangeResponse};
pub use session::SessionStore;
