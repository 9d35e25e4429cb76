//! Testbed Host - Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use testbed_host::config::defaults;
use testbed_host::{Config, OAuthClient, server};

#[derive(Parser, Debug)]
#[command(name = "testbed-host")]
#[command(about = "Static host and OAuth token broker for the Tandem testbed")]
#[command(version)]
struct Cli {
    /// Provider client identifier
    #[arg(long, env = "CLIENT_ID")]
    client_id: String,

    /// Provider client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Redirect URI registered with the provider
    #[arg(long, env = "REDIRECT_URI", default_value = defaults::REDIRECT_URI)]
    redirect_uri: String,

    /// Provider token endpoint
    #[arg(long, env = "TOKEN_URL", default_value = defaults::TOKEN_URL)]
    token_url: String,

    /// Secret used to sign the session cookie
    #[arg(long, env = "SESSION_SECRET", default_value = defaults::SESSION_SECRET, hide_env_values = true)]
    session_secret: String,

    /// HTTP listen port
    #[arg(long, env = "PORT", default_value_t = defaults::PORT)]
    port: u16,

    /// Directory the static frontend is served from
    #[arg(long, env = "STATIC_DIR", default_value = defaults::STATIC_DIR)]
    static_dir: PathBuf,

    /// Set the Secure attribute on the session cookie (behind TLS)
    #[arg(long)]
    secure_cookies: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap's env fallbacks see it
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cli.port,
        static_dir = %cli.static_dir.display(),
        "Starting testbed host"
    );

    let mut config = Config::new(cli.client_id, cli.client_secret);
    config.redirect_uri = cli.redirect_uri;
    config.token_url = cli.token_url;
    config.session_secret = cli.session_secret;
    config.static_dir = cli.static_dir;
    config.secure_cookies = cli.secure_cookies;

    if config.has_default_secret() {
        tracing::warn!(
            "SESSION_SECRET is the insecure development default; set it before deploying"
        );
    }

    let config = Arc::new(config);
    let oauth = OAuthClient::new(&config)?;
    let router = server::create_router(Arc::clone(&config), oauth);

    server::serve(router, cli.port).await
}
