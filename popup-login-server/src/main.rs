//! Serves AJAX logins for popup login forms.

mod audit;
mod error;
mod form;
mod handlers;
mod hooks;
mod identity;
mod nonce;
mod sanitize;
mod session;
mod state;

use audit::FailedLogins;
use axum::{
    http::header::COOKIE,
    routing::{get, post},
    Router,
};
use clap::Parser;
use color_eyre::eyre::eyre;
use hooks::Hooks;
use identity::Accounts;
use nonce::Nonces;
use popup_login_core::{
    config::{self, SubmitPolicy, DEFAULT_POPUP_IDS},
    login,
};
use state::{Settings, State};
use std::{iter::once, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{compression, limit, sensitive_headers, services::ServeDir, timeout, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[clap(version)]
struct Config {
    #[clap(long, env, default_value = "127.0.0.1:3000")]
    address: String,

    /// Public base URL the browser reaches us at. Defaults to the bound
    /// address, and is required when that is `0.0.0.0` or `[::]`.
    #[clap(long, env)]
    public_url: Option<String>,

    /// Request body size limit, in bytes
    #[clap(long, env, default_value = "5242880")]
    body_limit: usize,

    /// Request timeout, in seconds
    #[clap(long, env, default_value = "5", value_parser = duration_parser)]
    request_timeout: Duration,

    /// Path of the AJAX endpoint
    #[clap(long, env, default_value = login::DEFAULT_PATH)]
    ajax_path: String,

    /// Base64 secret for signing security tokens
    #[clap(long, env)]
    nonce_secret: String,

    /// How long security tokens stay valid, in seconds
    #[clap(long, env, default_value = "86400")]
    nonce_lifetime: u32,

    /// Cookie that identifies a client session
    #[clap(long, env, default_value = state::DEFAULT_SESSION_COOKIE)]
    session_cookie: String,

    /// TOML file of accounts and their argon2 password hashes
    #[clap(long, env)]
    accounts: PathBuf,

    /// Popups whose login forms get intercepted
    #[clap(long, env, value_delimiter = ',', default_values_t = DEFAULT_POPUP_IDS.to_vec())]
    popup_ids: Vec<u32>,

    /// What the browser does with a second submit while one is in flight
    /// (`concurrent` or `single-flight`)
    #[clap(long, env, default_value = "concurrent", value_parser = policy_parser)]
    submit_policy: SubmitPolicy,

    /// Shown in the popup when a request fails in transit
    #[clap(long, env)]
    transport_error_message: Option<String>,

    /// Shown instead of the identity provider's message on any failed login
    #[clap(long, env)]
    generic_failure_message: Option<String>,

    /// Directory with the wasm-pack output of the browser crate
    #[clap(long, env)]
    pkg_dir: Option<PathBuf>,
}

fn duration_parser(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

fn policy_parser(s: &str) -> Result<SubmitPolicy, String> {
    match s {
        "concurrent" => Ok(SubmitPolicy::Concurrent),
        "single-flight" | "single_flight" => Ok(SubmitPolicy::SingleFlight),
        other => Err(format!(
            "unknown submit policy `{other}` (expected `concurrent` or `single-flight`)"
        )),
    }
}

impl Config {
    /// What handlers need to know, given where the browser will find us.
    fn settings(&self, public_url: &str) -> Settings {
        Settings {
            ajax_url: format!("{}{}", public_url.trim_end_matches('/'), self.ajax_path),
            session_cookie: self.session_cookie.clone(),
            popup_ids: self.popup_ids.iter().copied().collect(),
            submit_policy: self.submit_policy,
            transport_error_message: self.transport_error_message.clone(),
            generic_failure_message: self.generic_failure_message.clone(),
        }
    }
}

/// Where the browser reaches us. Without `--public-url` that's the bound
/// address, which only works when it names a concrete interface.
fn public_url(configured: Option<&str>, bound: SocketAddr) -> color_eyre::Result<String> {
    match configured {
        Some(url) => Ok(url.to_string()),
        None if bound.ip().is_unspecified() => Err(eyre!(
            "listening on {bound}, which browsers can't reach; set --public-url"
        )),
        None => Ok(format!("http://{bound}")),
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let options = Config::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let accounts = Accounts::load(&options.accounts).await?;
    if accounts.is_empty() {
        tracing::warn!(path = ?options.accounts, "no accounts configured, every login will fail");
    } else {
        tracing::info!(accounts = accounts.len(), "loaded accounts");
    }

    let nonces = Nonces::from_base64_secret(&options.nonce_secret, options.nonce_lifetime)?;

    let hooks = Hooks::new()
        .with_login()
        .on_login_failed(Arc::new(FailedLogins::new()));

    let listener = TcpListener::bind(&options.address).await?;

    let public_url = public_url(options.public_url.as_deref(), listener.local_addr()?)?;

    let settings = options.settings(&public_url);
    tracing::info!(ajax_url = %settings.ajax_url, popup_ids = ?settings.popup_ids, "configured");

    let app = router(
        State::new(Arc::new(accounts), nonces, hooks, settings),
        &options,
    );

    tracing::info!(address = ?listener.local_addr(), "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: State, options: &Config) -> Router {
    let mut app = Router::new()
        // ROUTES
        .route(&options.ajax_path, post(handlers::ajax::handler))
        .route(config::PATH, get(handlers::config::handler))
        .route(handlers::script::PATH, get(handlers::script::handler))
        .route(handlers::health::PATH, get(handlers::health::handler));

    if let Some(pkg_dir) = &options.pkg_dir {
        app = app.nest_service("/static/pkg", ServeDir::new(pkg_dir));
    }

    app.layer(trace::TraceLayer::new_for_http())
        .layer(compression::CompressionLayer::new())
        .layer(limit::RequestBodyLimitLayer::new(options.body_limit))
        .layer(sensitive_headers::SetSensitiveHeadersLayer::new(once(
            COOKIE,
        )))
        .layer(timeout::TimeoutLayer::new(options.request_timeout))
        // STATE
        .with_state(state)
}
