//! Web server implementation using axum

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use teleclaude_core::auth::{AccessGate, AllowList, LoginStates, SessionStore};
use teleclaude_core::status::HttpStatusSource;

use crate::config::{OAuthCredentials, Settings};

use super::auth::{self, AuthState};
use super::dashboard;
use super::events::{self, SseState};
use super::oauth::GithubProvider;
use super::static_files;

/// How often expired sessions are swept
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Dashboard web server
pub struct WebServer {
    settings: Settings,
    credentials: OAuthCredentials,
}

impl WebServer {
    /// Create a new web server
    pub fn new(settings: Settings, credentials: OAuthCredentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let web = &self.settings.web;
        let addr: SocketAddr = format!("{}:{}", web.bind, web.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", web.bind, web.port))?;

        let redirect_uri = format!("{}/auth/callback/github", web.base_url());
        let provider = GithubProvider::new(self.credentials.clone(), redirect_uri)
            .context("Failed to build OAuth client")?;

        let allow_list = AllowList::new(self.settings.auth.allowed_emails.iter());
        let auth_state = Arc::new(AuthState {
            gate: AccessGate::new(Arc::new(allow_list)),
            sessions: SessionStore::new(self.settings.auth.session_ttl()),
            login_states: LoginStates::new(),
            provider: Arc::new(provider),
            cookie_secure: web.cookie_secure,
        });

        let source = HttpStatusSource::new(
            self.settings.status.url.clone(),
            self.settings.status.request_timeout(),
        )
        .context("Failed to build status client")?;
        let sse_state = Arc::new(SseState {
            auth: auth_state.clone(),
            source: Arc::new(source),
            interval: self.settings.status.poll_interval(),
        });

        let purge = tokio::spawn(purge_sessions(auth_state.clone()));
        let app = router(auth_state, sse_state);

        tracing::info!("Web server starting on {}", web.base_url());
        tracing::info!("Polling {}", self.settings.status.url);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        purge.abort();
        served?;
        tracing::info!("Web server stopped");
        Ok(())
    }
}

/// Build the application router
pub(crate) fn router(auth_state: Arc<AuthState>, sse_state: Arc<SseState>) -> Router {
    // Pages (redirect to sign-in without a session)
    let page_routes = Router::new()
        .route("/", get(dashboard::index))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth::require_page_session,
        ));

    // SSE route (401 without a session)
    let events_routes = Router::new()
        .route("/events", get(events::events))
        .with_state(sse_state)
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth::require_api_session,
        ));

    // Sign-in flow (public)
    let auth_routes = Router::new()
        .route("/signin", get(auth::signin_page))
        .route("/signin/github", get(auth::signin_provider))
        .route("/callback/github", get(auth::callback))
        .route("/signout", post(auth::signout))
        .route("/error", get(auth::error_page))
        .with_state(auth_state);

    let static_routes = Router::new().route("/assets/{*path}", get(static_files::asset));

    Router::new()
        .merge(page_routes)
        .nest("/api", events_routes)
        .nest("/auth", auth_routes)
        .merge(static_routes)
        .layer(TraceLayer::new_for_http())
}

async fn purge_sessions(auth_state: Arc<AuthState>) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let removed = auth_state.sessions.purge_expired();
        if removed > 0 {
            tracing::debug!("Purged {} expired sessions", removed);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
