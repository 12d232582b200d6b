//! Session-cookie authentication and the OAuth sign-in flow
//!
//! Pages without a session redirect to the sign-in view; API routes answer
//! `401`. A session is only ever created after the access gate admits the
//! identity returned by the provider.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use teleclaude_core::auth::{AccessGate, LoginStates, Session, SessionStore};

use super::oauth::IdentityProvider;
use super::pages;

/// Session cookie name
pub const SESSION_COOKIE: &str = "teleclaude_session";

/// Sign-in view path
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Error code for an identity the gate refused
pub const ERROR_ACCESS_DENIED: &str = "AccessDenied";

/// Error code for a callback that could not be completed
pub const ERROR_OAUTH_CALLBACK: &str = "OAuthCallback";

/// Shared state for authentication
pub struct AuthState {
    pub gate: AccessGate,
    pub sessions: SessionStore,
    pub login_states: LoginStates,
    pub provider: Arc<dyn IdentityProvider>,
    pub cookie_secure: bool,
}

impl AuthState {
    /// Resolve the live session named by the request's cookie
    fn session_from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let id = read_cookie(headers, SESSION_COOKIE)?;
        self.sessions.get(&id)
    }
}

/// Read a cookie value from the request headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "HttpOnly; SameSite=Lax; Path=/; Secure"
    } else {
        "HttpOnly; SameSite=Lax; Path=/"
    }
}

/// `Set-Cookie` value carrying a new session
pub fn session_cookie(session: &Session, secure: bool) -> String {
    let max_age = (session.expires_at - session.created_at)
        .num_seconds()
        .max(0);
    format!(
        "{}={}; {}; Max-Age={}",
        SESSION_COOKIE,
        session.id,
        cookie_attributes(secure),
        max_age
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_cookie(secure: bool) -> String {
    format!("{}=; {}; Max-Age=0", SESSION_COOKIE, cookie_attributes(secure))
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

fn error_redirect(code: &str) -> Response {
    Redirect::to(&format!("/auth/error?error={}", code)).into_response()
}

// =========================================================
// Middleware
// =========================================================

/// Page guard: redirect to sign-in without a live session
pub async fn require_page_session(
    State(auth): State<Arc<AuthState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match auth.session_from_headers(request.headers()) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => Redirect::to(SIGN_IN_PATH).into_response(),
    }
}

/// API guard: `401` without a live session
pub async fn require_api_session(
    State(auth): State<Arc<AuthState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let session = auth
        .session_from_headers(request.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// =========================================================
// Handlers
// =========================================================

/// `GET /auth/signin`
pub async fn signin_page(State(auth): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    if auth.session_from_headers(&headers).is_some() {
        return Redirect::to("/").into_response();
    }
    Html(pages::sign_in_page()).into_response()
}

/// `GET /auth/signin/github`: issue a nonce and hand off to the provider
pub async fn signin_provider(State(auth): State<Arc<AuthState>>) -> Redirect {
    let state = auth.login_states.issue();
    debug!("Starting {} sign-in", auth.provider.name());
    Redirect::to(&auth.provider.authorize_url(&state))
}

/// Query parameters on the provider callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `GET /auth/callback/github`: exchange the code, consult the gate
pub async fn callback(
    State(auth): State<Arc<AuthState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Nonce is consumed first so it can never be replayed
    let state_ok = query
        .state
        .as_deref()
        .is_some_and(|state| auth.login_states.consume(state));
    if !state_ok {
        warn!("OAuth callback with unknown or expired state");
        return error_redirect(ERROR_OAUTH_CALLBACK);
    }

    if let Some(error) = query.error.as_deref() {
        info!("Provider returned error on callback: {}", error);
        return error_redirect(ERROR_OAUTH_CALLBACK);
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return error_redirect(ERROR_OAUTH_CALLBACK);
    };

    let identity = match auth.provider.exchange(code).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("{} exchange failed: {}", auth.provider.name(), e);
            return error_redirect(ERROR_OAUTH_CALLBACK);
        }
    };

    if !auth.gate.authorize(&identity) {
        info!(
            "Sign-in denied for {} ({})",
            identity.email().unwrap_or("<no email>"),
            identity.login.as_deref().unwrap_or("?")
        );
        return error_redirect(ERROR_ACCESS_DENIED);
    }

    let Some(email) = identity.email() else {
        return error_redirect(ERROR_ACCESS_DENIED);
    };
    let session = auth.sessions.create(email, identity.login.clone());
    info!("Signed in {}", session.email);

    with_cookie(
        Redirect::to("/").into_response(),
        &session_cookie(&session, auth.cookie_secure),
    )
}

/// `POST /auth/signout`
pub async fn signout(State(auth): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    if let Some(id) = read_cookie(&headers, SESSION_COOKIE) {
        if auth.sessions.revoke(&id) {
            debug!("Session revoked");
        }
    }
    with_cookie(
        Redirect::to(SIGN_IN_PATH).into_response(),
        &clear_cookie(auth.cookie_secure),
    )
}

/// Query parameters on the error view
#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

/// `GET /auth/error`
pub async fn error_page(Query(query): Query<ErrorQuery>) -> Response {
    (
        StatusCode::FORBIDDEN,
        Html(pages::access_denied_page(query.error.as_deref())),
    )
        .into_response()
}
