//! OAuth2 identity provider exchange (GitHub)

use futures_util::future::BoxFuture;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use teleclaude_core::auth::Identity;

use crate::config::OAuthCredentials;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_SCOPE: &str = "read:user user:email";
const CLIENT_USER_AGENT: &str = concat!("teleclaude-dash/", env!("CARGO_PKG_VERSION"));

/// Error type for the provider exchange
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The provider refused the authorization code
    #[error("token exchange rejected: {0}")]
    Rejected(String),

    /// Transport or decoding failure talking to the provider
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// External identity provider
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// URL to send the browser to, carrying the `state` nonce
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for the user's identity
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<Identity, OAuthError>>;
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// `GET /user` response (fields we use)
#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

/// `GET /user/emails` entry
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GithubEmail {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

/// GitHub OAuth app
pub struct GithubProvider {
    client: reqwest::Client,
    credentials: OAuthCredentials,
    redirect_uri: String,
}

impl GithubProvider {
    /// Create a provider that redirects back to `redirect_uri`
    pub fn new(credentials: OAuthCredentials, redirect_uri: String) -> Result<Self, OAuthError> {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            credentials,
            redirect_uri,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, OAuthError> {
        let token: TokenResponse = self
            .client
            .post(GITHUB_TOKEN_URL)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let access_token = match (token.access_token, token.error) {
            (Some(t), None) => t,
            (_, Some(error)) => {
                let detail = token.error_description.unwrap_or_default();
                return Err(OAuthError::Rejected(format!("{} {}", error, detail)));
            }
            (None, None) => return Err(OAuthError::Rejected("no access token".to_string())),
        };

        let user: GithubUser = self
            .client
            .get(format!("{}/user", GITHUB_API_URL))
            .bearer_auth(&access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Profile email is null unless the user made it public
        let emails = if user.email.as_deref().is_some_and(|e| !e.is_empty()) {
            Vec::new()
        } else {
            self.fetch_emails(&access_token).await.unwrap_or_else(|e| {
                debug!("GitHub email list unavailable: {}", e);
                Vec::new()
            })
        };

        Ok(Identity {
            provider_id: Some(user.id.to_string()),
            email: select_email(user.email, &emails),
            login: Some(user.login),
            name: user.name,
        })
    }

    async fn fetch_emails(&self, access_token: &str) -> Result<Vec<GithubEmail>, OAuthError> {
        Ok(self
            .client
            .get(format!("{}/user/emails", GITHUB_API_URL))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

impl IdentityProvider for GithubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", GITHUB_SCOPE),
            ("state", state),
        ];
        match Url::parse_with_params(GITHUB_AUTHORIZE_URL, &params) {
            Ok(url) => url.into(),
            Err(_) => GITHUB_AUTHORIZE_URL.to_string(),
        }
    }

    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<Identity, OAuthError>> {
        Box::pin(self.exchange_code(code))
    }
}

/// Pick the identity's email: the public profile address, else the primary
/// verified address. Unverified addresses are never used.
pub(crate) fn select_email(profile_email: Option<String>, emails: &[GithubEmail]) -> Option<String> {
    profile_email.filter(|e| !e.is_empty()).or_else(|| {
        emails
            .iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(address: &str, primary: bool, verified: bool) -> GithubEmail {
        GithubEmail {
            email: address.to_string(),
            primary,
            verified,
        }
    }

    fn provider() -> GithubProvider {
        GithubProvider::new(
            OAuthCredentials {
                client_id: "client-1".to_string(),
                client_secret: "secret".to_string(),
            },
            "http://localhost:3000/auth/callback/github".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_select_profile_email() {
        let emails = [email("other@example.com", true, true)];
        assert_eq!(
            select_email(Some("public@example.com".to_string()), &emails),
            Some("public@example.com".to_string())
        );
    }

    #[test]
    fn test_select_primary_verified_fallback() {
        let emails = [
            email("old@example.com", false, true),
            email("main@example.com", true, true),
        ];
        assert_eq!(
            select_email(None, &emails),
            Some("main@example.com".to_string())
        );
        assert_eq!(
            select_email(Some(String::new()), &emails),
            Some("main@example.com".to_string())
        );
    }

    #[test]
    fn test_select_unverified_primary_ignored() {
        let emails = [email("main@example.com", true, false)];
        assert_eq!(select_email(None, &emails), None);
        assert_eq!(select_email(None, &[]), None);
    }

    #[test]
    fn test_authorize_url() {
        let url = provider().authorize_url("nonce-1");
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("github.com"));

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".to_string(), "client-1".to_string())));
        assert!(pairs.contains(&("state".to_string(), "nonce-1".to_string())));
        assert!(pairs.contains(&("scope".to_string(), GITHUB_SCOPE.to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3000/auth/callback/github".to_string()
        )));
    }

    #[test]
    fn test_token_error_response_parses() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
        )
        .unwrap();
        assert!(token.access_token.is_none());
        assert_eq!(token.error.as_deref(), Some("bad_verification_code"));
    }
}
