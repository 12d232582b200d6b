use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the OAuth client id
pub const CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";
/// Environment variable holding the OAuth client secret
pub const CLIENT_SECRET_ENV: &str = "GITHUB_CLIENT_SECRET";

/// Addresses allowed in when the config file names none.
///
/// Deployments list their operators under `[auth] allowed_emails`; with an
/// empty list every sign-in is denied.
pub const DEFAULT_ALLOWED_EMAILS: &[&str] = &[];

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "TeleClaude monitoring dashboard")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Status endpoint URL
    #[arg(long, global = true)]
    pub status_url: Option<String>,

    /// Polling interval in milliseconds
    #[arg(short = 'i', long, global = true)]
    pub poll_interval: Option<u64>,

    /// Web server port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the web dashboard (default)
    Serve,
    /// Show the dashboard in the terminal
    Watch,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if running the terminal view
    pub fn is_watch_mode(&self) -> bool {
        matches!(self.command, Some(Command::Watch))
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Web server settings
    #[serde(default)]
    pub web: WebSettings,

    /// Status endpoint settings
    #[serde(default)]
    pub status: StatusSettings,

    /// Access control settings
    #[serde(default)]
    pub auth: AuthSettings,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    /// Address to bind
    #[serde(default = "default_web_bind")]
    pub bind: String,

    /// Web server port
    #[serde(default = "default_web_port")]
    pub port: u16,

    /// Externally visible base URL, used for the OAuth redirect
    #[serde(default)]
    pub public_url: Option<String>,

    /// Mark the session cookie `Secure` (serve behind HTTPS)
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_web_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    3000
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            bind: default_web_bind(),
            port: default_web_port(),
            public_url: None,
            cookie_secure: false,
        }
    }
}

impl WebSettings {
    /// Base URL the browser reaches us at
    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.bind, self.port),
        }
    }
}

/// Status endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSettings {
    /// Status endpoint URL
    #[serde(default = "default_status_url")]
    pub url: String,

    /// Polling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_status_url() -> String {
    "http://127.0.0.1:8787/api/status".to_string()
}

fn default_poll_interval() -> u64 {
    30_000
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            url: default_status_url(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl StatusSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Access control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Email addresses allowed to sign in (exact match)
    #[serde(default = "default_allowed_emails")]
    pub allowed_emails: Vec<String>,

    /// Session lifetime in hours
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
}

fn default_allowed_emails() -> Vec<String> {
    DEFAULT_ALLOWED_EMAILS.iter().map(|e| e.to_string()).collect()
}

/// Longest accepted session lifetime (10 years)
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

/// Default session lifetime (30 days)
fn default_session_ttl() -> u64 {
    720
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            allowed_emails: default_allowed_emails(),
            session_ttl_hours: default_session_ttl(),
        }
    }
}

impl AuthSettings {
    pub fn session_ttl(&self) -> chrono::Duration {
        let hours = self.session_ttl_hours.min(MAX_SESSION_TTL_HOURS);
        i64::try_from(hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::hours(MAX_SESSION_TTL_HOURS as i64))
    }
}

/// OAuth client credentials, supplied only through the environment
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl OAuthCredentials {
    /// Read `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET`
    pub fn from_env() -> Result<Self> {
        let client_id = read_env(CLIENT_ID_ENV)?;
        let client_secret = read_env(CLIENT_SECRET_ENV)?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

fn read_env(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{} is not set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} is empty", name);
    }
    Ok(value)
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file: {:?}", p))?;
                return toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", p));
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("teleclaude/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/teleclaude/config.toml")),
            dirs::home_dir().map(|p| p.join(".teleclaude.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                return toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path));
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(url) = &cli.status_url {
            self.status.url = url.clone();
        }
        if let Some(poll_interval) = cli.poll_interval {
            self.status.poll_interval_ms = poll_interval;
        }
        if let Some(port) = cli.port {
            self.web.port = port;
        }
    }

    /// Validate and normalize settings values
    ///
    /// Floors the poll interval and request timeout; bounds the session lifetime.
    pub fn validate(&mut self) {
        const MIN_POLL_INTERVAL: u64 = 1_000;
        const MIN_REQUEST_TIMEOUT: u64 = 100;

        if self.status.poll_interval_ms < MIN_POLL_INTERVAL {
            self.status.poll_interval_ms = MIN_POLL_INTERVAL;
        }
        if self.status.request_timeout_ms < MIN_REQUEST_TIMEOUT {
            self.status.request_timeout_ms = MIN_REQUEST_TIMEOUT;
        }
        self.auth.session_ttl_hours = self.auth.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.status.poll_interval_ms, 30_000);
        assert_eq!(settings.status.request_timeout_ms, 10_000);
        assert_eq!(settings.web.port, 3000);
        assert_eq!(settings.auth.session_ttl_hours, 720);
        assert!(settings.auth.allowed_emails.is_empty());
        assert!(!settings.web.cookie_secure);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [web]
            port = 8080
            public_url = "https://dash.example.com/"

            [status]
            url = "http://bot.internal/api/status"

            [auth]
            allowed_emails = ["owner@example.com", "partner@example.com"]
        "#;

        let settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        assert_eq!(settings.web.port, 8080);
        assert_eq!(settings.web.base_url(), "https://dash.example.com");
        assert_eq!(settings.status.url, "http://bot.internal/api/status");
        assert_eq!(settings.status.poll_interval_ms, 30_000);
        assert_eq!(
            settings.auth.allowed_emails,
            vec!["owner@example.com", "partner@example.com"]
        );
    }

    #[test]
    fn test_base_url_without_public_url() {
        let web = WebSettings::default();
        assert_eq!(web.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[status]\npoll_interval_ms = 45000\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.status.poll_interval_ms, 45_000);
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[status\n").unwrap();

        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_merge_cli_overrides() {
        let cli = Config::parse_from([
            "teleclaude-dash",
            "--status-url",
            "http://other/api/status",
            "-i",
            "5000",
            "-p",
            "9000",
        ]);
        let mut settings = Settings::default();
        settings.merge_cli(&cli);

        assert_eq!(settings.status.url, "http://other/api/status");
        assert_eq!(settings.status.poll_interval_ms, 5000);
        assert_eq!(settings.web.port, 9000);
        assert!(!cli.is_watch_mode());
    }

    #[test]
    fn test_watch_subcommand() {
        let cli = Config::parse_from(["teleclaude-dash", "watch", "--status-url", "http://x"]);
        assert!(cli.is_watch_mode());
        assert_eq!(cli.status_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_validate_floors() {
        let mut settings = Settings::default();
        settings.status.poll_interval_ms = 0;
        settings.status.request_timeout_ms = 0;
        settings.auth.session_ttl_hours = 0;
        settings.validate();

        assert_eq!(settings.status.poll_interval_ms, 1_000);
        assert_eq!(settings.status.request_timeout_ms, 100);
        assert_eq!(settings.auth.session_ttl_hours, 1);
    }

    #[test]
    fn test_validate_caps_ttl() {
        let mut settings = Settings::default();
        settings.auth.session_ttl_hours = u64::MAX;
        settings.validate();

        assert_eq!(settings.auth.session_ttl_hours, MAX_SESSION_TTL_HOURS);
        assert_eq!(
            settings.auth.session_ttl(),
            chrono::Duration::hours(24 * 365 * 10)
        );
    }

    #[test]
    fn test_session_ttl_never_negative() {
        let auth = AuthSettings {
            allowed_emails: Vec::new(),
            session_ttl_hours: u64::MAX,
        };
        assert!(auth.session_ttl() > chrono::Duration::zero());
        assert_eq!(
            auth.session_ttl(),
            chrono::Duration::hours(MAX_SESSION_TTL_HOURS as i64)
        );
    }

    #[test]
    fn test_credentials_from_env() {
        temp_env::with_vars(
            [
                (CLIENT_ID_ENV, Some("id-123")),
                (CLIENT_SECRET_ENV, Some("shh")),
            ],
            || {
                let creds = OAuthCredentials::from_env().unwrap();
                assert_eq!(creds.client_id, "id-123");
                assert_eq!(creds.client_secret, "shh");
                assert!(!format!("{:?}", creds).contains("shh"));
            },
        );
    }

    #[test]
    fn test_credentials_missing() {
        temp_env::with_vars(
            [(CLIENT_ID_ENV, Some("id-123")), (CLIENT_SECRET_ENV, None)],
            || {
                let err = OAuthCredentials::from_env().unwrap_err();
                assert!(err.to_string().contains(CLIENT_SECRET_ENV));
            },
        );
        temp_env::with_vars(
            [(CLIENT_ID_ENV, Some("  ")), (CLIENT_SECRET_ENV, Some("shh"))],
            || {
                assert!(OAuthCredentials::from_env().is_err());
            },
        );
    }
}
