mod settings;

pub use settings::{
    AuthSettings, Command, Config, OAuthCredentials, Settings, StatusSettings, WebSettings,
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_ALLOWED_EMAILS, MAX_SESSION_TTL_HOURS,
};
