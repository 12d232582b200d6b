use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teleclaude_dash::config::{Command, Config, OAuthCredentials, Settings};
use teleclaude_dash::ui::App;
use teleclaude_dash::web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging (keep the guard alive so file logs are flushed)
    let _log_guard = setup_logging(cli.debug, cli.is_watch_mode());

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_cli(&cli);
    settings.validate();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let credentials = OAuthCredentials::from_env()?;
            if settings.auth.allowed_emails.is_empty() {
                tracing::warn!("No allowed emails configured; every sign-in will be denied");
            }
            WebServer::new(settings, credentials).run().await
        }
        Command::Watch => {
            let mut app = App::new(settings);
            app.run().await
        }
    }
}

fn setup_logging(
    debug: bool,
    to_file: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = if debug {
        EnvFilter::new("teleclaude=debug,tower_http=debug")
    } else {
        EnvFilter::new("teleclaude=info")
    };

    // The terminal view owns stdout; log to a file instead
    if to_file {
        let appender = dirs::cache_dir().and_then(|dir| {
            RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("watch")
                .filename_suffix("log")
                .build(dir.join("teleclaude"))
                .ok()
        });
        if let Some(appender) = appender {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            return Some(guard);
        }
        return None;
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
    None
}
