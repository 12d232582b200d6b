//! Server-rendered HTML for the dashboard and the auth views.
//!
//! Full pages are returned by route handlers; fragments are pushed over SSE
//! into the dashboard's live region. All interpolated text is escaped.

use std::fmt::Write as _;
use std::time::Duration;

use teleclaude_core::auth::Session;
use teleclaude_core::monitor::PollState;
use teleclaude_core::status::{seconds_label, DashboardView, StatusSnapshot, Tone};

/// Product name shown in the navigation bar and titles
const PRODUCT: &str = "TeleClaude";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn tone_class(tone: Tone) -> String {
    format!("tone-{}", tone.as_str())
}

/// Wrap body markup in a full HTML document
fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

// =========================================================
// Auth views
// =========================================================

/// Sign-in entry point for unauthenticated visitors
pub fn sign_in_page() -> String {
    document(
        &format!("Sign in - {}", PRODUCT),
        &format!(
            r#"<div class="centered">
<div class="panel auth-panel">
<h1>{product}</h1>
<p class="muted">Sign in to view the dashboard.</p>
<a class="button" href="/auth/signin/github">Sign in with GitHub</a>
</div>
</div>"#,
            product = PRODUCT,
        ),
    )
}

/// Access-denied view. Unknown error codes read as a failed sign-in.
pub fn access_denied_page(error: Option<&str>) -> String {
    let (heading, message) = match error {
        None | Some("AccessDenied") => (
            "Access Denied",
            "Your account is not authorized to access this dashboard.",
        ),
        Some(_) => (
            "Sign-in failed",
            "The sign-in with the identity provider did not complete.",
        ),
    };
    document(
        &format!("{} - {}", heading, PRODUCT),
        &format!(
            r#"<div class="centered">
<div class="panel auth-panel">
<h1 class="tone-text-red">{heading}</h1>
<p class="muted">{message}</p>
<a class="link" href="/auth/signin">Try again</a>
</div>
</div>"#,
        ),
    )
}

// =========================================================
// Dashboard
// =========================================================

/// Navigation bar with the signed-in email and the sign-out action
fn navigation(session: &Session) -> String {
    format!(
        r#"<nav class="topbar">
<a class="brand" href="/">{product}</a>
<div class="account">
<span class="muted email">{email}</span>
<form method="post" action="/auth/signout">
<button type="submit" class="link-button">Sign out</button>
</form>
</div>
</nav>"#,
        product = PRODUCT,
        email = escape(&session.email),
    )
}

/// Dashboard page shell; the live region is filled over SSE
pub fn dashboard_page(session: &Session) -> String {
    document(
        &format!("{} Dashboard", PRODUCT),
        &format!(
            r#"{nav}
<main id="dashboard" class="content" data-events="/api/events">
{loading}
</main>
<script src="/assets/app.js" defer></script>"#,
            nav = navigation(session),
            loading = loading_fragment(),
        ),
    )
}

/// Live-region markup for a poll state
pub fn poll_fragment(state: &PollState, refresh: Duration) -> String {
    match state {
        PollState::Loading => loading_fragment(),
        PollState::Failed(message) => error_fragment(message),
        PollState::Ready(snapshot) => dashboard_fragment(snapshot, refresh),
    }
}

fn loading_fragment() -> String {
    r#"<div class="centered"><div class="notice">Loading dashboard...</div></div>"#.to_string()
}

fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class="centered"><div class="notice tone-text-red">Error: {}</div></div>"#,
        escape(message)
    )
}

/// The four dashboard cards plus the footer
pub fn dashboard_fragment(snapshot: &StatusSnapshot, refresh: Duration) -> String {
    let view = DashboardView::new(snapshot);
    let mut html = String::new();

    html.push_str(r#"<div class="grid">"#);
    token_card(&mut html, &view);
    memory_card(&mut html, &view);
    system_card(&mut html, &view);
    quick_stats_card(&mut html, &view);
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<footer class="footer">
<p class="muted">Last updated: {updated}</p>
<p class="faint">Auto-refreshes every {secs} seconds</p>
</footer>"#,
        updated = escape(&view.last_updated_label()),
        secs = seconds_label(refresh),
    );
    html
}

fn token_card(html: &mut String, view: &DashboardView<'_>) {
    let status_tone = tone_class(view.status_tier().tone());
    let _ = write!(
        html,
        r#"<section class="card">
<h2>Token Usage (Today)</h2>
<div class="big">{spent}</div>
<div class="muted">of {budget} daily budget</div>
<div class="bar"><div class="bar-fill {tone}" style="width: {width}%"></div></div>
<div class="row">
<span>{percent} used</span>
<span class="chip {tone}">{status}</span>
</div>
<div class="muted">{requests} requests today</div>"#,
        spent = escape(&view.spent_label()),
        budget = escape(&view.budget_label()),
        tone = status_tone,
        width = view.bar_fill_percent(),
        percent = escape(&view.percent_label()),
        status = escape(view.status_label()),
        requests = view.requests(),
    );

    let models = view.model_lines();
    if !models.is_empty() {
        html.push_str(r#"<div class="sublist"><div class="faint">By Model:</div>"#);
        for line in models {
            let _ = write!(
                html,
                r#"<div class="row small"><span>{model}</span><span>{cost} ({requests})</span></div>"#,
                model = escape(&line.model),
                cost = escape(&line.cost),
                requests = line.requests,
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
}

fn memory_card(html: &mut String, view: &DashboardView<'_>) {
    let memory = &view.snapshot().memory;
    let _ = write!(
        html,
        r#"<section class="card">
<h2>Memory System</h2>
<div class="big">{total}</div>
<div class="muted">active memories</div>
<div class="chips">"#,
        total = memory.total,
    );
    for chip in view.priority_chips() {
        let _ = write!(
            html,
            r#"<span class="chip {tone}">{label}: {count}</span>"#,
            tone = tone_class(chip.tone),
            label = escape(&chip.label),
            count = chip.count,
        );
    }
    html.push_str("</div>");

    if !memory.recent.is_empty() {
        html.push_str(r#"<div class="sublist"><div class="faint">Recent:</div>"#);
        for (item, tone) in view.recent_memories() {
            let _ = write!(
                html,
                r#"<div class="item"><span class="tag {tone}">{priority}</span>{content}</div>"#,
                tone = tone_class(tone),
                priority = escape(&item.priority),
                content = escape(&item.content),
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
}

fn system_card(html: &mut String, view: &DashboardView<'_>) {
    let system = &view.snapshot().system;
    html.push_str(
        r#"<section class="card">
<h2>System Status</h2>
<div class="online"><span class="dot tone-text-green">&#9679;</span> Online</div>"#,
    );
    if let Some(last_active) = view.last_active_label() {
        let _ = write!(
            html,
            r#"<div class="muted">Last Active: {}</div>"#,
            escape(&last_active)
        );
    }

    if system.active_tasks.is_empty() {
        html.push_str(r#"<div class="faint spaced">No active background tasks</div>"#);
    } else {
        html.push_str(
            r#"<div class="sublist"><div class="tone-text-yellow small">Active Tasks:</div>"#,
        );
        for task in &system.active_tasks {
            let _ = write!(html, r#"<div class="item">{}</div>"#, escape(task));
        }
        html.push_str("</div>");
    }

    if !system.recent_completed_tasks.is_empty() {
        html.push_str(r#"<div class="sublist"><div class="faint">Recently Completed:</div>"#);
        for task in &system.recent_completed_tasks {
            let _ = write!(html, r#"<div class="item">{}</div>"#, escape(task));
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
}

fn quick_stats_card(html: &mut String, view: &DashboardView<'_>) {
    html.push_str(r#"<section class="card"><h2>Quick Stats</h2><div class="stats">"#);
    for stat in view.quick_stats() {
        let _ = write!(
            html,
            r#"<div class="stat"><div class="stat-value tone-text-{tone}">{value}</div><div class="stat-label">{label}</div></div>"#,
            tone = stat.tone.as_str(),
            value = escape(&stat.value),
            label = stat.label,
        );
    }
    html.push_str("</div></section>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const REFRESH: Duration = Duration::from_secs(30);

    const SNAPSHOT_JSON: &str = r#"{
        "timestamp": "2026-01-15T09:30:00Z",
        "memory": {
            "total": 3,
            "byPriority": {"URGENT": 3, "DAILY": 0},
            "recent": [{"id": "m1", "content": "<b>pay</b> rent", "priority": "URGENT", "created": "x"}]
        },
        "tokens": {
            "spent": 13.7, "budget": 10.0, "percent": 137.0, "status": "CRITICAL",
            "requests": 7, "byModel": {}
        },
        "system": {"lastActive": null, "activeTasks": [], "recentCompletedTasks": ["Backup"]}
    }"#;

    fn snapshot() -> StatusSnapshot {
        serde_json::from_str(SNAPSHOT_JSON).unwrap()
    }

    fn session() -> Session {
        let now = chrono::Utc::now();
        Session {
            id: "s1".to_string(),
            email: "owner@example.com".to_string(),
            login: None,
            created_at: now,
            expires_at: now,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_bar_width_clamped_percent_label_not() {
        let html = dashboard_fragment(&snapshot(), REFRESH);
        assert!(html.contains(r#"style="width: 100%""#));
        assert!(html.contains("137.0% used"));
        assert!(html.contains(r#"<span class="chip tone-red">CRITICAL</span>"#));
    }

    #[test]
    fn test_quick_stats_rendered() {
        let html = dashboard_fragment(&snapshot(), REFRESH);
        assert!(html.contains(
            r#"<div class="stat-value tone-text-red">3</div><div class="stat-label">Urgent Items</div>"#
        ));
        assert!(html.contains(
            r#"<div class="stat-value tone-text-blue">0</div><div class="stat-label">Daily Tasks</div>"#
        ));
        assert!(html.contains(
            r#"<div class="stat-value tone-text-green">$-3.70</div><div class="stat-label">Budget Left</div>"#
        ));
    }

    #[test]
    fn test_content_is_escaped() {
        let html = dashboard_fragment(&snapshot(), REFRESH);
        assert!(html.contains("&lt;b&gt;pay&lt;/b&gt; rent"));
        assert!(!html.contains("<b>pay</b>"));
    }

    #[test]
    fn test_empty_sections() {
        let html = dashboard_fragment(&snapshot(), REFRESH);
        assert!(html.contains("No active background tasks"));
        assert!(!html.contains("By Model:"));
        assert!(!html.contains("Last Active:"));
        assert!(html.contains("Recently Completed:"));
        assert!(html.contains("Auto-refreshes every 30 seconds"));
    }

    #[test]
    fn test_fractional_refresh_period() {
        let html = dashboard_fragment(&snapshot(), Duration::from_millis(1500));
        assert!(html.contains("Auto-refreshes every 1.5 seconds"));
    }

    #[test]
    fn test_poll_fragments() {
        assert!(poll_fragment(&PollState::Loading, REFRESH).contains("Loading dashboard..."));

        let failed = poll_fragment(&PollState::Failed("HTTP <502>".to_string()), REFRESH);
        assert!(failed.contains("Error: HTTP &lt;502&gt;"));
        assert!(!failed.contains("Token Usage"));

        let ready = poll_fragment(&PollState::Ready(Arc::new(snapshot())), REFRESH);
        assert!(ready.contains("Token Usage (Today)"));
        assert!(!ready.contains("Loading dashboard..."));
    }

    #[test]
    fn test_access_denied_page() {
        let html = access_denied_page(Some("AccessDenied"));
        assert!(html.contains("Access Denied"));
        assert!(html.contains("Your account is not authorized to access this dashboard."));
        assert!(html.contains(r#"href="/auth/signin""#));

        let html = access_denied_page(Some("OAuthCallback"));
        assert!(html.contains("Sign-in failed"));
        assert!(html.contains(r#"href="/auth/signin""#));
    }

    #[test]
    fn test_dashboard_page_shell() {
        let html = dashboard_page(&session());
        assert!(html.contains("owner@example.com"));
        assert!(html.contains(r#"action="/auth/signout""#));
        assert!(html.contains(r#"data-events="/api/events""#));
        assert!(html.contains("Loading dashboard..."));
    }

    #[test]
    fn test_sign_in_page() {
        let html = sign_in_page();
        assert!(html.contains(r#"href="/auth/signin/github""#));
    }
}
