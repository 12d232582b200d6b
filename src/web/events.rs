//! Server-Sent Events for the live dashboard region
//!
//! Each connection mounts its own [`StatusPoller`]; the poller stops when the
//! client goes away and the stream (which owns the handle) is dropped. The
//! session is re-checked before every fragment, so a signed-out or expired
//! session ends the stream.

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Extension,
};
use futures_util::{future, Stream, StreamExt};
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use teleclaude_core::auth::Session;
use teleclaude_core::monitor::{PollHandle, StatusPoller};
use teleclaude_core::status::StatusSource;

use super::auth::AuthState;
use super::pages;

/// SSE event name carrying a rendered fragment
pub const VIEW_EVENT: &str = "view";

/// State for SSE handler
pub struct SseState {
    pub auth: Arc<AuthState>,
    pub source: Arc<dyn StatusSource>,
    pub interval: Duration,
}

/// SSE stream of dashboard fragments, one per poll state change
pub async fn events(
    State(state): State<Arc<SseState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    debug!("Dashboard stream opened for {}", session.email);

    let (handle, rx) = StatusPoller::new(state.source.clone(), state.interval).start();
    let refresh = state.interval;
    let auth = state.auth.clone();

    let fragments = WatchStream::new(rx)
        .take_while(move |_| {
            let live = auth.sessions.get(&session.id).is_some();
            if !live {
                debug!("Dashboard stream closed: session for {} ended", session.email);
            }
            future::ready(live)
        })
        .map(move |poll_state| {
            let html = pages::poll_fragment(&poll_state, refresh);
            Ok::<_, Infallible>(Event::default().event(VIEW_EVENT).data(html))
        });

    let stream = Mounted {
        inner: fragments,
        handle: Some(handle),
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Stream that keeps its poller running until it ends or is dropped
struct Mounted<S> {
    inner: S,
    handle: Option<PollHandle>,
}

impl<S: Stream + Unpin> Stream for Mounted<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let next = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(None) = next {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
        next
    }
}
