//! Core library for the TeleClaude dashboard.
//!
//! Holds everything that does not depend on a particular front end:
//!
//! - [`auth`]: the allow-list access gate, sessions, and OAuth state nonces
//! - [`status`]: the status snapshot model, its derived display fields, and
//!   the HTTP source that fetches it
//! - [`monitor`]: the cancellable poller that keeps a view of the latest
//!   snapshot fresh
//!
//! The web dashboard and the terminal view both build on these types.

pub mod auth;
pub mod monitor;
pub mod status;
