//! Web dashboard: OAuth sign-in, session guard, and live status over SSE

pub mod auth;
mod dashboard;
mod events;
pub mod oauth;
pub mod pages;
mod server;
mod static_files;

pub use server::WebServer;
