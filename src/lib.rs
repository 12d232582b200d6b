//! TeleClaude dashboard: an allow-listed web view and a terminal view over
//! the bot's status endpoint.

pub mod config;
pub mod ui;
pub mod web;
