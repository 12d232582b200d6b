//! Terminal dashboard (`watch` subcommand)

mod app;
pub mod components;
mod layout;

pub use app::App;
pub use layout::{Arrangement, Layout, LayoutAreas};
