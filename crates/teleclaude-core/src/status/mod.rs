//! Status snapshot: the payload served by the bot's `/api/status` endpoint.
//!
//! - [`types`]: the wire model, deserialized as-is
//! - [`view`]: derived display fields and color classification
//! - [`source`]: fetching a snapshot over HTTP

pub mod source;
pub mod types;
pub mod view;

pub use source::{parse_snapshot, FetchError, HttpStatusSource, StatusSource};
pub use types::{MemoryItem, MemoryStats, ModelUsage, StatusSnapshot, SystemActivity, TokenStats};
pub use view::{
    local_time_label, seconds_label, DashboardView, ModelLine, Priority, PriorityChip, QuickStat,
    StatusTier, Tone,
};
