//! Display fields derived from a [`StatusSnapshot`] at render time.
//!
//! Both front ends render through [`DashboardView`] so the numbers shown on
//! the web page and in the terminal are the same.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::types::{MemoryItem, StatusSnapshot};

/// Renderer-neutral color class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Blue,
    Purple,
    Gray,
    /// Fallback for values outside the known set
    Neutral,
}

impl Tone {
    /// Stable lowercase name (used as a CSS class suffix)
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Green => "green",
            Tone::Yellow => "yellow",
            Tone::Red => "red",
            Tone::Blue => "blue",
            Tone::Purple => "purple",
            Tone::Gray => "gray",
            Tone::Neutral => "neutral",
        }
    }
}

/// Token budget status tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    Ok,
    Warning,
    Critical,
    NoData,
    Unrecognized,
}

impl StatusTier {
    /// Classify a status label. Exact match only.
    pub fn from_label(label: &str) -> Self {
        match label {
            "OK" => StatusTier::Ok,
            "WARNING" => StatusTier::Warning,
            "CRITICAL" => StatusTier::Critical,
            "NO DATA" => StatusTier::NoData,
            _ => StatusTier::Unrecognized,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            StatusTier::Ok => Tone::Green,
            StatusTier::Warning => Tone::Yellow,
            StatusTier::Critical => Tone::Red,
            StatusTier::NoData => Tone::Gray,
            StatusTier::Unrecognized => Tone::Neutral,
        }
    }
}

/// Memory priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Urgent,
    Daily,
    Weekly,
    Archive,
    Unrecognized,
}

impl Priority {
    /// Known tiers in display order
    pub const KNOWN: [Priority; 4] = [
        Priority::Urgent,
        Priority::Daily,
        Priority::Weekly,
        Priority::Archive,
    ];

    /// Classify a priority label. Exact match only.
    pub fn from_label(label: &str) -> Self {
        match label {
            "URGENT" => Priority::Urgent,
            "DAILY" => Priority::Daily,
            "WEEKLY" => Priority::Weekly,
            "ARCHIVE" => Priority::Archive,
            _ => Priority::Unrecognized,
        }
    }

    /// Wire label, `None` for unrecognized tiers
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Priority::Urgent => Some("URGENT"),
            Priority::Daily => Some("DAILY"),
            Priority::Weekly => Some("WEEKLY"),
            Priority::Archive => Some("ARCHIVE"),
            Priority::Unrecognized => None,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Priority::Urgent => Tone::Red,
            Priority::Daily => Tone::Blue,
            Priority::Weekly => Tone::Purple,
            Priority::Archive => Tone::Gray,
            Priority::Unrecognized => Tone::Neutral,
        }
    }
}

/// Count chip for one priority tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityChip {
    pub label: String,
    pub count: u64,
    pub tone: Tone,
}

/// One row of the per-model spend list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelLine {
    pub model: String,
    /// `$` with four decimals
    pub cost: String,
    pub requests: u64,
}

/// One tile of the quick stats card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickStat {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// Derived display fields over a borrowed snapshot
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    snapshot: &'a StatusSnapshot,
}

impl<'a> DashboardView<'a> {
    pub fn new(snapshot: &'a StatusSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a StatusSnapshot {
        self.snapshot
    }

    // =========================================================
    // Token usage
    // =========================================================

    pub fn status_tier(&self) -> StatusTier {
        StatusTier::from_label(&self.snapshot.tokens.status)
    }

    /// Raw status label as reported
    pub fn status_label(&self) -> &'a str {
        &self.snapshot.tokens.status
    }

    /// Spent today, `$` with four decimals
    pub fn spent_label(&self) -> String {
        money(self.snapshot.tokens.spent, 4)
    }

    /// Daily budget, `$` with two decimals
    pub fn budget_label(&self) -> String {
        money(self.snapshot.tokens.budget, 2)
    }

    /// Budget minus spend. Not part of the payload.
    pub fn budget_remaining(&self) -> f64 {
        self.snapshot.tokens.budget - self.snapshot.tokens.spent
    }

    pub fn budget_remaining_label(&self) -> String {
        money(self.budget_remaining(), 2)
    }

    /// Progress bar width in percent. Only the width is clamped.
    pub fn bar_fill_percent(&self) -> f64 {
        self.snapshot.tokens.percent.min(100.0)
    }

    /// Reported percent with one decimal, e.g. `137.0%`
    pub fn percent_label(&self) -> String {
        format!("{}%", fixed(self.snapshot.tokens.percent, 1))
    }

    pub fn requests(&self) -> u64 {
        self.snapshot.tokens.requests
    }

    pub fn model_lines(&self) -> Vec<ModelLine> {
        self.snapshot
            .tokens
            .by_model
            .iter()
            .map(|(model, usage)| ModelLine {
                model: model.clone(),
                cost: money(usage.cost, 4),
                requests: usage.requests,
            })
            .collect()
    }

    // =========================================================
    // Memory
    // =========================================================

    /// Count for a priority key; absent keys count as zero
    pub fn priority_count(&self, key: &str) -> u64 {
        self.snapshot
            .memory
            .by_priority
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Chips for every reported tier: known tiers first, then the rest
    pub fn priority_chips(&self) -> Vec<PriorityChip> {
        let by_priority = &self.snapshot.memory.by_priority;
        let known = Priority::KNOWN.iter().filter_map(|p| {
            let label = p.label()?;
            by_priority.get(label).map(|count| PriorityChip {
                label: label.to_string(),
                count: *count,
                tone: p.tone(),
            })
        });
        let other = by_priority
            .iter()
            .filter(|(label, _)| Priority::from_label(label) == Priority::Unrecognized)
            .map(|(label, count)| PriorityChip {
                label: label.clone(),
                count: *count,
                tone: Tone::Neutral,
            });
        known.chain(other).collect()
    }

    /// Recent memories with the tone of their priority
    pub fn recent_memories(&self) -> impl Iterator<Item = (&'a MemoryItem, Tone)> + 'a {
        let snapshot = self.snapshot;
        snapshot
            .memory
            .recent
            .iter()
            .map(|item| (item, Priority::from_label(&item.priority).tone()))
    }

    // =========================================================
    // Summary
    // =========================================================

    pub fn quick_stats(&self) -> [QuickStat; 4] {
        [
            QuickStat {
                label: "Urgent Items",
                value: self.priority_count("URGENT").to_string(),
                tone: Tone::Red,
            },
            QuickStat {
                label: "Daily Tasks",
                value: self.priority_count("DAILY").to_string(),
                tone: Tone::Blue,
            },
            QuickStat {
                label: "API Calls Today",
                value: self.requests().to_string(),
                tone: Tone::Gray,
            },
            QuickStat {
                label: "Budget Left",
                value: self.budget_remaining_label(),
                tone: Tone::Green,
            },
        ]
    }

    /// Snapshot time in local time
    pub fn last_updated_label(&self) -> String {
        local_time_label(&self.snapshot.timestamp)
    }

    /// Last bot activity in local time, if reported
    pub fn last_active_label(&self) -> Option<String> {
        self.snapshot
            .system
            .last_active
            .as_deref()
            .map(local_time_label)
    }
}

/// Dollar amount with fixed decimals
fn money(value: f64, decimals: usize) -> String {
    // -0.0 prints as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("${}", fixed(value, decimals))
}

/// Fixed-point text with exact halfway values rounded away from zero.
///
/// `{:.N}` rounds exact binary ties to even (`12.25` -> `12.2`); the
/// dashboard shows `12.3`.
fn fixed(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        let scale = 10f64.powi(decimals as i32);
        let scaled = value.abs() * scale;
        // Only a product that is exact can sit on a true tie
        if scaled.fract() == 0.5 && scaled / scale == value.abs() {
            let rounded = (scaled.floor() + 1.0) / scale;
            return format!("{:.*}", decimals, rounded.copysign(value));
        }
    }
    format!("{:.*}", decimals, value)
}

/// Refresh period in seconds without truncation, e.g. `30` or `1.5`
pub fn seconds_label(interval: Duration) -> String {
    let millis = interval.as_millis();
    if millis % 1000 == 0 {
        return (millis / 1000).to_string();
    }
    let text = format!("{:.3}", interval.as_secs_f64());
    text.trim_end_matches('0').to_string()
}

/// RFC 3339 timestamp rendered in local time, raw text if it does not parse
pub fn local_time_label(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
