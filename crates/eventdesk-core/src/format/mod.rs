//! Output formatting for events, slot suggestions and statistics.
//!
//! This module provides formatters for displaying store results:
//! - **Table**: fixed-width terminal table, one event per row
//! - **JSON**: machine-readable event lists
//!
//! # Example
//!
//! ```rust
//! use eventdesk_core::format::OutputFormatter;
//! use eventdesk_core::{EventDraft, EventStore};
//!
//! let mut store = EventStore::new();
//! store
//!     .add_event(EventDraft::new("Kickoff", "01-01-2030", "09:00", "Meeting"))
//!     .unwrap();
//!
//! let formatter = OutputFormatter::with_defaults();
//! let table = formatter.format_table(&store.list_all());
//! assert!(table.contains("Kickoff"));
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::slots::SlotSuggestions;
use crate::stats::{Statistics, TOP_DATES_LIMIT};


const ID_WIDTH: usize = 5;
const DATE_WIDTH: usize = 12;
const TIME_WIDTH: usize = 8;
/// Gap kept between a truncated column and the next one.
const COLUMN_GAP: usize = 2;
const RULE_WIDTH: usize = 79;

/// Text shown when a listing is empty.
pub const NO_EVENTS: &str = "No events.";
pub const NO_EVENTS_ON_DATE: &str = "No events on this date.";
pub const NO_MATCHES: &str = "No matches.";

/// The output format for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal table.
    #[default]
    Table,
    /// Machine-readable JSON output.
    Json,
}

/// Configuration options for table formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Maximum characters shown for a name.
    pub max_name_length: usize,
    /// Maximum characters shown for a type.
    pub max_kind_length: usize,
    /// Maximum characters shown for a location.
    pub max_location_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_name_length: 20,
            max_kind_length: 12,
            max_location_length: 16,
        }
    }
}

/// JSON output format for machine consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Number of events returned.
    pub count: usize,
    /// The events, in listing order.
    pub events: Vec<Event>,
}

impl JsonOutput {
    /// Serializes as indented JSON.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Output formatter for store results.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Creates a new OutputFormatter with default options.
    pub fn with_defaults() -> Self {
        Self::new(FormatOptions::default())
    }

    /// Formats events as a table, or `empty_text` when there are none.
    pub fn format_listing(&self, events: &[&Event], empty_text: &str) -> String {
        if events.is_empty() {
            format!("{empty_text}\n")
        } else {
            self.format_table(events)
        }
    }

    /// Formats events as a header, a rule and one row per event.
    pub fn format_table(&self, events: &[&Event]) -> String {
        let mut out = self.row(["ID", "Name", "Date", "Time", "Type", "Location"]);
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
        for e in events {
            let id = e.id.to_string();
            let date = e.date.to_string();
            let time = e.time.to_string();
            out.push_str(&self.row([
                &id,
                &ellipsis(&e.name, self.options.max_name_length),
                &date,
                &time,
                &ellipsis(&e.kind, self.options.max_kind_length),
                &ellipsis(&e.location, self.options.max_location_length),
            ]));
        }
        out
    }

    /// Pads cells to their column widths; trailing padding is dropped.
    fn row(&self, cells: [&str; 6]) -> String {
        let widths = [
            ID_WIDTH,
            self.options.max_name_length + COLUMN_GAP,
            DATE_WIDTH,
            TIME_WIDTH,
            self.options.max_kind_length + COLUMN_GAP,
            self.options.max_location_length + COLUMN_GAP,
        ];
        let mut line = String::new();
        for (cell, width) in cells.iter().zip(widths) {
            // an over-wide cell still gets one separating space
            let width = width.max(cell.chars().count() + 1);
            line.push_str(&format!("{cell:<width$}"));
        }
        let mut line = line.trim_end().to_string();
        line.push('\n');
        line
    }

    /// Formats events as JSON output.
    pub fn format_json(&self, events: &[&Event]) -> JsonOutput {
        JsonOutput {
            count: events.len(),
            events: events.iter().map(|e| (*e).clone()).collect(),
        }
    }

    /// Formats free slot suggestions for one date.
    pub fn format_suggestions(&self, suggestions: &SlotSuggestions) -> String {
        let mut out = format!("Suggested available slots on {}:\n", suggestions.date);
        if suggestions.is_empty() {
            out.push_str(&format!(
                "  (No free {} slots found in working window)\n",
                duration_label(suggestions.duration_minutes)
            ));
        }
        for slot in &suggestions.slots {
            out.push_str(&format!(
                "  - {} to {}\n",
                slot.start_time(),
                slot.end_time()
            ));
        }
        out
    }

    /// Formats totals, counts per type and the busiest dates.
    pub fn format_statistics(&self, stats: &Statistics) -> String {
        let mut out = format!("Total events: {}\nBy type:\n", stats.total);
        for (kind, count) in &stats.by_kind {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
        out.push_str(&format!("Top {TOP_DATES_LIMIT} dates by count:\n"));
        for (date, count) in &stats.top_dates {
            out.push_str(&format!("  {date}: {count}\n"));
        }
        out
    }
}

/// "1-hour" for whole hours, otherwise "N-minute".
fn duration_label(minutes: i64) -> String {
    if minutes > 0 && minutes % 60 == 0 {
        format!("{}-hour", minutes / 60)
    } else {
        format!("{minutes}-minute")
    }
}

/// Truncates a string to `max_len` characters, ending with `…` when cut.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len - 1).collect();
    Cow::Owned(format!("{truncated}…"))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ellipsis_tests {
        use super::*;

        #[test]
        fn short_string_unchanged() {
            assert_eq!(ellipsis("hello", 10), "hello");
        }

        #[test]
        fn exact_length_unchanged() {
            assert_eq!(ellipsis("hello", 5), "hello");
        }

        #[test]
        fn long_string_truncated() {
            assert_eq!(ellipsis("hello world", 8), "hello w…");
            assert_eq!(ellipsis("hello world", 8).chars().count(), 8);
        }

        #[test]
        fn zero_length() {
            assert_eq!(ellipsis("hello", 0), "");
        }

        #[test]
        fn counts_characters_not_bytes() {
            assert_eq!(ellipsis("Café Über", 9), "Café Über");
            assert_eq!(ellipsis("Café Über", 5), "Café…");
        }
    }

    #[test]
    fn duration_labels() {
        assert_eq!(duration_label(60), "1-hour");
        assert_eq!(duration_label(120), "2-hour");
        assert_eq!(duration_label(45), "45-minute");
    }

    #[test]
    fn output_format_serde() {
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
