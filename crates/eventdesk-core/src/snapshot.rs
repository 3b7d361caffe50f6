//! CSV snapshots of the store.
//!
//! The format is `id,name,date,time,type,location` with one event per line.
//! Fields are joined with bare commas and never quoted, so a comma inside a
//! field shifts the columns after it when the snapshot is read back.

use tracing::{info, warn};

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{Event, EventId};
use crate::store::EventStore;
use crate::time::{EventDate, TimeOfDay};

/// Header line written by [`export_csv`].
pub const CSV_HEADER: &str = "id,name,date,time,type,location";

/// Why an input line was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Missing, zero, non-numeric or the largest representable id.
    InvalidId,
    /// An earlier row already used this id.
    RepeatedId,
    EmptyName,
    InvalidDate,
    InvalidTime,
}

/// A data row that was dropped during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: SkipReason,
}

/// Rows accepted from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSnapshot {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedSnapshot {
    /// Highest imported id, or 0 when empty.
    pub fn max_id(&self) -> EventId {
        self.events.iter().map(|e| e.id).max().unwrap_or(0)
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    pub next_id: EventId,
}

/// Renders events as CSV, header first.
pub fn export_csv<'a>(events: impl IntoIterator<Item = &'a Event>) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for e in events {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            e.id, e.name, e.date, e.time, e.kind, e.location
        ));
    }
    out
}

/// Parses snapshot text.
///
/// Blank lines and lines without a comma are ignored. The first remaining
/// line is treated as a header when it contains the header text (ignoring
/// case). Columns beyond the sixth are ignored; missing columns are empty.
pub fn parse_csv(text: &str) -> ParsedSnapshot {
    let mut parsed = ParsedSnapshot::default();
    let mut first = true;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || !line.contains(',') {
            continue;
        }
        if std::mem::take(&mut first) && line.to_lowercase().contains(CSV_HEADER) {
            continue;
        }

        match parse_row(line) {
            Ok(event) if parsed.events.iter().any(|e| e.id == event.id) => {
                parsed.skipped.push(SkippedRow {
                    line: index + 1,
                    reason: SkipReason::RepeatedId,
                });
            }
            Ok(event) => parsed.events.push(event),
            Err(reason) => parsed.skipped.push(SkippedRow {
                line: index + 1,
                reason,
            }),
        }
    }

    parsed
}

fn parse_row(line: &str) -> Result<Event, SkipReason> {
    let mut columns = line.split(',');
    let mut next = || columns.next().unwrap_or("");

    let id = next()
        .trim()
        .parse::<EventId>()
        .ok()
        .filter(|id| (1..EventId::MAX).contains(id))
        .ok_or(SkipReason::InvalidId)?;
    let name = next();
    let date = next();
    let time = next();
    let kind = next();
    let location = next();

    if name.trim().is_empty() {
        return Err(SkipReason::EmptyName);
    }
    let date = EventDate::parse(date).map_err(|_| SkipReason::InvalidDate)?;
    let time = TimeOfDay::parse(time).map_err(|_| SkipReason::InvalidTime)?;

    Ok(Event::new(id, name, date, time, kind).with_location(location))
}

impl EventStore {
    /// Renders the live events as a CSV snapshot.
    pub fn export_csv(&self) -> String {
        export_csv(self.events())
    }

    /// Replaces the store's contents with the valid rows of a snapshot.
    ///
    /// The id counter moves to one past the highest imported id. When no
    /// row is valid the store is left untouched.
    pub fn import_csv(&mut self, text: &str) -> ScheduleResult<ImportSummary> {
        let parsed = parse_csv(text);
        for row in &parsed.skipped {
            warn!(line = row.line, reason = ?row.reason, "Skipped snapshot row");
        }
        if parsed.events.is_empty() {
            return Err(ScheduleError::NothingImported);
        }

        // parse_row never accepts EventId::MAX
        let next_id = parsed.max_id() + 1;
        let imported = parsed.events.len();
        self.replace_all(parsed.events, next_id);
        info!(imported, skipped = parsed.skipped.len(), next_id, "Snapshot imported");

        Ok(ImportSummary {
            imported,
            skipped: parsed.skipped,
            next_id,
        })
    }
}
