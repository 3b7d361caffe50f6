//! Event types for the scheduling engine.
//!
//! This module provides:
//! - [`Event`]: a committed, validated one-hour calendar entry
//! - [`EventDraft`]: raw string fields collected by a caller for a new event
//! - [`EventPatch`]: a partial update where blank fields keep their value
//! - [`ConflictingEvent`]: the live event that blocked an insert or edit

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{EVENT_DURATION_MINUTES, EventDate, MinuteSpan, TimeOfDay};

/// Identifier assigned by the store. Always positive.
pub type EventId = u32;

/// Case-insensitive string equality.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive substring test.
pub(crate) fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// A scheduled event.
///
/// Every event starts at [`Event::time`] and lasts exactly one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Display name, compared case-insensitively for duplicates.
    pub name: String,
    /// Calendar day.
    pub date: EventDate,
    /// Start time.
    pub time: TimeOfDay,
    /// Free-text category such as "Talk" or "Meeting".
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-text location; empty when unspecified.
    pub location: String,
}

impl Event {
    /// Creates an event from already validated parts.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        date: EventDate,
        time: TimeOfDay,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            date,
            time,
            kind: kind.into(),
            location: String::new(),
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// The occupied minutes of this event.
    pub fn span(&self) -> MinuteSpan {
        MinuteSpan::starting_at(self.time, EVENT_DURATION_MINUTES)
    }

    /// End time (start + one hour, wrapped past midnight).
    pub fn end_time(&self) -> TimeOfDay {
        self.span().end_time()
    }

    /// Returns true if both events share a date and their hours overlap.
    pub fn conflicts_with(&self, other: &Event) -> bool {
        self.date == other.date && self.span().overlaps(&other.span())
    }

    /// Returns true if both events share name (ignoring case), date and time.
    pub fn is_duplicate_of(&self, other: &Event) -> bool {
        self.date == other.date && self.time == other.time && eq_ignore_case(&self.name, &other.name)
    }

    /// Returns true if a location was given.
    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    /// The location, or `placeholder` when unspecified.
    pub fn location_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.has_location() {
            &self.location
        } else {
            placeholder
        }
    }
}

/// Conflict test between two events; symmetric.
pub fn conflicts(a: &Event, b: &Event) -> bool {
    a.conflicts_with(b)
}

/// Unvalidated fields for a new event, as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    /// `DD-MM-YYYY`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub kind: String,
    pub location: String,
}

impl EventDraft {
    /// Creates a draft with an empty location.
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            time: time.into(),
            kind: kind.into(),
            location: String::new(),
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Validates the fields in priority order: name, date, then time.
    pub fn into_event(self, id: EventId) -> Result<Event, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let date = EventDate::parse(&self.date)?;
        let time = TimeOfDay::parse(&self.time)?;
        Ok(Event {
            id,
            name: self.name,
            date,
            time,
            kind: self.kind,
            location: self.location,
        })
    }
}

/// A partial edit. `None` or blank fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
}

/// Returns the supplied value unless it is missing or blank.
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

fn pick(field: &Option<String>, keep: &str) -> String {
    supplied(field).unwrap_or(keep).to_string()
}

impl EventPatch {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns true if no field would change anything.
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.date, &self.time, &self.kind, &self.location]
            .into_iter()
            .all(|field| supplied(field).is_none())
    }

    /// Builds the edited candidate without touching `current`.
    ///
    /// Date and time are re-validated after the merge.
    pub fn apply(&self, current: &Event) -> Result<Event, ValidationError> {
        let date = match supplied(&self.date) {
            Some(raw) => EventDate::parse(raw)?,
            None => current.date,
        };
        let time = match supplied(&self.time) {
            Some(raw) => TimeOfDay::parse(raw)?,
            None => current.time,
        };
        Ok(Event {
            id: current.id,
            name: pick(&self.name, &current.name),
            date,
            time,
            kind: pick(&self.kind, &current.kind),
            location: pick(&self.location, &current.location),
        })
    }
}

/// The live event that blocked an insert or edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingEvent {
    pub id: EventId,
    pub name: String,
    pub time: TimeOfDay,
}

impl From<&Event> for ConflictingEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            time: event.time,
        }
    }
}

impl fmt::Display for ConflictingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event ID {} ({}) at {}", self.id, self.name, self.time)
    }
}
