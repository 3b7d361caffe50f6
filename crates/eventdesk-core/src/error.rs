//! Error types for the scheduling engine.
//!
//! Every failure is recoverable: the store is left exactly as it was before
//! the rejected operation. The `Display` output of each variant is the
//! status text shown to the user.

use thiserror::Error;

use crate::event::{ConflictingEvent, EventId};
use crate::slots::SlotSuggestions;
use crate::time::{EventDate, TimeOfDay};

/// Result type for store operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// A field value that failed format or range validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Date is not a valid `DD-MM-YYYY` calendar day in 1900..=3000.
    #[error("Invalid date '{input}'. Use DD-MM-YYYY.")]
    InvalidDate { input: String },

    /// Time is not a valid `HH:MM` 24-hour time.
    #[error("Invalid time '{input}'. Use HH:MM (24h).")]
    InvalidTime { input: String },

    /// Event name is empty or only whitespace.
    #[error("Event name must not be empty.")]
    EmptyName,
}

impl ValidationError {
    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Creates an invalid time error.
    pub fn invalid_time(input: impl Into<String>) -> Self {
        Self::InvalidTime {
            input: input.into(),
        }
    }
}

/// Errors reported by [`EventStore`](crate::store::EventStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A supplied field failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Another live event already has this name, date and time.
    #[error("Duplicate event exists: '{name}' on {date} at {time}.")]
    Duplicate {
        name: String,
        date: EventDate,
        time: TimeOfDay,
    },

    /// The event's hour overlaps a live event on the same date.
    ///
    /// Carries free slots on that date as guidance for the caller.
    #[error("Conflict with {conflict}.")]
    Conflict {
        conflict: ConflictingEvent,
        suggestions: SlotSuggestions,
    },

    /// No live event has this id.
    #[error("Event not found (ID {id}).")]
    NotFound { id: EventId },

    /// A snapshot contained no importable rows.
    #[error("Nothing imported.")]
    NothingImported,

    /// Nothing is scheduled on the requested date.
    #[error("No events on {date}.")]
    NoEventsOnDate { date: EventDate },

    /// A reminder was requested before any attendee was loaded.
    #[error("No attendee emails loaded. Choose 'Load attendees' first.")]
    NoRecipients,

    /// Every event id has been handed out.
    #[error("No event ids left. Export, clear and re-import to renumber.")]
    IdsExhausted,
}

impl ScheduleError {
    /// Returns the slot suggestions attached to a conflict, if any.
    pub fn suggestions(&self) -> Option<&SlotSuggestions> {
        match self {
            Self::Conflict { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }

    /// Returns true if this is a duplicate rejection.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a conflict rejection.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
