//! Reminder rendering and the notification sink boundary.
//!
//! The engine renders a deterministic reminder for one date and hands it,
//! with the number of recipients, to a [`NotificationSink`]. Delivery is the
//! sink's business; the engine never hears back from it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::Event;
use crate::store::EventStore;
use crate::time::EventDate;

/// Shown in place of an empty location.
pub const LOCATION_PLACEHOLDER: &str = "TBA";

/// Separators accepted between pasted addresses.
static RECIPIENT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("Invalid recipient separator regex"));

/// A rendered reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub subject: String,
    pub body: String,
}

impl ReminderMessage {
    /// Renders the reminder for `date` from events already sorted by time.
    pub fn render(date: EventDate, events: &[&Event]) -> Self {
        let mut body = format!("Upcoming events on {date}:\n\n");
        for e in events {
            body.push_str(&format!(
                "- {} | {} ({}) @ {}\n",
                e.time,
                e.name,
                e.kind,
                e.location_or(LOCATION_PLACEHOLDER)
            ));
        }
        Self {
            subject: format!("Reminder: Events on {date}"),
            body,
        }
    }
}

/// Receives rendered reminders.
pub trait NotificationSink {
    /// Hands a message over for delivery to `recipient_count` recipients.
    fn dispatch(&mut self, recipient_count: usize, message: &ReminderMessage);
}

/// A sink that keeps every dispatched message in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub sent: Vec<(usize, ReminderMessage)>,
}

impl NotificationSink for MemorySink {
    fn dispatch(&mut self, recipient_count: usize, message: &ReminderMessage) {
        self.sent.push((recipient_count, message.clone()));
    }
}

/// Attendee addresses loaded for reminders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    addresses: Vec<String>,
}

impl Recipients {
    /// Extracts addresses from pasted text.
    ///
    /// Tokens are separated by whitespace, commas or semicolons; a token
    /// counts as an address when it contains both `@` and `.`.
    pub fn parse(text: &str) -> Self {
        let addresses = RECIPIENT_SEPARATOR
            .split(text)
            .filter(|token| token.contains('@') && token.contains('.'))
            .map(str::to_string)
            .collect();
        Self { addresses }
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl EventStore {
    /// Renders the reminder for `date` and dispatches it to `sink`.
    ///
    /// Nothing is sent when the date has no events or no recipient has been
    /// loaded.
    pub fn send_reminder_for_date<S: NotificationSink + ?Sized>(
        &self,
        date: EventDate,
        recipients: &Recipients,
        sink: &mut S,
    ) -> ScheduleResult<ReminderMessage> {
        let events = self.day_view(date);
        if events.is_empty() {
            debug!(%date, "No reminder: no events");
            return Err(ScheduleError::NoEventsOnDate { date });
        }
        let message = ReminderMessage::render(date, &events);
        if recipients.is_empty() {
            debug!(%date, "No reminder: no recipients");
            return Err(ScheduleError::NoRecipients);
        }

        sink.dispatch(recipients.len(), &message);
        info!(%date, recipients = recipients.len(), events = events.len(), "Reminder dispatched");
        Ok(message)
    }
}
