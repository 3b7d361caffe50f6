//! Core types: dates, events, the event store, slots, reminders, formatting

pub mod error;
pub mod event;
pub mod format;
pub mod notify;
pub mod slots;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod time;
pub mod tracing;

pub use error::{ScheduleError, ScheduleResult, ValidationError};
pub use event::{ConflictingEvent, Event, EventDraft, EventId, EventPatch, conflicts};
pub use format::{FormatOptions, JsonOutput, OutputFormat, OutputFormatter, ellipsis};
pub use notify::{MemorySink, NotificationSink, Recipients, ReminderMessage};
pub use slots::{SlotPolicy, SlotSuggestions};
pub use snapshot::{ImportSummary, SkipReason, SkippedRow};
pub use stats::Statistics;
pub use store::EventStore;
pub use time::{EventDate, MinuteSpan, TimeOfDay};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
