//! The in-memory event store and scheduling engine.
//!
//! [`EventStore`] owns the live events and enforces, at every committed
//! state, that ids are unique, that no two events share name (ignoring
//! case), date and time, and that no two hours overlap on the same date.
//!
//! # Example
//!
//! ```
//! use eventdesk_core::{EventDraft, EventStore};
//!
//! let mut store = EventStore::new();
//! let id = store
//!     .add_event(EventDraft::new("Kickoff", "01-01-2030", "09:00", "Meeting"))
//!     .unwrap();
//! assert_eq!(id, 1);
//!
//! let err = store
//!     .add_event(EventDraft::new("Standup", "01-01-2030", "09:30", "Meeting"))
//!     .unwrap_err();
//! assert!(err.is_conflict());
//! ```

use tracing::{debug, info};

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{ConflictingEvent, Event, EventDraft, EventId, EventPatch, contains_ignore_case, eq_ignore_case};
use crate::slots::{SlotPolicy, SlotSuggestions};
use crate::stats::Statistics;
use crate::time::EventDate;

/// Owner of the live event collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStore {
    events: Vec<Event>,
    next_id: EventId,
    slot_policy: SlotPolicy,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    /// Creates an empty store using the default working window.
    pub fn new() -> Self {
        Self::with_slot_policy(SlotPolicy::default())
    }

    /// Creates an empty store with a custom slot policy.
    pub fn with_slot_policy(slot_policy: SlotPolicy) -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
            slot_policy,
        }
    }

    pub fn slot_policy(&self) -> &SlotPolicy {
        &self.slot_policy
    }

    /// Live events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The id the next successful add will receive.
    pub fn next_id(&self) -> EventId {
        self.next_id
    }

    /// Looks up a live event by id.
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Validates and inserts a new event, returning its id.
    ///
    /// Checks run in order: name, date, time, duplicate, conflict. A
    /// rejected add leaves the store untouched and does not consume an id.
    pub fn add_event(&mut self, draft: EventDraft) -> ScheduleResult<EventId> {
        let candidate = draft.into_event(self.next_id).inspect_err(|err| {
            debug!(error = %err, "Rejected add: invalid field");
        })?;
        self.check_placement(&candidate, None)?;
        let next_id = self.next_id.checked_add(1).ok_or_else(|| {
            debug!(id = self.next_id, "Rejected add: ids exhausted");
            ScheduleError::IdsExhausted
        })?;

        let id = candidate.id;
        info!(id, name = %candidate.name, date = %candidate.date, time = %candidate.time, "Event added");
        self.events.push(candidate);
        self.next_id = next_id;
        Ok(id)
    }

    /// Applies a partial update to an existing event.
    ///
    /// The edited value is built as a separate candidate and checked against
    /// every other live event; the stored event is replaced only if the
    /// date, time, duplicate and conflict checks all pass.
    pub fn edit_event(&mut self, id: EventId, patch: &EventPatch) -> ScheduleResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(ScheduleError::NotFound { id })?;

        let candidate = patch.apply(&self.events[index]).inspect_err(|err| {
            debug!(id, error = %err, "Rejected edit: invalid field");
        })?;
        self.check_placement(&candidate, Some(id))?;

        info!(id, name = %candidate.name, date = %candidate.date, time = %candidate.time, "Event updated");
        self.events[index] = candidate.clone();
        Ok(candidate)
    }

    /// Removes the event with `id`. Returns false if none matched.
    pub fn delete_by_id(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = before != self.events.len();
        if removed {
            info!(id, "Event deleted");
        }
        removed
    }

    /// Removes every event whose name matches, ignoring case.
    ///
    /// Returns how many were removed; zero is not an error.
    pub fn delete_by_name(&mut self, name: &str) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !eq_ignore_case(&e.name, name));
        let removed = before - self.events.len();
        if removed > 0 {
            info!(name, removed, "Events deleted by name");
        }
        removed
    }

    /// All events by date, then time.
    pub fn list_all(&self) -> Vec<&Event> {
        let mut list: Vec<&Event> = self.events.iter().collect();
        list.sort_by_key(|e| (e.date, e.time, e.id));
        list
    }

    /// Events on `date` by time.
    pub fn day_view(&self, date: EventDate) -> Vec<&Event> {
        let mut list: Vec<&Event> = self.events.iter().filter(|e| e.date == date).collect();
        list.sort_by_key(|e| (e.time, e.id));
        list
    }

    /// Events on the caller's current date.
    pub fn todays_events(&self, today: EventDate) -> Vec<&Event> {
        self.day_view(today)
    }

    /// Events whose name or type contains `keyword`, ignoring case, by id.
    pub fn search(&self, keyword: &str) -> Vec<&Event> {
        let mut list: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| contains_ignore_case(&e.name, keyword) || contains_ignore_case(&e.kind, keyword))
            .collect();
        list.sort_by_key(|e| e.id);
        debug!(keyword, matches = list.len(), "Search");
        list
    }

    /// Totals per type and busiest dates.
    pub fn statistics(&self) -> Statistics {
        Statistics::collect(&self.events)
    }

    /// Free one-hour slots on `date` within the working window.
    pub fn suggest_slots(&self, date: EventDate) -> SlotSuggestions {
        self.suggest_slots_for(date, self.slot_policy.duration_minutes)
    }

    /// Free slots of `duration` minutes on `date`.
    pub fn suggest_slots_for(&self, date: EventDate, duration: i64) -> SlotSuggestions {
        self.suggest_slots_excluding(date, duration, None)
    }

    fn suggest_slots_excluding(
        &self,
        date: EventDate,
        duration: i64,
        exclude: Option<EventId>,
    ) -> SlotSuggestions {
        let occupied = self
            .events
            .iter()
            .filter(|e| e.date == date && Some(e.id) != exclude)
            .map(Event::span);
        SlotSuggestions {
            date,
            duration_minutes: duration,
            slots: self.slot_policy.free_slots(occupied, duration),
        }
    }

    /// Checks the duplicate and conflict rules for `candidate` against every
    /// live event except `exclude`.
    fn check_placement(&self, candidate: &Event, exclude: Option<EventId>) -> ScheduleResult<()> {
        let others = || self.events.iter().filter(move |e| Some(e.id) != exclude);

        if others().any(|e| e.is_duplicate_of(candidate)) {
            debug!(name = %candidate.name, date = %candidate.date, time = %candidate.time, "Rejected: duplicate");
            return Err(ScheduleError::Duplicate {
                name: candidate.name.clone(),
                date: candidate.date,
                time: candidate.time,
            });
        }

        if let Some(existing) = others().find(|e| e.conflicts_with(candidate)) {
            debug!(with = existing.id, date = %candidate.date, time = %candidate.time, "Rejected: conflict");
            return Err(ScheduleError::Conflict {
                conflict: ConflictingEvent::from(existing),
                suggestions: self.suggest_slots_excluding(
                    candidate.date,
                    self.slot_policy.duration_minutes,
                    exclude,
                ),
            });
        }

        Ok(())
    }

    /// Replaces the whole collection, e.g. after a snapshot import.
    pub(crate) fn replace_all(&mut self, events: Vec<Event>, next_id: EventId) {
        self.events = events;
        self.next_id = next_id;
    }
}
