//! Free-slot suggestions within the working window.
//!
//! Suggestions scan candidate start times from the start of the working
//! window at a fixed step and keep the first few that overlap no occupied
//! hour on the requested date.

use serde::{Deserialize, Serialize};

use crate::time::{EVENT_DURATION_MINUTES, EventDate, MinuteSpan, TimeOfDay};

const DEFAULT_STEP_MINUTES: i64 = 30;
const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Parameters for slot suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPolicy {
    /// First candidate start (inclusive).
    pub window_start: TimeOfDay,
    /// Candidates must end at or before this time.
    pub window_end: TimeOfDay,
    /// Distance between candidate starts.
    pub step_minutes: i64,
    /// Stop after this many accepted candidates.
    pub max_suggestions: usize,
    /// Default candidate length.
    pub duration_minutes: i64,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            window_start: TimeOfDay::from_minutes(8 * 60),
            window_end: TimeOfDay::from_minutes(20 * 60),
            step_minutes: DEFAULT_STEP_MINUTES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            duration_minutes: EVENT_DURATION_MINUTES,
        }
    }
}

impl SlotPolicy {
    /// Builder: set the working window.
    #[must_use]
    pub fn with_window(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    /// Builder: set the candidate step.
    #[must_use]
    pub fn with_step(mut self, minutes: i64) -> Self {
        self.step_minutes = minutes;
        self
    }

    /// Builder: set the suggestion limit.
    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Finds free candidates of `duration` minutes around `occupied`.
    pub fn free_slots(
        &self,
        occupied: impl IntoIterator<Item = MinuteSpan>,
        duration: i64,
    ) -> Vec<MinuteSpan> {
        let mut occupied: Vec<MinuteSpan> = occupied.into_iter().collect();
        occupied.sort();

        let duration = duration.max(0);
        let step = self.step_minutes.max(1);
        let end = self.window_end.to_minutes();
        let mut slots = Vec::new();
        let mut start = self.window_start.to_minutes();

        while slots.len() < self.max_suggestions {
            let Some(finish) = start.checked_add(duration).filter(|finish| *finish <= end) else {
                break;
            };
            let candidate = MinuteSpan::new(start, finish);
            if !occupied.iter().any(|busy| busy.overlaps(&candidate)) {
                slots.push(candidate);
            }
            match start.checked_add(step) {
                Some(next) => start = next,
                None => break,
            }
        }
        slots
    }
}

/// Free slots found on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSuggestions {
    pub date: EventDate,
    pub duration_minutes: i64,
    pub slots: Vec<MinuteSpan>,
}

impl SlotSuggestions {
    /// Returns true when the working window had no free slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Start times of the suggested slots.
    pub fn start_times(&self) -> Vec<TimeOfDay> {
        self.slots.iter().map(MinuteSpan::start_time).collect()
    }
}
