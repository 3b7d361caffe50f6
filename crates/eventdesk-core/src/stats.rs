//! Summary statistics over live events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::time::EventDate;

/// How many dates the busiest-dates list keeps.
pub const TOP_DATES_LIMIT: usize = 5;

/// Counts over the live collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of live events.
    pub total: usize,
    /// Event count per type, alphabetical by type.
    pub by_kind: Vec<(String, usize)>,
    /// Busiest dates by descending count; ties stay chronological.
    pub top_dates: Vec<(EventDate, usize)>,
}

impl Statistics {
    /// Computes statistics for `events`.
    pub fn collect<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut total = 0;
        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_date: BTreeMap<EventDate, usize> = BTreeMap::new();

        for event in events {
            total += 1;
            *by_kind.entry(event.kind.as_str()).or_default() += 1;
            *by_date.entry(event.date).or_default() += 1;
        }

        let mut top_dates: Vec<(EventDate, usize)> = by_date.into_iter().collect();
        // stable: equal counts keep chronological order
        top_dates.sort_by(|a, b| b.1.cmp(&a.1));
        top_dates.truncate(TOP_DATES_LIMIT);

        Self {
            total,
            by_kind: by_kind
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
            top_dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    fn event(id: u32, kind: &str, day: u32) -> Event {
        Event::new(
            id,
            format!("Event {id}"),
            EventDate::from_dmy(day, 1, 2030).unwrap(),
            TimeOfDay::from_minutes(i64::from(id) * 60),
            kind,
        )
    }

    #[test]
    fn empty() {
        let none: Vec<Event> = Vec::new();
        let stats = Statistics::collect(&none);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn groups_by_kind_alphabetically() {
        let events = [
            event(1, "Workshop", 1),
            event(2, "Meeting", 1),
            event(3, "Talk", 2),
            event(4, "Meeting", 3),
        ];
        let stats = Statistics::collect(&events);
        assert_eq!(stats.total, 4);
        assert_eq!(
            stats.by_kind,
            vec![
                ("Meeting".to_string(), 2),
                ("Talk".to_string(), 1),
                ("Workshop".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_dates_by_count_then_chronology() {
        let events = [
            event(1, "x", 7),
            event(2, "x", 3),
            event(3, "x", 7),
            event(4, "x", 1),
            event(5, "x", 5),
            event(6, "x", 2),
            event(7, "x", 4),
        ];
        let stats = Statistics::collect(&events);
        let days: Vec<(u32, usize)> = stats
            .top_dates
            .iter()
            .map(|(date, count)| (date.day(), *count))
            .collect();
        assert_eq!(days, vec![(7, 2), (1, 1), (2, 1), (3, 1), (4, 1)]);
    }
}
