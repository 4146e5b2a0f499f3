//! Calendar projection: date index and per-day event list

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pulse_common::model::LiveEvent;

/// Accent color used for event dots
pub const DOT_COLOR: &str = "#BB86FC";

/// Marking state for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMark {
    /// At least one event falls on this day
    pub marked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_color: Option<String>,
    /// This is the currently selected day
    pub selected: bool,
}

/// Group events by day into a date -> mark index
///
/// Days with events get a dot; the selected day gets a highlight that
/// composes with an existing mark rather than replacing it, so a
/// selected day with events shows both.
pub fn date_index(events: &[LiveEvent], selected: &str) -> BTreeMap<String, DayMark> {
    let mut index = BTreeMap::new();

    for event in events {
        index.entry(event.date.clone()).or_insert_with(|| DayMark {
            marked: true,
            dot_color: Some(DOT_COLOR.to_string()),
            selected: false,
        });
    }

    index
        .entry(selected.to_string())
        .and_modify(|mark| mark.selected = true)
        .or_insert_with(|| DayMark {
            marked: false,
            dot_color: None,
            selected: true,
        });

    index
}

/// Events falling on exactly the selected day, source order preserved
///
/// Exact string equality, not a date-range comparison.
pub fn events_on(events: &[LiveEvent], date: &str) -> Vec<LiveEvent> {
    events
        .iter()
        .filter(|event| event.date == date)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, date: &str) -> LiveEvent {
        LiveEvent {
            artist: "Night Owls".into(),
            title: title.into(),
            date: date.into(),
            place: "Blue Hall".into(),
            link: format!("https://example.com/{title}"),
            image: None,
            source_url: None,
        }
    }

    #[test]
    fn test_day_filter_exact_matches_in_source_order() {
        let events = vec![
            event("A", "2024-05-01"),
            event("B", "2024-05-02"),
            event("C", "2024-05-02"),
        ];

        let selected = events_on(&events, "2024-05-02");
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].title, "B");
        assert_eq!(selected[1].title, "C");
    }

    #[test]
    fn test_day_filter_no_range_comparison() {
        let events = vec![event("A", "2024-05-01")];
        assert!(events_on(&events, "2024-05").is_empty());
        assert!(events_on(&events, "2024-05-01 ").is_empty());
    }

    #[test]
    fn test_date_index_marks_days_with_events() {
        let events = vec![
            event("A", "2024-05-01"),
            event("B", "2024-05-02"),
            event("C", "2024-05-02"),
        ];

        let index = date_index(&events, "2024-06-01");
        let first = index.get("2024-05-01").expect("day indexed");
        assert!(first.marked);
        assert_eq!(first.dot_color.as_deref(), Some(DOT_COLOR));
        assert!(!first.selected);

        // Two same-day events produce one entry
        assert!(index.get("2024-05-02").expect("day indexed").marked);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_selection_composes_with_existing_mark() {
        let events = vec![event("A", "2024-05-01")];

        let index = date_index(&events, "2024-05-01");
        let day = index.get("2024-05-01").expect("day indexed");
        assert!(day.marked, "selection must not clear the event mark");
        assert_eq!(day.dot_color.as_deref(), Some(DOT_COLOR));
        assert!(day.selected);
    }

    #[test]
    fn test_selected_day_without_events_is_unmarked() {
        let events = vec![event("A", "2024-05-01")];

        let index = date_index(&events, "2024-07-15");
        let day = index.get("2024-07-15").expect("selected day indexed");
        assert!(!day.marked);
        assert_eq!(day.dot_color, None);
        assert!(day.selected);
    }
}
