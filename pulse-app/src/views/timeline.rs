//! Timeline list projection: sorting, text search, placeholders

use pulse_common::model::LiveEvent;

/// Per-screen sort direction
///
/// Both directions are deliberate configuration, not a candidate for
/// unification: the news feed wants the latest announcement first, the
/// chronological list wants the next upcoming date first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Latest-news feed: maximum date first
    NewestFirst,
    /// Upcoming-chronological list: minimum date first
    OldestFirst,
}

/// Sort events by calendar day
///
/// ISO dates order lexicographically, so string comparison is the date
/// comparison. The sort is stable: same-day events keep source order.
pub fn sort_events(events: &mut [LiveEvent], order: SortOrder) {
    match order {
        SortOrder::NewestFirst => events.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::OldestFirst => events.sort_by(|a, b| a.date.cmp(&b.date)),
    }
}

/// Case-insensitive substring filter over title, artist, and place
///
/// An empty or whitespace-only query is a pass-through. Pure and
/// idempotent: filtering an already-filtered list by the same query
/// returns the same list.
pub fn filter_events(events: &[LiveEvent], query: &str) -> Vec<LiveEvent> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return events.to_vec();
    }

    events
        .iter()
        .filter(|event| {
            event.title.to_lowercase().contains(&needle)
                || event.artist.to_lowercase().contains(&needle)
                || event.place.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// What to show in place of an empty list body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// First fetch has not completed yet
    Initializing,
    /// Fetch completed but the backend returned nothing
    NoData,
    /// Source has events but none match the current query
    NoMatches,
}

/// Pick the placeholder for an empty visible list, or `None` when
/// there is something to show
///
/// "No results" is kept distinct from "still loading" via the
/// `initialized` flag rather than inferred from emptiness.
pub fn placeholder(
    initialized: bool,
    source_len: usize,
    visible_len: usize,
) -> Option<Placeholder> {
    if visible_len > 0 {
        return None;
    }
    if !initialized {
        return Some(Placeholder::Initializing);
    }
    if source_len == 0 {
        return Some(Placeholder::NoData);
    }
    Some(Placeholder::NoMatches)
}
