//! Render-ready projections of fetched data
//!
//! Pure functions only: everything here is recomputed synchronously
//! from a snapshot whenever the query, selection, or source changes.

pub mod calendar;
pub mod timeline;

pub use calendar::{date_index, events_on, DayMark};
pub use timeline::{filter_events, placeholder, sort_events, Placeholder, SortOrder};
