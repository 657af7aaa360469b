//! Month grid construction and per-day event bucketing for the calendar view.
//!
//! Everything in here is pure: callers pass the events and the month they want
//! and get plain values back.

pub mod bucket;
pub mod grid;
pub mod view;

pub use bucket::{bucket_by_day, events_on, has_events, is_same_month, parse_event_date, EventDate};
pub use grid::{
    build_month_grid, build_month_grid_with, month_grid_for, weekday_labels, CalendarError,
    WeekStart, DAYS_IN_WEEK,
};
pub use view::{add_months, parse_month_param, CalendarCell, CalendarViewState};

/// A calendar day without time of day
pub type CalendarDate = chrono::NaiveDate;
