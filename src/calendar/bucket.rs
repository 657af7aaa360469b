use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Read-only view of an event as far as the calendar is concerned
pub trait EventDate {
    /// Raw date string as stored by the content backend
    fn event_date(&self) -> &str;

    /// Calendar day of the event, `None` when the stored date is unparsable
    fn calendar_day(&self) -> Option<NaiveDate> {
        parse_event_date(self.event_date())
    }
}

impl<T: EventDate + ?Sized> EventDate for &T {
    fn event_date(&self) -> &str {
        (**self).event_date()
    }
}

/// Datetime layouts accepted besides plain dates and RFC 3339
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M%#z",
];

/// Parse an ISO-8601 event date into the calendar day it names.
///
/// The day is taken as written: an offset or `Z` suffix does not move the
/// event to another day, so `2024-03-05T23:00:00Z` is March 5th everywhere.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive());
    }

    // A trailing `Z` is UTC; the day stays as written
    let naive = raw.strip_suffix(&['Z', 'z'][..]).unwrap_or(raw);

    DATETIME_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDateTime::parse_from_str(raw, format)
                .or_else(|_| NaiveDateTime::parse_from_str(naive, format))
                .ok()
        })
        .map(|date_time| date_time.date())
}

/// Whether `event` falls on `date`. Unparsable dates never match.
pub fn occurs_on<E: EventDate + ?Sized>(event: &E, date: NaiveDate) -> bool {
    event.calendar_day() == Some(date)
}

/// Whether any event falls on `date`
pub fn has_events<E: EventDate>(date: NaiveDate, events: &[E]) -> bool {
    events.iter().any(|event| occurs_on(event, date))
}

/// Events falling on `date`, in the order they were given
pub fn events_on<E: EventDate>(date: NaiveDate, events: &[E]) -> Vec<&E> {
    events.iter().filter(|event| occurs_on(*event, date)).collect()
}

/// Whether `date` is in the same month and year as `reference`
pub fn is_same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Group events by calendar day in a single pass.
///
/// Each day keeps its events in input order; events with unparsable dates are
/// left out.
pub fn bucket_by_day<E: EventDate>(events: &[E]) -> BTreeMap<NaiveDate, Vec<&E>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&E>> = BTreeMap::new();
    for event in events {
        if let Some(day) = event.calendar_day() {
            buckets.entry(day).or_default().push(event);
        }
    }
    buckets
}
