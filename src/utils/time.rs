use crate::calendar::parse_event_date;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Current calendar day in the given timezone
pub fn today_in(timezone: &Tz) -> NaiveDate {
    Utc::now().with_timezone(timezone).date_naive()
}

/// Format an event date for display, e.g. "Tuesday, March 5, 2024".
///
/// Unparsable input is returned unchanged.
pub fn format_event_date(date_str: &str) -> String {
    match parse_event_date(date_str) {
        Some(date) => date.format("%A, %B %-d, %Y").to_string(),
        None => date_str.to_string(),
    }
}

/// Short date for calendar popovers, e.g. "Mar 5".
///
/// Unparsable input is returned unchanged.
pub fn format_calendar_date(date_str: &str) -> String {
    match parse_event_date(date_str) {
        Some(date) => date.format("%b %-d").to_string(),
        None => date_str.to_string(),
    }
}

/// Heading for the selected day, e.g. "March 5, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Time range as shown on cards: "7:00 PM" or "7:00 PM - 9:00 PM"
pub fn format_time_range(start: &str, end: Option<&str>) -> String {
    match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => format!("{} - {}", start, end),
        None => start.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event_date() {
        assert_eq!(format_event_date("2024-03-05"), "Tuesday, March 5, 2024");
        assert_eq!(
            format_event_date("2024-12-25T18:00:00Z"),
            "Wednesday, December 25, 2024"
        );
        assert_eq!(format_event_date("sometime soon"), "sometime soon");
    }

    #[test]
    fn test_format_calendar_date() {
        assert_eq!(format_calendar_date("2024-03-05"), "Mar 5");
        assert_eq!(format_calendar_date("2024-11-30"), "Nov 30");
        assert_eq!(format_calendar_date(""), "");
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_long_date(date), "March 5, 2024");
    }

    #[test]
    fn test_format_time_range() {
        assert_eq!(format_time_range("7:00 PM", None), "7:00 PM");
        assert_eq!(format_time_range("7:00 PM", Some("")), "7:00 PM");
        assert_eq!(
            format_time_range("7:00 PM", Some("9:00 PM")),
            "7:00 PM - 9:00 PM"
        );
    }

    #[test]
    fn test_today_in_is_close_to_utc() {
        let utc_today = Utc::now().date_naive();
        let helsinki_today = today_in(&chrono_tz::Europe::Helsinki);
        let diff = (helsinki_today - utc_today).num_days();
        assert!((0..=1).contains(&diff));
    }
}
