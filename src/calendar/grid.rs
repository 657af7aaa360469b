use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of columns in a calendar grid
pub const DAYS_IN_WEEK: usize = 7;

/// Errors from building a calendar grid out of raw year/month values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("{year}-{month:02} is not a valid calendar month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Unknown week start '{0}', expected 'sunday' or 'monday'")]
    UnknownWeekStart(String),
}

/// First column of the grid and of the weekday header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Weekday shown in the first column
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column index of `date` in a week that starts on this day
    pub fn column_of(self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        }
    }
}

impl FromStr for WeekStart {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(CalendarError::UnknownWeekStart(other.to_string())),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

/// Short weekday names in column order
pub fn weekday_labels(week_start: WeekStart) -> [&'static str; DAYS_IN_WEEK] {
    let mut labels = [""; DAYS_IN_WEEK];
    let mut day = week_start.weekday();
    for label in labels.iter_mut() {
        *label = short_weekday_name(day);
        day = day.succ();
    }
    labels
}

fn short_weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`, if it is representable
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Days in the given month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    last_of_month(first).map(|last| last.day())
}

/// Build the month grid using a Sunday week start.
///
/// `reference` can be any day of the month to display. The result covers whole
/// weeks: it starts on the Sunday on or before the 1st and ends on the Saturday
/// on or after the last day of the month.
pub fn build_month_grid(reference: NaiveDate) -> Vec<NaiveDate> {
    build_month_grid_with(reference, WeekStart::Sunday)
}

/// Build the month grid for an arbitrary week start.
///
/// Returns an empty grid when the padded range falls outside chrono's
/// representable dates.
pub fn build_month_grid_with(reference: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let month_start = first_of_month(reference);
    let Some(month_end) = last_of_month(reference) else {
        return Vec::new();
    };

    let leading = week_start.column_of(month_start) as u64;
    let trailing = (DAYS_IN_WEEK as u64 - 1) - week_start.column_of(month_end) as u64;

    let (Some(grid_start), Some(grid_end)) = (
        month_start.checked_sub_days(Days::new(leading)),
        month_end.checked_add_days(Days::new(trailing)),
    ) else {
        return Vec::new();
    };

    grid_start
        .iter_days()
        .take_while(|day| *day <= grid_end)
        .collect()
}

/// Build the month grid from raw year/month values, as found in query strings
pub fn month_grid_for(
    year: i32,
    month: u32,
    week_start: WeekStart,
) -> Result<Vec<NaiveDate>, CalendarError> {
    let reference =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })?;
    let grid = build_month_grid_with(reference, week_start);
    if grid.is_empty() {
        return Err(CalendarError::InvalidMonth { year, month });
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn assert_grid_shape(grid: &[NaiveDate], reference: NaiveDate) {
        assert!(!grid.is_empty());
        assert_eq!(grid.len() % DAYS_IN_WEEK, 0);

        // Strictly ascending with no gaps
        for pair in grid.windows(2) {
            assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }

        // Every day of the month appears exactly once
        let days = days_in_month(reference.year(), reference.month()).unwrap();
        for day in 1..=days {
            let date = d(reference.year(), reference.month(), day);
            assert_eq!(grid.iter().filter(|g| **g == date).count(), 1);
        }
    }

    #[test]
    fn test_february_2024() {
        // Leap year, starts on a Thursday
        let grid = build_month_grid(d(2024, 2, 1));
        assert_eq!(grid.len(), 35);
        assert_eq!(grid.first(), Some(&d(2024, 1, 28)));
        assert_eq!(grid.last(), Some(&d(2024, 3, 2)));
        assert_eq!(grid[0].weekday(), Weekday::Sun);
        assert_eq!(grid[34].weekday(), Weekday::Sat);
    }

    #[test]
    fn test_march_2024_needs_six_weeks() {
        let grid = build_month_grid(d(2024, 3, 1));
        assert_eq!(grid.len(), 42);
        assert_eq!(grid.first(), Some(&d(2024, 2, 25)));
        assert_eq!(grid.last(), Some(&d(2024, 4, 6)));
    }

    #[test]
    fn test_reference_day_does_not_matter() {
        let from_first = build_month_grid(d(2024, 3, 1));
        let from_mid = build_month_grid(d(2024, 3, 17));
        let from_last = build_month_grid(d(2024, 3, 31));
        assert_eq!(from_first, from_mid);
        assert_eq!(from_first, from_last);
    }

    #[test]
    fn test_idempotent() {
        let reference = d(2023, 10, 9);
        assert_eq!(build_month_grid(reference), build_month_grid(reference));
    }

    #[test]
    fn test_four_week_february() {
        // February 2015 starts on Sunday and has 28 days
        let grid = build_month_grid(d(2015, 2, 10));
        assert_eq!(grid.len(), 28);
        assert_eq!(grid.first(), Some(&d(2015, 2, 1)));
        assert_eq!(grid.last(), Some(&d(2015, 2, 28)));
    }

    #[test]
    fn test_shape_across_years() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let reference = d(year, month, 1);
                assert_grid_shape(&build_month_grid(reference), reference);
                assert_grid_shape(
                    &build_month_grid_with(reference, WeekStart::Monday),
                    reference,
                );
            }
        }
    }

    #[test]
    fn test_monday_week_start() {
        let grid = build_month_grid_with(d(2024, 3, 1), WeekStart::Monday);
        assert_eq!(grid.first(), Some(&d(2024, 2, 26)));
        assert_eq!(grid.last(), Some(&d(2024, 3, 31)));
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0].weekday(), Weekday::Mon);
    }

    #[test]
    fn test_grid_at_range_edge_is_empty() {
        assert!(build_month_grid(NaiveDate::MAX).is_empty());
    }

    #[test]
    fn test_month_grid_for_rejects_bad_month() {
        assert_eq!(
            month_grid_for(2024, 13, WeekStart::Sunday),
            Err(CalendarError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
        assert_eq!(month_grid_for(2024, 2, WeekStart::Sunday).unwrap().len(), 35);
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(
            weekday_labels(WeekStart::Sunday),
            ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        );
        assert_eq!(
            weekday_labels(WeekStart::Monday),
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
    }

    #[test]
    fn test_week_start_parsing() {
        assert_eq!("Sunday".parse::<WeekStart>(), Ok(WeekStart::Sunday));
        assert_eq!(" mon ".parse::<WeekStart>(), Ok(WeekStart::Monday));
        assert!("friday".parse::<WeekStart>().is_err());
        assert_eq!(WeekStart::Monday.to_string(), "monday");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 0), None);
    }
}
