use chrono::{Datelike, Months, NaiveDate};

use super::bucket::{has_events, is_same_month, EventDate};
use super::grid::{build_month_grid_with, first_of_month, weekday_labels, WeekStart, DAYS_IN_WEEK};

/// One rendered day slot of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Belongs to the displayed month (as opposed to padding from a neighbour)
    pub in_month: bool,
    pub is_today: bool,
    pub has_events: bool,
    pub is_selected: bool,
}

/// Month currently displayed plus the optionally selected day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarViewState {
    month: NaiveDate,
    selected: Option<NaiveDate>,
}

impl CalendarViewState {
    /// Show the month containing `today`, nothing selected
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: first_of_month(today),
            selected: None,
        }
    }

    /// Show the month containing `reference` with an optional selection
    pub fn for_month(reference: NaiveDate, selected: Option<NaiveDate>) -> Self {
        Self {
            month: first_of_month(reference),
            selected,
        }
    }

    /// Rebuild the state from `month=YYYY-MM` and `date=YYYY-MM-DD` query values.
    ///
    /// A missing or unparsable month falls back to the month of `today`. The
    /// selection is dropped when it does not parse or no event falls on it.
    pub fn from_query<E: EventDate>(
        month: Option<&str>,
        date: Option<&str>,
        today: NaiveDate,
        events: &[E],
    ) -> Self {
        let month = month
            .and_then(parse_month_param)
            .unwrap_or_else(|| first_of_month(today));
        let selected = date
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            .filter(|d| has_events(*d, events));
        Self { month, selected }
    }

    /// First day of the displayed month
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// `YYYY-MM` for the displayed month
    pub fn month_param(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }

    /// Title such as "March 2024"
    pub fn title(&self) -> String {
        self.month.format("%B %Y").to_string()
    }

    /// Move one month forward and clear the selection
    pub fn next_month(&mut self) {
        if let Some(next) = self.month.checked_add_months(Months::new(1)) {
            self.month = next;
        }
        self.selected = None;
    }

    /// Move one month back and clear the selection
    pub fn prev_month(&mut self) {
        if let Some(prev) = self.month.checked_sub_months(Months::new(1)) {
            self.month = prev;
        }
        self.selected = None;
    }

    /// State after moving one month forward
    pub fn following(mut self) -> Self {
        self.next_month();
        self
    }

    /// State after moving one month back
    pub fn preceding(mut self) -> Self {
        self.prev_month();
        self
    }

    /// Handle a click on `date`.
    ///
    /// Days without events are not selectable. Clicking the selected day again
    /// clears the selection.
    pub fn select<E: EventDate>(&mut self, date: NaiveDate, events: &[E]) {
        if !has_events(date, events) {
            return;
        }
        self.selected = if self.selected == Some(date) {
            None
        } else {
            Some(date)
        };
    }

    /// Events on the selected day, or nothing when no day is selected
    pub fn selected_events<'a, E: EventDate>(&self, events: &'a [E]) -> Vec<&'a E> {
        match self.selected {
            Some(date) => super::bucket::events_on(date, events),
            None => Vec::new(),
        }
    }

    /// Cells for the displayed month with their flags resolved
    pub fn cells<E: EventDate>(
        &self,
        today: NaiveDate,
        events: &[E],
        week_start: WeekStart,
    ) -> Vec<CalendarCell> {
        let busy = super::bucket::bucket_by_day(events);

        build_month_grid_with(self.month, week_start)
            .into_iter()
            .map(|date| CalendarCell {
                date,
                in_month: is_same_month(date, self.month),
                is_today: date == today,
                has_events: busy.contains_key(&date),
                is_selected: self.selected == Some(date),
            })
            .collect()
    }

    /// Cells split into rows of seven
    pub fn weeks<E: EventDate>(
        &self,
        today: NaiveDate,
        events: &[E],
        week_start: WeekStart,
    ) -> Vec<Vec<CalendarCell>> {
        self.cells(today, events, week_start)
            .chunks(DAYS_IN_WEEK)
            .map(|week| week.to_vec())
            .collect()
    }

    /// Plain-text month sheet for terminals.
    ///
    /// Today is bracketed and days with events carry a `*`. Padding days from
    /// neighbouring months are left blank.
    pub fn to_text<E: EventDate>(&self, today: NaiveDate, events: &[E], week_start: WeekStart) -> String {
        let mut out = format!("{:^35}\n", self.title());

        let header: String = weekday_labels(week_start)
            .iter()
            .map(|label| format!(" {:<4}", label))
            .collect();
        out.push_str(header.trim_end());
        out.push('\n');

        for week in self.weeks(today, events, week_start) {
            let line: String = week
                .iter()
                .map(|cell| {
                    if !cell.in_month {
                        return "     ".to_string();
                    }
                    let (open, close) = if cell.is_today { ('[', ']') } else { (' ', ' ') };
                    let mark = if cell.has_events { '*' } else { ' ' };
                    format!("{}{:>2}{}{}", open, cell.date.day(), close, mark)
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }
}

/// Parse a `YYYY-MM` month parameter into the first day of that month
pub fn parse_month_param(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Add `months` to `date`, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dated(&'static str);

    impl EventDate for Dated {
        fn event_date(&self) -> &str {
            self.0
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_shows_current_month() {
        let state = CalendarViewState::new(d(2024, 3, 17));
        assert_eq!(state.month(), d(2024, 3, 1));
        assert_eq!(state.selected(), None);
        assert_eq!(state.title(), "March 2024");
        assert_eq!(state.month_param(), "2024-03");
    }

    #[test]
    fn test_navigation_clears_selection() {
        let events = vec![Dated("2024-03-05")];
        let mut state = CalendarViewState::new(d(2024, 3, 1));
        state.select(d(2024, 3, 5), &events);
        assert_eq!(state.selected(), Some(d(2024, 3, 5)));

        state.next_month();
        assert_eq!(state.month(), d(2024, 4, 1));
        assert_eq!(state.selected(), None);

        state.prev_month();
        state.prev_month();
        assert_eq!(state.month(), d(2024, 2, 1));
    }

    #[test]
    fn test_navigation_across_year_boundary() {
        let state = CalendarViewState::new(d(2024, 12, 31));
        assert_eq!(state.following().month(), d(2025, 1, 1));
        assert_eq!(CalendarViewState::new(d(2024, 1, 2)).preceding().month(), d(2023, 12, 1));
    }

    #[test]
    fn test_select_toggles_and_ignores_empty_days() {
        let events = vec![Dated("2024-03-05"), Dated("2024-03-09")];
        let mut state = CalendarViewState::new(d(2024, 3, 1));

        // No events on the 6th
        state.select(d(2024, 3, 6), &events);
        assert_eq!(state.selected(), None);

        state.select(d(2024, 3, 5), &events);
        assert_eq!(state.selected(), Some(d(2024, 3, 5)));

        // Switching to another busy day
        state.select(d(2024, 3, 9), &events);
        assert_eq!(state.selected(), Some(d(2024, 3, 9)));

        // Clicking the same day again clears it
        state.select(d(2024, 3, 9), &events);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_selected_events() {
        let events = vec![Dated("2024-03-05"), Dated("nope"), Dated("2024-03-05T20:00")];
        let mut state = CalendarViewState::new(d(2024, 3, 1));
        assert!(state.selected_events(&events).is_empty());

        state.select(d(2024, 3, 5), &events);
        let selected = state.selected_events(&events);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[1].0, "2024-03-05T20:00");
    }

    #[test]
    fn test_cells_flags() {
        let events = vec![Dated("2024-02-26"), Dated("2024-03-05")];
        let state = CalendarViewState::for_month(d(2024, 3, 1), Some(d(2024, 3, 5)));
        let cells = state.cells(d(2024, 3, 10), &events, WeekStart::Sunday);

        assert_eq!(cells.len(), 42);

        // Padding from February is still checked for events
        let feb_26 = cells.iter().find(|c| c.date == d(2024, 2, 26)).unwrap();
        assert!(!feb_26.in_month);
        assert!(feb_26.has_events);

        let mar_5 = cells.iter().find(|c| c.date == d(2024, 3, 5)).unwrap();
        assert!(mar_5.in_month && mar_5.has_events && mar_5.is_selected);

        let today: Vec<_> = cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, d(2024, 3, 10));

        assert_eq!(cells.iter().filter(|c| c.in_month).count(), 31);
    }

    #[test]
    fn test_weeks_are_full_rows() {
        let events: Vec<Dated> = Vec::new();
        let state = CalendarViewState::new(d(2024, 2, 14));
        let weeks = state.weeks(d(2024, 2, 14), &events, WeekStart::Sunday);
        assert_eq!(weeks.len(), 5);
        assert!(weeks.iter().all(|w| w.len() == DAYS_IN_WEEK));
    }

    #[test]
    fn test_from_query() {
        let today = d(2024, 3, 10);
        let events = vec![Dated("2024-07-04")];

        let state = CalendarViewState::from_query(Some("2024-07"), Some("2024-07-04"), today, &events);
        assert_eq!(state.month(), d(2024, 7, 1));
        assert_eq!(state.selected(), Some(d(2024, 7, 4)));

        let state = CalendarViewState::from_query(Some("july"), Some("soon"), today, &events);
        assert_eq!(state.month(), d(2024, 3, 1));
        assert_eq!(state.selected(), None);

        let state = CalendarViewState::from_query(None, None, today, &events);
        assert_eq!(state, CalendarViewState::new(today));
    }

    #[test]
    fn test_from_query_ignores_days_without_events() {
        let events = vec![Dated("2024-03-05")];
        let state =
            CalendarViewState::from_query(Some("2024-03"), Some("2024-03-06"), d(2024, 3, 10), &events);
        assert_eq!(state.month(), d(2024, 3, 1));
        assert_eq!(state.selected(), None);
        assert!(state
            .cells(d(2024, 3, 10), &events, WeekStart::Sunday)
            .iter()
            .all(|c| !c.is_selected));
    }

    #[test]
    fn test_parse_month_param() {
        assert_eq!(parse_month_param("2024-03"), Some(d(2024, 3, 1)));
        assert_eq!(parse_month_param("2024-13"), None);
        assert_eq!(parse_month_param("2024"), None);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2024, 3, 31), -1), d(2024, 2, 29));
        assert_eq!(add_months(d(2024, 5, 15), 12), d(2025, 5, 15));
        assert_eq!(add_months(d(2024, 5, 15), 0), d(2024, 5, 15));
    }

    #[test]
    fn test_to_text() {
        let events = vec![Dated("2024-03-12"), Dated("2024-02-27")];
        let state = CalendarViewState::new(d(2024, 3, 5));
        let text = state.to_text(d(2024, 3, 5), &events, WeekStart::Sunday);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].trim(), "March 2024");
        assert_eq!(lines[1], " Sun  Mon  Tue  Wed  Thu  Fri  Sat");
        // Feb 25..29 are blank, March starts on Friday
        assert_eq!(lines[2], "                           1    2");
        assert!(lines[3].contains("[ 5]"));
        assert!(lines[4].contains(" 12 *"));
        // Events outside the month are not marked
        assert!(!lines[2].contains('*'));
    }
}
