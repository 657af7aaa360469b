use crate::calendar::{weekday_labels, CalendarCell, CalendarViewState, EventDate, WeekStart};
use crate::config::SiteSettings;
use crate::cosmic::Event;
use crate::submission::SubmissionForm;
use crate::utils::text::description_preview;
use crate::utils::time::{format_calendar_date, format_event_date, format_long_date, format_time_range};
use askama::Template;
use chrono::{Datelike, NaiveDate};

/// Characters of description shown on a card
const PREVIEW_LENGTH: usize = 150;

/// An event prepared for a list card or the calendar sidebar
#[derive(Debug, Clone)]
pub struct EventCard {
    pub slug: String,
    pub title: String,
    pub date_label: String,
    pub short_date: String,
    pub time_label: String,
    pub venue_name: String,
    pub preview: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
}

impl EventCard {
    pub fn from_event(event: &Event) -> Self {
        let meta = &event.metadata;
        Self {
            slug: event.slug.clone(),
            title: display_title(event),
            date_label: format_event_date(event.event_date()),
            short_date: format_calendar_date(event.event_date()),
            time_label: format_time_range(&meta.start_time, meta.end_time()),
            venue_name: meta.venue_name.clone(),
            preview: description_preview(&meta.description, PREVIEW_LENGTH),
            image_url: meta.featured_image.as_ref().and_then(|img| img.sized(600, 300)),
            price: meta.price().map(str::to_string),
        }
    }
}

/// Object title, falling back to the title metafield
fn display_title(event: &Event) -> String {
    if event.title.trim().is_empty() {
        event.metadata.title.clone()
    } else {
        event.title.clone()
    }
}

/// One day square of the calendar
#[derive(Debug, Clone)]
pub struct DayCell {
    pub day: u32,
    /// Where clicking the day leads; `None` for days without events
    pub href: Option<String>,
    pub class: String,
}

impl DayCell {
    fn from_cell<E: EventDate>(cell: &CalendarCell, state: &CalendarViewState, events: &[E]) -> Self {
        let mut classes = vec!["day"];
        if !cell.in_month {
            classes.push("outside");
        }
        if cell.is_today {
            classes.push("today");
        }
        if cell.has_events {
            classes.push("busy");
        }
        if cell.is_selected {
            classes.push("selected");
        }

        let href = cell.has_events.then(|| {
            let mut next = *state;
            next.select(cell.date, events);
            calendar_href(&next)
        });

        Self {
            day: cell.date.day(),
            href,
            class: classes.join(" "),
        }
    }
}

/// Link that reproduces a calendar view state
pub fn calendar_href(state: &CalendarViewState) -> String {
    match state.selected() {
        Some(date) => format!(
            "/?view=calendar&month={}&date={}",
            state.month_param(),
            date.format("%Y-%m-%d")
        ),
        None => format!("/?view=calendar&month={}", state.month_param()),
    }
}

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub site: SiteSettings,
    pub events: Vec<EventCard>,
}

#[derive(Template)]
#[template(path = "calendar.html")]
pub struct CalendarTemplate {
    pub site: SiteSettings,
    pub month_title: String,
    pub prev_href: String,
    pub next_href: String,
    pub weekdays: Vec<&'static str>,
    pub weeks: Vec<Vec<DayCell>>,
    pub selected_label: Option<String>,
    pub selected_events: Vec<EventCard>,
}

impl CalendarTemplate {
    pub fn build(
        site: SiteSettings,
        state: CalendarViewState,
        today: NaiveDate,
        events: &[Event],
        week_start: WeekStart,
    ) -> Self {
        let weeks = state
            .weeks(today, events, week_start)
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| DayCell::from_cell(cell, &state, events))
                    .collect()
            })
            .collect();

        Self {
            site,
            month_title: state.title(),
            prev_href: calendar_href(&state.preceding()),
            next_href: calendar_href(&state.following()),
            weekdays: weekday_labels(week_start).to_vec(),
            weeks,
            selected_label: state.selected().map(format_long_date),
            selected_events: state
                .selected_events(events)
                .into_iter()
                .map(EventCard::from_event)
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "event.html")]
pub struct EventTemplate {
    pub site: SiteSettings,
    pub title: String,
    pub date_label: String,
    pub time_label: String,
    pub venue_name: String,
    pub address: String,
    /// Description with markup removed, one entry per paragraph
    pub paragraphs: Vec<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
}

impl EventTemplate {
    pub fn from_event(site: SiteSettings, event: &Event) -> Self {
        let meta = &event.metadata;
        let description = meta
            .description
            .replace("</p>", "\n")
            .replace("<br>", "\n")
            .replace("<br/>", "\n");

        Self {
            site,
            title: display_title(event),
            date_label: format_event_date(event.event_date()),
            time_label: format_time_range(&meta.start_time, meta.end_time()),
            venue_name: meta.venue_name.clone(),
            address: meta.address.clone(),
            paragraphs: crate::utils::text::strip_html(&description)
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            image_url: meta.featured_image.as_ref().and_then(|img| img.sized(1200, 600)),
            price: meta.price().map(str::to_string),
            website: meta.website().map(str::to_string),
            contact_email: meta.contact_email().map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "submit.html")]
pub struct SubmitTemplate {
    pub site: SiteSettings,
    pub form: SubmissionForm,
    pub success: Option<String>,
    pub error: Option<String>,
    /// Earliest date the picker offers
    pub min_date: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub site: SiteSettings,
    pub message: String,
}
