use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use askama::Template;
use rust_i18n::t;
use serde::Deserialize;
use serde_json::json;
use std::cmp::Ordering;
use tracing::{error, info, warn};

use super::templates::{
    CalendarTemplate, EventCard, EventTemplate, EventsTemplate, NotFoundTemplate, SubmitTemplate,
};
use super::AppState;
use crate::calendar::{CalendarViewState, EventDate};
use crate::cosmic::Event;
use crate::error::SiteResult;
use crate::submission::SubmissionForm;

/// Query parameters of the index page
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub view: Option<String>,
    pub month: Option<String>,
    pub date: Option<String>,
}

fn render<T: Template>(template: &T) -> SiteResult<Html<String>> {
    Ok(Html(template.render()?))
}

/// Events by date; undated ones go last, ties keep store order
fn sort_by_date(events: &mut [Event]) {
    events.sort_by(|a, b| match (a.calendar_day(), b.calendar_day()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Handler for the index page, list or calendar view
pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> SiteResult<Response> {
    let mut events = state.store.get_events(state.config.events_limit, 0).await?;
    sort_by_date(&mut events);
    let site = state.config.site.clone();

    if query.view.as_deref() == Some("calendar") {
        let today = state.config.today();
        let view = CalendarViewState::from_query(
            query.month.as_deref(),
            query.date.as_deref(),
            today,
            &events,
        );
        let page = CalendarTemplate::build(site, view, today, &events, state.config.week_start);
        return Ok(render(&page)?.into_response());
    }

    let page = EventsTemplate {
        site,
        events: events.iter().map(EventCard::from_event).collect(),
    };
    Ok(render(&page)?.into_response())
}

/// Handler for a single event page
pub async fn event_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> SiteResult<Response> {
    match state.store.get_event(&slug).await? {
        Some(event) => {
            let page = EventTemplate::from_event(state.config.site.clone(), &event);
            Ok(render(&page)?.into_response())
        }
        None => {
            info!("No event with slug '{}'", slug);
            not_found_page(&state, t!("event_not_found").to_string())
        }
    }
}

/// Handler for the submission form page
pub async fn submit_form_handler(State(state): State<AppState>) -> SiteResult<Response> {
    let page = submit_page(&state, SubmissionForm::default(), None, None);
    Ok(render(&page)?.into_response())
}

/// Handler for the browser form post
pub async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SubmissionForm>,
) -> SiteResult<Response> {
    let submission = match form.validate(state.config.today()) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected event submission: {}", e);
            let page = submit_page(&state, form, None, Some(e.to_string()));
            return Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response());
        }
    };

    match state.store.submit_event(&submission).await {
        Ok(created) => {
            info!("Event submission {} received", created.id);
            let page = submit_page(
                &state,
                SubmissionForm::default(),
                Some(t!("submit_success").to_string()),
                None,
            );
            Ok(render(&page)?.into_response())
        }
        Err(e) => {
            error!("Failed to store event submission: {}", e);
            let page = submit_page(&state, form, None, Some(t!("submit_failed").to_string()));
            Ok((StatusCode::BAD_GATEWAY, render(&page)?).into_response())
        }
    }
}

/// JSON submission endpoint
pub async fn api_submit_handler(
    State(state): State<AppState>,
    Json(form): Json<SubmissionForm>,
) -> Response {
    let submission = match form.validate(state.config.today()) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected event submission: {}", e);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response();
        }
    };

    match state.store.submit_event(&submission).await {
        Ok(created) => {
            info!("Event submission {} received via API", created.id);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": t!("submit_success").to_string(),
                    "id": created.id,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to store event submission: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": t!("submit_failed").to_string() })),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// Fallback for unknown paths
pub async fn fallback_handler(State(state): State<AppState>) -> SiteResult<Response> {
    not_found_page(&state, t!("page_not_found").to_string())
}

fn not_found_page(state: &AppState, message: String) -> SiteResult<Response> {
    let page = NotFoundTemplate {
        site: state.config.site.clone(),
        message,
    };
    Ok((StatusCode::NOT_FOUND, render(&page)?).into_response())
}

fn submit_page(
    state: &AppState,
    form: SubmissionForm,
    success: Option<String>,
    error: Option<String>,
) -> SubmitTemplate {
    SubmitTemplate {
        site: state.config.site.clone(),
        form,
        success,
        error,
        min_date: state.config.today().format("%Y-%m-%d").to_string(),
    }
}
