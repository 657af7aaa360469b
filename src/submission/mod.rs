//! Public event submissions: form data, validation and the Cosmic payload.

use crate::calendar::parse_event_date;
use crate::cosmic::models::Metafield;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Object type that holds submissions awaiting review
pub const SUBMISSION_OBJECT_TYPE: &str = "event-submissions";

/// Reasons a submission is rejected before it reaches the CMS
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid event date: {0}")]
    InvalidDate(String),

    #[error("Event date must be in the future")]
    DateInPast,

    #[error("Invalid website URL: {0}")]
    InvalidWebsite(String),
}

/// Raw submission form as posted by the browser or the JSON API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue_name: String,
    pub address: String,
    pub submitter_name: String,
    pub submitter_email: String,
    pub website: String,
    pub price: String,
    pub notes: String,
}

/// A submission that passed validation, trimmed and with empty optionals removed
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    pub venue_name: String,
    pub address: String,
    pub submitter_name: String,
    pub submitter_email: String,
    pub website: Option<String>,
    pub price: Option<String>,
    pub notes: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl SubmissionForm {
    /// Required fields paired with their values, in form order
    fn required_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("event_date", self.event_date.as_str()),
            ("start_time", self.start_time.as_str()),
            ("venue_name", self.venue_name.as_str()),
            ("address", self.address.as_str()),
            ("submitter_name", self.submitter_name.as_str()),
            ("submitter_email", self.submitter_email.as_str()),
        ]
    }

    /// Validate the form against the current date in the site timezone
    pub fn validate(&self, today: NaiveDate) -> Result<NewSubmission, ValidationError> {
        let missing: Vec<&'static str> = self
            .required_fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let email = self.submitter_email.trim();
        if !EMAIL.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }

        let event_date = parse_event_date(&self.event_date)
            .ok_or_else(|| ValidationError::InvalidDate(self.event_date.trim().to_string()))?;
        if event_date < today {
            return Err(ValidationError::DateInPast);
        }

        let website = optional(&self.website);
        if let Some(site) = &website {
            url::Url::parse(site).map_err(|_| ValidationError::InvalidWebsite(site.clone()))?;
        }

        Ok(NewSubmission {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            event_date,
            start_time: self.start_time.trim().to_string(),
            end_time: optional(&self.end_time),
            venue_name: self.venue_name.trim().to_string(),
            address: self.address.trim().to_string(),
            submitter_name: self.submitter_name.trim().to_string(),
            submitter_email: email.to_string(),
            website,
            price: optional(&self.price),
            notes: optional(&self.notes),
        })
    }
}

impl NewSubmission {
    /// One metafield per form field, optional ones sent as empty strings
    pub fn to_metafields(&self) -> Vec<Metafield> {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();

        vec![
            Metafield::text("title", "Event Title", &self.title, true),
            Metafield::textarea("description", "Description", &self.description, true),
            Metafield::new(
                "event_date",
                "date",
                "Event Date",
                &self.event_date.format("%Y-%m-%d").to_string(),
                true,
            ),
            Metafield::text("start_time", "Start Time", &self.start_time, true),
            Metafield::text("end_time", "End Time", &opt(&self.end_time), false),
            Metafield::text("venue_name", "Venue Name", &self.venue_name, true),
            Metafield::textarea("address", "Address", &self.address, true),
            Metafield::text("submitter_name", "Submitter Name", &self.submitter_name, true),
            Metafield::text("submitter_email", "Submitter Email", &self.submitter_email, true),
            Metafield::text("website", "Event Website", &opt(&self.website), false),
            Metafield::text("price", "Price", &opt(&self.price), false),
            Metafield::textarea("notes", "Additional Notes", &opt(&self.notes), false),
        ]
    }
}
