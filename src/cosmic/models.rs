use crate::calendar::EventDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Object type of published events
pub const EVENT_OBJECT_TYPE: &str = "events";

/// Treat JSON `null` like a missing string
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A published event as returned by Cosmic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default)]
    pub metadata: EventMetadata,
}

/// Metafields of a published event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventMetadata {
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "nullable_string")]
    pub event_date: String,
    #[serde(deserialize_with = "nullable_string")]
    pub start_time: String,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub venue_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub address: String,
    pub featured_image: Option<FeaturedImage>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub price: Option<String>,
}

/// Image metafield; `imgix_url` accepts resize parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturedImage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub imgix_url: String,
}

impl FeaturedImage {
    /// Cropped, auto-formatted rendition of the image.
    ///
    /// Falls back to the plain `url` without an imgix URL, and to `None` when
    /// the image has no URL at all.
    pub fn sized(&self, width: u32, height: u32) -> Option<String> {
        let imgix = self.imgix_url.trim();
        if !imgix.is_empty() {
            return Some(format!(
                "{}?w={}&h={}&fit=crop&auto=format,compress",
                imgix, width, height
            ));
        }

        let url = self.url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}

/// Cosmic sends unset text metafields as empty strings
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl EventMetadata {
    pub fn end_time(&self) -> Option<&str> {
        non_empty(&self.end_time)
    }

    pub fn price(&self) -> Option<&str> {
        non_empty(&self.price)
    }

    pub fn website(&self) -> Option<&str> {
        non_empty(&self.website)
    }

    pub fn contact_email(&self) -> Option<&str> {
        non_empty(&self.contact_email)
    }
}

impl EventDate for Event {
    fn event_date(&self) -> &str {
        &self.metadata.event_date
    }
}

/// A submission waiting for review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSubmission {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default)]
    pub metadata: SubmissionMetadata,
}

/// Metafields of a submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionMetadata {
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "nullable_string")]
    pub event_date: String,
    #[serde(deserialize_with = "nullable_string")]
    pub start_time: String,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub venue_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(deserialize_with = "nullable_string")]
    pub submitter_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub submitter_email: String,
    pub website: Option<String>,
    pub price: Option<String>,
    pub notes: Option<String>,
}

impl EventDate for EventSubmission {
    fn event_date(&self) -> &str {
        &self.metadata.event_date
    }
}

/// One metafield of an object being inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub title: String,
    pub value: String,
    pub required: bool,
}

impl Metafield {
    pub fn new(key: &str, field_type: &str, title: &str, value: &str, required: bool) -> Self {
        Self {
            key: key.to_string(),
            field_type: field_type.to_string(),
            title: title.to_string(),
            value: value.to_string(),
            required,
        }
    }

    pub fn text(key: &str, title: &str, value: &str, required: bool) -> Self {
        Self::new(key, "text", title, value, required)
    }

    pub fn textarea(key: &str, title: &str, value: &str, required: bool) -> Self {
        Self::new(key, "textarea", title, value, required)
    }
}

/// Body of an insert request
#[derive(Debug, Clone, Serialize)]
pub struct NewObject {
    pub title: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub metafields: Vec<Metafield>,
}

/// Response of a `find` request
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectsResponse<T> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Response of an insert request
#[derive(Debug, Clone, Deserialize)]
pub struct InsertResponse {
    pub object: SubmittedObject,
}

/// Identity of a freshly inserted object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmittedObject {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
}
