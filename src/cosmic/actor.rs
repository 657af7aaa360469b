use super::models::{
    Event, EventSubmission, InsertResponse, NewObject, ObjectsResponse, SubmittedObject,
    EVENT_OBJECT_TYPE,
};
use crate::config::Config;
use crate::error::{config_error, cosmic_error, Error, SiteResult};
use crate::submission::{NewSubmission, SUBMISSION_OBJECT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use url::Url;

/// Properties requested for every object
const OBJECT_PROPS: &str = "id,title,slug,metadata";

/// Commands that can be sent to the Cosmic actor
pub enum CosmicCommand {
    GetEvents {
        limit: u32,
        skip: u32,
        respond: mpsc::Sender<SiteResult<Vec<Event>>>,
    },
    GetEvent {
        slug: String,
        respond: mpsc::Sender<SiteResult<Option<Event>>>,
    },
    SubmitEvent {
        submission: NewSubmission,
        respond: mpsc::Sender<SiteResult<SubmittedObject>>,
    },
    GetSubmissions {
        limit: u32,
        skip: u32,
        respond: mpsc::Sender<SiteResult<Vec<EventSubmission>>>,
    },
    Shutdown,
}

/// The Cosmic actor that processes messages
pub struct CosmicActor {
    api: CosmicApi,
    command_rx: mpsc::Receiver<CosmicCommand>,
}

impl CosmicActor {
    /// Create a new actor and the sending half of its mailbox
    pub fn new(config: Arc<Config>) -> (Self, mpsc::Sender<CosmicCommand>) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            api: CosmicApi::new(config),
            command_rx,
        };

        (actor, command_tx)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Cosmic actor started");

        // Each request runs in its own task so a slow call does not hold up the mailbox
        while let Some(cmd) = self.command_rx.recv().await {
            let api = self.api.clone();
            match cmd {
                CosmicCommand::GetEvents {
                    limit,
                    skip,
                    respond,
                } => {
                    tokio::spawn(async move {
                        let _ = respond.send(api.get_events(limit, skip).await).await;
                    });
                }
                CosmicCommand::GetEvent { slug, respond } => {
                    tokio::spawn(async move {
                        let _ = respond.send(api.get_event(&slug).await).await;
                    });
                }
                CosmicCommand::SubmitEvent {
                    submission,
                    respond,
                } => {
                    tokio::spawn(async move {
                        let _ = respond.send(api.submit_event(&submission).await).await;
                    });
                }
                CosmicCommand::GetSubmissions {
                    limit,
                    skip,
                    respond,
                } => {
                    tokio::spawn(async move {
                        let _ = respond
                            .send(api.get_event_submissions(limit, skip).await)
                            .await;
                    });
                }
                CosmicCommand::Shutdown => {
                    info!("Cosmic actor shutting down");
                    break;
                }
            }
        }

        info!("Cosmic actor shut down");
    }
}

/// Thin REST client for one Cosmic bucket
#[derive(Clone)]
pub struct CosmicApi {
    config: Arc<Config>,
    client: Client,
}

impl CosmicApi {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Published events; an empty bucket answers 404, which becomes an empty list
    pub async fn get_events(&self, limit: u32, skip: u32) -> SiteResult<Vec<Event>> {
        match self.find(json!({ "type": EVENT_OBJECT_TYPE }), limit, skip).await {
            Ok(events) => Ok(events),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// A single event by slug, `None` when Cosmic has no such object
    pub async fn get_event(&self, slug: &str) -> SiteResult<Option<Event>> {
        let query = json!({ "type": EVENT_OBJECT_TYPE, "slug": slug });
        match self.find::<Event>(query, 1, 0).await {
            Ok(events) => Ok(events.into_iter().next()),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Submissions awaiting review
    pub async fn get_event_submissions(
        &self,
        limit: u32,
        skip: u32,
    ) -> SiteResult<Vec<EventSubmission>> {
        match self
            .find(json!({ "type": SUBMISSION_OBJECT_TYPE }), limit, skip)
            .await
        {
            Ok(submissions) => Ok(submissions),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Insert a submission object using the write key
    pub async fn submit_event(&self, submission: &NewSubmission) -> SiteResult<SubmittedObject> {
        let write_key = self
            .config
            .cosmic_write_key
            .as_deref()
            .ok_or_else(|| config_error("COSMIC_WRITE_KEY is required to submit events"))?;

        let body = NewObject {
            title: submission.title.clone(),
            object_type: SUBMISSION_OBJECT_TYPE.to_string(),
            metafields: submission.to_metafields(),
        };

        info!(
            "Submitting event '{}' on {} for review",
            submission.title, submission.event_date
        );

        let url = objects_url(&self.config)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(write_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| cosmic_error(&format!("Failed to submit event: {}", e)))?;

        let response = check_status(response).await.inspect_err(|e| {
            error!("Error submitting event to Cosmic: {}", e);
        })?;

        let inserted: InsertResponse = response
            .json()
            .await
            .map_err(|e| cosmic_error(&format!("Failed to parse insert response: {}", e)))?;

        info!("Event submission stored with id {}", inserted.object.id);
        Ok(inserted.object)
    }

    async fn find<T: DeserializeOwned>(
        &self,
        query: Value,
        limit: u32,
        skip: u32,
    ) -> SiteResult<Vec<T>> {
        let url = find_url(&self.config, &query, limit, skip)?;
        debug!("Querying Cosmic objects: {}", query);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| cosmic_error(&format!("Failed to fetch objects: {}", e)))?;

        let response = check_status(response).await?;

        let data: ObjectsResponse<T> = response
            .json()
            .await
            .map_err(|e| cosmic_error(&format!("Failed to parse objects response: {}", e)))?;

        Ok(data.objects)
    }
}

/// Turn a non-success response into `Error::CosmicStatus`
async fn check_status(response: Response) -> SiteResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    Err(Error::CosmicStatus { status, body })
}

/// `{api}/buckets/{bucket}/objects`
pub fn objects_url(config: &Config) -> SiteResult<Url> {
    let mut url = Url::parse(&config.cosmic_api_url)
        .map_err(|e| config_error(&format!("Invalid COSMIC_API_URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| config_error("COSMIC_API_URL cannot be used as a base URL"))?
        .pop_if_empty()
        .push("buckets")
        .push(&config.cosmic_bucket_slug)
        .push("objects");

    Ok(url)
}

/// Query URL for a `find` request
pub fn find_url(config: &Config, query: &Value, limit: u32, skip: u32) -> SiteResult<Url> {
    let mut url = objects_url(config)?;

    url.query_pairs_mut()
        .append_pair("query", &query.to_string())
        .append_pair("read_key", &config.cosmic_read_key)
        .append_pair("props", OBJECT_PROPS)
        .append_pair("depth", "1")
        .append_pair("limit", &limit.to_string())
        .append_pair("skip", &skip.to_string());

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects_url() {
        let config = Config::for_tests();
        let url = objects_url(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cosmicjs.com/v3/buckets/test-bucket/objects"
        );
    }

    #[test]
    fn test_objects_url_with_trailing_slash() {
        let mut config = Config::for_tests();
        config.cosmic_api_url = "http://localhost:8080/v3/".to_string();
        let url = objects_url(&config).unwrap();
        assert_eq!(url.path(), "/v3/buckets/test-bucket/objects");
    }

    #[test]
    fn test_find_url_query() {
        let config = Config::for_tests();
        let query = json!({ "type": "events", "slug": "jazz night" });
        let url = find_url(&config, &query, 10, 20).unwrap();

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["read_key"], "test-read-key");
        assert_eq!(pairs["props"], "id,title,slug,metadata");
        assert_eq!(pairs["depth"], "1");
        assert_eq!(pairs["limit"], "10");
        assert_eq!(pairs["skip"], "20");

        let decoded: Value = serde_json::from_str(&pairs["query"]).unwrap();
        assert_eq!(decoded["slug"], "jazz night");
    }

    #[tokio::test]
    async fn test_submit_without_write_key() {
        let mut config = Config::for_tests();
        config.cosmic_write_key = None;
        let api = CosmicApi::new(Arc::new(config));

        let submission = crate::submission::SubmissionForm {
            title: "Choir".to_string(),
            description: "Open rehearsal".to_string(),
            event_date: "2099-01-01".to_string(),
            start_time: "18:00".to_string(),
            venue_name: "Hall".to_string(),
            address: "Square 1".to_string(),
            submitter_name: "Kim".to_string(),
            submitter_email: "kim@example.net".to_string(),
            ..Default::default()
        }
        .validate(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .unwrap();

        let err = api.submit_event(&submission).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
