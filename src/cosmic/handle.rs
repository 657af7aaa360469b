use super::actor::{CosmicActor, CosmicCommand};
use super::models::{Event, EventSubmission, SubmittedObject};
use super::store::EventStore;
use crate::config::Config;
use crate::error::{cosmic_error, SiteResult};
use crate::submission::NewSubmission;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Cosmic actor
#[derive(Clone)]
pub struct CosmicHandle {
    command_tx: mpsc::Sender<CosmicCommand>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CosmicHandle {
    /// Create a new CosmicHandle and spawn the actor
    pub fn new(config: Arc<Config>) -> Self {
        // Create the actor and get its mailbox
        let (mut actor, command_tx) = CosmicActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            command_tx,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Send a command and wait for its reply
    async fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<SiteResult<T>>) -> CosmicCommand,
    ) -> SiteResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|e| cosmic_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| cosmic_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> SiteResult<()> {
        let _ = self.command_tx.send(CosmicCommand::Shutdown).await;
        Ok(())
    }
}

#[async_trait]
impl EventStore for CosmicHandle {
    async fn get_events(&self, limit: u32, skip: u32) -> SiteResult<Vec<Event>> {
        self.request(|respond| CosmicCommand::GetEvents {
            limit,
            skip,
            respond,
        })
        .await
    }

    async fn get_event(&self, slug: &str) -> SiteResult<Option<Event>> {
        let slug = slug.to_string();
        self.request(|respond| CosmicCommand::GetEvent { slug, respond })
            .await
    }

    async fn submit_event(&self, submission: &NewSubmission) -> SiteResult<SubmittedObject> {
        let submission = submission.clone();
        self.request(|respond| CosmicCommand::SubmitEvent {
            submission,
            respond,
        })
        .await
    }

    async fn get_event_submissions(&self, limit: u32, skip: u32) -> SiteResult<Vec<EventSubmission>> {
        self.request(|respond| CosmicCommand::GetSubmissions {
            limit,
            skip,
            respond,
        })
        .await
    }
}
