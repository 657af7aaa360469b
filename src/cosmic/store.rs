use super::models::{Event, EventSubmission, SubmissionMetadata, SubmittedObject};
use crate::error::SiteResult;
use crate::submission::NewSubmission;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Content backend the site reads events from and writes submissions to
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Published events, paged
    async fn get_events(&self, limit: u32, skip: u32) -> SiteResult<Vec<Event>>;

    /// A single published event by slug
    async fn get_event(&self, slug: &str) -> SiteResult<Option<Event>>;

    /// Store a validated submission for review
    async fn submit_event(&self, submission: &NewSubmission) -> SiteResult<SubmittedObject>;

    /// Submissions awaiting review, paged
    async fn get_event_submissions(&self, limit: u32, skip: u32) -> SiteResult<Vec<EventSubmission>>;
}

/// In-memory implementation of the store (for testing and offline runs)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: RwLock<Vec<Event>>,
    submissions: RwLock<Vec<EventSubmission>>,
}

impl InMemoryStore {
    /// Create a store holding the given published events
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
            submissions: RwLock::new(Vec::new()),
        }
    }
}

fn page<T: Clone>(items: &[T], limit: u32, skip: u32) -> Vec<T> {
    items
        .iter()
        .skip(skip as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn get_events(&self, limit: u32, skip: u32) -> SiteResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(page(events.as_slice(), limit, skip))
    }

    async fn get_event(&self, slug: &str) -> SiteResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn submit_event(&self, submission: &NewSubmission) -> SiteResult<SubmittedObject> {
        let mut submissions = self.submissions.write().await;
        let id = format!("submission-{}", submissions.len() + 1);

        submissions.push(EventSubmission {
            id: id.clone(),
            slug: id.clone(),
            title: submission.title.clone(),
            metadata: SubmissionMetadata {
                title: submission.title.clone(),
                description: submission.description.clone(),
                event_date: submission.event_date.format("%Y-%m-%d").to_string(),
                start_time: submission.start_time.clone(),
                end_time: submission.end_time.clone(),
                venue_name: submission.venue_name.clone(),
                address: submission.address.clone(),
                submitter_name: submission.submitter_name.clone(),
                submitter_email: submission.submitter_email.clone(),
                website: submission.website.clone(),
                price: submission.price.clone(),
                notes: submission.notes.clone(),
            },
        });

        Ok(SubmittedObject {
            id: id.clone(),
            slug: Some(id),
            title: submission.title.clone(),
        })
    }

    async fn get_event_submissions(&self, limit: u32, skip: u32) -> SiteResult<Vec<EventSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(page(submissions.as_slice(), limit, skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SubmissionForm;
    use chrono::NaiveDate;

    fn event(slug: &str, date: &str) -> Event {
        let mut event = Event {
            id: format!("id-{}", slug),
            slug: slug.to_string(),
            title: slug.to_string(),
            ..Default::default()
        };
        event.metadata.event_date = date.to_string();
        event
    }

    #[tokio::test]
    async fn test_paging_and_lookup() {
        let store = InMemoryStore::with_events(vec![
            event("a", "2024-03-01"),
            event("b", "2024-03-02"),
            event("c", "2024-03-03"),
        ]);

        let first = store.get_events(2, 0).await.unwrap();
        assert_eq!(first.len(), 2);
        let rest = store.get_events(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].slug, "c");

        assert!(store.get_event("b").await.unwrap().is_some());
        assert!(store.get_event("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submissions_are_recorded() {
        let store = InMemoryStore::default();
        let form = SubmissionForm {
            title: "Board games".to_string(),
            description: "Weekly meetup".to_string(),
            event_date: "2024-05-02".to_string(),
            start_time: "6 PM".to_string(),
            venue_name: "Library".to_string(),
            address: "3 Main St".to_string(),
            submitter_name: "Alex".to_string(),
            submitter_email: "alex@example.com".to_string(),
            ..Default::default()
        };
        let submission = form
            .validate(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .unwrap();

        let created = store.submit_event(&submission).await.unwrap();
        assert_eq!(created.id, "submission-1");

        let pending = store.get_event_submissions(10, 0).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].metadata.event_date, "2024-05-02");
        assert_eq!(pending[0].metadata.submitter_email, "alex@example.com");

        // Published events are untouched
        assert!(store.get_events(10, 0).await.unwrap().is_empty());
    }
}
