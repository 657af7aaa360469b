//! Client for the Cosmic headless CMS that holds published events and
//! pending submissions.

pub mod actor;
pub mod handle;
pub mod models;
pub mod store;

pub use actor::{CosmicActor, CosmicApi, CosmicCommand};
pub use handle::CosmicHandle;
pub use models::{Event, EventMetadata, EventSubmission, FeaturedImage, SubmittedObject};
pub use store::{EventStore, InMemoryStore};
