// Service exports
pub mod automation;
pub mod cache;
pub mod error;
pub mod gemini;
pub mod linkd;
pub mod storage;

pub use automation::{AutomationError, BrowserAutomation, Cookie, StagehandClient};
pub use cache::{CacheKey, CachedSearch};
pub use error::ServiceError;
pub use gemini::{GeminiClient, MessageWriter, QueryGenerator};
pub use linkd::{LinkdClient, PeopleSearch, SearchParams};
pub use storage::{MessageArchive, SessionStore, StateStore, StorageError};
