use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::model::person::PersonDocument;

use self::query::{NameFilter, PageRequest};

pub mod memory;
pub mod mongo;
pub mod query;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document store driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Cannot insert, document already exists: {0}")]
    DuplicateId(ObjectId),

    #[error("Document store lock poisoned")]
    Poisoned,

    #[error("Document store session is closed")]
    Closed,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Connection to a document store holding person documents.
///
/// Implementations are shared by every in-flight request, so they must be safe for
/// concurrent use without outside locking.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: PersonDocument) -> StoreResult<()>;

    /// First document matching the filter, in store order
    async fn find_one(&self, filter: &NameFilter) -> StoreResult<Option<PersonDocument>>;

    async fn find_by_id(&self, id: &ObjectId) -> StoreResult<Option<PersonDocument>>;

    async fn find_page(&self, page: &PageRequest) -> StoreResult<Vec<PersonDocument>>;

    /// Returns whether a document was removed
    async fn remove_by_id(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Releases the connection. Errors are logged, not returned.
    async fn close(&self);
}
