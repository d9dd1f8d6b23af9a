use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::model::person::PersonDocument;

use super::{
    query::{NameFilter, PageRequest},
    DocumentStore, StoreError, StoreResult,
};

/// In-process document store. Documents are kept ordered by id, which is also creation
/// order for generated ids.
pub struct MemoryStore {
    documents: RwLock<BTreeMap<ObjectId, PersonDocument>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<ObjectId, PersonDocument>>> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }

        self.documents.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<ObjectId, PersonDocument>>> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }

        self.documents.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, document: PersonDocument) -> StoreResult<()> {
        let mut documents = self.write()?;

        if documents.contains_key(&document.id) {
            return Err(StoreError::DuplicateId(document.id));
        }

        documents.insert(document.id, document);

        Ok(())
    }

    async fn find_one(&self, filter: &NameFilter) -> StoreResult<Option<PersonDocument>> {
        Ok(self
            .read()?
            .values()
            .find(|document| filter.matches(document))
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> StoreResult<Option<PersonDocument>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_page(&self, page: &PageRequest) -> StoreResult<Vec<PersonDocument>> {
        let lower = match page.after() {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };

        Ok(self
            .read()?
            .range((lower, Bound::Unbounded))
            .take(page.limit() as usize)
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn remove_by_id(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            log::warn!("Memory store already closed");
        }
    }
}
