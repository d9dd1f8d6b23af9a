use std::sync::Arc;

use thiserror::Error;

use crate::{
    model::{
        id::{PersonId, PersonIdError},
        person::{NewPerson, Person},
    },
    store::{
        query::{NameFilter, PageRequest},
        DocumentStore, StoreError,
    },
};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid person id: {0}")]
    InvalidId(#[from] PersonIdError),

    #[error("Not found, record does not exist: {0}")]
    NotFound(PersonId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Translates person operations into document store operations.
///
/// Owns identity assignment: every save generates a new id, ids supplied by callers are
/// never persisted. Lookups return `None` when nothing matches.
#[derive(Clone)]
pub struct PersonRepository {
    store: Arc<dyn DocumentStore>,
}

impl PersonRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Inserts `person` under a freshly generated id. Not idempotent, saving the same
    /// payload twice creates two documents.
    pub async fn save(&self, person: NewPerson) -> Result<PersonId, RepositoryError> {
        let id = PersonId::generate();

        self.store.insert(person.into_document(id)).await?;

        Ok(id)
    }

    /// First person whose first and last name both match exactly
    pub async fn find_by_fields(
        &self,
        firstname: Option<&str>,
        lastname: Option<&str>,
    ) -> Result<Option<Person>, RepositoryError> {
        let document = self
            .store
            .find_one(&NameFilter::new(firstname, lastname))
            .await?;

        Ok(document.map(Person::from))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Person>, RepositoryError> {
        let id: PersonId = id.parse()?;

        let document = self.store.find_by_id(&id.0).await?;

        Ok(document.map(Person::from))
    }

    pub async fn find_all(&self, page: PageRequest) -> Result<Vec<Person>, RepositoryError> {
        let documents = self.store.find_page(&page).await?;

        Ok(documents.into_iter().map(Person::from).collect())
    }

    pub async fn delete(&self, person: &Person) -> Result<(), RepositoryError> {
        match self.store.remove_by_id(&person.id.0).await? {
            true => Ok(()),
            false => Err(RepositoryError::NotFound(person.id)),
        }
    }
}
