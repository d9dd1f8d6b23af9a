use std::sync::Arc;

use thiserror::Error;

use crate::{
    consts::consts::{MEMORY_SCHEME, MONGODB_SCHEMES},
    store::{memory::MemoryStore, mongo::MongoStore, DocumentStore, StoreError},
};

use super::options::SessionOptions;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unsupported document store url, expected mongodb:// or memory://: {0}")]
    UnsupportedScheme(String),

    #[error("Unable to connect to document store: {0}")]
    Connect(#[from] StoreError),
}

#[derive(Debug, PartialEq)]
enum StoreKind {
    Mongo,
    Memory,
}

impl StoreKind {
    fn from_url(url: &str) -> Result<StoreKind, SessionError> {
        match url.split_once("://") {
            Some((scheme, _)) if MONGODB_SCHEMES.contains(&scheme) => Ok(StoreKind::Mongo),
            Some((MEMORY_SCHEME, _)) => Ok(StoreKind::Memory),
            _ => Err(SessionError::UnsupportedScheme(url.to_string())),
        }
    }
}

/// The process' single connection to the document store.
///
/// Opened once at startup, shared by every request through [`Session::store`] and closed
/// once on shutdown. `close` consumes the session so it cannot be closed twice or used
/// afterwards.
pub struct Session {
    store: Arc<dyn DocumentStore>,
}

impl Session {
    /// Opens the store behind `url`. There is no retry, callers treat an error as fatal.
    pub async fn open(url: &str, options: SessionOptions) -> Result<Session, SessionError> {
        let store: Arc<dyn DocumentStore> = match StoreKind::from_url(url)? {
            StoreKind::Mongo => {
                log::info!(
                    "Opening mongodb session [Database: {}, Collection: {}]",
                    options.database,
                    options.collection
                );

                Arc::new(MongoStore::connect(url, &options.database, &options.collection).await?)
            }
            StoreKind::Memory => {
                log::info!("Opening in-memory session, data is lost on exit");

                Arc::new(MemoryStore::new())
            }
        };

        Ok(Session { store })
    }

    /// Wraps an already connected store
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Session {
        Session { store }
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    pub async fn close(self) {
        log::info!("Closing document store session");

        self.store.close().await;
    }
}
