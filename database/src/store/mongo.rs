use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{ClientOptions, FindOptions, ReadPreference, ReadPreferenceOptions, SelectionCriteria},
    Client, Collection,
};

use crate::model::person::PersonDocument;

use super::{
    query::{NameFilter, PageRequest},
    DocumentStore, StoreResult,
};

pub struct MongoStore {
    client: Client,
    collection: Collection<PersonDocument>,
}

impl MongoStore {
    /// Connects to `url` and checks the server answers before returning.
    ///
    /// Reads prefer the primary and fall back to a secondary only while no primary is
    /// reachable, so a session sees a monotonically advancing view of its own writes in
    /// the common case without strict consistency across failover.
    pub async fn connect(url: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(url).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.selection_criteria = Some(SelectionCriteria::ReadPreference(
            ReadPreference::PrimaryPreferred {
                options: ReadPreferenceOptions::default(),
            },
        ));

        let client = Client::with_options(client_options)?;

        // The driver connects lazily, without this an unreachable server would only
        //  surface on the first request
        client
            .database(database)
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        let collection = client
            .database(database)
            .collection::<PersonDocument>(collection);

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, document: PersonDocument) -> StoreResult<()> {
        self.collection.insert_one(document, None).await?;

        Ok(())
    }

    async fn find_one(&self, filter: &NameFilter) -> StoreResult<Option<PersonDocument>> {
        Ok(self.collection.find_one(filter.to_document(), None).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> StoreResult<Option<PersonDocument>> {
        Ok(self.collection.find_one(doc! { "_id": *id }, None).await?)
    }

    async fn find_page(&self, page: &PageRequest) -> StoreResult<Vec<PersonDocument>> {
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .limit(i64::from(page.limit()))
            .build();

        let cursor = self.collection.find(page.to_filter(), options).await?;

        Ok(cursor.try_collect().await?)
    }

    async fn remove_by_id(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": *id }, None).await?;

        Ok(result.deleted_count > 0)
    }

    async fn close(&self) {
        // Waits for checked out connections to be returned before closing the pool
        self.client.clone().shutdown().await;
    }
}
