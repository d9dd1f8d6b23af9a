use crate::consts::consts::{DEFAULT_COLLECTION, DEFAULT_DATABASE};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub database: String,
    pub collection: String,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl SessionOptions {
    pub fn set_database(mut self, database: String) -> Self {
        self.database = database;
        self
    }

    pub fn set_collection(mut self, collection: String) -> Self {
        self.collection = collection;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}
