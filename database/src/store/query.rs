use mongodb::bson::{doc, oid::ObjectId, Document};
use thiserror::Error;

use crate::{
    consts::consts::MAX_PAGE_SIZE,
    model::person::{non_empty, PersonDocument},
};

/// Exact match on first and last name. An absent name only matches documents where the
/// field is absent as well.
#[derive(Clone, Debug, PartialEq)]
pub struct NameFilter {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl NameFilter {
    pub fn new(firstname: Option<&str>, lastname: Option<&str>) -> Self {
        NameFilter {
            firstname: non_empty(firstname.map(str::to_string)),
            lastname: non_empty(lastname.map(str::to_string)),
        }
    }

    pub fn matches(&self, document: &PersonDocument) -> bool {
        self.firstname == document.firstname && self.lastname == document.lastname
    }

    // `null` matches both missing and null fields
    pub fn to_document(&self) -> Document {
        doc! {
            "firstname": self.firstname.clone(),
            "lastname": self.lastname.clone(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PageSizeError {
    #[error("Page size must be between 1 and {}, got {0}", MAX_PAGE_SIZE)]
    OutOfRange(u32),
}

/// One page of a listing, ordered by ascending id. `after` is the last id of the
/// previous page.
///
/// The limit is always within `1..=MAX_PAGE_SIZE`, every backend can apply it as is.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
    after: Option<ObjectId>,
    limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Result<Self, PageSizeError> {
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(PageSizeError::OutOfRange(limit));
        }

        Ok(PageRequest { after: None, limit })
    }

    pub fn after(&self) -> Option<ObjectId> {
        self.after
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn starting_after(mut self, after: ObjectId) -> Self {
        self.after = Some(after);
        self
    }

    pub fn to_filter(&self) -> Document {
        match self.after {
            Some(after) => doc! { "_id": { "$gt": after } },
            None => doc! {},
        }
    }
}
