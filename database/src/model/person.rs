use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::id::PersonId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Address {
    pub fn new(city: &str, state: &str) -> Self {
        Address {
            city: Some(city.to_string()),
            state: Some(state.to_string()),
        }
    }

    fn normalize(self) -> Option<Address> {
        let address = Address {
            city: non_empty(self.city),
            state: non_empty(self.state),
        };

        match address {
            Address {
                city: None,
                state: None,
            } => None,
            address => Some(address),
        }
    }
}

/// A stored person, as returned to API clients.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Person {
    pub id: PersonId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Create payload. Identity is never taken from the client, an `id` field in the body
/// is dropped on decode.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct NewPerson {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl NewPerson {
    pub fn new(firstname: &str, lastname: &str, address: Option<Address>) -> Self {
        NewPerson {
            firstname: Some(firstname.to_string()),
            lastname: Some(lastname.to_string()),
            address,
        }
    }

    /// Builds the document to persist under `id`. Empty strings and empty addresses
    /// are dropped so they are omitted from the stored document.
    pub fn into_document(self, id: PersonId) -> PersonDocument {
        PersonDocument {
            id: id.into(),
            firstname: non_empty(self.firstname),
            lastname: non_empty(self.lastname),
            address: self.address.and_then(Address::normalize),
        }
    }
}

/// Persisted shape: `{_id, firstname, lastname, address: {city, state}}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl From<PersonDocument> for Person {
    fn from(document: PersonDocument) -> Self {
        Person {
            id: document.id.into(),
            firstname: document.firstname,
            lastname: document.lastname,
            address: document.address,
        }
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
