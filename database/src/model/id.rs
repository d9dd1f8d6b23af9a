use std::{fmt, str::FromStr};

use mongodb::bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PersonIdError {
    #[error("Malformed person id, expected 24 hex characters: {0:?}")]
    Malformed(String),
}

/// Identity of a stored person, assigned by the repository on save and stable for the
/// lifetime of the record.
///
/// Stored as the document store's native `ObjectId`, rendered as 24 lower case hex
/// characters everywhere else (paths, `Location` headers, JSON bodies).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub ObjectId);

impl PersonId {
    pub fn generate() -> PersonId {
        PersonId(ObjectId::new())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for PersonId {
    type Err = PersonIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(value)
            .map(PersonId)
            .map_err(|_| PersonIdError::Malformed(value.to_string()))
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<ObjectId> for PersonId {
    fn from(object_id: ObjectId) -> Self {
        PersonId(object_id)
    }
}

impl From<PersonId> for ObjectId {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

// JSON carries the hex form, never the extended-json `{"$oid": ..}` object
impl Serialize for PersonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;

        value.parse().map_err(de::Error::custom)
    }
}
