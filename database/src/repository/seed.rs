use crate::model::person::{Address, NewPerson};

use super::person::{PersonRepository, RepositoryError};

/// Demo records inserted on every start
pub fn demo_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new(
            "Mahieddine Mehdi",
            "ICHIR",
            Some(Address::new("Algeria", "Algiers")),
        ),
        NewPerson::new("Rafika", "ICHIR", Some(Address::new("France", "Paris"))),
    ]
}

impl PersonRepository {
    /// Inserts each person that has no first and last name match yet and returns how
    /// many were inserted. Running it again against the same store inserts nothing.
    pub async fn seed(&self, people: &[NewPerson]) -> Result<usize, RepositoryError> {
        let mut inserted = 0;

        for person in people {
            let existing = self
                .find_by_fields(person.firstname.as_deref(), person.lastname.as_deref())
                .await?;

            if existing.is_some() {
                continue;
            }

            log::info!(
                "Populating {} {}",
                person.lastname.as_deref().unwrap_or_default(),
                person.firstname.as_deref().unwrap_or_default()
            );

            self.save(person.clone()).await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}
