pub mod id;
pub mod person;
