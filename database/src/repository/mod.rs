pub mod person;
pub mod seed;
