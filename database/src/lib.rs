pub mod consts;
pub mod model;
pub mod repository;
pub mod session;
pub mod store;
