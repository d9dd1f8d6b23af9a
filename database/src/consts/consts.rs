// Document store layout
pub const DEFAULT_DATABASE: &str = "people";
pub const DEFAULT_COLLECTION: &str = "people";

// Listing
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// Url schemes understood by the session manager
pub const MONGODB_SCHEMES: [&str; 2] = ["mongodb", "mongodb+srv"];
pub const MEMORY_SCHEME: &str = "memory";
