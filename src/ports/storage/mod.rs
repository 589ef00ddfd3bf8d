mod version_store;

pub use version_store::{ListVersionsRequest, VersionStoreClient};
