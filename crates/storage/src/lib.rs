#![forbid(unsafe_code)]

pub mod local_store;
pub mod repository;
pub mod sqlite;

pub use local_store::LocalStore;
pub use repository::{InMemoryBackend, KeyValueBackend, Storage, StorageError};
