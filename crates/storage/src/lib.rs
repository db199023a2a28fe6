pub mod db;
pub mod error;
pub mod kv_store;
pub mod repositories;

pub use db::SqliteStore;
pub use error::StorageError;
pub use kv_store::{KeyValueStore, MemoryStore};
