#![doc = include_str!("../README.md")]

pub mod error;
pub mod keys;
pub mod kv;
pub mod paths;
pub mod startup;
pub mod store;

pub use error::{Result, StoreError};
pub use keys::{accept_terms, terms_accepted};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use paths::StorageResolver;
pub use startup::{CallbackOutcome, handle_callback, take_oauth_code};
pub use store::ProjectStore;
