//! ESPORA Storage - Persistence Port and Typed Adapter
//!
//! Every piece of checklist state lives under a fixed key in a string
//! key-value store, serialized as JSON. This crate defines that port
//! ([`KvStore`]), two implementations of it, and the typed adapter
//! ([`LocalStore`]) the checklist engine reads and writes through.

pub mod file;
pub mod keys;
pub mod kv;
pub mod local;
pub mod snapshot;

pub use file::JsonFileKvStore;
pub use keys::StorageKey;
pub use kv::{InMemoryKvStore, KvStore};
pub use local::LocalStore;
pub use snapshot::Snapshot;
