//! JSON key-value persistence
//!
//! Batch records are whole-document JSON values replaced on every write,
//! so a single-writer/multiple-reader discipline needs no locking above
//! the store. Two backends:
//! - `MemoryStore` — process-local, the default
//! - `FileStore` — one JSON file per key, for the CLI

#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
