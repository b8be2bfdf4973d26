//! The key-value contract

use crate::error::StoreError;
use serde_json::Value;

/// JSON key-value store
///
/// Writes replace the whole value for a key. Implementations must be safe
/// to share across tasks behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value for `key`, if present
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value for `key`
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the value for `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently held, in unspecified order
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
