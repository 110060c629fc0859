use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Thread-safe string-keyed map of values scoped to one job or step execution.
///
/// Clones share the same entries, so a handle can be given to monitoring code
/// while the step that owns the context keeps writing to it. Use
/// [`ExecutionContext::snapshot`] for an independent copy.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    entries: Arc<RwLock<BTreeMap<String, JsonValue>>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Serializes `value` and stores it. Values that fail to serialize are
    /// reported back instead of being stored.
    pub fn put_serialized<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.entries.write().insert(key.into(), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.entries.read().get(key).cloned()
    }

    /// Typed read; `None` when the key is absent or holds another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let guard = self.entries.read();
        let value = guard.get(key)?;
        T::deserialize(value).ok()
    }

    pub fn put_string(&self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, JsonValue::String(value.into()));
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .get(key)
            .and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn put_long(&self, key: impl Into<String>, value: i64) {
        self.put(key, JsonValue::from(value));
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.entries.read().get(key).and_then(JsonValue::as_i64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<JsonValue> {
        self.entries.write().remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Copies every entry of `other` into this context, overwriting on key
    /// collision.
    pub fn put_all(&self, other: &ExecutionContext) {
        if Arc::ptr_eq(&self.entries, &other.entries) {
            return;
        }
        let incoming = other.snapshot();
        self.entries.write().extend(incoming);
    }

    pub fn snapshot(&self) -> BTreeMap<String, JsonValue> {
        self.entries.read().clone()
    }

    /// A context with the same entries that no longer shares storage with `self`.
    pub fn detached(&self) -> ExecutionContext {
        ExecutionContext::from(self.snapshot())
    }
}

impl From<BTreeMap<String, JsonValue>> for ExecutionContext {
    fn from(entries: BTreeMap<String, JsonValue>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl PartialEq for ExecutionContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.snapshot() == other.snapshot()
    }
}

impl Serialize for ExecutionContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.read().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExecutionContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, JsonValue>::deserialize(deserializer).map(ExecutionContext::from)
    }
}
