//! Structured key-value fields
//!
//! This module provides:
//! - `FieldValue`: a single structured value
//! - `Fields`: a key-value map used for ambient, bound, and per-call data
//! - `ContextStore`: the process-wide ambient fields attached to every record
//! - `ContextGuard`: RAII guard for a scoped ambient field

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A map of structured fields. Key order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields {
    fields: HashMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field, returning the updated map
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Overlay `other` onto `self`; keys in `other` win.
    pub fn extend_from(&mut self, other: &Fields) {
        for (key, value) in other.iter() {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Format fields as key=value pairs, sorted by key for stable output
    pub fn format_fields(&self) -> String {
        let mut pairs: Vec<_> = self.fields.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = hash_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Process-wide ambient fields attached to every emission
///
/// Writers replace the map copy-on-write, so a reader holding a
/// [`snapshot`](Self::snapshot) keeps a consistent view no matter what
/// happens concurrently.
///
/// # Example
///
/// ```
/// use rust_field_logger::core::ContextStore;
///
/// let ctx = ContextStore::new();
/// ctx.set("service", "api-gateway");
/// ctx.set("version", "1.2.3");
///
/// let fields = ctx.snapshot();
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ContextStore {
    fields: RwLock<Arc<Fields>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            fields: RwLock::new(Arc::new(Fields::new())),
        }
    }

    /// Set a field, overwriting any previous value
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut guard = self.fields.write();
        Arc::make_mut(&mut guard).insert(key.into(), value.into());
    }

    /// Merge many fields at once, last write wins per key
    pub fn set_many(&self, fields: &Fields) {
        let mut guard = self.fields.write();
        Arc::make_mut(&mut guard).extend_from(fields);
    }

    pub fn remove(&self, key: &str) {
        let mut guard = self.fields.write();
        if guard.contains_key(key) {
            Arc::make_mut(&mut guard).remove(key);
        }
    }

    pub fn clear(&self) {
        *self.fields.write() = Arc::new(Fields::new());
    }

    /// Current fields as an immutable snapshot
    pub fn snapshot(&self) -> Arc<Fields> {
        Arc::clone(&self.fields.read())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }
}

/// RAII guard for a scoped ambient field
///
/// The guard owns its key for the whole scope: when dropped it removes the
/// key from the context store, including a value someone else set for the
/// same key after the guard was created.
///
/// # Example
///
/// ```
/// use rust_field_logger::LogSystem;
///
/// let system = LogSystem::new();
/// {
///     let _guard = system.scoped_context_field("request_id", "abc-123");
///     assert_eq!(system.context().len(), 1);
/// }
/// assert!(system.context().is_empty());
/// ```
pub struct ContextGuard {
    store: Arc<ContextStore>,
    key: String,
}

impl ContextGuard {
    pub(crate) fn new(store: Arc<ContextStore>, key: String) -> Self {
        Self { store, key }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.store.remove(&self.key);
    }
}
