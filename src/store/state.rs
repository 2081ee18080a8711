//! State - string-keyed bag of values kept during a test run
//!
//! Not thread-safe: no internal locking. Wrap in a mutex to share.

use std::collections::hash_map::{self, HashMap};
use std::fmt;

use tracing::{debug, trace};

use crate::dump;
use crate::error::StateError;
use crate::value::{StateObject, StateValue};

/// Mutable mapping from key to [`StateValue`]
///
/// `Clone` is a shallow copy: the mapping is duplicated, opaque objects are
/// shared through their `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// key → value (a key may hold an explicit `Null`)
    entries: HashMap<String, StateValue>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot another state; later inserts/removes on either side stay local
    pub fn copy(original: &State) -> Self {
        trace!(entries = original.len(), "copying state");
        original.clone()
    }

    pub fn from_map(entries: HashMap<String, StateValue>) -> Self {
        Self { entries }
    }

    // ─────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────

    /// Insert or overwrite the value for `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        let key = key.into();
        let value = value.into();
        trace!(key = %key, kind = value.kind(), "state set");
        self.entries.insert(key, value);
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        let removed = self.entries.remove(key);
        trace!(key, present = removed.is_some(), "state remove");
        removed
    }

    pub fn clear(&mut self) {
        trace!(entries = self.entries.len(), "state clear");
        self.entries.clear();
    }

    // ─────────────────────────────────────────────────────────────
    // Query
    // ─────────────────────────────────────────────────────────────

    /// True if `key` has an entry, even one holding `Null`
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value for `key`; `None` means absent, `Some(&Null)` means stored null
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    /// Value as a string
    ///
    /// Missing keys and stored nulls yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`StateError::TypeMismatch`] if the value is not a string.
    pub fn get_string(&self, key: &str) -> Result<Option<&str>, StateError> {
        self.typed(key, "string", StateValue::as_str)
    }

    /// Value as a 32-bit integer (a stored `Long` is a mismatch)
    pub fn get_int(&self, key: &str) -> Result<Option<i32>, StateError> {
        self.typed(key, "int", StateValue::as_int)
    }

    /// Value as a 64-bit integer (a stored `Int` is a mismatch)
    pub fn get_long(&self, key: &str) -> Result<Option<i64>, StateError> {
        self.typed(key, "long", StateValue::as_long)
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, StateError> {
        self.typed(key, "bool", StateValue::as_bool)
    }

    pub fn get_bytes(&self, key: &str) -> Result<Option<&[u8]>, StateError> {
        self.typed(key, "bytes", StateValue::as_bytes)
    }

    /// Opaque object downcast to `T`
    pub fn get_object<T: StateObject>(&self, key: &str) -> Result<Option<&T>, StateError> {
        self.typed(key, std::any::type_name::<T>(), StateValue::downcast_ref::<T>)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        cast: impl FnOnce(&'a StateValue) -> Option<T>,
    ) -> Result<Option<T>, StateError> {
        match self.entries.get(key) {
            None | Some(StateValue::Null) => Ok(None),
            Some(value) => match cast(value) {
                Some(v) => Ok(Some(v)),
                None => {
                    debug!(key, expected, found = value.kind(), "state type mismatch");
                    Err(StateError::TypeMismatch {
                        key: key.to_string(),
                        expected,
                        found: value.kind(),
                    })
                }
            },
        }
    }

    /// Independent copy of the mapping
    pub fn to_map(&self) -> HashMap<String, StateValue> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, StateValue> {
        self.entries.iter()
    }

    /// Render as `{k1 = |v1|,k2 = |v2|}` (entry order unspecified)
    pub fn dump(&self) -> String {
        dump::dump(&self.entries)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl From<HashMap<String, StateValue>> for State {
    fn from(entries: HashMap<String, StateValue>) -> Self {
        Self::from_map(entries)
    }
}

impl<K, V> FromIterator<(K, V)> for State
where
    K: Into<String>,
    V: Into<StateValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        state.extend(iter);
        state
    }
}

impl<K, V> Extend<(K, V)> for State
where
    K: Into<String>,
    V: Into<StateValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a String, &'a StateValue);
    type IntoIter = hash_map::Iter<'a, String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for State {
    type Item = (String, StateValue);
    type IntoIter = hash_map::IntoIter<String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
