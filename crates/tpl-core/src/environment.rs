//! Environment table: variable name → plain or structured value.
//!
//! The table is built once, from the process environment or any sequence of
//! pairs, and handed to the renderer as its lookup context. Building never
//! fails; values that don't classify as structured stay plain strings.

use crate::classifier::classify;
use crate::types::EnvValue;
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use std::ffi::OsString;
use tracing::debug;

/// Immutable mapping from variable name to its classified value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentTable {
    entries: BTreeMap<String, EnvValue>,
}

impl EnvironmentTable {
    /// Build from `(key, value)` pairs, keeping keys that start with `prefix`.
    /// An empty prefix keeps every key.
    ///
    /// ```
    /// use tpl_core::EnvironmentTable;
    ///
    /// let table = EnvironmentTable::from_pairs(
    ///     [("APP_HOSTS", "[a,b]"), ("HOME", "/root")],
    ///     "APP_",
    /// );
    /// assert_eq!(table.len(), 1);
    /// assert!(table.get("APP_HOSTS").unwrap().is_structured());
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;
        for (key, value) in pairs {
            let key = key.into();
            if !key.starts_with(prefix) {
                skipped += 1;
                continue;
            }
            let value = classify(value.as_ref());
            entries.insert(key, value);
        }
        debug!(kept = entries.len(), skipped, prefix, "environment table built");
        Self { entries }
    }

    /// Build from raw `KEY=VALUE` strings, splitting on the first `=`.
    /// Entries without `=` are skipped.
    pub fn from_entries<I, S>(entries: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref();
                match entry.split_once('=') {
                    Some((key, value)) => Some((key.to_owned(), value.to_owned())),
                    None => {
                        debug!(entry, "skipping environment entry without '='");
                        None
                    }
                }
            })
            .collect();
        Self::from_pairs(pairs, prefix)
    }

    /// Build from the current process environment.
    ///
    /// Variables whose name or value isn't valid Unicode are skipped.
    pub fn from_process_env(prefix: &str) -> Self {
        let pairs = std::env::vars_os().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    let key = key.unwrap_or_else(|k: OsString| k.to_string_lossy().into_owned());
                    debug!(key = %key, "skipping non-unicode variable");
                    None
                }
            }
        });
        Self::from_pairs(pairs, prefix)
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
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

    pub fn iter(&self) -> btree_map::Iter<'_, String, EnvValue> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a EnvironmentTable {
    type Item = (&'a String, &'a EnvValue);
    type IntoIter = btree_map::Iter<'a, String, EnvValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
