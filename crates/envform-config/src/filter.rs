//! Delimiter-safe encoding of the filter pattern list.
//!
//! A filter field stores an ordered list of arbitrary strings in one scalar
//! value, joined by a separator token that is persisted next to it under
//! `{KEY}_DELIMITER`. Separators are uppercase tokens generated from an index
//! (`DEL`, `A`..`Z`, `AA`, ...). Whenever an edit makes an entry contain the
//! current separator, a new one that occurs in no entry is chosen and the whole
//! list is re-encoded under it. A candidate that only appears once entries are
//! joined (`AA` between `xA` and `Ay`) is rejected the same way.
//!
//! # Design
//! - The codec functions never fail; the only soft failure is running out of
//!   candidates, which falls back to `DEL` and is logged.
//! - `FilterList` is the editable view over the two coupled config keys.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::ConfigMap;

/// Config key holding the default filter list.
pub const FILTER_KEY: &str = "FILTER";
/// Separator used when none is stored and as the exhaustion fallback.
pub const DEFAULT_SEPARATOR: &str = "DEL";
/// Number of generated candidates tried before falling back to the default.
///
/// Must stay below 2846, the first index whose letters spell `DEL` again.
pub const SEPARATOR_SEARCH_LIMIT: usize = 1000;

const DELIMITER_SUFFIX: &str = "_DELIMITER";
const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Key under which the separator for `key` is stored.
#[must_use]
pub fn delimiter_key(key: &str) -> String {
    format!("{key}{DELIMITER_SUFFIX}")
}

/// Token joining the entries of an encoded filter list. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Separator(String);

impl Separator {
    /// Separator from a stored value, falling back to the default when absent or empty.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some(token) if !token.is_empty() => Self(token.to_string()),
            _ => Self::default(),
        }
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether any entry contains this separator as a substring.
    #[must_use]
    pub fn occurs_in<S: AsRef<str>>(&self, entries: &[S]) -> bool {
        entries
            .iter()
            .any(|entry| entry.as_ref().contains(self.as_str()))
    }

    /// Whether `entries` can be encoded with this separator and decoded back
    /// to their non-empty members: no entry contains it and no occurrence
    /// spans the boundary between two joined entries.
    #[must_use]
    pub fn is_safe_for<S: AsRef<str>>(&self, entries: &[S]) -> bool {
        if self.occurs_in(entries) {
            return false;
        }
        let encoded = encode(entries, self);
        encoded.is_empty()
            || decode(&encoded, self)
                .iter()
                .map(String::as_str)
                .eq(entries
                    .iter()
                    .map(AsRef::<str>::as_ref)
                    .filter(|entry| !entry.is_empty()))
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(DEFAULT_SEPARATOR.to_string())
    }
}

impl Display for Separator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for Separator {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Split an encoded scalar into entries.
///
/// An empty scalar yields a single empty entry. Empty segments between
/// consecutive separators are kept.
#[must_use]
pub fn decode(scalar: &str, separator: &Separator) -> Vec<String> {
    if scalar.is_empty() {
        return vec![String::new()];
    }
    scalar
        .split(separator.as_str())
        .map(str::to_string)
        .collect()
}

/// Join the non-empty entries with the separator.
#[must_use]
pub fn encode<S: AsRef<str>>(entries: &[S], separator: &Separator) -> String {
    entries
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Separator candidate for `index`.
///
/// `0` is `DEL`; from `1` on the letters follow spreadsheet column naming
/// (`1 => A`, `26 => Z`, `27 => AA`, `702 => ZZ`, `703 => AAA`). Tokens are
/// unique only below 2846, which spells `DEL` like index `0`.
#[must_use]
pub fn generate_separator(index: usize) -> Separator {
    if index == 0 {
        return Separator::default();
    }
    let mut letters = Vec::new();
    let mut remaining = index;
    while remaining > 0 {
        letters.push(char::from(ALPHABET[(remaining - 1) % 26]));
        remaining = (remaining - 1) / 26;
    }
    Separator(letters.iter().rev().collect())
}

/// First candidate that is [safe](Separator::is_safe_for) for `entries`, or
/// `DEL` once [`SEPARATOR_SEARCH_LIMIT`] candidates are exhausted.
///
/// The fallback is best-effort: it may itself occur in an entry.
#[must_use]
pub fn find_unused_separator<S: AsRef<str>>(entries: &[S]) -> Separator {
    (0..SEPARATOR_SEARCH_LIMIT)
        .map(generate_separator)
        .find(|candidate| candidate.is_safe_for(entries))
        .unwrap_or_else(|| {
            warn!(
                limit = SEPARATOR_SEARCH_LIMIT,
                "no unused filter separator found; falling back to default"
            );
            Separator::default()
        })
}

/// Effect an edit had on the separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOutcome {
    /// No entry contains the separator; it was kept.
    SeparatorKept,
    /// A collision was repaired by switching separators.
    SeparatorChanged {
        /// Separator in use before the edit.
        previous: Separator,
    },
    /// A collision was found but every candidate collided too; `DEL` is in use
    /// and may still occur in an entry.
    SeparatorExhausted {
        /// Separator in use before the edit.
        previous: Separator,
    },
}

/// Errors raised when editing a filter list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterEditError {
    /// The entry index is past the end of the list.
    #[error("filter entry index out of range")]
    IndexOutOfRange {
        /// Index requested by the caller.
        index: usize,
        /// Number of entries in the list.
        len: usize,
    },
}

/// Editable view of a filter list stored across `key` and `{key}_DELIMITER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterList {
    key: String,
    separator: Separator,
    entries: Vec<String>,
}

impl FilterList {
    /// Decode the list stored under `key`.
    #[must_use]
    pub fn from_config(map: &ConfigMap, key: &str) -> Self {
        let separator = Separator::from_stored(map.get(&delimiter_key(key)));
        let entries = decode(map.get(key).unwrap_or_default(), &separator);
        Self {
            key: key.to_string(),
            separator,
            entries,
        }
    }

    /// Config key holding the encoded list.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Config key holding the separator.
    #[must_use]
    pub fn delimiter_key(&self) -> String {
        delimiter_key(&self.key)
    }

    /// Current separator.
    #[must_use]
    pub const fn separator(&self) -> &Separator {
        &self.separator
    }

    /// Entries as edited, including empty placeholders.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries plus a trailing empty slot when every entry is filled, so the
    /// editor always has a place to append.
    #[must_use]
    pub fn display_entries(&self) -> Vec<String> {
        let mut entries = self.entries.clone();
        if entries.iter().all(|entry| !entry.is_empty()) {
            entries.push(String::new());
        }
        entries
    }

    /// Whether the current separator is safe for the entries.
    #[must_use]
    pub fn is_separator_valid(&self) -> bool {
        self.separator.is_safe_for(&self.entries)
    }

    /// Encoded scalar under the current separator.
    #[must_use]
    pub fn encoded(&self) -> String {
        encode(&self.entries, &self.separator)
    }

    /// Replace the entry at `index`, or append when `index` equals the entry
    /// count, then repair the separator if the edit introduced a collision.
    ///
    /// # Errors
    ///
    /// Returns [`FilterEditError::IndexOutOfRange`] when `index` is past the end.
    pub fn set_entry(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<EditOutcome, FilterEditError> {
        let len = self.entries.len();
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = value.into();
        } else if index == len {
            self.entries.push(value.into());
        } else {
            return Err(FilterEditError::IndexOutOfRange { index, len });
        }
        Ok(self.repair_separator())
    }

    /// Remove the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterEditError::IndexOutOfRange`] when `index` is past the end.
    pub fn remove_entry(&mut self, index: usize) -> Result<String, FilterEditError> {
        let len = self.entries.len();
        if index >= len {
            return Err(FilterEditError::IndexOutOfRange { index, len });
        }
        Ok(self.entries.remove(index))
    }

    /// Store the encoded list and its separator into `map`.
    pub fn write_to(&self, map: &mut ConfigMap) {
        map.insert(self.key.clone(), self.encoded());
        map.insert(self.delimiter_key(), self.separator.as_str());
    }

    fn repair_separator(&mut self) -> EditOutcome {
        if self.is_separator_valid() {
            return EditOutcome::SeparatorKept;
        }
        let previous = std::mem::replace(&mut self.separator, find_unused_separator(&self.entries));
        debug!(
            key = %self.key,
            previous = %previous,
            next = %self.separator,
            "filter separator changed"
        );
        // Candidate 0 is the fallback, so it is only unsafe here when the search ran dry.
        if self.is_separator_valid() {
            EditOutcome::SeparatorChanged { previous }
        } else {
            EditOutcome::SeparatorExhausted { previous }
        }
    }
}
