//! Generic field patches for character records.
//!
//! Hosts that own the character sheet send edits as a map of dotted field
//! paths to JSON values:
//!
//! ```text
//! "attributes.strength"  → 5
//! "traits.0.active"      → false
//! "wounds.light"         → [true, false, false]
//! ```
//!
//! The patch is applied to the record's JSON form and the result is decoded
//! back, so a value of the wrong shape is rejected instead of half-applied.

use std::collections::BTreeMap;

use rules_core::CharacterRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why a patch could not be applied.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("patch path is empty")]
    EmptyPath,

    #[error("field `{0}` cannot be patched")]
    Immutable(String),

    #[error("no field at `{0}`")]
    MissingField(String),

    #[error("patched record is invalid")]
    Decode(#[source] serde_json::Error),

    #[error("record could not be encoded")]
    Encode(#[source] serde_json::Error),
}

/// Dotted field path → new value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch {
    fields: BTreeMap<String, Value>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(path.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns a patched copy of `record`.
    ///
    /// Every path must name an existing field; the record id cannot change.
    pub fn apply(&self, record: &CharacterRecord) -> Result<CharacterRecord, PatchError> {
        let mut document = serde_json::to_value(record).map_err(PatchError::Encode)?;

        for (path, value) in &self.fields {
            let slot = locate(&mut document, path)?;
            *slot = value.clone();
        }

        serde_json::from_value(document).map_err(PatchError::Decode)
    }
}

fn locate<'a>(document: &'a mut Value, path: &str) -> Result<&'a mut Value, PatchError> {
    let segments: Vec<&str> = path.split('.').map(str::trim).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(PatchError::EmptyPath);
    }
    if segments[0] == "id" {
        return Err(PatchError::Immutable(path.to_string()));
    }

    let mut current = document;
    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get_mut(index)),
            _ => None,
        };
        current = next.ok_or_else(|| PatchError::MissingField(path.to_string()))?;
    }
    Ok(current)
}
