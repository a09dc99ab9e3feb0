//! The model store: the ordered, index-addressable list of rows that every
//! other component reads from.
//!
//! Rows are append-only. An entry's index is its position in the list and is
//! never stored alongside it, so it cannot drift. Inserting or removing at an
//! arbitrary position is not supported.
//!
//! Mutations report their change notification as a return value. A write that
//! does not change anything returns `None`, which is how the store keeps a
//! refresh from bouncing back into another write.
//!
//! ## Wire shape
//!
//! Bulk loads accept a JSON array of records. The toggle field may be spelled
//! `toggled`, `mark` or `active`, and the label field `label` or `right_text`.
//! An optional second label is read from `left_label` or `left_text`:
//!
//! ```rust
//! use bubbletea_recycler::store::Store;
//!
//! let store = Store::from_json(
//!     r#"[{"index": 0, "mark": true, "right_text": "Right 0"},
//!         {"index": 1, "toggled": false, "label": "Right 1"}]"#,
//! ).unwrap();
//!
//! assert_eq!(store.len(), 2);
//! assert!(store.get(0).unwrap().toggled);
//! assert_eq!(store.get(1).unwrap().label, "Right 1");
//! ```

use crate::error::{Error, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// One logical row's state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Current on/off state of the row's toggle.
    pub toggled: bool,
    /// Display text for the row's label.
    pub label: String,
    /// Optional text shown left of the label.
    pub left_label: Option<String>,
}

impl Entry {
    /// Creates an entry with the given toggle state and label.
    pub fn new(toggled: bool, label: impl Into<String>) -> Self {
        Self {
            toggled,
            label: label.into(),
            left_label: None,
        }
    }

    /// Sets the left label.
    pub fn with_left_label(mut self, left_label: impl Into<String>) -> Self {
        self.left_label = Some(left_label.into());
        self
    }
}

/// Which field of an entry a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The toggle state.
    Toggled,
    /// The label text.
    Label,
    /// The left label text.
    LeftLabel,
}

/// Change notification emitted by a successful store mutation.
#[must_use = "a change must be routed to the recycler or the bound view goes stale"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    /// Index of the entry that changed.
    pub index: usize,
    /// The field that changed.
    pub field: Field,
}

/// Serialized form of one row, used for seeding and bulk loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Position of the row. Optional on input; when present it must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Toggle state.
    #[serde(default, alias = "mark", alias = "active")]
    pub toggled: bool,
    /// Label text.
    #[serde(default, alias = "right_text")]
    pub label: String,
    /// Left label text, if the row has one.
    #[serde(default, alias = "left_text", skip_serializing_if = "Option::is_none")]
    pub left_label: Option<String>,
}

impl EntryRecord {
    /// Creates a record without an explicit index.
    pub fn new(toggled: bool, label: impl Into<String>) -> Self {
        Self {
            index: None,
            toggled,
            label: label.into(),
            left_label: None,
        }
    }
}

/// Ordered, append-only collection of entries.
#[derive(Debug, Clone, Default)]
pub struct Store {
    entries: Vec<Entry>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records, checking that any explicit index equals
    /// the record's position.
    pub fn from_records(records: impl IntoIterator<Item = EntryRecord>) -> Result<Self> {
        let mut store = Self::new();
        for (position, record) in records.into_iter().enumerate() {
            if let Some(index) = record.index {
                if index != position {
                    return Err(Error::IndexMismatch { position, index });
                }
            }
            store.append(Entry {
                toggled: record.toggled,
                label: record.label,
                left_label: record.left_label,
            })?;
        }
        Ok(store)
    }

    /// Parses a JSON array of records into a store.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<EntryRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Appends an entry and returns the index it was assigned.
    pub fn append(&mut self, entry: Entry) -> Result<usize> {
        let index = self.entries.len();
        self.entries
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailure { capacity: index })?;
        debug!("append row {} (toggled={}, label={:?})", index, entry.toggled, entry.label);
        self.entries.push(entry);
        Ok(index)
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Sets the toggle state at `index`.
    ///
    /// Returns `Ok(None)` without touching anything if the entry already holds
    /// `value`; otherwise writes it and returns the change to propagate.
    pub fn set_toggled(&mut self, index: usize, value: bool) -> Result<Option<Change>> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        if entry.toggled == value {
            trace!("row {} already toggled={}, write suppressed", index, value);
            return Ok(None);
        }
        entry.toggled = value;
        debug!("row {} toggled={}", index, value);
        Ok(Some(Change {
            index,
            field: Field::Toggled,
        }))
    }

    /// Sets the label at `index`, with the same no-op rule as [`Store::set_toggled`].
    pub fn set_label(&mut self, index: usize, value: &str) -> Result<Option<Change>> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        if entry.label == value {
            trace!("row {} label unchanged, write suppressed", index);
            return Ok(None);
        }
        entry.label = value.to_string();
        debug!("row {} label={:?}", index, value);
        Ok(Some(Change {
            index,
            field: Field::Label,
        }))
    }

    /// Sets the left label at `index`, with the same no-op rule as
    /// [`Store::set_toggled`]. `None` removes it.
    pub fn set_left_label(&mut self, index: usize, value: Option<&str>) -> Result<Option<Change>> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        if entry.left_label.as_deref() == value {
            trace!("row {} left label unchanged, write suppressed", index);
            return Ok(None);
        }
        entry.left_label = value.map(str::to_string);
        debug!("row {} left_label={:?}", index, value);
        Ok(Some(Change {
            index,
            field: Field::LeftLabel,
        }))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries.iter().enumerate()
    }

    /// Number of entries whose toggle is on.
    pub fn toggled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.toggled).count()
    }

    /// Snapshot of the store as records, each carrying its index.
    pub fn records(&self) -> Vec<EntryRecord> {
        self.iter()
            .map(|(index, entry)| EntryRecord {
                index: Some(index),
                toggled: entry.toggled,
                label: entry.label.clone(),
                left_label: entry.left_label.clone(),
            })
            .collect()
    }

    /// Serializes the store as a JSON array of records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records())?)
    }

    /// Logs the full contents of the store at debug level and returns the
    /// JSON that was logged.
    pub fn dump(&self) -> Result<String> {
        let json = self.to_json()?;
        debug!("store contents: {}", json);
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Store {
        let mut store = Store::new();
        for i in 0..2 {
            store.append(Entry::new(true, format!("Right {}", i))).unwrap();
        }
        store
    }

    #[test]
    fn test_append_assigns_position() {
        let mut store = seeded();
        let index = store.append(Entry::new(false, "Added Right 2")).unwrap();
        assert_eq!(index, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(2).unwrap().label, "Added Right 2");
    }

    #[test]
    fn test_get_out_of_range() {
        let store = seeded();
        let err = store.get(2).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_set_toggled_twice_notifies_once() {
        let mut store = seeded();
        let first = store.set_toggled(0, false).unwrap();
        let second = store.set_toggled(0, false).unwrap();
        assert_eq!(
            first,
            Some(Change {
                index: 0,
                field: Field::Toggled
            })
        );
        assert_eq!(second, None);
        assert!(!store.get(0).unwrap().toggled);
    }

    #[test]
    fn test_set_toggled_to_current_value_is_silent() {
        let mut store = seeded();
        assert_eq!(store.set_toggled(1, true).unwrap(), None);
    }

    #[test]
    fn test_set_label_notifies_once() {
        let mut store = seeded();
        let change = store.set_label(1, "Renamed").unwrap();
        assert_eq!(
            change,
            Some(Change {
                index: 1,
                field: Field::Label
            })
        );
        assert_eq!(store.set_label(1, "Renamed").unwrap(), None);
        assert_eq!(store.get(1).unwrap().label, "Renamed");
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut store = seeded();
        assert!(matches!(
            store.set_toggled(5, true),
            Err(Error::OutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            store.set_label(2, "x"),
            Err(Error::OutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_from_json_accepts_field_aliases() {
        let store = Store::from_json(
            r#"[{"index": 0, "active": true, "label": "a"},
                {"mark": false, "right_text": "b"},
                {"index": 2, "toggled": true}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap(), &Entry::new(true, "a"));
        assert_eq!(store.get(1).unwrap(), &Entry::new(false, "b"));
        assert_eq!(store.get(2).unwrap(), &Entry::new(true, ""));
    }

    #[test]
    fn test_from_records_rejects_index_drift() {
        let records = vec![
            EntryRecord::new(true, "Right 0"),
            EntryRecord {
                index: Some(3),
                ..EntryRecord::new(true, "Right 1")
            },
        ];
        let err = Store::from_records(records).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexMismatch {
                position: 1,
                index: 3
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(Store::from_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_records_carry_derived_index() {
        let store = seeded();
        let records = store.records();
        assert_eq!(records[0].index, Some(0));
        assert_eq!(records[1].index, Some(1));
        let json = store.to_json().unwrap();
        let reloaded = Store::from_json(&json).unwrap();
        assert_eq!(reloaded.records(), records);
    }

    #[test]
    fn test_left_label_round_trips_through_records() {
        let store = Store::from_json(
            r#"[{"left_text": "Left 0", "right_text": "Right 0"},
                {"right_text": "Right 1"}]"#,
        )
        .unwrap();
        assert_eq!(
            store.get(0).unwrap(),
            &Entry::new(false, "Right 0").with_left_label("Left 0")
        );
        assert_eq!(store.get(1).unwrap().left_label, None);

        let json = store.to_json().unwrap();
        assert!(json.contains(r#""left_label":"Left 0""#));
        assert_eq!(json.matches("left_label").count(), 1);
    }

    #[test]
    fn test_set_left_label_notifies_once() {
        let mut store = seeded();
        let change = store.set_left_label(0, Some("Left 0")).unwrap();
        assert_eq!(
            change,
            Some(Change {
                index: 0,
                field: Field::LeftLabel
            })
        );
        assert_eq!(store.set_left_label(0, Some("Left 0")).unwrap(), None);
        assert!(store.set_left_label(0, None).unwrap().is_some());
        assert_eq!(store.get(0).unwrap().left_label, None);
    }

    #[test]
    fn test_dump_returns_logged_json() {
        let store = seeded();
        let dumped = store.dump().unwrap();
        assert_eq!(dumped, store.to_json().unwrap());
        assert!(dumped.contains(r#""label":"Right 1""#));
    }

    #[test]
    fn test_toggled_count() {
        let mut store = seeded();
        store.append(Entry::new(false, "x")).unwrap();
        assert_eq!(store.toggled_count(), 2);
        let _ = store.set_toggled(2, true).unwrap();
        assert_eq!(store.toggled_count(), 3);
    }
}
