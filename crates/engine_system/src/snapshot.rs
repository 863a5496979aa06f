//! Active-set snapshots.
//!
//! A snapshot records *which* systems were active and on what cadence, never
//! the systems' own data; component state belongs to the store. The document
//! form is a JSON array with one record per active system:
//!
//! ```json
//! [
//!   { "name": "integrate", "interval": 0,   "stagger": 0,  "next_execution": 120 },
//!   { "name": "report",    "interval": 500, "stagger": 50, "next_execution": 450 }
//! ]
//! ```
//!
//! The same records can be packed to MessagePack for compact storage.

use engine_component::ComponentStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ScheduleConfig;
use crate::error::SchedulerError;
use crate::schedule::ScheduleEntry;

/// One active system as recorded in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Registered system name.
    pub name: String,
    /// Interval in milliseconds.
    pub interval: u64,
    /// Stagger in milliseconds.
    pub stagger: u64,
    /// Due time of the entry when the snapshot was taken.
    pub next_execution: u64,
}

impl ScheduleRecord {
    #[must_use]
    pub fn config(&self) -> ScheduleConfig {
        ScheduleConfig::every(self.interval).with_stagger(self.stagger)
    }
}

/// Ordered list of [`ScheduleRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<ScheduleRecord>,
}

impl Snapshot {
    /// Record the given entries in order.
    #[must_use]
    pub fn from_entries<S: ComponentStore>(entries: &[ScheduleEntry<S>]) -> Self {
        let records = entries
            .iter()
            .map(|entry| {
                let config = entry.config();
                ScheduleRecord {
                    name: entry.name().to_string(),
                    interval: config.interval_ms,
                    stagger: config.stagger_ms,
                    next_execution: entry.next_execution_time(),
                }
            })
            .collect();
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert to a self-describing document.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] if conversion fails.
    pub fn to_document(&self) -> Result<Value, SchedulerError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read a snapshot back from a document produced by
    /// [`Snapshot::to_document`].
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] if the document is not an array
    /// of well-formed records.
    pub fn from_document(document: &Value) -> Result<Self, SchedulerError> {
        Ok(Self::deserialize(document)?)
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] if serialisation fails.
    pub fn to_json_string(&self) -> Result<String, SchedulerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::Document`] if `json` is not a valid snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, SchedulerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pack to MessagePack, keeping field names so the bytes stay
    /// self-describing.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Encode`] if serialisation fails.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, SchedulerError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::Decode`] if `bytes` is not a valid snapshot.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SchedulerError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

impl FromIterator<ScheduleRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ScheduleRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
