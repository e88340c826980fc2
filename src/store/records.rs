//! The locked record set and its read operations.

use std::collections::BTreeMap;

use crate::error::{KernelError, Result};
use crate::query::{self, QueryResults};
use crate::types::{Record, RecordKey, VersionTag};

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    /// Content tag, computed once on insertion. Records are immutable.
    tag: VersionTag,
}

/// All records plus the container-wide version tag.
///
/// Only reachable through a store guard, so every method here runs with the
/// store lock held. Uses BTreeMap for deterministic key order.
#[derive(Debug, Clone)]
pub struct RecordSet {
    entries: BTreeMap<RecordKey, Entry>,
    container_tag: VersionTag,
    generation: u64,
}

impl RecordSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            container_tag: VersionTag::generate_random(),
            generation: 0,
        }
    }

    /// The current record for `key`.
    pub fn get(&self, key: &RecordKey) -> Result<&Record> {
        self.entries
            .get(key)
            .map(|entry| &entry.record)
            .ok_or_else(|| KernelError::NotFound(key.clone()))
    }

    /// Whether a record with `key` exists.
    pub fn exists(&self, key: &RecordKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Content-derived version tag of the record at `key`.
    pub fn record_tag(&self, key: &RecordKey) -> Result<&VersionTag> {
        self.entries
            .get(key)
            .map(|entry| &entry.tag)
            .ok_or_else(|| KernelError::NotFound(key.clone()))
    }

    /// Keys of all current records, in key order.
    ///
    /// Lazy and one-shot; call again for a fresh pass.
    pub fn containment_view(&self) -> impl Iterator<Item = &RecordKey> + '_ {
        self.entries.keys()
    }

    /// All current records, in key order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.entries.values().map(|entry| &entry.record)
    }

    /// Version tag of the container membership.
    pub fn container_tag(&self) -> &VersionTag {
        &self.container_tag
    }

    /// Number of commits since the store was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse and run a query over every record body.
    ///
    /// The full result set is materialized so the caller can release the
    /// lock before streaming it out.
    pub fn evaluate(&self, query_text: &str) -> Result<QueryResults> {
        let query = query::parse(query_text)?;
        Ok(query.evaluate(self.records().map(|record| &record.body)))
    }

    pub(crate) fn insert(&mut self, record: Record) -> Result<()> {
        if self.entries.contains_key(&record.key) {
            return Err(KernelError::AlreadyExists(record.key));
        }
        let tag = VersionTag::from_content(&record);
        self.entries.insert(record.key.clone(), Entry { record, tag });
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &RecordKey) -> Result<Record> {
        self.entries
            .remove(key)
            .map(|entry| entry.record)
            .ok_or_else(|| KernelError::NotFound(key.clone()))
    }

    pub(crate) fn set_container_tag(&mut self, tag: VersionTag) {
        self.container_tag = tag;
    }

    pub(crate) fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
