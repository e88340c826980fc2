//! The resource store: records, container tag, and lock discipline.
//!
//! ## Locking
//!
//! One `parking_lot::RwLock` guards the whole [`RecordSet`]. Many readers may
//! hold [`ReadGuard`]s at once; a [`WriteGuard`] excludes everyone else.
//! Dropping a guard releases the lock, so success, error and `NotModified`
//! paths all release exactly once.
//!
//! ## Atomicity
//!
//! Membership changes and container tag regeneration happen under the same
//! write guard. A reader that acquires after a writer released sees both or
//! neither:
//!
//! ```text
//! write() ─ add/remove ─ commit() ─ regenerate_container_tag() ─ drop
//!                                                               │
//!                         read() ───────────────────────────────┘ sees new keys + new tag
//! ```
//!
//! If a write guard is dropped with a membership change that was not
//! committed or whose tag was not regenerated, `Drop` finishes the job.

pub mod records;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::ops::Deref;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{KernelError, Result};
use crate::types::{Graph, Record, RecordKey, Triple, VersionTag};

pub use records::RecordSet;

/// Process-wide store of records. Share it as `Arc<ResourceStore>`.
#[derive(Debug)]
pub struct ResourceStore {
    records: RwLock<RecordSet>,
    /// Bound on lock waits for `acquire_*`. `None` waits indefinitely.
    lock_timeout: Option<Duration>,
}

impl ResourceStore {
    /// Empty store with a fresh random container tag.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(RecordSet::new()),
            lock_timeout: None,
        }
    }

    /// Bound every `acquire_read`/`acquire_write` wait by `timeout`.
    pub fn with_lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Acquire the shared lock, honoring the configured timeout.
    pub fn acquire_read(&self) -> Result<ReadGuard<'_>> {
        match self.lock_timeout {
            Some(timeout) => self.try_read_for(timeout),
            None => Ok(self.read()),
        }
    }

    /// Acquire the exclusive lock, honoring the configured timeout.
    pub fn acquire_write(&self) -> Result<WriteGuard<'_>> {
        match self.lock_timeout {
            Some(timeout) => self.try_write_for(timeout),
            None => Ok(self.write()),
        }
    }

    /// Acquire the shared lock, blocking until available.
    pub fn read(&self) -> ReadGuard<'_> {
        ReadGuard {
            inner: self.records.read(),
        }
    }

    /// Acquire the exclusive lock, blocking until available.
    pub fn write(&self) -> WriteGuard<'_> {
        WriteGuard::new(self.records.write())
    }

    /// Acquire the shared lock, giving up after `timeout`.
    pub fn try_read_for(&self, timeout: Duration) -> Result<ReadGuard<'_>> {
        self.records
            .try_read_for(timeout)
            .map(|inner| ReadGuard { inner })
            .ok_or(KernelError::LockTimeout)
    }

    /// Acquire the exclusive lock, giving up after `timeout`.
    pub fn try_write_for(&self, timeout: Duration) -> Result<WriteGuard<'_>> {
        self.records
            .try_write_for(timeout)
            .map(WriteGuard::new)
            .ok_or(KernelError::LockTimeout)
    }

    /// Create a record from a document posted to `container_uri`.
    ///
    /// Mints a fresh key, resolves relative IRIs in `triples` against it, then
    /// adds, commits and regenerates the container tag under one write guard.
    /// A body that fails to resolve is rejected before the lock is taken.
    pub fn create_record(
        &self,
        container_uri: &str,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<RecordKey> {
        let key = RecordKey::mint(container_uri);
        let body = Graph::resolve(key.as_str(), triples)?;
        let triple_count = body.len();

        let mut guard = self.acquire_write()?;
        guard.add(Record::new(key.clone(), body))?;
        guard.commit();
        guard.regenerate_container_tag();
        drop(guard);

        info!(key = %key, triples = triple_count, "record created");
        Ok(key)
    }

    /// Delete the record at `key`.
    ///
    /// Fails with `NotFound`, leaving the container tag untouched, if absent.
    pub fn delete_record(&self, key: &RecordKey) -> Result<()> {
        let mut guard = self.acquire_write()?;
        if !guard.exists(key) {
            return Err(KernelError::NotFound(key.clone()));
        }
        guard.remove(key)?;
        guard.commit();
        guard.regenerate_container_tag();
        drop(guard);

        info!(key = %key, "record deleted");
        Ok(())
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared access to the records. Released on drop.
pub struct ReadGuard<'a> {
    inner: RwLockReadGuard<'a, RecordSet>,
}

impl Deref for ReadGuard<'_> {
    type Target = RecordSet;

    fn deref(&self) -> &RecordSet {
        &self.inner
    }
}

/// Exclusive access to the records. Released on drop.
///
/// Read operations are available through `Deref<Target = RecordSet>`.
pub struct WriteGuard<'a> {
    inner: RwLockWriteGuard<'a, RecordSet>,
    /// Mutations since the last commit.
    uncommitted: usize,
    /// Membership changed since the last tag regeneration.
    tag_stale: bool,
}

impl<'a> WriteGuard<'a> {
    fn new(inner: RwLockWriteGuard<'a, RecordSet>) -> Self {
        Self {
            inner,
            uncommitted: 0,
            tag_stale: false,
        }
    }

    /// Insert a new record. An existing key is rejected, never overwritten.
    pub fn add(&mut self, record: Record) -> Result<()> {
        let key = record.key.clone();
        self.inner.insert(record)?;
        self.uncommitted += 1;
        self.tag_stale = true;
        debug!(key = %key, "record added");
        Ok(())
    }

    /// Remove and return the record at `key`.
    pub fn remove(&mut self, key: &RecordKey) -> Result<Record> {
        let record = self.inner.remove(key)?;
        self.uncommitted += 1;
        self.tag_stale = true;
        debug!(key = %key, "record removed");
        Ok(record)
    }

    /// Syncpoint for every mutation made so far under this guard.
    pub fn commit(&mut self) {
        let generation = self.inner.advance_generation();
        debug!(generation, mutations = self.uncommitted, "store committed");
        self.uncommitted = 0;
    }

    /// Replace the container tag with a fresh random one.
    pub fn regenerate_container_tag(&mut self) -> &VersionTag {
        self.inner.set_container_tag(VersionTag::generate_random());
        self.tag_stale = false;
        self.inner.container_tag()
    }

    /// Mutations made since the last commit.
    pub fn uncommitted(&self) -> usize {
        self.uncommitted
    }
}

impl Deref for WriteGuard<'_> {
    type Target = RecordSet;

    fn deref(&self) -> &RecordSet {
        &self.inner
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        if self.uncommitted > 0 {
            warn!(mutations = self.uncommitted, "write guard dropped with uncommitted mutations");
            self.commit();
        }
        if self.tag_stale {
            warn!("write guard dropped without container tag regeneration");
            self.regenerate_container_tag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;
    use crate::vocab::dcterms;

    const CONTAINER: &str = "http://localhost/bugs";

    fn titled(key: &RecordKey, title: &str) -> Record {
        let mut body = Graph::new();
        body.add(key.to_term(), dcterms::TITLE, Term::literal(title));
        Record::new(key.clone(), body)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ResourceStore::new();
        let guard = store.read();
        assert!(guard.is_empty());
        assert_eq!(guard.generation(), 0);
        assert_eq!(guard.containment_view().count(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let store = ResourceStore::new();
        let key = RecordKey::member(CONTAINER, "1");
        {
            let mut w = store.write();
            w.add(titled(&key, "Crash on save")).unwrap();
            w.commit();
            w.regenerate_container_tag();
        }

        let r = store.read();
        assert!(r.exists(&key));
        assert_eq!(
            r.get(&key).unwrap().literal_property(dcterms::TITLE),
            Some("Crash on save")
        );
        assert_eq!(r.record_tag(&key).unwrap(), &VersionTag::from_content(r.get(&key).unwrap()));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = ResourceStore::new();
        let key = RecordKey::member(CONTAINER, "missing");
        let r = store.read();
        assert_eq!(r.get(&key).unwrap_err(), KernelError::NotFound(key.clone()));
        assert!(r.record_tag(&key).is_err());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let store = ResourceStore::new();
        let key = RecordKey::member(CONTAINER, "1");
        let mut w = store.write();
        w.add(titled(&key, "first")).unwrap();
        let err = w.add(titled(&key, "second")).unwrap_err();
        assert_eq!(err, KernelError::AlreadyExists(key.clone()));
        assert_eq!(w.get(&key).unwrap().literal_property(dcterms::TITLE), Some("first"));
        assert_eq!(w.uncommitted(), 1);
    }

    #[test]
    fn test_containment_view_is_sorted() {
        let store = ResourceStore::new();
        {
            let mut w = store.write();
            for id in ["c", "a", "b"] {
                let key = RecordKey::member(CONTAINER, id);
                w.add(titled(&key, id)).unwrap();
            }
            w.commit();
            w.regenerate_container_tag();
        }
        let r = store.read();
        let keys: Vec<_> = r.containment_view().map(RecordKey::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "http://localhost/bugs/a",
                "http://localhost/bugs/b",
                "http://localhost/bugs/c"
            ]
        );
    }

    #[test]
    fn test_tag_changes_only_on_membership_change() {
        let store = ResourceStore::new();
        let before = store.read().container_tag().clone();

        // Read-only write scope leaves the tag alone.
        drop(store.write());
        assert_eq!(store.read().container_tag(), &before);

        let key = store
            .create_record(CONTAINER, vec![Triple::new(Term::iri(""), dcterms::TITLE, Term::literal("x"))])
            .unwrap();
        let after_add = store.read().container_tag().clone();
        assert_ne!(after_add, before);

        store.delete_record(&key).unwrap();
        assert_ne!(store.read().container_tag(), &after_add);
    }

    #[test]
    fn test_drop_finishes_commit_and_tag() {
        let store = ResourceStore::new();
        let before = store.read().container_tag().clone();
        {
            let mut w = store.write();
            w.add(titled(&RecordKey::member(CONTAINER, "1"), "x")).unwrap();
            // Neither commit nor regenerate.
        }
        let r = store.read();
        assert_eq!(r.len(), 1);
        assert_eq!(r.generation(), 1);
        assert_ne!(r.container_tag(), &before);
    }

    #[test]
    fn test_delete_missing_keeps_tag() {
        let store = ResourceStore::new();
        let before = store.read().container_tag().clone();
        let key = RecordKey::member(CONTAINER, "nope");

        assert_eq!(store.delete_record(&key), Err(KernelError::NotFound(key)));
        assert_eq!(store.read().container_tag(), &before);
        assert_eq!(store.read().generation(), 0);
    }

    #[test]
    fn test_create_bad_input_creates_nothing() {
        let store = ResourceStore::new();
        let before = store.read().container_tag().clone();
        let err = store
            .create_record(CONTAINER, vec![Triple::new(Term::iri(""), "title", Term::literal("x"))])
            .unwrap_err();
        assert!(matches!(err, KernelError::BadInput(_)));
        assert!(store.read().is_empty());
        assert_eq!(store.read().container_tag(), &before);
    }

    #[test]
    fn test_try_write_times_out_while_read_held() {
        let store = ResourceStore::new();
        let _r = store.read();
        let err = store.try_write_for(Duration::from_millis(10)).err();
        assert_eq!(err, Some(KernelError::LockTimeout));
    }

    #[test]
    fn test_configured_timeout_applies_to_mutations() {
        let store = ResourceStore::new().with_lock_timeout(Some(Duration::from_millis(10)));
        let _r = store.acquire_read().unwrap();
        let result = store.create_record(
            CONTAINER,
            vec![Triple::new(Term::iri(""), dcterms::TITLE, Term::literal("x"))],
        );
        assert_eq!(result, Err(KernelError::LockTimeout));
    }

    #[test]
    fn test_try_read_succeeds_when_free() {
        let store = ResourceStore::new();
        assert!(store.try_read_for(Duration::from_millis(10)).is_ok());
    }
}
