//! Captured directory entries and the per-class collections that hold them.
//!
//! A [`ClassRegistry`] owns one [`ClassCollection`] per [`EntryClass`].
//! Collections are append-only until sorted and track the widest name they
//! have seen so the formatter can size its columns. An optional per-class
//! limit turns a pathologically large directory into a fatal error instead
//! of unbounded growth.

use crate::entry_class::{EntryClass, classify, file_mode};
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use unicode_width::UnicodeWidthStr;

/// Per-class entry limit used when nothing else is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 2048;

/// One member of the listed directory with its captured metadata.
///
/// Entries are immutable once captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The bare file name, without any path prefix.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Number of hard links.
    pub link_count: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Platform file-type and permission bits.
    pub mode: u32,
}

impl Entry {
    /// Creates an entry from already-known values.
    pub fn new(name: impl Into<String>, size: u64, modified: DateTime<Utc>, mode: u32) -> Self {
        Self {
            name: name.into(),
            size,
            link_count: 1,
            modified,
            mode,
        }
    }

    /// Captures an entry from the result of a `stat` call.
    ///
    /// Fails only when the platform cannot report a modification time.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> std::io::Result<Self> {
        let modified = DateTime::<Utc>::from(metadata.modified()?);
        Ok(Self {
            name: name.into(),
            size: metadata.len(),
            link_count: link_count(metadata),
            modified,
            mode: file_mode(metadata),
        })
    }

    /// The class this entry belongs to.
    pub fn class(&self) -> EntryClass {
        classify(self.mode)
    }

    /// Width of the name in terminal columns.
    pub fn name_width(&self) -> usize {
        self.name.width()
    }
}

#[cfg(unix)]
fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &Metadata) -> u64 {
    1
}

/// Errors raised while filling the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A class received more entries than the configured limit.
    CapacityExceeded { class: EntryClass, limit: usize },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded { class, limit } => write!(
                f,
                "{} maximum of {} has been exceeded",
                class.title(),
                limit
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// The ordered store of entries for one class.
#[derive(Debug, Clone)]
pub struct ClassCollection {
    class: EntryClass,
    entries: Vec<Entry>,
    max_name_width: usize,
}

impl ClassCollection {
    /// Creates an empty collection for `class`.
    pub fn new(class: EntryClass) -> Self {
        Self {
            class,
            entries: Vec::new(),
            max_name_width: 0,
        }
    }

    /// Appends `entry`, updating the widest-name bookkeeping.
    ///
    /// With `limit` set, the insert that would push the count past it fails
    /// and leaves the collection untouched.
    pub fn insert(&mut self, entry: Entry, limit: Option<usize>) -> RegistryResult<()> {
        if let Some(limit) = limit
            && self.entries.len() >= limit
        {
            return Err(RegistryError::CapacityExceeded {
                class: self.class,
                limit,
            });
        }

        self.max_name_width = self.max_name_width.max(entry.name_width());
        self.entries.push(entry);
        Ok(())
    }

    pub fn class(&self) -> EntryClass {
        self.class
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Widest name seen so far, in terminal columns. Never decreases.
    pub fn max_name_width(&self) -> usize {
        self.max_name_width
    }

    /// Column width for this collection: the widest name plus one space.
    pub fn field_width(&self) -> usize {
        self.max_name_width + 1
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

/// One collection per class plus the per-class entry limit.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    collections: [ClassCollection; 5],
    limit: Option<usize>,
}

impl ClassRegistry {
    /// Creates an empty registry. `None` disables the per-class limit.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            collections: [
                ClassCollection::new(EntryClass::RegularFile),
                ClassCollection::new(EntryClass::Directory),
                ClassCollection::new(EntryClass::CharacterDevice),
                ClassCollection::new(EntryClass::Other),
                ClassCollection::new(EntryClass::Fifo),
            ],
            limit,
        }
    }

    /// Classifies `entry` and appends it to the matching collection.
    pub fn insert(&mut self, entry: Entry) -> RegistryResult<()> {
        let class = entry.class();
        tracing::debug!(name = %entry.name, ?class, "adding entry");
        let limit = self.limit;
        self.collection_mut(class).insert(entry, limit)
    }

    pub fn collection(&self, class: EntryClass) -> &ClassCollection {
        &self.collections[class.index()]
    }

    pub(crate) fn collection_mut(&mut self, class: EntryClass) -> &mut ClassCollection {
        &mut self.collections[class.index()]
    }

    /// All collections in report order.
    pub fn in_report_order(&self) -> impl Iterator<Item = &ClassCollection> {
        EntryClass::REPORT_ORDER
            .into_iter()
            .map(|class| self.collection(class))
    }

    /// Total number of entries across every class.
    pub fn total(&self) -> usize {
        self.collections.iter().map(ClassCollection::count).sum()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_ENTRIES))
    }
}
