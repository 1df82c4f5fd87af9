//! Ordering strategies applied to every collection before it is printed.

use crate::registry::{ClassCollection, ClassRegistry, Entry};
use serde::Deserialize;
use std::cmp::Ordering;

/// How entries inside each class are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Case-insensitive name order (ASCII folding, no locale rules).
    #[default]
    Name,
    /// Modification time, oldest first.
    Time,
}

impl SortOrder {
    /// Compares two entries under this ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use lc::registry::Entry;
    /// use lc::sort::SortOrder;
    /// use std::cmp::Ordering;
    ///
    /// let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    /// let a = Entry::new("A.txt", 0, t, 0o100644);
    /// let b = Entry::new("b.txt", 0, t, 0o100644);
    /// assert_eq!(SortOrder::Name.compare(&a, &b), Ordering::Less);
    /// ```
    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            SortOrder::Name => compare_names(&a.name, &b.name),
            SortOrder::Time => a.modified.cmp(&b.modified),
        }
    }

    /// Sorts one collection in place. Other collections are unaffected.
    pub fn sort_collection(&self, collection: &mut ClassCollection) {
        collection
            .entries_mut()
            .sort_by(|a, b| self.compare(a, b));
    }

    /// Sorts every collection of the registry independently.
    pub fn sort_registry(&self, registry: &mut ClassRegistry) {
        tracing::debug!(order = ?self, "sorting collections");
        for class in crate::entry_class::EntryClass::REPORT_ORDER {
            self.sort_collection(registry.collection_mut(class));
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_class::{EntryClass, S_IFDIR, S_IFREG};
    use chrono::{DateTime, Utc};

    fn at(name: &str, secs: i64) -> Entry {
        let modified = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
        Entry::new(name, 0, modified, S_IFREG | 0o644)
    }

    fn collection_of(entries: Vec<Entry>) -> ClassCollection {
        let mut collection = ClassCollection::new(EntryClass::RegularFile);
        for entry in entries {
            collection.insert(entry, None).expect("insert");
        }
        collection
    }

    fn names(collection: &ClassCollection) -> Vec<&str> {
        collection.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let mut collection = collection_of(vec![at("b.txt", 0), at("A.txt", 0), at("c", 0)]);
        SortOrder::Name.sort_collection(&mut collection);
        assert_eq!(names(&collection), vec!["A.txt", "b.txt", "c"]);
    }

    #[test]
    fn test_name_sort_is_idempotent() {
        let mut collection = collection_of(vec![
            at("Zeta", 0),
            at("alpha", 0),
            at("ALPHA", 0),
            at("beta", 0),
        ]);
        SortOrder::Name.sort_collection(&mut collection);
        let first: Vec<String> = names(&collection).iter().map(|n| n.to_string()).collect();
        SortOrder::Name.sort_collection(&mut collection);
        assert_eq!(names(&collection), first);
    }

    #[test]
    fn test_time_sort_oldest_first() {
        let mut collection = collection_of(vec![at("new", 300), at("old", 100), at("mid", 200)]);
        SortOrder::Time.sort_collection(&mut collection);
        assert_eq!(names(&collection), vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_time_sort_is_idempotent() {
        let mut collection = collection_of(vec![at("b", 5), at("a", 1), at("c", 3)]);
        SortOrder::Time.sort_collection(&mut collection);
        let first: Vec<String> = names(&collection).iter().map(|n| n.to_string()).collect();
        SortOrder::Time.sort_collection(&mut collection);
        assert_eq!(names(&collection), first);
    }

    #[test]
    fn test_time_sort_ties_keep_every_entry() {
        let mut collection = collection_of(vec![at("x", 7), at("y", 7), at("w", 1)]);
        SortOrder::Time.sort_collection(&mut collection);

        let sorted = names(&collection);
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0], "w");
        let mut tied = sorted[1..].to_vec();
        tied.sort();
        assert_eq!(tied, vec!["x", "y"]);
    }

    #[test]
    fn test_empty_collection_sorts_trivially() {
        let mut collection = ClassCollection::new(EntryClass::Fifo);
        SortOrder::Name.sort_collection(&mut collection);
        SortOrder::Time.sort_collection(&mut collection);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_registry_sort_keeps_classes_apart() {
        let mut registry = ClassRegistry::new(None);
        registry.insert(at("b", 0)).expect("file");
        registry.insert(at("a", 0)).expect("file");
        let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        registry
            .insert(Entry::new("Z", 0, t, S_IFDIR | 0o755))
            .expect("dir");

        SortOrder::Name.sort_registry(&mut registry);

        assert_eq!(names(registry.collection(EntryClass::RegularFile)), vec!["a", "b"]);
        assert_eq!(names(registry.collection(EntryClass::Directory)), vec!["Z"]);
    }

    #[test]
    fn test_deserialize_sort_order() {
        #[derive(Deserialize)]
        struct Wrapper {
            sort: SortOrder,
        }
        let parsed: Wrapper = toml::from_str("sort = \"time\"").expect("parse");
        assert_eq!(parsed.sort, SortOrder::Time);
        assert!(toml::from_str::<Wrapper>("sort = \"size\"").is_err());
    }
}
