//! Column formatting for report blocks.
//!
//! Each non-empty collection is printed as a titled block of left-justified,
//! fixed-width fields packed left to right and wrapped at a maximum line
//! width. All output goes to a caller-provided `Write` sink.

use crate::registry::{ClassCollection, ClassRegistry};
use colored::*;
use std::io::{self, Write};

/// Line width used when nothing else is configured.
pub const DEFAULT_MAX_LINE_WIDTH: usize = 118;

/// Renders collections as wrapped, column-aligned blocks.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFormatter {
    max_line_width: usize,
    styled: bool,
}

impl ColumnFormatter {
    /// Creates a plain-text formatter wrapping at `max_line_width` columns.
    pub fn new(max_line_width: usize) -> Self {
        Self {
            max_line_width,
            styled: false,
        }
    }

    /// Enables or disables bold block titles.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Writes one collection as a block.
    ///
    /// An empty collection writes nothing at all, not even its title.
    /// Otherwise the block is a blank line, `"<title> [<count>]"`, then the
    /// names in fields of `field_width()` columns. A field that would push
    /// the current line past the maximum width starts a new line; a single
    /// field wider than the maximum is still written whole on its own line.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use lc::entry_class::EntryClass;
    /// use lc::output::ColumnFormatter;
    /// use lc::registry::{ClassCollection, Entry};
    ///
    /// let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    /// let mut files = ClassCollection::new(EntryClass::RegularFile);
    /// files.insert(Entry::new("A.txt", 0, t, 0o100644), None).unwrap();
    /// files.insert(Entry::new("b.txt", 0, t, 0o100644), None).unwrap();
    ///
    /// let mut out = Vec::new();
    /// ColumnFormatter::new(118).write_block(&mut out, &files, "Files").unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "\nFiles [2]\nA.txt b.txt \n");
    /// ```
    pub fn write_block<W: Write>(
        &self,
        out: &mut W,
        collection: &ClassCollection,
        title: &str,
    ) -> io::Result<()> {
        tracing::debug!(title, count = collection.count(), "dumping collection");
        if collection.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        let heading = format!("{} [{}]", title, collection.count());
        if self.styled {
            writeln!(out, "{}", heading.bold())?;
        } else {
            writeln!(out, "{}", heading)?;
        }

        let width = collection.field_width();
        let mut line_width = 0;
        for entry in collection.entries() {
            if line_width > 0 && line_width + width > self.max_line_width {
                writeln!(out)?;
                line_width = 0;
            }
            let padding = width.saturating_sub(entry.name_width());
            write!(out, "{}{:padding$}", entry.name, "")?;
            line_width += width;
        }
        writeln!(out)?;

        Ok(())
    }

    /// Writes every collection of the registry in report order.
    pub fn write_report<W: Write>(&self, out: &mut W, registry: &ClassRegistry) -> io::Result<()> {
        for collection in registry.in_report_order() {
            self.write_block(out, collection, collection.class().title())?;
        }
        out.flush()
    }
}

impl Default for ColumnFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_class::{EntryClass, S_IFDIR, S_IFREG};
    use crate::registry::Entry;
    use chrono::{DateTime, Utc};

    fn collection_of(names: &[&str]) -> ClassCollection {
        let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let mut collection = ClassCollection::new(EntryClass::RegularFile);
        for name in names {
            collection
                .insert(Entry::new(*name, 0, t, S_IFREG | 0o644), None)
                .expect("insert");
        }
        collection
    }

    fn render(formatter: ColumnFormatter, collection: &ClassCollection) -> String {
        let mut out = Vec::new();
        formatter
            .write_block(&mut out, collection, "Files")
            .expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_empty_collection_writes_nothing() {
        let collection = ClassCollection::new(EntryClass::Fifo);
        assert_eq!(render(ColumnFormatter::default(), &collection), "");
    }

    #[test]
    fn test_block_layout() {
        let collection = collection_of(&["A.txt", "b.txt"]);
        assert_eq!(
            render(ColumnFormatter::default(), &collection),
            "\nFiles [2]\nA.txt b.txt \n"
        );
    }

    #[test]
    fn test_fields_padded_to_widest_name() {
        let collection = collection_of(&["a", "abcd"]);
        assert_eq!(
            render(ColumnFormatter::default(), &collection),
            "\nFiles [2]\na    abcd \n"
        );
    }

    #[test]
    fn test_wraps_at_max_line_width() {
        // field width 4, so two fields fit in 8 columns and three do not
        let collection = collection_of(&["aaa", "bbb", "ccc", "ddd", "eee"]);
        assert_eq!(
            render(ColumnFormatter::new(9), &collection),
            "\nFiles [5]\naaa bbb \nccc ddd \neee \n"
        );
    }

    #[test]
    fn test_exact_fit_does_not_wrap() {
        let collection = collection_of(&["aaa", "bbb"]);
        assert_eq!(
            render(ColumnFormatter::new(8), &collection),
            "\nFiles [2]\naaa bbb \n"
        );
    }

    #[test]
    fn test_oversized_fields_each_get_their_own_line() {
        let collection = collection_of(&["twelve_chars", "twelve_char2"]);
        let output = render(ColumnFormatter::new(10), &collection);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, vec!["", "Files [2]", "twelve_chars ", "twelve_char2 "]);
    }

    #[test]
    fn test_lines_never_exceed_width_unless_single_field() {
        let names: Vec<String> = (0..50).map(|i| format!("name{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let collection = collection_of(&refs);
        let width = collection.field_width();

        for max in [1, 5, 7, 20, 33, 118] {
            let output = render(ColumnFormatter::new(max), &collection);
            for line in output.lines().skip(2) {
                assert!(line.len() <= max || line.len() == width, "line {line:?} at {max}");
            }
            let printed: usize = output
                .lines()
                .skip(2)
                .map(|l| l.split_whitespace().count())
                .sum();
            assert_eq!(printed, 50);
        }
    }

    #[test]
    fn test_wide_characters_stay_aligned() {
        let collection = collection_of(&["日本", "ab"]);
        assert_eq!(
            render(ColumnFormatter::default(), &collection),
            "\nFiles [2]\n日本 ab   \n"
        );
    }

    #[test]
    fn test_report_order_skips_empty_classes() {
        let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let mut registry = ClassRegistry::new(None);
        registry
            .insert(Entry::new("sub", 0, t, S_IFDIR | 0o755))
            .expect("dir");
        registry
            .insert(Entry::new("f", 0, t, S_IFREG | 0o644))
            .expect("file");

        let mut out = Vec::new();
        ColumnFormatter::default()
            .write_report(&mut out, &registry)
            .expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "\nFiles [1]\nf \n\nDirectories [1]\nsub \n"
        );
    }
}
