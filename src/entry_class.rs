//! Classification of directory entries by filesystem object type.
//!
//! Every entry lands in exactly one class. Type bits that are not
//! recognised fall into [`EntryClass::Other`], so nothing is ever dropped.
//!
//! # Examples
//!
//! ```
//! use lc::entry_class::{EntryClass, classify};
//!
//! assert_eq!(classify(0o040755), EntryClass::Directory);
//! assert_eq!(classify(0o100644), EntryClass::RegularFile);
//! assert_eq!(classify(0o010644), EntryClass::Fifo);
//! ```

use std::fs::Metadata;

/// Mask selecting the file-type bits of a mode.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFIFO: u32 = 0o010000;
pub const S_IFREG: u32 = 0o100000;

/// The filesystem object categories an entry can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryClass {
    /// Regular files
    RegularFile,
    /// Directories
    Directory,
    /// Character devices
    CharacterDevice,
    /// Named pipes
    Fifo,
    /// Anything else (sockets, block devices, unknown types)
    Other,
}

impl EntryClass {
    /// Order in which classes appear in a report.
    ///
    /// Independent of sort mode and discovery order.
    pub const REPORT_ORDER: [EntryClass; 5] = [
        EntryClass::RegularFile,
        EntryClass::Directory,
        EntryClass::CharacterDevice,
        EntryClass::Other,
        EntryClass::Fifo,
    ];

    /// Returns the block title used for this class in a report.
    ///
    /// # Examples
    ///
    /// ```
    /// use lc::entry_class::EntryClass;
    ///
    /// assert_eq!(EntryClass::RegularFile.title(), "Files");
    /// assert_eq!(EntryClass::Other.title(), "Misc");
    /// ```
    pub fn title(&self) -> &'static str {
        match self {
            EntryClass::RegularFile => "Files",
            EntryClass::Directory => "Directories",
            EntryClass::CharacterDevice => "Character Devices",
            EntryClass::Fifo => "FIFO",
            EntryClass::Other => "Misc",
        }
    }

    /// Stable slot index used by the registry.
    pub(crate) fn index(&self) -> usize {
        match self {
            EntryClass::RegularFile => 0,
            EntryClass::Directory => 1,
            EntryClass::CharacterDevice => 2,
            EntryClass::Other => 3,
            EntryClass::Fifo => 4,
        }
    }
}

/// Maps the file-type bits of `mode` to a class.
///
/// Pure function of `mode`; permission bits are ignored.
pub fn classify(mode: u32) -> EntryClass {
    match mode & S_IFMT {
        S_IFDIR => EntryClass::Directory,
        S_IFCHR => EntryClass::CharacterDevice,
        S_IFIFO => EntryClass::Fifo,
        S_IFREG => EntryClass::RegularFile,
        _ => EntryClass::Other,
    }
}

/// Returns the platform mode bits for `metadata`.
#[cfg(unix)]
pub fn file_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

/// Returns mode bits synthesised from the file type.
///
/// Platforms without `st_mode` only distinguish files and directories.
#[cfg(not(unix))]
pub fn file_mode(metadata: &Metadata) -> u32 {
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        S_IFDIR
    } else if file_type.is_file() {
        S_IFREG
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_types() {
        assert_eq!(classify(S_IFDIR | 0o755), EntryClass::Directory);
        assert_eq!(classify(S_IFCHR | 0o620), EntryClass::CharacterDevice);
        assert_eq!(classify(S_IFIFO | 0o600), EntryClass::Fifo);
        assert_eq!(classify(S_IFREG | 0o644), EntryClass::RegularFile);
    }

    #[test]
    fn test_classify_unknown_types_fall_into_other() {
        // socket, block device, symlink, garbage
        assert_eq!(classify(0o140755), EntryClass::Other);
        assert_eq!(classify(0o060660), EntryClass::Other);
        assert_eq!(classify(0o120777), EntryClass::Other);
        assert_eq!(classify(0), EntryClass::Other);
    }

    #[test]
    fn test_classify_ignores_permission_bits() {
        assert_eq!(classify(S_IFREG), classify(S_IFREG | 0o7777));
    }

    #[test]
    fn test_report_order_and_titles() {
        let titles: Vec<_> = EntryClass::REPORT_ORDER.iter().map(|c| c.title()).collect();
        assert_eq!(
            titles,
            vec!["Files", "Directories", "Character Devices", "Misc", "FIFO"]
        );
    }

    #[test]
    fn test_indices_are_distinct() {
        let mut seen = [false; 5];
        for class in EntryClass::REPORT_ORDER {
            assert!(!seen[class.index()]);
            seen[class.index()] = true;
        }
    }

    #[test]
    fn test_file_mode_of_real_entries() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a.txt");
        std::fs::write(&file_path, "x").expect("Failed to write test file");

        let dir_meta = std::fs::metadata(temp_dir.path()).expect("stat dir");
        let file_meta = std::fs::metadata(&file_path).expect("stat file");

        assert_eq!(classify(file_mode(&dir_meta)), EntryClass::Directory);
        assert_eq!(classify(file_mode(&file_meta)), EntryClass::RegularFile);
    }
}
