//! lc - list a directory grouped by file type
//!
//! This library enumerates a single directory, classifies every entry
//! (regular file, directory, character device, FIFO, other), sorts each
//! class by name or modification time, and prints the classes as
//! word-wrapped, column-aligned blocks.

pub mod cli;
pub mod config;
pub mod entry_class;
pub mod output;
pub mod registry;
pub mod signals;
pub mod sort;

pub use config::{ConfigError, ListConfig};
pub use entry_class::{EntryClass, classify};
pub use output::ColumnFormatter;
pub use registry::{ClassCollection, ClassRegistry, Entry, RegistryError};
pub use sort::SortOrder;

pub use cli::{Cli, ListError, ListOptions, run_cli, run_with_writer};
