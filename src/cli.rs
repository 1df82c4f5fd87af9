//! Command-line interface and report driver for lc.
//!
//! This module handles:
//! - Argument parsing
//! - Merging configuration with command-line overrides
//! - Enumerating and classifying the target directory
//! - Sorting and printing the grouped report

use crate::config::{ConfigError, ListConfig};
use crate::output::ColumnFormatter;
use crate::registry::{ClassRegistry, Entry, RegistryError};
use crate::sort::SortOrder;
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Display files and directory names in groups.
#[derive(Debug, Clone, Parser)]
#[command(name = "lc")]
pub struct Cli {
    /// Invoke debugging mode
    #[arg(short = 'd')]
    pub debug: bool,

    /// Sort by modification time instead of name
    #[arg(short = 't')]
    pub time: bool,

    /// Override maximum line width
    #[arg(short = 'w', value_name = "max_line_width", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Maximum entries per class (0 removes the limit)
    #[arg(long = "max-entries", value_name = "N")]
    pub max_entries: Option<usize>,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to list
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

/// Everything one run needs, resolved from defaults, config and flags.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub directory: PathBuf,
    pub sort: SortOrder,
    pub max_line_width: usize,
    pub entry_limit: Option<usize>,
    pub styled: bool,
}

impl ListOptions {
    /// Options for `directory` with built-in defaults and plain output.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::from_config(directory, &ListConfig::default())
    }

    fn from_config(directory: impl Into<PathBuf>, config: &ListConfig) -> Self {
        Self {
            directory: directory.into(),
            sort: config.listing.sort,
            max_line_width: config.listing.max_line_width,
            entry_limit: config.entry_limit(),
            styled: false,
        }
    }

    /// Applies command-line overrides on top of `config`.
    pub fn resolve(cli: &Cli, config: &ListConfig) -> Self {
        let mut options = Self::from_config(cli.directory.clone(), config);
        if cli.time {
            options.sort = SortOrder::Time;
        }
        if let Some(width) = cli.width {
            options.max_line_width = width as usize;
        }
        if let Some(max) = cli.max_entries {
            options.entry_limit = (max > 0).then_some(max);
        }
        options.styled = config.listing.color;
        options
    }
}

/// Errors that end a run before a report is printed.
#[derive(Debug)]
pub enum ListError {
    /// The target directory could not be opened.
    DirectoryOpen { path: PathBuf, source: io::Error },
    /// A class overflowed its entry limit.
    Registry(RegistryError),
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// Writing the report failed.
    Output(io::Error),
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryOpen { path, source } => {
                write!(f, "Failed to open directory '{}': {}", path.display(), source)
            }
            Self::Registry(e) => write!(f, "{}", e),
            Self::Config(e) => write!(f, "{}", e),
            Self::Output(e) => write!(f, "Failed to write report: {}", e),
        }
    }
}

impl std::error::Error for ListError {}

impl From<RegistryError> for ListError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<ConfigError> for ListError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Installs the tracing subscriber.
///
/// With `debug` set, diagnostics down to DEBUG go to stdout alongside the
/// report; otherwise only warnings are emitted, to stderr.
pub fn init_logging(debug: bool) {
    let builder = tracing_subscriber::fmt()
        .without_time()
        .with_target(false);

    let result = if debug {
        builder
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(io::stdout().is_terminal())
            .with_writer(io::stdout)
            .try_init()
    } else {
        builder
            .with_max_level(tracing::Level::WARN)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialise logging: {}", e);
    }
}

/// Parses command-line arguments.
///
/// Unknown flags do not stop parsing: each one is recorded and dropped,
/// and parsing resumes so every bad flag is reported together. Any other
/// error ends parsing. A help request comes back as an error of kind
/// `DisplayHelp`.
pub fn parse_args<I, T>(args: I) -> Result<Cli, Vec<clap::Error>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut errors = Vec::new();

    loop {
        let e = match Cli::try_parse_from(&args) {
            Ok(cli) if errors.is_empty() => return Ok(cli),
            Ok(_) => return Err(errors),
            Err(e) => e,
        };

        let unknown_at = match (e.kind(), e.get(ContextKind::InvalidArg)) {
            (ErrorKind::UnknownArgument, Some(ContextValue::String(arg))) => args
                .iter()
                .skip(1)
                .position(|a| a == arg.as_str())
                .map(|i| i + 1),
            _ => None,
        };
        errors.push(e);

        match unknown_at {
            Some(index) => {
                args.remove(index);
            }
            None => return Err(errors),
        }
    }
}

/// Runs lc for parsed arguments, printing the report to stdout.
///
/// Stdout is only locked once the report is ready to print.
pub fn run_cli(cli: &Cli) -> Result<(), ListError> {
    let config = ListConfig::load(cli.config.as_deref())?;
    let mut options = ListOptions::resolve(cli, &config);

    options.styled = options.styled && io::stdout().is_terminal();
    colored::control::set_override(options.styled);

    let registry = build_registry(&options)?;
    let mut out = io::stdout().lock();
    write_registry(&options, &registry, &mut out)
}

/// Lists `options.directory` and writes the grouped report to `out`.
///
/// Nothing is written if enumeration fails.
///
/// # Examples
///
/// ```no_run
/// use lc::cli::{ListOptions, run_with_writer};
///
/// let mut out = Vec::new();
/// run_with_writer(&ListOptions::new("/tmp"), &mut out).unwrap();
/// print!("{}", String::from_utf8_lossy(&out));
/// ```
pub fn run_with_writer<W: Write>(options: &ListOptions, out: &mut W) -> Result<(), ListError> {
    let registry = build_registry(options)?;
    write_registry(options, &registry, out)
}

/// Enumerates and sorts, stopping short of any output.
pub fn build_registry(options: &ListOptions) -> Result<ClassRegistry, ListError> {
    tracing::debug!(directory = %options.directory.display(), "enumerating");
    let mut registry = collect_entries(&options.directory, options.entry_limit)?;

    tracing::debug!(total = registry.total(), "sorting");
    options.sort.sort_registry(&mut registry);
    Ok(registry)
}

fn write_registry<W: Write>(
    options: &ListOptions,
    registry: &ClassRegistry,
    out: &mut W,
) -> Result<(), ListError> {
    tracing::debug!("reporting");
    ColumnFormatter::new(options.max_line_width)
        .styled(options.styled)
        .write_report(out, registry)
        .map_err(ListError::Output)
}

/// Reads every entry of `dir_path` into a fresh registry.
///
/// Hidden entries are included. An entry that cannot be stat'ed is logged
/// and left out; failing to open the directory, or overflowing a class,
/// aborts the whole listing.
pub fn collect_entries(dir_path: &Path, limit: Option<usize>) -> Result<ClassRegistry, ListError> {
    let entries = fs::read_dir(dir_path).map_err(|e| ListError::DirectoryOpen {
        path: dir_path.to_path_buf(),
        source: e,
    })?;

    let mut registry = ClassRegistry::new(limit);
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to read entry in '{}': {}", dir_path.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();
        tracing::debug!(name = %name, "found entry");

        let captured = fs::metadata(&path).and_then(|metadata| Entry::from_metadata(name, &metadata));
        match captured {
            Ok(captured) => {
                tracing::debug!(
                    size = captured.size,
                    links = captured.link_count,
                    modified = %captured.modified.format("%Y-%m-%d %H:%M:%S"),
                    "stat ok"
                );
                registry.insert(captured)?;
            }
            Err(e) => {
                tracing::warn!("stat() failed for '{}': {}", path.display(), e);
            }
        }
    }
    tracing::debug!(directory = %dir_path.display(), "all entries processed");

    Ok(registry)
}
