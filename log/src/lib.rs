//! Logging setup for blocks with file output and optional stderr.
//!
//! Logs always go to a file at `warn` level (or whatever the environment asks for).
//! Terminal logging is enabled when `BLOCKS_LOG` or `RUST_LOG` is set. It writes to stderr so
//! command output on stdout stays clean.
//!
//! ## Environment Variables
//!
//! 1. **`BLOCKS_LOG`** (highest priority) - blocks-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for blocks crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/blocks/logs/blocks-<pid>.log`
//! - macOS: `~/Library/Application Support/blocks/logs/blocks-12345.log`
//! - Linux: `~/.local/share/blocks/logs/blocks-12345.log`
//!
//! Override with `--log-file <path>` or the `log_file` config key.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every crate whose target a bare `BLOCKS_LOG=<level>` applies to
const CRATES: &[&str] = &[
    "blocks_ast",
    "blocks_text",
    "blocks_scheme",
    "blocks_edit",
    "blocks_bin",
];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Respects the environment variable priority described in the module docs:
/// `BLOCKS_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let stderr_layer = terminal_enabled()
        .then(|| fmt::layer().with_writer(std::io::stderr).with_filter(create_filter()));

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stderr-only with the same filter rules as [`init`]. Safe to call from every test; only the
/// first call installs a subscriber.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn terminal_enabled() -> bool {
    env::var("BLOCKS_LOG").is_ok() || env::var("RUST_LOG").is_ok()
}

/// Split an override into directory and file name
///
/// A path with an extension is a file, anything else is a directory to put the default file
/// name in.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("blocks-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blocks")
        .join("logs");

    (dir, filename)
}

/// File filter: uses the environment if set, otherwise `warn`.
fn create_file_filter() -> EnvFilter {
    if terminal_enabled() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// `BLOCKS_LOG` > `RUST_LOG` > `warn` globally with `info` for blocks crates
fn create_filter() -> EnvFilter {
    if let Ok(blocks_log) = env::var("BLOCKS_LOG") {
        return expand_blocks_log(&blocks_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(directives("info"))
}

/// Expand `BLOCKS_LOG` values into full tracing filter strings.
///
/// - `BLOCKS_LOG=debug` becomes `warn,blocks_ast=debug,blocks_text=debug,...`
/// - `BLOCKS_LOG=blocks_edit=trace,blocks_ast=debug` is used as-is
fn expand_blocks_log(blocks_log: &str) -> EnvFilter {
    if blocks_log.contains(['=', ':', ',']) {
        return EnvFilter::new(blocks_log);
    }
    EnvFilter::new(directives(blocks_log))
}

fn directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}
