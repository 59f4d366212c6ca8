//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - timestamped status lines (`status_success`, `status_error`, `status_warning`)
//!
//! # Example
//!
//! ```ignore
//! log!("watch"; "watching {} directories", count);
//! status_error("build failed", "exit status: 2");
//! ```
//!
//! Styling honors `owo_colors::set_override` and falls back to plain text
//! when stdout is not a color terminal.
//!
//! Status lines are appended, never redrawn: the supervised program writes to
//! the same terminal and moving the cursor would clobber its output.

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Serializes multi-line status blocks against concurrent `log!` calls.
static OUTPUT: Mutex<()> = Mutex::new(());

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let _guard = OUTPUT.lock();
    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let styled = prefix.if_supports_color(Stream::Stdout, |p| match module_lower {
        "run" => p.bright_blue().bold().to_string(),
        "watch" => p.bright_green().bold().to_string(),
        "error" => p.bright_red().bold().to_string(),
        "build" => p.bright_magenta().bold().to_string(),
        _ => p.bright_yellow().bold().to_string(),
    });
    styled.to_string()
}

// ============================================================================
// Status lines
// ============================================================================

/// Get current wall-clock time (UTC) formatted as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    clock(secs)
}

fn clock(secs: u64) -> String {
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Build a status line: dimmed timestamp, optional symbol, message.
fn format_status(timestamp: &str, symbol: &str, message: &str) -> String {
    let timestamp = format!("[{timestamp}]");
    let timestamp = timestamp.if_supports_color(Stream::Stdout, |t| t.dimmed());
    if symbol.is_empty() {
        format!("{timestamp} {message}")
    } else {
        format!("{timestamp} {symbol} {message}")
    }
}

fn print_status(symbol: String, message: &str) {
    let line = format_status(&now(), &symbol, message);

    let _guard = OUTPUT.lock();
    let mut stdout = stdout().lock();
    writeln!(stdout, "{line}").ok();
    stdout.flush().ok();
}

/// Status line: success (✓ prefix, green).
pub fn status_success(message: &str) {
    let symbol = "✓".if_supports_color(Stream::Stdout, |s| s.green());
    print_status(symbol.to_string(), message);
}

/// Status line: error (✗ prefix, red) with optional detail.
pub fn status_error(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    };
    let symbol = "✗".if_supports_color(Stream::Stdout, |s| s.red());
    print_status(symbol.to_string(), &message);
}

/// Status line: warning (⚠ prefix, yellow).
pub fn status_warning(detail: &str) {
    let symbol = "⚠".if_supports_color(Stream::Stdout, |s| s.yellow());
    print_status(symbol.to_string(), detail);
}

// ============================================================================
// Tests
// ============================================================================
