//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output only shown with `--verbose`
//! - `StageProgress` for a single-line per-stage file counter
//!
//! # Example
//!
//! ```ignore
//! log!("bundle"; "compiling {} files", count);
//!
//! let progress = StageProgress::new("fingerprint", 12);
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    cell::Cell,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Whether a progress line currently owns the last terminal line
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored stage prefix
///
/// # Usage
/// ```ignore
/// log!("stage"; "message with {} formatting", args);
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
/// debug!("stage"; "debug info: {}", value);
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

/// Log a message with a colored stage prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    if PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a stage prefix based on its type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" => prefix.bright_red().bold().to_string(),
        "warning" | "warn" => prefix.bright_magenta().bold().to_string(),
        "manifest" | "done" => prefix.bright_green().bold().to_string(),
        "upgrade" => prefix.bright_blue().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Stage Progress (single-line counter)
// ============================================================================

/// Single-line progress display for one pipeline stage
///
/// Displays: `[fingerprint] 5/12`
///
/// The pipeline is single-threaded, so the counter is a plain `Cell`.
/// A zero total draws nothing.
pub struct StageProgress {
    stage: &'static str,
    total: usize,
    current: Cell<usize>,
}

impl StageProgress {
    /// Create a progress line for `stage` expecting `total` items.
    pub fn new(stage: &'static str, total: usize) -> Self {
        let progress = Self {
            stage,
            total,
            current: Cell::new(0),
        };
        if total > 0 {
            PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
            progress.display(false);
        }
        progress
    }

    /// Advance the counter by one.
    #[inline]
    pub fn inc(&self) {
        self.current.set(self.current.get() + 1);
        if self.total > 0 {
            self.display(false);
        }
    }

    /// Items counted so far.
    #[cfg(test)]
    pub fn current(&self) -> usize {
        self.current.get()
    }

    fn line(&self) -> String {
        format!(
            "{} {}/{}",
            colorize_prefix(self.stage, self.stage),
            self.current.get(),
            self.total
        )
    }

    fn display(&self, newline: bool) {
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        if newline {
            writeln!(stdout, "{}", self.line()).ok();
        } else {
            write!(stdout, "{}", self.line()).ok();
        }
        stdout.flush().ok();
    }

    /// Finish progress display, keep the final line.
    pub fn finish(self) {
        if self.total > 0 {
            self.display(true);
        }
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        std::mem::forget(self);
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        if !PROGRESS_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        // Stage aborted mid-way: leave the partial count visible
        let mut stdout = stdout().lock();
        writeln!(stdout).ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_stage_progress_counts() {
        let progress = StageProgress::new("bundle", 0);
        progress.inc();
        progress.inc();
        assert_eq!(progress.current(), 2);
        progress.finish();
    }

    #[test]
    fn test_prefix_contains_stage_name() {
        assert!(colorize_prefix("copy", "copy").contains("[copy]"));
        assert!(colorize_prefix("error", "error").contains("[error]"));
    }
}
