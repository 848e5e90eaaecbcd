//! Batch-loop progress reporting.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

/// Width of the drawn bar in cells.
const BAR_WIDTH: usize = 40;

/// Receives progress events from the pipeline.
pub trait ProgressReporter {
    /// Begin a run of `total` entries.
    fn start(&mut self, total: usize);
    /// Mark `n` more entries as processed.
    fn advance(&mut self, n: usize);
    /// End the run.
    fn finish(&mut self);
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self, _n: usize) {}
    fn finish(&mut self) {}
}

/// Single-line bar drawn on stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    /// Entries processed so far.
    value: usize,
    /// Entries in the run.
    total: usize,
    /// Whether the cursor is currently hidden.
    active: bool,
}

impl ConsoleProgress {
    /// Create an idle reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw the line; terminal errors are ignored.
    fn draw(&self) {
        let (bar, rest, pct) = render_bar(self.value, self.total, BAR_WIDTH);
        let mut err = io::stderr();
        let _ = execute!(
            err,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Cyan),
            Print(bar),
            ResetColor,
            Print(rest),
            Print(format!(" {pct}% | {}/{}", self.value, self.total)),
        );
        let _ = err.flush();
    }
}

impl ProgressReporter for ConsoleProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.value = 0;
        self.active = true;
        let _ = execute!(io::stderr(), Hide);
        self.draw();
    }

    fn advance(&mut self, n: usize) {
        self.value = (self.value + n).min(self.total);
        self.draw();
    }

    fn finish(&mut self) {
        if self.active {
            self.active = false;
            let _ = execute!(io::stderr(), Show, Print("\n"));
        }
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// What: Split a bar into its filled and empty parts.
///
/// Inputs:
/// - `value`: Processed entries.
/// - `total`: Entries in the run.
/// - `width`: Bar width in cells.
///
/// Output:
/// - Filled cells, empty cells and the whole-number percentage.
///
/// Details:
/// - A zero total draws a full bar at 100%.
#[must_use]
pub fn render_bar(value: usize, total: usize, width: usize) -> (String, String, usize) {
    let (filled, pct) = if total == 0 {
        (width, 100)
    } else {
        let value = value.min(total);
        (value * width / total, value * 100 / total)
    };
    ("█".repeat(filled), "░".repeat(width - filled), pct)
}
