//! Row-addressed progress rendering on the terminal.
//!
//! Every transfer owns one screen row, fixed by the [`RowLayout`] before the
//! run starts. Each redraw is a single locked "save cursor, move, clear,
//! print, restore" sequence so concurrent transfers never interleave output.

use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use aioget_core::humansize::Units;
use aioget_core::progress::{
    render_failed_line, render_line, ProgressEvent, ProgressSink, RowLayout,
};
use aioget_core::{TransferResult, TransferState};
use crossterm::cursor::{Hide, MoveTo, RestorePosition, SavePosition, Show};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

/// Fallback when the terminal size cannot be queried (e.g. output is piped).
const DEFAULT_WIDTH: usize = 80;

pub struct TerminalProgress {
    layout: RowLayout,
    width: usize,
    units: Units,
    out: Mutex<Stdout>,
}

impl TerminalProgress {
    pub fn new(layout: RowLayout, units: Units) -> Self {
        let width = terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .unwrap_or(DEFAULT_WIDTH);
        Self {
            layout,
            width,
            units,
            out: Mutex::new(io::stdout()),
        }
    }

    /// Clears the screen and hides the cursor while rows are redrawn.
    pub fn prepare(&self) -> io::Result<()> {
        let mut guard = self.lock();
        let out: &mut Stdout = &mut guard;
        write_prologue(out)
    }

    /// Moves below the progress rows, prints `summary` and shows the cursor again.
    pub fn finish(&self, summary: &str) -> io::Result<()> {
        let mut guard = self.lock();
        let out: &mut Stdout = &mut guard;
        write_epilogue(out, self.layout.height(), summary)
    }

    fn draw(&self, name: &str, line: &str) {
        let Some(row) = self.layout.row_of(name) else {
            tracing::debug!(name, "no row assigned");
            return;
        };
        let mut guard = self.lock();
        let out: &mut Stdout = &mut guard;
        let res = queue!(
            out,
            SavePosition,
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(line),
            RestorePosition
        )
        .and_then(|()| out.flush());
        if let Err(e) = res {
            tracing::debug!(error = %e, "progress redraw failed");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Stdout> {
        self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn write_prologue<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Hide, Clear(ClearType::All), MoveTo(0, 0))
}

fn write_epilogue<W: Write>(out: &mut W, below: u16, summary: &str) -> io::Result<()> {
    execute!(out, MoveTo(0, below), Print(summary), Print("\n"), Show)
}

impl ProgressSink for TerminalProgress {
    fn on_progress(&self, event: &ProgressEvent) {
        let line = render_line(event, self.width, self.units);
        self.draw(&event.destination_name, &line);
    }

    fn on_finished(&self, result: &TransferResult) {
        if let Some(err) = &result.error {
            let line = render_failed_line(&result.destination_name, err, self.width);
            self.draw(&result.destination_name, &line);
        }
    }
}

/// `"N completed, M failed"` for the line printed after the run.
pub fn summary_line(results: &[TransferResult]) -> String {
    let completed = results
        .iter()
        .filter(|r| r.state == TransferState::Completed)
        .count();
    let failed = results.len() - completed;
    format!("{} completed, {} failed", completed, failed)
}
