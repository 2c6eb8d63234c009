//! Downloads and clipboard copies of a generation result

use crate::error::{ReqscribeError, Result};
use crate::log_debug;
use crate::render::ResultView;

use arboard::Clipboard;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

pub const MARKDOWN_FILE_NAME: &str = "requirements.md";
pub const CSV_FILE_NAME: &str = "requirements.csv";

/// How long the "copied" indicator stays on after a copy
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Write the Markdown document as `requirements.md` in `dir`
pub fn save_markdown(view: &ResultView<'_>, dir: &Path) -> Result<PathBuf> {
    write_atomically(dir, MARKDOWN_FILE_NAME, view.markdown())
}

/// Write the itemized requirements as `requirements.csv` in `dir`
pub fn save_csv(view: &ResultView<'_>, dir: &Path) -> Result<PathBuf> {
    let csv = view.csv()?;
    write_atomically(dir, CSV_FILE_NAME, &csv)
}

/// Write through a temp file in the same directory, then rename into place
fn write_atomically(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| {
        ReqscribeError::Export(format!("cannot create {}: {e}", dir.display()))
    })?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| ReqscribeError::Export(format!("cannot write to {}: {e}", dir.display())))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| ReqscribeError::Export(format!("failed writing {file_name}: {e}")))?;

    let target = dir.join(file_name);
    temp.persist(&target).map_err(|e| {
        ReqscribeError::Export(format!("cannot save {}: {}", target.display(), e.error))
    })?;

    log_debug!("Saved {} ({} bytes)", target.display(), content.len());
    Ok(target)
}

/// Place text on the system clipboard
pub fn copy_to_clipboard(content: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| ReqscribeError::Export(format!("Clipboard unavailable: {e}")))?;
    clipboard
        .set_text(content)
        .map_err(|e| ReqscribeError::Export(format!("Failed to copy: {e}")))?;
    log_debug!("Copied {} characters to clipboard", content.chars().count());
    Ok(())
}

/// Tracks the short-lived "copied" indicator
///
/// A second copy while the flag is on restarts the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful copy at `now`
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Whether the indicator is showing at `now`
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK_DURATION)
    }

    /// Time left before the indicator reverts
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let at = self.copied_at?;
        COPY_FEEDBACK_DURATION
            .checked_sub(now.saturating_duration_since(at))
            .filter(|left| !left.is_zero())
    }

    pub fn clear(&mut self) {
        self.copied_at = None;
    }
}
