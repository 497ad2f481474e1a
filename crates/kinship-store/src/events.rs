//! Per-identity life-event files.
//!
//! One event per line, oldest first. Loading replays the lines as
//! sequential pushes, so the last line becomes the most recent event.

use std::path::{Path, PathBuf};

use kinship_timeline::LifeEventLog;
use kinship_types::LifeEvent;

use crate::error::StoreError;
use crate::fs;

/// What happened while loading a life-event file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLogLoadReport {
    /// No file existed; the log starts empty.
    pub missing: bool,
    /// Events restored.
    pub events: usize,
    /// Blank lines skipped.
    pub skipped: usize,
}

/// One identity's life-event file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogFile {
    path: PathBuf,
}

impl EventLogFile {
    /// Bind to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file from `log`, oldest event first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be replaced.
    pub fn save(&self, log: &LifeEventLog) -> Result<(), StoreError> {
        let mut out = String::new();
        for event in log.as_slice() {
            out.push_str(event.as_str());
            out.push('\n');
        }
        fs::write_atomic(&self.path, &out)?;
        tracing::debug!(path = %self.path.display(), events = log.len(), "life-event log saved");
        Ok(())
    }

    /// Load the file into a fresh log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<(LifeEventLog, EventLogLoadReport), StoreError> {
        let Some(text) = fs::read_optional(&self.path)? else {
            let report = EventLogLoadReport {
                missing: true,
                ..EventLogLoadReport::default()
            };
            return Ok((LifeEventLog::new(), report));
        };

        let mut report = EventLogLoadReport::default();
        let mut log = LifeEventLog::new();
        for line in text.lines() {
            match LifeEvent::new(line) {
                Ok(event) => {
                    log.push(event);
                    report.events = report.events.saturating_add(1);
                }
                Err(_blank) => report.skipped = report.skipped.saturating_add(1),
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            events = report.events,
            skipped = report.skipped,
            "life-event log loaded"
        );
        Ok((log, report))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn event(text: &str) -> LifeEvent {
        LifeEvent::new(text).unwrap()
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = EventLogFile::new(dir.path().join("life_events_a.txt"));
        let log: LifeEventLog = ["born", "graduated", "moved to Lisbon"]
            .into_iter()
            .map(event)
            .collect();
        file.save(&log).unwrap();

        let (loaded, report) = file.load().unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded.peek(), Some(&event("moved to Lisbon")));
        assert_eq!(report.events, 3);
        assert!(!report.missing);
    }

    #[test]
    fn missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let (log, report) = EventLogFile::new(dir.path().join("nobody.txt")).load().unwrap();
        assert!(log.is_empty());
        assert!(report.missing);
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("life_events_b.txt");
        std::fs::write(&path, "first\r\n\r\n  \nsecond\n").unwrap();
        let (log, report) = EventLogFile::new(&path).load().unwrap();
        assert_eq!(log.as_slice(), &[event("first"), event("second")]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn saving_empty_log_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let file = EventLogFile::new(dir.path().join("life_events_c.txt"));
        file.save(&[event("x")].into_iter().collect()).unwrap();
        file.save(&LifeEventLog::new()).unwrap();
        let (log, report) = file.load().unwrap();
        assert!(log.is_empty());
        assert!(!report.missing);
    }
}
