//! Test reporter — keeps every reported error for later assertions.

use std::sync::Mutex;

use monogatari_core::error::EngineError;
use monogatari_core::report::ErrorReporter;

/// An error reporter that records every report.
#[derive(Debug, Default)]
pub struct RecordingErrorReporter {
    reported: Mutex<Vec<EngineError>>,
}

impl RecordingErrorReporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything reported so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reported(&self) -> Vec<EngineError> {
        self.reported.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingErrorReporter {
    fn report(&self, error: &EngineError) {
        self.reported.lock().unwrap().push(error.clone());
    }
}
