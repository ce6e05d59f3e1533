//! Error-reporting abstraction.

use tracing::{error, warn};

use crate::error::EngineError;

/// Receives errors the engine recovered from on its own, so a host can
/// surface them (debug overlay, telemetry) without the playback loop
/// stopping.
pub trait ErrorReporter: Send + Sync {
    /// Report a recovered error.
    fn report(&self, error: &EngineError);
}

/// Default reporter that writes recovered errors to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, err: &EngineError) {
        match err {
            EngineError::ChapterLoad { chapter, reason } => {
                error!(chapter = %chapter, reason = %reason, "chapter load failed, using fallback");
            }
            other => warn!(error = %other, "recovered engine error"),
        }
    }
}
