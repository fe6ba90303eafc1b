//! Process-wide application span.

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the `app` span entered for as long as the value lives, so every event
/// emitted by the process carries the build SHA and the current phase.
pub struct AppSpan {
    span: EnteredSpan,
}

impl AppSpan {
    /// Enter the application span in the given lifecycle `phase`.
    #[must_use]
    pub fn enter(phase: &str) -> Self {
        let span = tracing::info_span!("app", phase = %phase, build_sha = %build_sha());
        Self {
            span: span.entered(),
        }
    }

    /// Move the span to a new lifecycle phase.
    pub fn set_phase(&self, phase: &str) {
        self.span.record("phase", phase);
    }
}
