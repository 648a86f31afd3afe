use tracing::{debug, info, warn};

use crate::api::TraceLevel;

/// Per-parse diagnostics, gated by the configured [`TraceLevel`].
/// Messages are only formatted when their level is enabled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tracer {
    level: TraceLevel,
}

impl Tracer {
    pub(crate) fn new(level: TraceLevel) -> Self {
        Self { level }
    }

    #[cfg(test)]
    pub(crate) fn off() -> Self {
        Self::new(TraceLevel::Off)
    }

    pub(crate) fn warn(&self, message: impl FnOnce() -> String) {
        if self.level >= TraceLevel::Warn {
            warn!("{}", message());
        }
    }

    pub(crate) fn info(&self, message: impl FnOnce() -> String) {
        if self.level >= TraceLevel::Info {
            info!("{}", message());
        }
    }

    pub(crate) fn debug(&self, message: impl FnOnce() -> String) {
        if self.level >= TraceLevel::Debug {
            debug!("{}", message());
        }
    }
}
