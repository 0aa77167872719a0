//! RAII guard for the reporter lifecycle.
//!
//! Once `started` has been delivered, the reporter is closed exactly once:
//! explicitly through [`ReporterGuard::close`], or from `Drop` when the run
//! unwinds through an error, a panic or a cancelled future.

use tracing::{debug, warn};

use crate::reporter::{ReportError, Reporter};

/// RAII guard owning the reporter of one run.
///
/// # Example
///
/// ```ignore
/// let mut guard = ReporterGuard::start(reporter)?;
/// // ... run engines against guard.reporter() ...
/// guard.finish()?;
/// guard.close()?; // on early return, Drop closes instead
/// ```
pub struct ReporterGuard<R: Reporter> {
    reporter: R,
    closed: bool,
}

impl<R: Reporter> ReporterGuard<R> {
    /// Deliver `started` and take ownership of the reporter.
    ///
    /// If `started` itself fails the reporter is still closed before the
    /// error is returned.
    pub fn start(reporter: R) -> Result<Self, ReportError> {
        let mut guard = Self {
            reporter,
            closed: false,
        };

        debug!("Reporter started");
        guard.reporter.started()?;
        Ok(guard)
    }

    pub fn reporter(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Deliver `finished`.
    pub fn finish(&mut self) -> Result<(), ReportError> {
        if self.closed {
            return Err(ReportError::Closed);
        }
        self.reporter.finished()
    }

    /// Check if the reporter has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the reporter now and surface the close error, if any.
    pub fn close(mut self) -> Result<(), ReportError> {
        self.closed = true;
        debug!("Reporter closed");
        self.reporter.close()
    }
}

impl<R: Reporter> Drop for ReporterGuard<R> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            warn!("Reporter guard dropped before close - closing reporter");

            if let Err(e) = self.reporter.close() {
                warn!(error = %e, "Failed to close reporter");
            }
        }
    }
}
