//! RAII resource guards for automatic cleanup.
//!
//! - [`ReporterGuard`] - Closes the reporter on every exit path of a run

mod reporter_guard;

pub use reporter_guard::ReporterGuard;
