//! Contract-violation errors for the APU core (spec §7).
//!
//! The core has no I/O and therefore no recoverable errors in the usual
//! sense; every operation is a total function over well-formed inputs.
//! These variants exist for programming-error contracts that must fail
//! fast rather than silently misbehave: an out-of-range register address
//! reaching `Driver::read`/`write`, or `advance_to` called with a
//! cycle count that doesn't move forward.

use thiserror::Error;

/// Errors returned by the driver's external contract surface
/// (`Driver::read`, `Driver::write`, `Driver::advance_to`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApuError {
    /// A bus address outside `$4000-$4017` (minus the non-APU gaps) was
    /// addressed through the driver.
    #[error("invalid APU register address: {0:#06x}")]
    InvalidAddress(u16),

    /// `advance_to` was called with a cycle count that did not move the
    /// clock forward.
    #[error("advance_to called with non-monotonic cycle count: previous={previous} new={new}")]
    NonMonotonicAdvance { previous: u64, new: u64 },

    /// Diagnostic-only: the audio ring has underrun more times in a row
    /// than the configured threshold. Never raised by the core itself;
    /// available for callers that want to escalate a degraded audio
    /// pipeline into a hard error.
    #[error("audio ring underrun threshold exceeded: {count} consecutive underruns")]
    UnderflowUnderrunThresholdExceeded { count: u64 },
}
