//! Error Types for the Packet Parse Seam
//!
//! Inside the engine, anomaly handling is silent by policy: out-of-range
//! anchor ids are dropped, zero intervals fall back to an identity clock
//! correction, and implausible results are discarded by the sanity filter.
//! The one place a typed error exists is the byte-level parse of an
//! overheard frame, where a `Result` makes the wire contract explicit.
//!
//! Errors are `Copy` with inline data only, so they can be returned from
//! the receive hot path without allocation.

use thiserror_no_std::Error;

/// Result alias for packet parsing.
pub type PacketResult<T> = Result<T, PacketError>;

/// Failure to interpret an overheard frame.
///
/// The driver layer contract guarantees well-formed frames of the declared
/// length, so in steady state these never occur; the engine drops the
/// offending frame without mutating any state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    /// Frame shorter than the fixed wire layout requires.
    #[error("frame truncated: need {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the wire layout for this anchor count.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },

    /// Payload does not carry a range broadcast.
    #[error("unexpected packet type {found:#04x}")]
    UnexpectedType {
        /// The packet-type byte found on the wire.
        found: u8,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for PacketError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Truncated { expected, actual } => {
                defmt::write!(fmt, "frame truncated: need {} bytes, got {}", expected, actual)
            }
            Self::UnexpectedType { found } => {
                defmt::write!(fmt, "unexpected packet type {:#x}", found)
            }
        }
    }
}
