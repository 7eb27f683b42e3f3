//! Clock-synchronization and TDOA computation engine for tdoa-core
//!
//! Reconstructs a common time base across the independently drifting clocks
//! of a mobile tag and a network of fixed UWB anchors, and turns overheard
//! anchor broadcasts into distance-difference measurements for a downstream
//! position estimator.
//!
//! Key constraints:
//! - no_std core with no heap allocation in the receive path
//! - Fixed-cost arithmetic per packet, driven synchronously from the
//!   radio's receive-complete notification
//! - 40-bit wrapping hardware timestamps unwrapped into 64-bit monotonic
//!   timelines per clock domain
//!
//! ```no_run
//! use tdoa_core::{EngineConfig, NullSink, Position, RawTimestamp, TdoaEngine};
//!
//! let config = EngineConfig::with_positions([Position::ORIGIN; 8]);
//! let mut engine: TdoaEngine<_, 8> = TdoaEngine::new(config, NullSink);
//!
//! // From the driver's receive callback:
//! let frame: &[u8] = &[];
//! let arrival = RawTimestamp::from_ticks(0);
//! engine.on_packet_received(frame, arrival);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod drift;
pub mod engine;
pub mod errors;
pub mod history;
pub mod measurement;
pub mod packet;
pub mod sink;
pub mod time;

// Public API
pub use config::{EngineConfig, Position};
pub use engine::TdoaEngine;
pub use errors::{PacketError, PacketResult};
pub use measurement::{TdoaMeasurement, ToaSample};
pub use packet::{AnchorBroadcast, RangePacket};
pub use sink::{BufferedSink, MeasurementSink, NullSink};
pub use time::{RawTimestamp, UnwrappedTime, WrapTracker};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
