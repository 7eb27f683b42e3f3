//! Hardware Timestamps and Wraparound Elimination
//!
//! ## Overview
//!
//! UWB transceivers timestamp packets with a free-running 40-bit counter
//! that wraps roughly every 17 seconds at the DW1000 tick rate. This module
//! provides the two time representations the engine works with and the
//! conversion between them:
//!
//! - [`RawTimestamp`]: the 40-bit modular value read from hardware or from
//!   a packet. Subtraction is modular within 40 bits, so a single wrap
//!   inside one frame period cancels out implicitly.
//! - [`UnwrappedTime`]: a signed 64-bit monotonic timeline within one clock
//!   domain, produced only by a [`WrapTracker`] for that domain.
//!
//! Keeping the two as distinct types prevents the classic bug of mixing a
//! masked counter value into 64-bit arithmetic (or vice versa) without an
//! explicit conversion step.
//!
//! ## Wrap detection
//!
//! A [`WrapTracker`] watches consecutive raw values from one clock domain.
//! A raw value smaller than its predecessor means the counter wrapped since
//! the previous observation, so the tracker adds another 2^40 to its
//! accumulated offset:
//!
//! ```text
//! raw:       2^40-5   3        9
//! offset:    0        2^40     2^40
//! unwrapped: 2^40-5   2^40+3   2^40+9
//! ```
//!
//! The caller must feed every observed raw value exactly once, in true
//! chronological order of observation; feeding out of order silently
//! corrupts the offset. Multiple wraps between two observations cannot be
//! detected; acceptable because the counter frequency exceeds the anchor
//! broadcast rate by many orders of magnitude.

/// Width of the hardware timestamp counter in bits.
pub const TIMESTAMP_BITS: u32 = 40;

/// Bit mask selecting the valid portion of a raw timestamp.
pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Length in bytes of a timestamp as carried in anchor packets.
pub const TIMESTAMP_WIRE_LEN: usize = 5;

/// Monotonic time within one clock domain, in counter ticks.
///
/// Obtained only through [`WrapTracker::unwrap`]; never read directly from
/// hardware or from a packet.
pub type UnwrappedTime = i64;

/// A 40-bit modular hardware timestamp.
///
/// The inner value is always masked to [`TIMESTAMP_BITS`] bits. Arithmetic
/// is modular: [`RawTimestamp::wrapping_sub`] returns the duration between
/// two observations of the same clock even when the counter wrapped once
/// between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTimestamp(u64);

impl RawTimestamp {
    /// Timestamp at counter value zero.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from a tick count, truncating to 40 bits.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks & TIMESTAMP_MASK)
    }

    /// Decode a timestamp from its 5-byte little-endian wire form.
    pub const fn from_le_bytes(bytes: [u8; TIMESTAMP_WIRE_LEN]) -> Self {
        Self(
            bytes[0] as u64
                | (bytes[1] as u64) << 8
                | (bytes[2] as u64) << 16
                | (bytes[3] as u64) << 24
                | (bytes[4] as u64) << 32,
        )
    }

    /// Encode into the 5-byte little-endian wire form.
    pub const fn to_le_bytes(self) -> [u8; TIMESTAMP_WIRE_LEN] {
        [
            self.0 as u8,
            (self.0 >> 8) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 24) as u8,
            (self.0 >> 32) as u8,
        ]
    }

    /// The raw tick count, in `[0, 2^40)`.
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Modular duration `self - earlier` within the 40-bit counter.
    ///
    /// Correct across at most one counter wrap between the two values.
    pub const fn wrapping_sub(self, earlier: Self) -> u64 {
        self.0.wrapping_sub(earlier.0) & TIMESTAMP_MASK
    }
}

/// Wraparound eliminator for one clock domain.
///
/// Tracks the accumulated wrap offset and the latest raw value seen. One
/// independent instance exists per clock domain; the engine owns one for
/// the tag's receive clock and one for the master's transmit clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapTracker {
    /// Accumulated offset; always a non-negative multiple of 2^40.
    offset: i64,
    /// Most recent raw value observed, used solely to detect the next wrap.
    latest: i64,
}

impl WrapTracker {
    /// Fresh tracker with zero offset.
    pub const fn new() -> Self {
        Self { offset: 0, latest: 0 }
    }

    /// Convert the next observed raw value into monotonic domain time.
    ///
    /// Must be called exactly once per newly observed raw timestamp, in
    /// chronological order of observation within this domain.
    pub fn unwrap(&mut self, raw: RawTimestamp) -> UnwrappedTime {
        let time = raw.ticks() as i64;
        if time < self.latest {
            self.offset += 1 << TIMESTAMP_BITS;
        }
        self.latest = time;
        time + self.offset
    }

    /// Forget all wrap state, as if freshly constructed.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.latest = 0;
    }
}
