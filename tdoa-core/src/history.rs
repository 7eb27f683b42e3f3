//! Per-Anchor Packet History
//!
//! The drift and ranging math needs exactly one packet of history per
//! anchor: the previous broadcast's timestamp table and the tag-clock time
//! at which it arrived. This module keeps that history in a fixed-capacity
//! arena indexed by anchor id, with no heap and no eviction policy; each
//! new packet unconditionally overwrites its predecessor.
//!
//! A `seen` flag distinguishes a genuinely recorded packet from the zeroed
//! initial state, so the engine can tell "no prior interval exists" apart
//! from "previous packet arrived at tick zero".

use crate::{packet::RangePacket, time::RawTimestamp};

/// History entry for a single anchor.
#[derive(Debug, Clone, Copy)]
struct AnchorRecord<const N: usize> {
    packet: RangePacket<N>,
    arrival: RawTimestamp,
    seen: bool,
}

impl<const N: usize> AnchorRecord<N> {
    const EMPTY: Self = Self {
        packet: RangePacket::zeroed(),
        arrival: RawTimestamp::ZERO,
        seen: false,
    };
}

/// Most-recent-packet store, one slot per anchor id.
///
/// `N` is the deployment's anchor slot count; all accessors require a
/// validated `anchor < N`, which the engine guarantees.
#[derive(Debug, Clone)]
pub struct PacketHistory<const N: usize> {
    records: [AnchorRecord<N>; N],
}

impl<const N: usize> PacketHistory<N> {
    /// Empty history; every slot zeroed and marked unseen.
    pub const fn new() -> Self {
        Self {
            records: [AnchorRecord::EMPTY; N],
        }
    }

    /// Overwrite `anchor`'s slot with the packet just processed.
    pub fn record(&mut self, anchor: u8, packet: &RangePacket<N>, arrival: RawTimestamp) {
        self.records[anchor as usize] = AnchorRecord {
            packet: *packet,
            arrival,
            seen: true,
        };
    }

    /// The most recently recorded packet from `anchor` (zeroed if none).
    pub fn packet(&self, anchor: u8) -> &RangePacket<N> {
        &self.records[anchor as usize].packet
    }

    /// Tag-clock arrival time of the most recent packet from `anchor`.
    pub fn arrival(&self, anchor: u8) -> RawTimestamp {
        self.records[anchor as usize].arrival
    }

    /// Whether a packet from `anchor` has been recorded since the last
    /// reset.
    pub fn seen(&self, anchor: u8) -> bool {
        self.records[anchor as usize].seen
    }

    /// Drop all history, returning to the zeroed initial state.
    pub fn clear(&mut self) {
        self.records = [AnchorRecord::EMPTY; N];
    }
}

impl<const N: usize> Default for PacketHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_with_slot0(ticks: u64) -> RangePacket<3> {
        RangePacket::from_timestamps([
            RawTimestamp::from_ticks(ticks),
            RawTimestamp::ZERO,
            RawTimestamp::ZERO,
        ])
    }

    #[test]
    fn starts_unseen_and_zeroed() {
        let history = PacketHistory::<3>::new();
        for anchor in 0..3 {
            assert!(!history.seen(anchor));
            assert_eq!(history.arrival(anchor), RawTimestamp::ZERO);
            assert_eq!(history.packet(anchor).timestamp(anchor), RawTimestamp::ZERO);
        }
    }

    #[test]
    fn record_overwrites_unconditionally() {
        let mut history = PacketHistory::<3>::new();

        history.record(1, &packet_with_slot0(100), RawTimestamp::from_ticks(10));
        history.record(1, &packet_with_slot0(200), RawTimestamp::from_ticks(20));

        assert!(history.seen(1));
        assert_eq!(history.arrival(1), RawTimestamp::from_ticks(20));
        assert_eq!(history.packet(1).timestamp(0).ticks(), 200);
        // Other slots untouched.
        assert!(!history.seen(0));
        assert!(!history.seen(2));
    }

    #[test]
    fn clear_restores_initial_state() {
        let mut history = PacketHistory::<3>::new();
        history.record(0, &packet_with_slot0(1), RawTimestamp::from_ticks(1));

        history.clear();

        assert!(!history.seen(0));
        assert_eq!(history.arrival(0), RawTimestamp::ZERO);
    }
}
