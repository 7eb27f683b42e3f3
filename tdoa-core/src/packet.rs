//! Wire Layout of Anchor Range Broadcasts
//!
//! ## Overview
//!
//! Every anchor periodically broadcasts a range packet that the tag
//! overhears. The frame layout, per the anchor network convention, is:
//!
//! ```text
//! offset  size  field
//! ------  ----  -----------------------------------------------
//! 0       8     source address, little-endian (low byte = anchor id)
//! 8       1     packet type (0x21 = range broadcast)
//! 9       5*N   timestamp table, one 5-byte LE slot per anchor id
//! ```
//!
//! Slot *i* of the table holds, in the sender's own clock:
//! - the sender's transmit time for this packet, if *i* is the sender;
//! - otherwise, the sender's recorded receive time of anchor *i*'s most
//!   recent broadcast.
//!
//! The table width `N` is fixed per deployment, so the whole frame has a
//! compile-time size and parsing is a bounds check plus fixed-offset reads.

use crate::{
    constants::PACKET_TYPE_RANGE,
    errors::{PacketError, PacketResult},
    time::{RawTimestamp, TIMESTAMP_WIRE_LEN},
};

/// Length in bytes of the source address field.
pub const SOURCE_ADDRESS_LEN: usize = 8;

/// The timestamp table of one range broadcast.
///
/// Indexed by anchor id; ids are validated by the engine before any access,
/// so accessors index directly. `N` is the deployment's anchor slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePacket<const N: usize> {
    packet_type: u8,
    timestamps: [RawTimestamp; N],
}

impl<const N: usize> RangePacket<N> {
    /// Payload bytes following the source address: type byte plus table.
    pub const PAYLOAD_LEN: usize = 1 + N * TIMESTAMP_WIRE_LEN;

    /// Total frame length including the source address.
    pub const FRAME_LEN: usize = SOURCE_ADDRESS_LEN + Self::PAYLOAD_LEN;

    /// All-zero packet, the initial state of every history slot.
    pub const fn zeroed() -> Self {
        Self {
            packet_type: 0,
            timestamps: [RawTimestamp::ZERO; N],
        }
    }

    /// Build a packet from a timestamp table (primarily for tests and
    /// simulation; live packets come from [`AnchorBroadcast::parse`]).
    pub const fn from_timestamps(timestamps: [RawTimestamp; N]) -> Self {
        Self {
            packet_type: PACKET_TYPE_RANGE,
            timestamps,
        }
    }

    /// The timestamp slot for `anchor`.
    ///
    /// Caller contract: `anchor < N`, guaranteed by the engine's id
    /// validation.
    pub fn timestamp(&self, anchor: u8) -> RawTimestamp {
        self.timestamps[anchor as usize]
    }

    /// The packet-type byte as seen on the wire.
    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }
}

/// A parsed frame: the sending anchor's id plus its range packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorBroadcast<const N: usize> {
    /// Anchor id of the sender (low byte of the source address).
    pub source: u8,
    /// The decoded range packet.
    pub packet: RangePacket<N>,
}

impl<const N: usize> AnchorBroadcast<N> {
    /// Parse an overheard frame.
    ///
    /// Validates length and packet type but nothing else; semantic checks
    /// (anchor id range) belong to the engine.
    pub fn parse(frame: &[u8]) -> PacketResult<Self> {
        if frame.len() < RangePacket::<N>::FRAME_LEN {
            return Err(PacketError::Truncated {
                expected: RangePacket::<N>::FRAME_LEN,
                actual: frame.len(),
            });
        }

        // Low byte of the LE source address is the anchor id.
        let source = frame[0];

        let packet_type = frame[SOURCE_ADDRESS_LEN];
        if packet_type != PACKET_TYPE_RANGE {
            return Err(PacketError::UnexpectedType { found: packet_type });
        }

        let mut timestamps = [RawTimestamp::ZERO; N];
        let table = &frame[SOURCE_ADDRESS_LEN + 1..];
        for (slot, chunk) in timestamps
            .iter_mut()
            .zip(table.chunks_exact(TIMESTAMP_WIRE_LEN))
        {
            let mut bytes = [0u8; TIMESTAMP_WIRE_LEN];
            bytes.copy_from_slice(chunk);
            *slot = RawTimestamp::from_le_bytes(bytes);
        }

        Ok(Self {
            source,
            packet: RangePacket {
                packet_type,
                timestamps,
            },
        })
    }

    /// Encode back into the wire form (test and simulation helper).
    ///
    /// Returns the frame as a fixed-capacity byte vector sized for the
    /// widest supported table.
    pub fn to_frame(&self) -> heapless::Vec<u8, 256> {
        let mut frame = heapless::Vec::new();
        let mut address = [0u8; SOURCE_ADDRESS_LEN];
        address[0] = self.source;
        // FRAME_LEN <= 256 for every practical anchor count.
        let _ = frame.extend_from_slice(&address);
        let _ = frame.push(self.packet.packet_type);
        for slot in &self.packet.timestamps {
            let _ = frame.extend_from_slice(&slot.to_le_bytes());
        }
        frame
    }
}
