//! Engine Configuration
//!
//! Anchor count and per-anchor positions, supplied once at initialization
//! and immutable for the engine's active lifetime. Changing the deployment
//! means constructing a new engine (or resetting one with a new config).

/// Static 3D coordinate of an anchor, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// X coordinate (m).
    pub x: f32,
    /// Y coordinate (m).
    pub y: f32,
    /// Z coordinate (m).
    pub z: f32,
}

impl Position {
    /// Position at the coordinate origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Construct a position from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Deployment description: how many anchors are active and where they are.
///
/// `N` is the compile-time anchor slot capacity (the width of the packet
/// timestamp table); the active count may be smaller. Packets from ids at
/// or beyond the active count are ignored by the engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig<const N: usize> {
    anchor_count: u8,
    positions: [Position; N],
}

impl<const N: usize> EngineConfig<N> {
    /// Configuration with `anchor_count` active anchors at the given
    /// positions. Counts beyond the slot capacity are clamped to `N`.
    pub fn new(anchor_count: u8, positions: [Position; N]) -> Self {
        Self {
            anchor_count: (anchor_count as usize).min(N) as u8,
            positions,
        }
    }

    /// All `N` slots active.
    pub fn with_positions(positions: [Position; N]) -> Self {
        Self::new(N as u8, positions)
    }

    /// Number of active anchors; valid ids are `[0, anchor_count)`.
    pub fn anchor_count(&self) -> u8 {
        self.anchor_count
    }

    /// Position of `anchor`.
    ///
    /// Caller contract: `anchor < N`, guaranteed by the engine's id
    /// validation.
    pub fn position(&self, anchor: u8) -> Position {
        self.positions[anchor as usize]
    }
}
