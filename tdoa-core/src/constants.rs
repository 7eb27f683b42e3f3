//! Radio and Physics Constants for tdoa-core
//!
//! This module centralizes the numeric constants of the anchor network and
//! the ranging math. All values are defined here with their purpose, source,
//! and units so that no magic numbers appear in the computation paths.

// ===== FUNDAMENTAL PHYSICS =====

/// Speed of light in vacuum (m/s).
///
/// Converts a time-of-flight expressed in seconds into a distance. UWB
/// ranging errors from using the vacuum value instead of the air value are
/// well below the radio's timestamp resolution.
///
/// Source: CODATA 2018
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

// ===== RADIO TIMEBASE =====

/// Frequency of the UWB transceiver timestamp counter (Hz).
///
/// The DW1000 family timestamps packets with a counter running at
/// 128 x 499.2 MHz (~63.9 GHz), giving a tick period of ~15.65 ps or
/// roughly 4.7 mm of light travel per tick.
///
/// Source: DW1000 user manual, section 3 (system time counter)
pub const TIMESTAMP_FREQ_HZ: f64 = 499.2e6 * 128.0;

// ===== ANCHOR NETWORK =====

/// Anchor id of the network master.
///
/// The master originates each broadcast round and serves as the common time
/// reference; every relay anchor timestamps its reception of the master and
/// echoes it in its own broadcast.
pub const MASTER_ANCHOR: u8 = 0;

/// Default number of anchor slots in a deployment.
///
/// Matches the timestamp-table width used by the standard anchor firmware.
/// The engine is generic over the slot count; this is the conventional
/// instantiation.
pub const DEFAULT_ANCHOR_COUNT: usize = 8;

/// Packet-type byte of an anchor range broadcast.
///
/// First payload byte after the source address, per the anchor network
/// protocol. Other packet types are not interpreted by this crate.
pub const PACKET_TYPE_RANGE: u8 = 0x21;

// ===== MEASUREMENT QUALITY =====

/// Largest credible distance difference (m).
///
/// A TDOA result can never legitimately exceed the tag-to-anchor geometry
/// of the deployment. Results beyond this bound are artifacts of a missed
/// intermediate packet corrupting the two-interval math, and are dropped.
/// The bound rejects corruption, not physical range.
///
/// Source: reference anchor deployment envelope (~hundreds of meters)
pub const MAX_DISTANCE_DIFF_M: f32 = 300.0;

/// Standard deviation attached to every emitted measurement (m).
///
/// Fixed measurement-noise figure handed to the downstream estimator along
/// with each distance-difference sample.
pub const MEASUREMENT_NOISE_STD_M: f32 = 0.5;
