//! TDOA Computation Engine
//!
//! ## Overview
//!
//! [`TdoaEngine`] is the state machine at the center of this crate. It is
//! driven by a single inbound event ("packet received") delivered
//! synchronously from the radio driver's receive-complete notification,
//! and it owns every piece of mutable state: the per-domain wrap trackers,
//! the per-anchor packet history, the persisted tag→master clock
//! correction, the last accepted sample, and the per-anchor diagnostic
//! distance differences.
//!
//! On each accepted packet the engine branches on the sender:
//!
//! - **Master**: the two most recent master transmissions give a frame
//!   interval in the master clock; the two most recent arrivals give the
//!   same interval in the tag clock. Their ratio refreshes the tag→master
//!   correction, and the packet itself yields a reference time-of-arrival
//!   sample.
//! - **Relay anchor**: four timestamp quantities from the current packet
//!   and the buffered previous packets of this anchor and of the master
//!   feed a closed-form double-sided two-way-ranging formula. The symmetric
//!   subtraction cancels the unknown propagation delay and clock offset,
//!   leaving the time-of-flight master→anchor and from it the relay's
//!   transmit time expressed in the master clock. Subtracting that from the
//!   tag-observed arrival gap gives the time difference of arrival, scaled
//!   to meters by the counter frequency and the speed of light.
//!
//! A variable-naming note, inherited from the reference anchor protocol:
//! three actors appear in the math: the master (`master`), the relay
//! anchor (`anchor`), and the tag. `rx_master_by_anchor` reads as "the time
//! when the master's packet was received by the anchor, in the anchor's
//! clock".
//!
//! ## Anomaly policy
//!
//! There are no fatal conditions here. Out-of-range anchor ids and
//! unparseable frames are dropped without state mutation; zero-length
//! intervals fall back to the identity correction; implausible distance
//! differences (the signature of a missed intermediate packet) are
//! discarded by the sanity filter. History always updates from the raw
//! packet, even when the computed sample is rejected, so the next packet's
//! interval math is based on the latest real transmission.
//!
//! ## Concurrency
//!
//! Single-threaded and non-reentrant by design: the driver dispatches no
//! new event until the previous one returns. All operations are fixed-cost
//! arithmetic over fixed-size state; nothing blocks.

use crate::{
    config::{EngineConfig, Position},
    constants::{MASTER_ANCHOR, MAX_DISTANCE_DIFF_M, SPEED_OF_LIGHT_M_PER_S, TIMESTAMP_FREQ_HZ},
    drift::clock_correction,
    history::PacketHistory,
    measurement::{TdoaMeasurement, ToaSample},
    packet::{AnchorBroadcast, RangePacket},
    sink::MeasurementSink,
    time::{RawTimestamp, WrapTracker},
};

/// Clock-synchronization and TDOA computation engine.
///
/// `S` is the measurement sink the estimator hookup resolves to at
/// composition time; `N` is the anchor slot capacity of the deployment
/// (the width of the packet timestamp table).
#[derive(Debug)]
pub struct TdoaEngine<S: MeasurementSink, const N: usize> {
    config: EngineConfig<N>,
    sink: S,

    history: PacketHistory<N>,

    /// Wrap tracker for the tag's receive-timestamp clock.
    tag_clock: WrapTracker,
    /// Wrap tracker for the master's transmit-timestamp clock.
    master_clock: WrapTracker,

    /// Interval between the two most recent master transmissions, in
    /// master-clock ticks. Zero until two master packets have been seen.
    frame_interval_master: f64,
    /// Persisted tag→master clock correction; identity until two master
    /// packets have been seen.
    tag_to_master: f64,

    /// The most recently accepted sample, paired with the next one.
    last_toa: ToaSample,

    /// Last accepted distance difference per anchor, for telemetry.
    distance_diff: [f32; N],
}

impl<S: MeasurementSink, const N: usize> TdoaEngine<S, N> {
    /// Construct an engine in the fully reset state.
    pub fn new(config: EngineConfig<N>, sink: S) -> Self {
        #[cfg(feature = "log")]
        log::info!(
            "tdoa engine initialized: {} anchors, master id {}",
            config.anchor_count(),
            MASTER_ANCHOR
        );

        Self {
            config,
            sink,
            history: PacketHistory::new(),
            tag_clock: WrapTracker::new(),
            master_clock: WrapTracker::new(),
            frame_interval_master: 0.0,
            tag_to_master: 1.0,
            last_toa: ToaSample::default(),
            distance_diff: [0.0; N],
        }
    }

    /// Reset all internal state to the zeroed/identity values, keeping the
    /// configuration and sink.
    ///
    /// Intended for module startup and tests; must not race an in-flight
    /// event (the single-threaded dispatch model guarantees it cannot).
    pub fn reset(&mut self) {
        self.history.clear();
        self.tag_clock.reset();
        self.master_clock.reset();
        self.frame_interval_master = 0.0;
        self.tag_to_master = 1.0;
        self.last_toa = ToaSample::default();
        self.distance_diff = [0.0; N];
    }

    /// Process one overheard frame.
    ///
    /// `frame` is the raw payload as delivered by the driver (source
    /// address, type byte, timestamp table); `arrival` is the hardware
    /// receive timestamp in the tag's clock. Malformed frames and frames
    /// from anchor ids outside `[0, anchor_count)` are dropped silently.
    pub fn on_packet_received(&mut self, frame: &[u8], arrival: RawTimestamp) {
        let broadcast = match AnchorBroadcast::<N>::parse(frame) {
            Ok(broadcast) => broadcast,
            Err(_err) => {
                #[cfg(feature = "log")]
                log::debug!("dropping unparseable frame: {}", _err);
                return;
            }
        };

        let anchor = broadcast.source;
        if anchor >= self.config.anchor_count() {
            #[cfg(feature = "log")]
            log::debug!("dropping frame from unconfigured anchor {}", anchor);
            return;
        }

        if anchor == MASTER_ANCHOR {
            self.process_master(&broadcast.packet, arrival);
        } else {
            self.process_relay(anchor, &broadcast.packet, arrival);
        }

        // Epilogue, both branches: history always reflects the latest real
        // transmission, regardless of the filter outcome above.
        self.history.record(anchor, &broadcast.packet, arrival);
    }

    /// Master-sender branch: refresh the tag→master correction and emit
    /// the reference time-of-arrival sample.
    fn process_master(&mut self, packet: &RangePacket<N>, arrival: RawTimestamp) {
        let tx_master = packet.timestamp(MASTER_ANCHOR);

        if self.history.seen(MASTER_ANCHOR) {
            let prev_tx_master = self.history.packet(MASTER_ANCHOR).timestamp(MASTER_ANCHOR);
            let rx_master_by_tag = self.history.arrival(MASTER_ANCHOR);

            let frame_in_master = tx_master.wrapping_sub(prev_tx_master) as f64;
            let frame_in_tag = arrival.wrapping_sub(rx_master_by_tag) as f64;

            self.frame_interval_master = frame_in_master;
            self.tag_to_master = clock_correction(frame_in_master, frame_in_tag);
        }

        self.accept(MASTER_ANCHOR, arrival, tx_master.ticks() as i64);
    }

    /// Relay-anchor branch: double-sided two-way ranging against the
    /// buffered master and anchor packets, then the sanity-filtered
    /// distance-difference sample.
    fn process_relay(&mut self, anchor: u8, packet: &RangePacket<N>, arrival: RawTimestamp) {
        let master_packet = self.history.packet(MASTER_ANCHOR);
        let anchor_packet = self.history.packet(anchor);

        let prev_tx_anchor = anchor_packet.timestamp(anchor);
        let rx_anchor_by_master = master_packet.timestamp(anchor);
        let rx_master_by_anchor = packet.timestamp(MASTER_ANCHOR);
        let tx_master = master_packet.timestamp(MASTER_ANCHOR);
        let prev_rx_master_by_anchor = anchor_packet.timestamp(MASTER_ANCHOR);
        let tx_anchor = packet.timestamp(anchor);

        let rx_master_by_tag = self.history.arrival(MASTER_ANCHOR);

        // This anchor's frame interval in its own clock, against the same
        // master-clock interval cached by the master branch.
        let frame_in_anchor = rx_master_by_anchor.wrapping_sub(prev_rx_master_by_anchor) as f64;
        let anchor_to_master = clock_correction(self.frame_interval_master, frame_in_anchor);

        // Double-sided two-way ranging: the two half-exchanges cancel the
        // unknown propagation delay and clock offset.
        let tof_master_to_anchor = ((rx_master_by_anchor.wrapping_sub(prev_tx_anchor) as f64
            * anchor_to_master
            - tx_master.wrapping_sub(rx_anchor_by_master) as f64)
            / 2.0) as i64;

        let delta_tx = (tof_master_to_anchor as f64
            + tx_anchor.wrapping_sub(rx_master_by_anchor) as f64 * anchor_to_master)
            as i64;

        let time_diff_of_arrival = (arrival.wrapping_sub(rx_master_by_tag) as f64
            * self.tag_to_master
            - delta_tx as f64) as i64;

        let tx_anchor_in_master_clock = tx_master.ticks() as i64 + delta_tx;

        let distance_diff =
            (SPEED_OF_LIGHT_M_PER_S * time_diff_of_arrival as f64 / TIMESTAMP_FREQ_HZ) as f32;

        // Sanity filter: a missed intermediate packet corrupts the interval
        // math into wildly implausible distances.
        if libm::fabsf(distance_diff) < MAX_DISTANCE_DIFF_M {
            self.distance_diff[anchor as usize] = distance_diff;
            self.accept(anchor, arrival, tx_anchor_in_master_clock);
        } else {
            #[cfg(feature = "log")]
            log::debug!(
                "rejecting implausible distance diff {} m for anchor {}",
                distance_diff,
                anchor
            );
        }
    }

    /// Measurement emitter: unwrap both clock domains, pair the new sample
    /// with the previously accepted one, and hand it to the sink.
    fn accept(&mut self, anchor: u8, rx: RawTimestamp, tx_in_master_clock: i64) {
        let sample = ToaSample {
            anchor,
            rx: self.tag_clock.unwrap(rx),
            tx: self
                .master_clock
                .unwrap(RawTimestamp::from_ticks(tx_in_master_clock as u64)),
            position: self.config.position(anchor),
        };

        let measurement = TdoaMeasurement::pair(self.last_toa, sample);
        self.sink.enqueue(&measurement);
        self.last_toa = sample;
    }

    /// Last accepted distance difference for `anchor`, in meters.
    ///
    /// Zero until the first relay-branch sample from that anchor passes the
    /// sanity filter; `None` for ids beyond the active anchor count.
    pub fn distance_diff(&self, anchor: u8) -> Option<f32> {
        if anchor < self.config.anchor_count() {
            Some(self.distance_diff[anchor as usize])
        } else {
            None
        }
    }

    /// Current tag→master clock correction.
    pub fn tag_to_master_correction(&self) -> f64 {
        self.tag_to_master
    }

    /// The most recently accepted sample (zeroed after reset).
    pub fn last_accepted(&self) -> &ToaSample {
        &self.last_toa
    }

    /// Read access to the per-anchor packet history.
    pub fn history(&self) -> &PacketHistory<N> {
        &self.history
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig<N> {
        &self.config
    }

    /// Position of `anchor`, if configured.
    pub fn anchor_position(&self, anchor: u8) -> Option<Position> {
        if anchor < self.config.anchor_count() {
            Some(self.config.position(anchor))
        } else {
            None
        }
    }

    /// Read access to the measurement sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the measurement sink (for draining buffered
    /// sinks).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the engine, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
