//! Measurement Sinks
//!
//! The engine never talks to the position estimator directly; it depends on
//! a [`MeasurementSink`] capability and invokes it unconditionally for
//! every accepted sample. Which sink is wired in is a composition-time
//! decision: firmware hands the engine a sink that enqueues into the state
//! estimator, a host-side consumer might buffer measurements, and a build
//! without an estimator uses [`NullSink`]. This replaces the conditional
//! compilation a firmware implementation would reach for.
//!
//! The contract is fire-and-forget: no acknowledgment, no backpressure. A
//! sink that cannot take a measurement simply drops it.

use crate::measurement::TdoaMeasurement;

/// Receiver of emitted differential measurements.
pub trait MeasurementSink {
    /// Take ownership of one measurement. Must not block.
    fn enqueue(&mut self, measurement: &TdoaMeasurement);
}

/// Sink that discards every measurement.
///
/// Satisfies the engine's dependency when no estimator is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MeasurementSink for NullSink {
    fn enqueue(&mut self, _measurement: &TdoaMeasurement) {}
}

/// Bounded buffering sink.
///
/// Holds up to `CAP` measurements for a consumer to drain; once full,
/// further measurements are counted and dropped, honoring the
/// fire-and-forget contract. Useful both as a test double and as a staging
/// queue toward an asynchronous consumer.
#[derive(Debug, Default)]
pub struct BufferedSink<const CAP: usize> {
    queue: heapless::Vec<TdoaMeasurement, CAP>,
    dropped: u32,
}

impl<const CAP: usize> BufferedSink<CAP> {
    /// Empty sink.
    pub const fn new() -> Self {
        Self {
            queue: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Measurements currently buffered, oldest first.
    pub fn measurements(&self) -> &[TdoaMeasurement] {
        &self.queue
    }

    /// Number of buffered measurements.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Measurements dropped because the buffer was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Remove and return all buffered measurements.
    pub fn drain(&mut self) -> heapless::Vec<TdoaMeasurement, CAP> {
        core::mem::take(&mut self.queue)
    }
}

impl<const CAP: usize> MeasurementSink for BufferedSink<CAP> {
    fn enqueue(&mut self, measurement: &TdoaMeasurement) {
        if self.queue.push(*measurement).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

impl<S: MeasurementSink> MeasurementSink for &mut S {
    fn enqueue(&mut self, measurement: &TdoaMeasurement) {
        (**self).enqueue(measurement)
    }
}
