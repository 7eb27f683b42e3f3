//! Clock-Drift Correction Between Two Domains
//!
//! Anchors and the tag each run on an independent free-running oscillator.
//! Over one broadcast round, the same physical interval is observed by
//! several clocks; the ratio of two such observations is a dimensionless
//! scale factor converting durations from one domain into another.
//!
//! The engine maintains two corrections this way:
//! - tag → master, recomputed on every master packet from the interval
//!   between the two most recent master transmissions (master clock) versus
//!   the interval between their arrivals (tag clock);
//! - anchor → master, computed transiently per relay packet from the same
//!   master-clock frame interval versus the relay's own-clock interval.
//!
//! No smoothing or filtering is applied; each factor comes entirely from
//! the most recent pair of intervals.

/// Scale factor converting a duration observed by one clock into the
/// reference domain's units.
///
/// Returns `reference_interval / observed_interval`, or exactly `1.0` when
/// the observed interval is zero: the identity correction, used both to
/// guard the division and as the designed default when no interval
/// information exists yet.
///
/// Both intervals must cover the same physical time span and already be
/// truncated to the 40-bit counter width, so a single wrap inside the span
/// has cancelled out.
pub fn clock_correction(reference_interval: f64, observed_interval: f64) -> f64 {
    if observed_interval == 0.0 {
        1.0
    } else {
        reference_interval / observed_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_observed_interval_is_identity() {
        assert_eq!(clock_correction(12345.0, 0.0), 1.0);
        assert_eq!(clock_correction(0.0, 0.0), 1.0);
    }

    #[test]
    fn ratio_of_intervals() {
        assert_eq!(clock_correction(1000.0, 1000.0), 1.0);
        assert_eq!(clock_correction(1001.0, 1000.0), 1.001);
        // Observed clock running fast relative to the reference.
        assert!(clock_correction(1000.0, 1002.0) < 1.0);
    }
}
