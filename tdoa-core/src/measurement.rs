//! Measurement Types Handed to the Estimator
//!
//! A [`ToaSample`] is one anchor's contribution to a differential
//! measurement: the unwrapped tag-clock arrival time of its packet, the
//! unwrapped master-clock transmit time of that packet, and the anchor's
//! configured position. The engine chains consecutive accepted samples:
//! every new sample is paired with whichever sample was accepted
//! immediately before it (possibly from a different anchor), forming a
//! [`TdoaMeasurement`].

use crate::{config::Position, constants::MEASUREMENT_NOISE_STD_M, time::UnwrappedTime};

/// One anchor's time-of-arrival contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToaSample {
    /// Id of the anchor this sample belongs to.
    pub anchor: u8,
    /// Arrival time at the tag, unwrapped, in the tag's clock domain.
    pub rx: UnwrappedTime,
    /// Transmit time, unwrapped, expressed in the master's clock domain.
    pub tx: UnwrappedTime,
    /// Configured position of the anchor.
    pub position: Position,
}

/// A differential measurement: two consecutive accepted samples plus the
/// fixed measurement-noise standard deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TdoaMeasurement {
    /// `samples[0]` is the previously accepted sample, `samples[1]` the
    /// newly accepted one.
    pub samples: [ToaSample; 2],
    /// Measurement noise standard deviation, in meters.
    pub std_dev: f32,
}

impl TdoaMeasurement {
    /// Pair a new sample with the previously accepted one.
    pub fn pair(previous: ToaSample, latest: ToaSample) -> Self {
        Self {
            samples: [previous, latest],
            std_dev: MEASUREMENT_NOISE_STD_M,
        }
    }

    /// The sample accepted before this measurement's newest one.
    pub fn previous(&self) -> &ToaSample {
        &self.samples[0]
    }

    /// The newly accepted sample.
    pub fn latest(&self) -> &ToaSample {
        &self.samples[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_orders_samples() {
        let older = ToaSample { anchor: 0, rx: 100, tx: 90, position: Position::ORIGIN };
        let newer = ToaSample { anchor: 3, rx: 200, tx: 190, position: Position::ORIGIN };

        let measurement = TdoaMeasurement::pair(older, newer);

        assert_eq!(measurement.previous().anchor, 0);
        assert_eq!(measurement.latest().anchor, 3);
        assert_eq!(measurement.std_dev, MEASUREMENT_NOISE_STD_M);
    }

    /// Serde support lives on the fixed-shape value types only; serde has
    /// no impls for const-generic arrays, so the generic packet and config
    /// types must not derive it.
    #[cfg(feature = "serde")]
    #[test]
    fn value_types_are_serde_capable() {
        fn assert_roundtrip<T: serde::Serialize + serde::de::DeserializeOwned>() {}

        assert_roundtrip::<ToaSample>();
        assert_roundtrip::<TdoaMeasurement>();
        assert_roundtrip::<Position>();
        assert_roundtrip::<crate::time::RawTimestamp>();
    }
}
