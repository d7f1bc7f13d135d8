//! Declares the [FrameRate] type.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU32;
use std::time::Duration;

/// A frame rate as a rational number of frames per second (e.g. `30000/1001`
/// for NTSC video). Both parts are guaranteed to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    num: NonZeroU32,
    den: NonZeroU32,
}

impl FrameRate {
    /// Construct from a numerator and a denominator.
    pub const fn new(num: u32, den: u32) -> Result<Self, FrameRateError> {
        let Some(num) = NonZeroU32::new(num) else {
            return Err(FrameRateError::ZeroNumerator);
        };
        let Some(den) = NonZeroU32::new(den) else {
            return Err(FrameRateError::ZeroDenominator);
        };

        Ok(Self { num, den })
    }

    /// Construct from the signed rational that FFmpeg and NDI use.
    pub fn from_signed(num: i32, den: i32) -> Result<Self, FrameRateError> {
        match (u32::try_from(num), u32::try_from(den)) {
            (Ok(num), Ok(den)) => Self::new(num, den),
            _ => Err(FrameRateError::Negative(num, den)),
        }
    }

    /// The numerator (frames).
    pub const fn num(&self) -> u32 {
        self.num.get()
    }

    /// The denominator (seconds).
    pub const fn den(&self) -> u32 {
        self.den.get()
    }

    /// The time between two frames, truncated to whole microseconds.
    ///
    /// ```
    /// use std::time::Duration;
    /// use media::frame::FrameRate;
    ///
    /// let ntsc = FrameRate::new(30000, 1001).unwrap();
    /// assert_eq!(ntsc.interval(), Duration::from_micros(33366));
    /// ```
    pub const fn interval(&self) -> Duration {
        // Dividing `1_000_000 * den` by `num` (instead of dividing by
        // `num / den`) keeps fractional rates exact to the microsecond.
        Duration::from_micros(1_000_000 * self.den.get() as u64 / self.num.get() as u64)
    }

    /// Frames per second as a float (only meant for display).
    pub fn fps(&self) -> f64 {
        f64::from(self.num.get()) / f64::from(self.den.get())
    }
}

/// When displayed, a [FrameRate] looks like `num/den` (e.g. `30000/1001`).
impl Display for FrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Indicates that a frame rate couldn't be constructed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRateError {
    #[error("A frame rate can't have a numerator of 0.")]
    ZeroNumerator,
    #[error("A frame rate can't have a denominator of 0.")]
    ZeroDenominator,
    #[error("A frame rate can't be negative (got {0}/{1}).")]
    Negative(i32, i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_of_whole_rates() {
        assert_eq!(
            FrameRate::new(25, 1).unwrap().interval(),
            Duration::from_micros(40_000)
        );
        assert_eq!(
            FrameRate::new(60, 1).unwrap().interval(),
            Duration::from_micros(16_666)
        );
    }

    #[test]
    fn interval_of_rates_below_one_fps() {
        // Half a frame per second. `num / den` in integers would be `0`.
        assert_eq!(
            FrameRate::new(1, 2).unwrap().interval(),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn zero_parts_are_rejected() {
        assert_eq!(FrameRate::new(0, 1), Err(FrameRateError::ZeroNumerator));
        assert_eq!(FrameRate::new(30, 0), Err(FrameRateError::ZeroDenominator));
        assert_eq!(
            FrameRate::from_signed(0, 0),
            Err(FrameRateError::ZeroNumerator)
        );
    }

    #[test]
    fn negative_parts_are_rejected() {
        assert_eq!(
            FrameRate::from_signed(-30, 1),
            Err(FrameRateError::Negative(-30, 1))
        );
        assert_eq!(
            FrameRate::from_signed(30, -1),
            Err(FrameRateError::Negative(30, -1))
        );
    }

    #[test]
    fn displays_as_a_fraction() {
        assert_eq!(FrameRate::new(30000, 1001).unwrap().to_string(), "30000/1001");
    }
}
