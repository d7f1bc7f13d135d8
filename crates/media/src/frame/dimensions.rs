//! Declares the [Dimensions] type, the width and height of a frame.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;

/// A width and a height, both guaranteed to be non-zero.
///
/// # Example
///
/// [From<(usize, usize)>] is implemented for [Dimensions]. If either side is
/// `0`, the thread will panic. [Into::into] should really only be used if
/// you're providing the side lengths as literals (e.g. `(1920, 1080).into()`).
///
/// ```
/// use media::frame::Dimensions;
///
/// let d: Dimensions = (1920, 1080).into();
/// assert_eq!(d.width(), 1920);
/// assert_eq!(d.height(), 1080);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: NonZeroUsize,
    height: NonZeroUsize,
}

impl Dimensions {
    /// Construct from a width and a height.
    ///
    /// This function will return [None] if the width or height are 0.
    pub const fn new(width: usize, height: usize) -> Option<Self> {
        let Some(width) = NonZeroUsize::new(width) else {
            return None;
        };
        let Some(height) = NonZeroUsize::new(height) else {
            return None;
        };

        Some(Self { width, height })
    }

    /// The dimensions' width. This will never be `0`.
    pub const fn width(&self) -> usize {
        self.width.get()
    }

    /// The dimensions' height. This will never be `0`.
    pub const fn height(&self) -> usize {
        self.height.get()
    }

    /// The number of pixels in a frame with these dimensions.
    pub const fn area(&self) -> usize {
        self.width.get() * self.height.get()
    }

    /// The dimensions of the chroma planes of a 4:2:0 frame with these
    /// dimensions. Odd sides round up, so a `5x3` frame has `3x2` chroma
    /// planes.
    ///
    /// ```
    /// use media::frame::Dimensions;
    ///
    /// let d: Dimensions = (1920, 1080).into();
    /// assert_eq!(d.chroma_420(), (960, 540).into());
    ///
    /// let d: Dimensions = (5, 3).into();
    /// assert_eq!(d.chroma_420(), (3, 2).into());
    /// ```
    pub const fn chroma_420(&self) -> Self {
        let width = self.width.get().div_ceil(2);
        let height = self.height.get().div_ceil(2);

        // Both halves of a non-zero side round up to at least `1`.
        match Self::new(width, height) {
            Some(chroma) => chroma,
            None => *self,
        }
    }

    /// The picture aspect ratio (width divided by height).
    ///
    /// ```
    /// use media::frame::Dimensions;
    ///
    /// let d: Dimensions = (1920, 1080).into();
    /// assert!((d.aspect_ratio() - 16.0 / 9.0).abs() < f32::EPSILON);
    /// ```
    pub fn aspect_ratio(&self) -> f32 {
        self.width.get() as f32 / self.height.get() as f32
    }
}

/// When displayed, [Dimensions] will look like `WxH` (e.g. `1920x1080`).
impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// If either side is `0`, the thread will panic. [Into::into] should really
/// only be used if you're providing the side lengths as literals (e.g.
/// `(1920, 1080).into()`).
impl From<(usize, usize)> for Dimensions {
    fn from(dimensions: (usize, usize)) -> Self {
        Self::new(dimensions.0, dimensions.1).expect("Both sides must be non-zero.")
    }
}

impl From<Dimensions> for (usize, usize) {
    fn from(dimensions: Dimensions) -> Self {
        (dimensions.width(), dimensions.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sides_are_rejected() {
        assert_eq!(Dimensions::new(0, 1080), None);
        assert_eq!(Dimensions::new(1920, 0), None);
        assert!(Dimensions::new(1, 1).is_some());
    }

    #[test]
    fn odd_sides_keep_a_chroma_sample() {
        let d: Dimensions = (1, 1).into();
        assert_eq!(d.chroma_420(), (1, 1).into());
    }

    #[test]
    fn displays_as_width_by_height() {
        let d: Dimensions = (640, 480).into();
        assert_eq!(d.to_string(), "640x480");
    }
}
