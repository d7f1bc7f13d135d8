//! Declares [PackedFrame], a frame ready to be sent.

use super::{Dimensions, FrameRate};

/// The layout of the bytes in a [PackedFrame].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FourCc {
    /// Packed 4:2:2, 16bpp. Every two pixels are `[U, Y0, V, Y1]`.
    Uyvy,
}

/// An owned, packed frame. One of these is created for every converted frame
/// and dropped once it has been sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedFrame {
    data: Vec<u8>,
    dimensions: Dimensions,
    stride: usize,
    rate: FrameRate,
    aspect_ratio: f32,
    fourcc: FourCc,
}

impl PackedFrame {
    /// Create a zeroed UYVY frame with `stride` bytes per row.
    pub(crate) fn uyvy(dimensions: Dimensions, stride: usize, rate: FrameRate) -> Self {
        Self {
            data: vec![0; stride * dimensions.height()],
            dimensions,
            stride,
            rate,
            aspect_ratio: dimensions.aspect_ratio(),
            fourcc: FourCc::Uyvy,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The bytes of row `row`, including any padding at the end of it.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.stride..(row + 1) * self.stride]
    }

    /// The number of meaningful bytes in a row, without the padding.
    pub fn row_len(&self) -> usize {
        match self.fourcc {
            FourCc::Uyvy => self.dimensions.width() * 2,
        }
    }

    /// Copy the rows into `out` one right after another, dropping the padding
    /// at the end of each row.
    ///
    /// Returns `false` (and leaves `out` untouched) if `out` is shorter than
    /// [row_len](Self::row_len) times the height.
    pub fn copy_unpadded(&self, out: &mut [u8]) -> bool {
        let row_len = self.row_len();
        let height = self.dimensions.height();
        if out.len() < row_len * height {
            return false;
        }

        for (row, dst) in out.chunks_exact_mut(row_len).take(height).enumerate() {
            dst.copy_from_slice(&self.row(row)[..row_len]);
        }
        true
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The distance between the start of two rows in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// The picture aspect ratio (width divided by height).
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn fourcc(&self) -> FourCc {
        self.fourcc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: FrameRate = match FrameRate::new(25, 1) {
        Ok(rate) => rate,
        Err(_) => panic!(),
    };

    /// A 3x2 frame with 2 bytes of padding per row. Every meaningful byte is
    /// its row number plus one, padding is `0xff`.
    fn padded_frame() -> PackedFrame {
        let mut frame = PackedFrame::uyvy((3, 2).into(), 8, RATE);
        for (row, bytes) in frame.data_mut().chunks_exact_mut(8).enumerate() {
            bytes[..6].fill(row as u8 + 1);
            bytes[6..].fill(0xff);
        }
        frame
    }

    #[test]
    fn unpadded_copy_drops_the_padding() {
        let frame = padded_frame();
        assert_eq!(frame.row_len(), 6);

        let mut out = [0; 12];
        assert!(frame.copy_unpadded(&mut out));
        assert_eq!(out, [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn unpadded_copy_leaves_extra_space_alone() {
        let mut out = [7; 14];
        assert!(padded_frame().copy_unpadded(&mut out));
        assert_eq!(out[12..], [7, 7]);
    }

    #[test]
    fn unpadded_copy_needs_room_for_every_row() {
        let mut out = [0; 11];
        assert!(!padded_frame().copy_unpadded(&mut out));
        assert_eq!(out, [0; 11]);
    }
}
