//! Declares [PlanarFrame], a borrowed view of a decoded frame, along with the
//! types that describe it.

use std::fmt::{self, Display, Formatter};

use super::Dimensions;

/// The pixel format a decoder produced a frame in.
///
/// Only [PixelFormat::Yuv420p] can be converted for sending. Anything else is
/// carried around by name so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (one Y plane, quarter-size U and V planes).
    Yuv420p,
    /// Any other format, by name.
    Other(String),
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Yuv420p => f.write_str("yuv420p"),
            PixelFormat::Other(name) => f.write_str(name),
        }
    }
}

/// The picture type of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PictureType {
    #[default]
    Unknown,
    Intra,
    Predicted,
    BiPredicted,
    SwitchingIntra,
    SwitchingPredicted,
    Bi,
    Sprite,
}

impl PictureType {
    /// The single character decoders conventionally use for this picture type
    /// (`I`, `P`, `B`, ...). [PictureType::Unknown] is `?`.
    pub const fn as_char(&self) -> char {
        match self {
            PictureType::Unknown => '?',
            PictureType::Intra => 'I',
            PictureType::Predicted => 'P',
            PictureType::BiPredicted => 'B',
            PictureType::Sprite => 'S',
            PictureType::SwitchingIntra => 'i',
            PictureType::SwitchingPredicted => 'p',
            PictureType::Bi => 'b',
        }
    }
}

/// Metadata a decoder attaches to a frame. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInfo {
    /// How many frames the decoder has produced so far (including this one).
    pub number: u64,
    pub picture_type: PictureType,
    /// Size of the compressed unit this frame was decoded from, in bytes.
    pub packet_size: usize,
    /// Presentation timestamp in stream time base units, if the container
    /// has one.
    pub pts: Option<i64>,
    pub key_frame: bool,
}

impl Display for FrameInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {} (type={}, size={} bytes) pts ",
            self.number,
            self.picture_type.as_char(),
            self.packet_size
        )?;
        match self.pts {
            Some(pts) => write!(f, "{pts}")?,
            None => f.write_str("none")?,
        }
        write!(f, " key_frame {}", u8::from(self.key_frame))
    }
}

/// One plane of a [PlanarFrame]: rows of samples, `stride` bytes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane<'a> {
    data: &'a [u8],
    stride: usize,
}

impl<'a> Plane<'a> {
    pub const fn new(data: &'a [u8], stride: usize) -> Self {
        Self { data, stride }
    }

    /// A plane with no data, for formats with fewer than three planes.
    pub const fn empty() -> Self {
        Self::new(&[], 0)
    }

    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The distance between the start of two rows in bytes (the "linesize").
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The first `len` samples of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if the row isn't in the plane. [PlanarFrame::new] checks that
    /// every row of a YUV 4:2:0 frame is.
    pub fn row(&self, row: usize, len: usize) -> &'a [u8] {
        let start = row * self.stride;
        &self.data[start..start + len]
    }

    /// Check that `rows` rows of `row_len` samples fit in this plane. The last
    /// row doesn't need to be padded out to the full stride.
    fn check(&self, name: &'static str, row_len: usize, rows: usize) -> Result<(), FrameError> {
        if self.stride < row_len {
            return Err(FrameError::StrideTooSmall {
                plane: name,
                stride: self.stride,
                row_len,
            });
        }

        let expected = self.stride * (rows - 1) + row_len;
        if self.data.len() < expected {
            return Err(FrameError::PlaneTooSmall {
                plane: name,
                expected,
                actual: self.data.len(),
            });
        }

        Ok(())
    }
}

/// A decoded frame, borrowed from whatever decoded it. The frame is only
/// valid until the next decode call on its source, which the borrow enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarFrame<'a> {
    format: PixelFormat,
    dimensions: Dimensions,
    planes: [Plane<'a>; 3],
    info: FrameInfo,
}

impl<'a> PlanarFrame<'a> {
    /// Create a frame from its planes, in `[Y, U, V]` order for YUV formats.
    ///
    /// For [PixelFormat::Yuv420p] frames this checks that every row of every
    /// plane is in bounds. Frames in other formats are taken as they are
    /// since they can't be converted anyway.
    pub fn new(
        format: PixelFormat,
        dimensions: Dimensions,
        planes: [Plane<'a>; 3],
        info: FrameInfo,
    ) -> Result<Self, FrameError> {
        if format == PixelFormat::Yuv420p {
            let chroma = dimensions.chroma_420();
            planes[0].check("Y", dimensions.width(), dimensions.height())?;
            planes[1].check("U", chroma.width(), chroma.height())?;
            planes[2].check("V", chroma.width(), chroma.height())?;
        }

        Ok(Self {
            format,
            dimensions,
            planes,
            info,
        })
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn info(&self) -> &FrameInfo {
        &self.info
    }

    /// The luma plane.
    pub fn y(&self) -> &Plane<'a> {
        &self.planes[0]
    }

    /// The blue-difference chroma plane.
    pub fn u(&self) -> &Plane<'a> {
        &self.planes[1]
    }

    /// The red-difference chroma plane.
    pub fn v(&self) -> &Plane<'a> {
        &self.planes[2]
    }
}

/// Indicates that a decoded frame's planes don't match its dimensions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error(
        "The {plane} plane's stride ({stride} bytes) is shorter than one of its \
        rows ({row_len} bytes)."
    )]
    StrideTooSmall {
        plane: &'static str,
        stride: usize,
        row_len: usize,
    },
    #[error(
        "The {plane} plane should be at least {expected} bytes long \
        but is actually {actual} bytes long."
    )]
    PlaneTooSmall {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yuv420p<'a>(
        dimensions: Dimensions,
        planes: [Plane<'a>; 3],
    ) -> Result<PlanarFrame<'a>, FrameError> {
        PlanarFrame::new(
            PixelFormat::Yuv420p,
            dimensions,
            planes,
            FrameInfo::default(),
        )
    }

    #[test]
    fn padded_planes_are_accepted() {
        let y = [0; 8 * 3 + 4];
        let uv = [0; 8 + 2];
        let frame = yuv420p(
            (4, 4).into(),
            [Plane::new(&y, 8), Plane::new(&uv, 8), Plane::new(&uv, 8)],
        );
        assert!(frame.is_ok());
    }

    #[test]
    fn short_luma_plane_is_rejected() {
        let y = [0; 7];
        let uv = [0; 1];
        let err = yuv420p(
            (4, 2).into(),
            [Plane::new(&y, 4), Plane::new(&uv, 2), Plane::new(&uv, 2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            FrameError::PlaneTooSmall {
                plane: "Y",
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn stride_shorter_than_width_is_rejected() {
        let y = [0; 16];
        let uv = [0; 4];
        let err = yuv420p(
            (4, 2).into(),
            [Plane::new(&y, 4), Plane::new(&uv, 1), Plane::new(&uv, 2)],
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::StrideTooSmall { plane: "U", .. }));
    }

    #[test]
    fn other_formats_are_not_checked() {
        let frame = PlanarFrame::new(
            PixelFormat::Other("nv12".into()),
            (4, 4).into(),
            [Plane::empty(), Plane::empty(), Plane::empty()],
            FrameInfo::default(),
        );
        assert!(frame.is_ok());
    }

    #[test]
    fn frame_info_log_line() {
        let info = FrameInfo {
            number: 12,
            picture_type: PictureType::Predicted,
            packet_size: 3120,
            pts: Some(6144),
            key_frame: false,
        };
        assert_eq!(
            info.to_string(),
            "Frame 12 (type=P, size=3120 bytes) pts 6144 key_frame 0"
        );
    }
}
