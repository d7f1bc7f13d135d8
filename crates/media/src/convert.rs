//! Conversion of decoded frames into the packed layout that gets sent. See
//! [yuv420p_to_uyvy].

use crate::frame::{FrameRate, PackedFrame, PixelFormat, PlanarFrame};

/// Convert a planar YUV 4:2:0 frame to packed UYVY (4:2:2).
///
/// Every output row `r` is built from luma row `r` and chroma row `r / 2`, so
/// each chroma row is used for two output rows. Horizontally, every pair of
/// pixels shares one U and one V sample and is written as `[U, Y0, V, Y1]`.
///
/// The output's stride is twice the luma plane's stride, so padding in the
/// source carries over as zeroed padding in the output. If the width is odd
/// the last pixel of every row is written as `[U, Y]`.
///
/// Frames in any other pixel format are rejected.
pub fn yuv420p_to_uyvy(
    frame: &PlanarFrame<'_>,
    rate: FrameRate,
) -> Result<PackedFrame, ConvertError> {
    if *frame.format() != PixelFormat::Yuv420p {
        return Err(ConvertError::UnsupportedFormat(frame.format().clone()));
    }

    let dimensions = frame.dimensions();
    let width = dimensions.width();
    let chroma_width = dimensions.chroma_420().width();
    let stride = frame.y().stride() * 2;

    let mut packed = PackedFrame::uyvy(dimensions, stride, rate);

    for (row, out_row) in packed.data_mut().chunks_exact_mut(stride).enumerate() {
        let y = frame.y().row(row, width);
        let u = frame.u().row(row / 2, chroma_width);
        let v = frame.v().row(row / 2, chroma_width);

        for (pair, out) in out_row[..width * 2].chunks_mut(4).enumerate() {
            let y0 = y[pair * 2];
            let y1 = y.get(pair * 2 + 1).copied().unwrap_or(y0);
            let samples = [u[pair], y0, v[pair], y1];
            out.copy_from_slice(&samples[..out.len()]);
        }
    }

    Ok(packed)
}

/// Indicates that a frame couldn't be converted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Expected a planar YUV 4:2:0 frame but got a {0} frame.")]
    UnsupportedFormat(PixelFormat),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Dimensions, FourCc, FrameInfo, Plane};

    const RATE: FrameRate = match FrameRate::new(30, 1) {
        Ok(rate) => rate,
        Err(_) => panic!(),
    };

    fn frame<'a>(
        dimensions: Dimensions,
        y: (&'a [u8], usize),
        u: (&'a [u8], usize),
        v: (&'a [u8], usize),
    ) -> PlanarFrame<'a> {
        PlanarFrame::new(
            PixelFormat::Yuv420p,
            dimensions,
            [
                Plane::new(y.0, y.1),
                Plane::new(u.0, u.1),
                Plane::new(v.0, v.1),
            ],
            FrameInfo::default(),
        )
        .unwrap()
    }

    #[test]
    fn two_by_two_layout() {
        let f = frame((2, 2).into(), (&[10, 20, 30, 40], 2), (&[1], 1), (&[2], 1));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.data(), &[1, 10, 2, 20, 1, 30, 2, 40]);
        assert_eq!(packed.stride(), 4);
        assert_eq!(packed.fourcc(), FourCc::Uyvy);
        assert_eq!(packed.rate(), RATE);
        assert_eq!(packed.aspect_ratio(), 1.0);
    }

    #[test]
    fn chroma_rows_are_shared_by_row_pairs() {
        #[rustfmt::skip]
        let y = [
            0, 1, 2, 3,
            4, 5, 6, 7,
            8, 9, 10, 11,
            12, 13, 14, 15,
        ];
        let u = [100, 101, 110, 111];
        let v = [200, 201, 210, 211];
        let f = frame((4, 4).into(), (&y, 4), (&u, 2), (&v, 2));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.row(0), &[100, 0, 200, 1, 101, 2, 201, 3]);
        assert_eq!(packed.row(1), &[100, 4, 200, 5, 101, 6, 201, 7]);
        assert_eq!(packed.row(2), &[110, 8, 210, 9, 111, 10, 211, 11]);
        assert_eq!(packed.row(3), &[110, 12, 210, 13, 111, 14, 211, 15]);
    }

    #[test]
    fn stride_is_twice_the_luma_stride() {
        // 4x2 picture in planes padded out to 8 luma bytes per row.
        let y = [1, 2, 3, 4, 9, 9, 9, 9, 5, 6, 7, 8, 9, 9, 9, 9];
        let u = [50, 51, 9, 9];
        let v = [60, 61, 9, 9];
        let f = frame((4, 2).into(), (&y, 8), (&u, 4), (&v, 4));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.stride(), 16);
        assert_eq!(packed.data().len(), 16 * 2);
        assert_eq!(
            packed.row(0),
            &[50, 1, 60, 2, 51, 3, 61, 4, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            packed.row(1),
            &[50, 5, 60, 6, 51, 7, 61, 8, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn odd_width_ends_with_a_single_pixel() {
        let f = frame((3, 1).into(), (&[1, 2, 3], 3), (&[7, 8], 2), (&[9, 10], 2));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.data(), &[7, 1, 9, 2, 8, 3]);
    }

    #[test]
    fn odd_height_reuses_the_last_chroma_row() {
        let y = [1, 2, 3, 4, 5, 6];
        let f = frame((2, 3).into(), (&y, 2), (&[7, 8], 1), (&[9, 10], 1));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.row(2), &[8, 5, 10, 6]);
    }

    #[test]
    fn other_pixel_formats_are_rejected() {
        let f = PlanarFrame::new(
            PixelFormat::Other("rgb24".into()),
            (2, 2).into(),
            [Plane::new(&[0; 12], 6), Plane::empty(), Plane::empty()],
            FrameInfo::default(),
        )
        .unwrap();

        assert_eq!(
            yuv420p_to_uyvy(&f, RATE),
            Err(ConvertError::UnsupportedFormat(PixelFormat::Other(
                "rgb24".into()
            )))
        );
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let y = [0; 8];
        let f = frame((4, 2).into(), (&y, 4), (&[0, 0], 2), (&[0, 0], 2));
        let packed = yuv420p_to_uyvy(&f, RATE).unwrap();

        assert_eq!(packed.aspect_ratio(), 2.0);
        assert_eq!(packed.dimensions(), (4, 2).into());
    }
}
