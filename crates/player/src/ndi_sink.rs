//! Contains [NdiSink], a [VideoSink] that sends frames over NDI.

use grafton_ndi::{NDI, PixelFormat, Sender, SenderOptions, VideoFrame};

use media::frame::{FourCc, PackedFrame};
use playout::{SinkError, VideoSink};

/// Sends frames as an NDI source. Borrows the NDI runtime, which has to stay
/// initialized for as long as this is alive.
pub struct NdiSink<'a> {
    sender: Sender<'a>,
}

impl<'a> NdiSink<'a> {
    /// Announce a source called `name`.
    pub fn new(ndi: &'a NDI, name: &str) -> Result<Self, grafton_ndi::Error> {
        let options = SenderOptions::builder(name).build();
        let sender = Sender::new(ndi, &options)?;
        log::info!("Created the NDI sender `{name}`.");

        Ok(Self { sender })
    }
}

impl VideoSink for NdiSink<'_> {
    fn send(&mut self, frame: &PackedFrame) -> Result<(), SinkError> {
        let (width, height): (usize, usize) = frame.dimensions().into();
        let unsupported = || SinkError::UnsupportedDimensions { width, height };

        let pixel_format = match frame.fourcc() {
            FourCc::Uyvy => PixelFormat::UYVY,
        };

        let rate = frame.rate();
        let mut video_frame = VideoFrame::builder()
            .resolution(
                i32::try_from(width).map_err(|_| unsupported())?,
                i32::try_from(height).map_err(|_| unsupported())?,
            )
            .pixel_format(pixel_format)
            .frame_rate(
                i32::try_from(rate.num()).map_err(|_| unsupported())?,
                i32::try_from(rate.den()).map_err(|_| unsupported())?,
            )
            .aspect_ratio(frame.aspect_ratio())
            .build()
            .map_err(|e| SinkError::Other(Box::new(e)))?;

        // NDI frames are tightly packed, ours keep the decoder's padding.
        if !frame.copy_unpadded(&mut video_frame.data) {
            return Err(unsupported());
        }

        self.sender.send_video(&video_frame);
        Ok(())
    }
}
