//! The module contains [FileSource], a [MediaSource](super::MediaSource) that
//! decodes the best video stream of almost any kind of video file (using
//! FFmpeg).

use std::path::Path;
use std::time::Duration;

use ctor::ctor;

use ffmpeg::codec::Context as FFmpegCodecContext;
use ffmpeg::codec::decoder::Video as FFmpegVideoDecoder;
use ffmpeg::format::Pixel as FFmpegPixelFormat;
use ffmpeg::format::context::Input as FFmpegInputFormatContext;
use ffmpeg::format::stream::Stream as FFmpegStream;
use ffmpeg::frame::Video as FFmpegVideoFrame;
use ffmpeg::media::Type as FFmpegMediaType;
use ffmpeg::picture::Type as FFmpegPictureType;
use ffmpeg::{Packet as FFmpegPacket, Rational as FFmpegRational};
use ffmpeg_next as ffmpeg;

use super::{IntoSourceError, MediaSource, Retrieved, SourceError, SourceStats};
use crate::frame::{
    Dimensions, FrameInfo, FrameRate, FrameRateError, PictureType, PixelFormat, PlanarFrame,
    Plane,
};

/// A [MediaSource](super::MediaSource) that decodes the best video stream of a
/// file.
pub struct FileSource {
    input_context: FFmpegInputFormatContext,
    decoder: FFmpegVideoDecoder,
    frame: FFmpegVideoFrame,
    video_stream_index: usize,
    stats: SourceStats,
    frames_decoded: u64,
    last_packet_size: usize,
}

impl FileSource {
    /// Open a video file and set up a decoder for its best video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FileSourceError> {
        Self::open_impl(path.as_ref())
    }

    fn open_impl(path: &Path) -> Result<Self, FileSourceError> {
        log::info!(
            "Opening the input file ({}) and loading the container header.",
            path.display()
        );

        // This object is a handle to the file we opened. Right now this is
        // just the kind of container (e.g. MP4, MKV) and its metadata.
        let input_context =
            ffmpeg::format::input(path).map_err(|_| FileSourceError::NoInputContext)?;

        log::info!(
            "Format {}, duration {} us, bit_rate {}.",
            input_context.format().name(),
            input_context.duration(),
            input_context.bit_rate()
        );

        for stream in input_context.streams() {
            log_stream(&stream);
        }

        let video_stream = input_context
            .streams()
            .best(FFmpegMediaType::Video)
            .ok_or(FileSourceError::NoBestVideoStream)?;

        // Packets from every other stream get skipped.
        let video_stream_index = video_stream.index();

        let decoder = FFmpegCodecContext::from_parameters(video_stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|_| FileSourceError::DecoderCreateFailure)?;

        let stats = Self::get_source_stats(&input_context, &decoder, &video_stream)?;

        log::info!(
            "Using stream #{video_stream_index}: {} at {} fps ({}).",
            stats.dimensions,
            stats.rate,
            decoder.format().descriptor().map_or("unknown format", |d| d.name()),
        );

        Ok(Self {
            input_context,
            decoder,
            frame: FFmpegVideoFrame::empty(),
            video_stream_index,
            stats,
            frames_decoded: 0,
            last_packet_size: 0,
        })
    }

    fn get_source_stats(
        input_context: &FFmpegInputFormatContext,
        decoder: &FFmpegVideoDecoder,
        video_stream: &FFmpegStream,
    ) -> Result<SourceStats, FileSourceError> {
        // The container's guess at the real base frame rate is what the
        // frames are timed by. Some containers only have an average.
        let rate = frame_rate(video_stream.rate())
            .or_else(|_| frame_rate(video_stream.avg_frame_rate()))?;

        let dimensions = Dimensions::new(decoder.width() as usize, decoder.height() as usize)
            .ok_or_else(|| FileSourceError::ZeroLengthSide(decoder.width(), decoder.height()))?;

        // The container's duration is in `AV_TIME_BASE` units (microseconds).
        let duration = u64::try_from(input_context.duration())
            .ok()
            .filter(|&micros| micros > 0)
            .map(Duration::from_micros);

        Ok(SourceStats {
            rate,
            dimensions,
            duration,
        })
    }
}

impl MediaSource for FileSource {
    type Unit = FFmpegPacket;

    fn stats(&self) -> SourceStats {
        self.stats
    }

    fn read_unit(&mut self) -> Result<Option<Self::Unit>, SourceError> {
        // Internally, the `packets` iterator mutates our `input_context`, not
        // its own internal state. This means we can re-create the packets
        // iterator each time we want to grab a new packet.
        for (stream, packet) in self.input_context.packets() {
            if stream.index() == self.video_stream_index {
                log::trace!("Packet pts {:?}.", packet.pts());
                return Ok(Some(packet));
            }
        }

        Ok(None)
    }

    fn submit(&mut self, unit: &Self::Unit) -> Result<(), SourceError> {
        self.last_packet_size = unit.size();
        self.decoder.send_packet(unit)?;
        Ok(())
    }

    fn retrieve(&mut self) -> Result<Retrieved<'_>, SourceError> {
        match self.decoder.receive_frame(&mut self.frame) {
            Ok(()) => {}
            Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::error::EAGAIN => {
                return Ok(Retrieved::NeedMore);
            }
            Err(ffmpeg::Error::Eof) => return Ok(Retrieved::End),
            Err(e) => return Err(e.into()),
        }

        self.frames_decoded += 1;
        let frame = &self.frame;

        let dimensions = Dimensions::new(frame.width() as usize, frame.height() as usize)
            .ok_or_else(|| FileSourceError::ZeroLengthSide(frame.width(), frame.height()))?;

        let format = pixel_format(frame.format());

        let mut planes = [Plane::empty(); 3];
        for (i, plane) in planes.iter_mut().enumerate().take(frame.planes()) {
            *plane = Plane::new(frame.data(i), frame.stride(i));
        }

        let info = FrameInfo {
            number: self.frames_decoded,
            picture_type: picture_type(frame.kind()),
            packet_size: self.last_packet_size,
            pts: frame.pts(),
            key_frame: frame.is_key(),
        };

        Ok(Retrieved::Frame(PlanarFrame::new(format, dimensions, planes, info)?))
    }

    fn finish(&mut self) -> Result<(), SourceError> {
        self.decoder.send_eof()?;
        Ok(())
    }

    fn start_over(&mut self) -> Result<(), SourceError> {
        self.input_context.seek(0, ..)?;
        self.decoder.flush();
        Ok(())
    }
}

fn log_stream(stream: &FFmpegStream) {
    let time_base = stream.time_base();
    let rate = stream.rate();
    log::info!(
        "Stream #{}: time_base {}/{}, r_frame_rate {}/{}, start_time {}, duration {}.",
        stream.index(),
        time_base.numerator(),
        time_base.denominator(),
        rate.numerator(),
        rate.denominator(),
        stream.start_time(),
        stream.duration()
    );

    let parameters = stream.parameters();
    let medium = parameters.medium();
    let Some(codec) = ffmpeg::codec::decoder::find(parameters.id()) else {
        log::warn!("Stream #{} uses an unsupported codec.", stream.index());
        return;
    };

    let Ok(context) = FFmpegCodecContext::from_parameters(parameters) else {
        return;
    };
    let decoder = context.decoder();

    match medium {
        FFmpegMediaType::Video => {
            if let Ok(video) = decoder.video() {
                log::info!(
                    "\tVideo codec {}: resolution {} x {}, bit_rate {}.",
                    codec.name(),
                    video.width(),
                    video.height(),
                    video.bit_rate()
                );
            }
        }
        FFmpegMediaType::Audio => {
            if let Ok(audio) = decoder.audio() {
                log::info!(
                    "\tAudio codec {}: {} channels, sample rate {}, bit_rate {}.",
                    codec.name(),
                    audio.channels(),
                    audio.rate(),
                    audio.bit_rate()
                );
            }
        }
        other => log::info!("\tCodec {} ({other:?}).", codec.name()),
    }
}

fn frame_rate(rational: FFmpegRational) -> Result<FrameRate, FrameRateError> {
    FrameRate::from_signed(rational.numerator(), rational.denominator())
}

fn pixel_format(format: FFmpegPixelFormat) -> PixelFormat {
    match format {
        FFmpegPixelFormat::YUV420P => PixelFormat::Yuv420p,
        other => PixelFormat::Other(
            other
                .descriptor()
                .map_or_else(|| format!("{other:?}"), |d| d.name().to_owned()),
        ),
    }
}

fn picture_type(kind: FFmpegPictureType) -> PictureType {
    match kind {
        FFmpegPictureType::None => PictureType::Unknown,
        FFmpegPictureType::I => PictureType::Intra,
        FFmpegPictureType::P => PictureType::Predicted,
        FFmpegPictureType::B => PictureType::BiPredicted,
        FFmpegPictureType::S => PictureType::Sprite,
        FFmpegPictureType::SI => PictureType::SwitchingIntra,
        FFmpegPictureType::SP => PictureType::SwitchingPredicted,
        FFmpegPictureType::BI => PictureType::Bi,
    }
}

/// Indicates that something went wrong opening or decoding a [FileSource].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSourceError {
    #[error("Failed to open the input file.")]
    NoInputContext,
    #[error("The input file does not contain a video stream.")]
    NoBestVideoStream,
    #[error("Failed to create a decoder.")]
    DecoderCreateFailure,
    #[error(
        "The video stream shouldn't have dimensions with a 0-length side \
        ({0}x{1} has no area)."
    )]
    ZeroLengthSide(u32, u32),
    #[error("The video stream has no usable frame rate: {0}")]
    NoFrameRate(#[from] FrameRateError),
}

impl IntoSourceError for FileSourceError {}

impl IntoSourceError for ffmpeg::Error {}

/// Initializes FFmpeg. This happens when the [crate] is loaded.
///
/// You should never actually call this function.
#[ctor]
fn ffmpeg_init() {
    ffmpeg::init().expect("FFmpeg shouldn't fail to initialize.");
}
