//! The [MediaSource] trait, the seam that decoded frames come through, along
//! with the FFmpeg-backed [FileSource] (with the `ffmpeg` feature).

#[cfg(feature = "ffmpeg")]
mod video;

use std::error::Error;
use std::time::Duration;

use crate::frame::{Dimensions, FrameError, FrameRate, FrameRateError, PlanarFrame};

#[cfg(feature = "ffmpeg")]
pub use video::*;

/// A decoder that is fed compressed units (packets) and hands back decoded
/// frames, one at a time.
///
/// A full pass over a source looks like this: [read_unit](Self::read_unit)
/// until it returns [None], [submit](Self::submit) every unit, and after each
/// submit call [retrieve](Self::retrieve) until it stops returning
/// [Retrieved::Frame]. Then [finish](Self::finish) and retrieve whatever the
/// decoder was still holding on to. [start_over](Self::start_over) begins the
/// next pass.
pub trait MediaSource {
    /// One compressed unit of the selected stream.
    type Unit;

    /// A collection of a few stats about this source.
    ///
    /// # Contract
    ///
    /// Calling this function multiple times should never result in a different
    /// value being returned than what was returned from the first call.
    fn stats(&self) -> SourceStats;

    /// Read the next compressed unit, or [None] if the source is exhausted.
    fn read_unit(&mut self) -> Result<Option<Self::Unit>, SourceError>;

    /// Hand a compressed unit to the decoder.
    fn submit(&mut self, unit: &Self::Unit) -> Result<(), SourceError>;

    /// Try to take a decoded frame out of the decoder.
    ///
    /// The returned frame borrows from the source so it can't outlive the
    /// next call to any other method.
    fn retrieve(&mut self) -> Result<Retrieved<'_>, SourceError>;

    /// Tell the decoder no more units are coming so that it releases any
    /// frames it's holding back. Sources that don't buffer frames can leave
    /// this as it is.
    fn finish(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    /// Reset, starting the source over from the beginning.
    ///
    /// An error being returned indicates that no frames may ever be able to be
    /// be generated again.
    fn start_over(&mut self) -> Result<(), SourceError>;
}

/// The result of [MediaSource::retrieve].
#[derive(Debug)]
pub enum Retrieved<'a> {
    /// A decoded frame.
    Frame(PlanarFrame<'a>),
    /// The decoder needs another unit before it can produce a frame.
    NeedMore,
    /// The decoder has been [finished](MediaSource::finish) and has no more
    /// frames.
    End,
}

/// Stats about a [MediaSource].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceStats {
    /// The rate frames should be played back at.
    pub rate: FrameRate,

    /// The dimensions the decoder reported before the first frame. Frames
    /// carry their own dimensions, these are only informational.
    pub dimensions: Dimensions,

    /// How long one pass over the source lasts, if the container says.
    pub duration: Option<Duration>,
}

/// Implementing this trait allows an error type to be converted to a
/// [SourceError::Other] variant automatically (using the `?` operator).
trait IntoSourceError: Error + Send + Sync {}

impl<E: IntoSourceError + 'static> From<E> for SourceError {
    fn from(err: E) -> Self {
        SourceError::Other(Box::from(err))
    }
}

impl IntoSourceError for FrameError {}

impl IntoSourceError for FrameRateError {}

/// Indicates that something went wrong with an operation for a
/// [MediaSource].
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("{0}")]
    Other(Box<dyn Error + Send + Sync>),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0}")]
struct StaticStrError(&'static str);

impl From<&'static str> for SourceError {
    fn from(str: &'static str) -> Self {
        SourceError::Other(Box::from(StaticStrError(str)))
    }
}
