//! The [VideoSink] trait, where packed frames end up.

use std::error::Error;

use media::frame::PackedFrame;

/// Something that transmits packed frames.
#[cfg_attr(test, mockall::automock)]
pub trait VideoSink {
    /// Send one frame. The frame is only borrowed for the duration of the
    /// call, so a sink that needs the data later has to copy it.
    fn send(&mut self, frame: &PackedFrame) -> Result<(), SinkError>;
}

/// A [VideoSink] that drops every frame it's handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl VideoSink for DiscardSink {
    fn send(&mut self, frame: &PackedFrame) -> Result<(), SinkError> {
        log::trace!("Discarding a {} frame.", frame.dimensions());
        Ok(())
    }
}

/// Indicates that a [VideoSink] failed to send a frame.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("The sink can't send {width}x{height} frames.")]
    UnsupportedDimensions { width: usize, height: usize },
    #[error("{0}")]
    Other(Box<dyn Error + Send + Sync>),
}
