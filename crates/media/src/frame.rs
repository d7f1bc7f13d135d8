//! This module exports everything that has to do with frames: [PlanarFrame]s
//! are what a decoder hands out, [PackedFrame]s are what gets sent.

mod dimensions;
mod packed;
mod planar;
mod rate;

pub use dimensions::*;
pub use packed::*;
pub use planar::*;
pub use rate::*;
