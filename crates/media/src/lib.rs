//! This library contains everything the player needs to know about media:
//! the [frame] types, the [convert]er from planar 4:2:0 to packed UYVY and the
//! [source] seam that frames are decoded through.

pub mod convert;
pub mod frame;
pub mod source;
