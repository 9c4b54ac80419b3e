// MPEG audio frame handling

pub mod header;

pub use header::{ChannelMode, Emphasis, MpegFrameHeader, MpegLayer, MpegVersion};
