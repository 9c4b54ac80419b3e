//! Read and write MP3 metadata: ID3v1 and ID3v2 (2.2, 2.3, 2.4) tags and
//! MPEG audio frame headers.
//!
//! The codec works on byte buffers. [`Id3v2Tag::decode`] and
//! [`Id3v2Tag::encode`] reproduce every frame they understand byte for byte;
//! [`Mp3File`] is a thin layer that locates tags and audio inside a file.

pub mod error;
pub mod file;
pub mod id3;
pub mod mpeg;
pub mod utils;

pub use error::{Error, MpegHeaderError, Result};
pub use file::{AudioSummary, Mp3File};
pub use id3::{EncodedText, Frame, FrameData, FrameSet, Id3v1Tag, Id3v2Tag, TagVersion};
pub use mpeg::MpegFrameHeader;
pub use utils::TextEncoding;
