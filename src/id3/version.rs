// Tag versions and the layout rules that differ between them

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::buffer::{
    pack_synchsafe, pack_u24, pack_u32, unpack_synchsafe, unpack_u24, unpack_u32, SYNCHSAFE_MAX,
};

/// ID3v2 major versions this codec reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TagVersion {
    V22,
    V23,
    V24,
}

/// How a frame's size field is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCodec {
    /// Three-byte big-endian integer.
    Plain24,
    /// Four-byte big-endian integer.
    Plain32,
    /// Four bytes of seven bits each.
    Synchsafe,
}

/// Per-version layout rules consumed by the generic frame and tag codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRules {
    pub id_width: usize,
    pub size_codec: SizeCodec,
    pub has_frame_flags: bool,
    pub supports_footer: bool,
    pub supports_compression: bool,
    pub supports_extended_header: bool,
}

impl VersionRules {
    pub fn size_width(&self) -> usize {
        match self.size_codec {
            SizeCodec::Plain24 => 3,
            SizeCodec::Plain32 | SizeCodec::Synchsafe => 4,
        }
    }

    /// Total frame header length.
    pub fn frame_header_len(&self) -> usize {
        self.id_width + self.size_width() + if self.has_frame_flags { 2 } else { 0 }
    }

    /// Largest value the size field can hold.
    pub fn max_size(&self) -> u32 {
        match self.size_codec {
            SizeCodec::Plain24 => 0x00FF_FFFF,
            SizeCodec::Plain32 => u32::MAX,
            SizeCodec::Synchsafe => SYNCHSAFE_MAX,
        }
    }

    /// Pack a size field. `size` must not exceed `max_size()`.
    pub fn pack_size(&self, size: u32) -> Vec<u8> {
        debug_assert!(size <= self.max_size(), "size {size} does not fit its size field");
        match self.size_codec {
            SizeCodec::Plain24 => pack_u24(size).to_vec(),
            SizeCodec::Plain32 => pack_u32(size).to_vec(),
            SizeCodec::Synchsafe => pack_synchsafe(size).to_vec(),
        }
    }

    /// Decode a size field; `bytes` must hold `size_width()` bytes.
    pub fn unpack_size(&self, bytes: &[u8]) -> u32 {
        match self.size_codec {
            SizeCodec::Plain24 => unpack_u24([bytes[0], bytes[1], bytes[2]]),
            SizeCodec::Plain32 => unpack_u32([bytes[0], bytes[1], bytes[2], bytes[3]]),
            SizeCodec::Synchsafe => unpack_synchsafe([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}

const V22_RULES: VersionRules = VersionRules {
    id_width: 3,
    size_codec: SizeCodec::Plain24,
    has_frame_flags: false,
    supports_footer: false,
    supports_compression: true,
    supports_extended_header: false,
};

const V23_RULES: VersionRules = VersionRules {
    id_width: 4,
    size_codec: SizeCodec::Plain32,
    has_frame_flags: true,
    supports_footer: false,
    supports_compression: false,
    supports_extended_header: true,
};

const V24_RULES: VersionRules = VersionRules {
    id_width: 4,
    size_codec: SizeCodec::Synchsafe,
    has_frame_flags: true,
    supports_footer: true,
    supports_compression: false,
    supports_extended_header: true,
};

impl TagVersion {
    pub fn from_major(major: u8, minor: u8) -> Result<Self> {
        match major {
            2 => Ok(TagVersion::V22),
            3 => Ok(TagVersion::V23),
            4 => Ok(TagVersion::V24),
            _ => Err(Error::UnsupportedVersion { major, minor }),
        }
    }

    pub fn major(self) -> u8 {
        match self {
            TagVersion::V22 => 2,
            TagVersion::V23 => 3,
            TagVersion::V24 => 4,
        }
    }

    pub fn rules(self) -> &'static VersionRules {
        match self {
            TagVersion::V22 => &V22_RULES,
            TagVersion::V23 => &V23_RULES,
            TagVersion::V24 => &V24_RULES,
        }
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2.{}", self.major())
    }
}
