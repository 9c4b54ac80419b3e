// MPEG audio frame header decoding

use serde::Serialize;

use crate::error::MpegHeaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MpegVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "2.0")]
    V2,
    #[serde(rename = "2.5")]
    V25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MpegLayer {
    I,
    II,
    III,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualMono,
    Mono,
}

impl ChannelMode {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelMode::Stereo => "Stereo",
            ChannelMode::JointStereo => "Joint stereo",
            ChannelMode::DualMono => "Dual mono",
            ChannelMode::Mono => "Mono",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Emphasis {
    None,
    Ms50_15,
    CcittJ17,
}

impl Emphasis {
    pub fn name(&self) -> &'static str {
        match self {
            Emphasis::None => "None",
            Emphasis::Ms50_15 => "50/15 ms",
            Emphasis::CcittJ17 => "CCITT J.17",
        }
    }
}

const BITRATES_V1_L1: [u32; 14] = [32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448];
const BITRATES_V1_L2: [u32; 14] = [32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384];
const BITRATES_V1_L3: [u32; 14] = [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const BITRATES_V2_L1: [u32; 14] = [32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256];
const BITRATES_V2_L23: [u32; 14] = [8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

const SAMPLE_RATES_V1: [u32; 3] = [44100, 48000, 32000];
const SAMPLE_RATES_V2: [u32; 3] = [22050, 24000, 16000];
const SAMPLE_RATES_V25: [u32; 3] = [11025, 12000, 8000];

const L3_MODE_EXTENSIONS: [&str; 4] = ["None", "Intensity stereo", "M/S stereo", "Intensity & M/S stereo"];
const L12_MODE_EXTENSIONS: [&str; 4] = ["Bands 4-31", "Bands 8-31", "Bands 12-31", "Bands 16-31"];

/// A decoded 4-byte MPEG audio frame header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MpegFrameHeader {
    pub version: MpegVersion,
    pub layer: MpegLayer,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    pub channel_mode: ChannelMode,
    /// Only meaningful for joint stereo.
    pub mode_extension: Option<&'static str>,
    pub emphasis: Emphasis,
    /// The raw protection bit. A set bit means no CRC follows the header.
    pub has_protection: bool,
    pub has_padding: bool,
    pub is_private: bool,
    pub is_copyright: bool,
    pub is_original: bool,
    pub length_in_bytes: usize,
}

impl MpegFrameHeader {
    pub const SIZE: usize = 4;

    /// Decode the first four bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self, MpegHeaderError> {
        let &[b0, b1, b2, b3, ..] = bytes else {
            return Err(MpegHeaderError::InvalidFrameSync);
        };
        if b0 != 0xFF || b1 & 0xE0 != 0xE0 {
            return Err(MpegHeaderError::InvalidFrameSync);
        }

        let version = match (b1 >> 3) & 0x03 {
            0 => MpegVersion::V25,
            2 => MpegVersion::V2,
            3 => MpegVersion::V1,
            _ => return Err(MpegHeaderError::InvalidVersion),
        };
        let layer = match (b1 >> 1) & 0x03 {
            1 => MpegLayer::III,
            2 => MpegLayer::II,
            3 => MpegLayer::I,
            _ => return Err(MpegHeaderError::InvalidLayer),
        };
        let has_protection = b1 & 0x01 != 0;

        let bitrate_index = usize::from(b2 >> 4);
        if bitrate_index == 0 || bitrate_index == 15 {
            return Err(MpegHeaderError::InvalidBitrate);
        }
        let bitrate_kbps = bitrate_table(version, layer)[bitrate_index - 1];

        let sample_rate_index = usize::from((b2 >> 2) & 0x03);
        let sample_rate_hz = *sample_rate_table(version)
            .get(sample_rate_index)
            .ok_or(MpegHeaderError::InvalidSampleRate)?;

        let has_padding = b2 & 0x02 != 0;
        let is_private = b2 & 0x01 != 0;

        let channel_mode = match b3 >> 6 {
            0 => ChannelMode::Stereo,
            1 => ChannelMode::JointStereo,
            2 => ChannelMode::DualMono,
            _ => ChannelMode::Mono,
        };
        let extension = usize::from((b3 >> 4) & 0x03);
        let mode_extension = (channel_mode == ChannelMode::JointStereo).then(|| match layer {
            MpegLayer::III => L3_MODE_EXTENSIONS[extension],
            _ => L12_MODE_EXTENSIONS[extension],
        });
        let is_copyright = b3 & 0x08 != 0;
        let is_original = b3 & 0x04 != 0;
        let emphasis = match b3 & 0x03 {
            0 => Emphasis::None,
            1 => Emphasis::Ms50_15,
            3 => Emphasis::CcittJ17,
            _ => return Err(MpegHeaderError::InvalidEmphasis),
        };

        let length_in_bytes = frame_length(layer, bitrate_kbps, sample_rate_hz, has_padding);
        Ok(MpegFrameHeader {
            version,
            layer,
            bitrate_kbps,
            sample_rate_hz,
            channel_mode,
            mode_extension,
            emphasis,
            has_protection,
            has_padding,
            is_private,
            is_copyright,
            is_original,
            length_in_bytes,
        })
    }

    /// Offset of a Xing/Info header from the start of the frame.
    pub fn xing_offset(&self) -> usize {
        let mono = self.channel_mode == ChannelMode::Mono;
        let side_info = match (self.version, mono) {
            (MpegVersion::V1, false) => 32,
            (MpegVersion::V1, true) | (_, false) => 17,
            (_, true) => 9,
        };
        Self::SIZE + side_info
    }
}

fn bitrate_table(version: MpegVersion, layer: MpegLayer) -> &'static [u32; 14] {
    match (version, layer) {
        (MpegVersion::V1, MpegLayer::I) => &BITRATES_V1_L1,
        (MpegVersion::V1, MpegLayer::II) => &BITRATES_V1_L2,
        (MpegVersion::V1, MpegLayer::III) => &BITRATES_V1_L3,
        (_, MpegLayer::I) => &BITRATES_V2_L1,
        (_, _) => &BITRATES_V2_L23,
    }
}

fn sample_rate_table(version: MpegVersion) -> &'static [u32; 3] {
    match version {
        MpegVersion::V1 => &SAMPLE_RATES_V1,
        MpegVersion::V2 => &SAMPLE_RATES_V2,
        MpegVersion::V25 => &SAMPLE_RATES_V25,
    }
}

/// Total frame length in bytes, header included.
pub fn frame_length(layer: MpegLayer, bitrate_kbps: u32, sample_rate_hz: u32, padding: bool) -> usize {
    let (bitrate, sample_rate) = (u64::from(bitrate_kbps), u64::from(sample_rate_hz));
    let length = match layer {
        MpegLayer::I => 48_000 * bitrate / sample_rate + if padding { 4 } else { 0 },
        _ => 144_000 * bitrate / sample_rate + u64::from(padding),
    };
    length as usize
}
