// ID3v2 tag implementation

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::id3::frame::{Frame, FrameSet};
use crate::id3::frames::{ids, FrameData};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{
    pack_synchsafe, read_synchsafe, read_u32, slice, synchronise, unsynchronise, SYNCHSAFE_MAX,
};

/// Length of the tag header and of the optional footer.
pub const HEADER_SIZE: usize = 10;

/// Zero bytes appended when padding is requested.
pub const PADDING_LENGTH: usize = 256;

const TAG_ID: &[u8; 3] = b"ID3";
const FOOTER_ID: &[u8; 3] = b"3DI";

/// Flags from the tag header byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFlags {
    pub unsynchronisation: bool,
    /// Only defined for v2.2.
    pub compression: bool,
    pub experimental: bool,
    /// Only defined for v2.4.
    pub footer: bool,
}

/// The fixed 10-byte tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: TagVersion,
    pub minor: u8,
    pub flags: TagFlags,
    pub extended_header: bool,
    /// Tag size excluding header and footer.
    pub size: u32,
}

impl Id3v2Header {
    /// Parse and validate a header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE || &bytes[..3] != TAG_ID {
            return Err(Error::NoSuchTag);
        }
        let version = TagVersion::from_major(bytes[3], bytes[4])?;
        let flags = bytes[5];
        if flags & 0x0F != 0 {
            return Err(Error::UnsupportedTag(format!("unknown header flags {flags:#04x}")));
        }
        let size = read_synchsafe(bytes, 6)?;
        if size == 0 {
            return Err(Error::invalid("tag size is zero"));
        }

        let rules = version.rules();
        Ok(Id3v2Header {
            version,
            minor: bytes[4],
            flags: TagFlags {
                unsynchronisation: flags & 0x80 != 0,
                compression: rules.supports_compression && flags & 0x40 != 0,
                experimental: version != TagVersion::V22 && flags & 0x20 != 0,
                footer: rules.supports_footer && flags & 0x10 != 0,
            },
            extended_header: rules.supports_extended_header && flags & 0x40 != 0,
            size,
        })
    }

    fn flags_byte(&self) -> u8 {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        bit(self.flags.unsynchronisation, 0x80)
            | bit(self.flags.compression || self.extended_header, 0x40)
            | bit(self.flags.experimental, 0x20)
            | bit(self.flags.footer, 0x10)
    }

    /// Header bytes, or footer bytes when `footer` is set.
    pub fn pack(&self, footer: bool) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..3].copy_from_slice(if footer { FOOTER_ID } else { TAG_ID });
        bytes[3] = self.version.major();
        bytes[4] = self.minor;
        bytes[5] = self.flags_byte();
        bytes[6..].copy_from_slice(&pack_synchsafe(self.size));
        bytes
    }
}

/// A versioned ID3v2 tag: header flags plus frame sets keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Id3v2Tag {
    version: TagVersion,
    minor: u8,
    flags: TagFlags,
    /// Raw extended header, including its size field.
    extended_header: Option<Vec<u8>>,
    padding: usize,
    frame_sets: BTreeMap<String, FrameSet>,
}

impl Id3v2Tag {
    /// An empty tag of `version`.
    pub fn new(version: TagVersion) -> Self {
        Id3v2Tag {
            version,
            minor: 0,
            flags: TagFlags::default(),
            extended_header: None,
            padding: 0,
            frame_sets: BTreeMap::new(),
        }
    }

    /// Decode a complete tag starting at the first byte of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Id3v2Header::parse(bytes)?;
        let size = header.size as usize;
        let body = slice(bytes, HEADER_SIZE, size)
            .map_err(|_| Error::invalid(format!("tag size {size} exceeds buffer")))?;
        debug!(version = %header.version, size, "parsing ID3v2 tag");

        if header.flags.footer {
            let footer = slice(bytes, HEADER_SIZE + size, HEADER_SIZE)
                .map_err(|_| Error::invalid("tag footer is missing"))?;
            if &footer[..3] != FOOTER_ID {
                return Err(Error::invalid("tag footer is invalid"));
            }
        }

        // v2.2 and v2.3 unsynchronise the whole body; v2.4 does it per frame
        let body = if header.flags.unsynchronisation && header.version != TagVersion::V24 {
            synchronise(body)
        } else {
            body.to_vec()
        };

        let mut tag = Id3v2Tag {
            version: header.version,
            minor: header.minor,
            flags: header.flags,
            extended_header: None,
            padding: 0,
            frame_sets: BTreeMap::new(),
        };

        let mut offset = 0;
        if header.extended_header {
            let length = tag.extended_header_length(&body)?;
            tag.extended_header = Some(body[..length].to_vec());
            offset = length;
        }

        while offset < body.len() {
            if body[offset] == 0 {
                tag.padding = body.len() - offset;
                break;
            }
            let frame = Frame::decode(tag.version, &body, offset)?;
            offset += frame.length();
            tag.insert_frame(frame);
        }

        debug!(frame_sets = tag.frame_sets.len(), padding = tag.padding, "parsed ID3v2 tag");
        Ok(tag)
    }

    fn extended_header_length(&self, body: &[u8]) -> Result<usize> {
        let length = match self.version {
            // v2.3 size excludes its own four bytes
            TagVersion::V23 => read_u32(body, 0).map(|size| size as usize + 4),
            _ => read_synchsafe(body, 0).map(|size| size as usize),
        }
        .map_err(|_| Error::invalid("extended header is truncated"))?;
        if length < 4 || length > body.len() {
            return Err(Error::invalid(format!("extended header length {length} is invalid")));
        }
        Ok(length)
    }

    /// Serialize the tag.
    ///
    /// The header size field is synchsafe, so the body must stay under 256 MiB.
    pub fn encode(&self) -> Vec<u8> {
        let body = self.encode_body();
        let mut bytes = Vec::with_capacity(body.len() + 2 * HEADER_SIZE);
        let header = self.header_for(body.len());
        bytes.extend_from_slice(&header.pack(false));
        bytes.extend(body);
        if self.flags.footer {
            bytes.extend_from_slice(&header.pack(true));
        }
        bytes
    }

    fn header_for(&self, size: usize) -> Id3v2Header {
        debug_assert!(size <= SYNCHSAFE_MAX as usize, "tag body of {size} bytes is too large");
        Id3v2Header {
            version: self.version,
            minor: self.minor,
            flags: self.flags,
            extended_header: self.extended_header.is_some(),
            size: size as u32,
        }
    }

    fn encode_body(&self) -> Vec<u8> {
        let mut body = self.extended_header.clone().unwrap_or_default();
        for frame in self.frames_in_write_order() {
            body.extend(frame.encode());
        }
        if self.flags.unsynchronisation && self.version != TagVersion::V24 {
            body = unsynchronise(&body);
        }
        if !self.flags.footer {
            body.resize(body.len() + self.padding, 0);
        }
        body
    }

    /// Alphabetical by id with pictures last; empty frames are skipped.
    fn frames_in_write_order(&self) -> impl Iterator<Item = &Frame> {
        let picture = ids::PICTURE.for_version(self.version);
        let others = self.frame_sets.values().filter(move |set| set.id() != picture);
        let pictures = self.frame_sets.get(picture).into_iter();
        others
            .chain(pictures)
            .flat_map(FrameSet::iter)
            .filter(|frame| !frame.data().is_empty())
    }

    /// Tag size as stored in the header, excluding header and footer.
    pub fn data_length(&self) -> usize {
        self.encode_body().len()
    }

    /// Total encoded length.
    pub fn length(&self) -> usize {
        let footer = if self.flags.footer { HEADER_SIZE } else { 0 };
        HEADER_SIZE + self.data_length() + footer
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn minor_version(&self) -> u8 {
        self.minor
    }

    pub fn flags(&self) -> &TagFlags {
        &self.flags
    }

    /// In v2.4 stuffing is per frame, so turning the flag on stuffs and flags
    /// every frame already present. Turning it off leaves stuffed frames as
    /// they are; their own flag still marks them.
    pub fn set_unsynchronisation(&mut self, unsynchronisation: bool) -> Result<()> {
        if unsynchronisation && self.version == TagVersion::V24 {
            for set in self.frame_sets.values_mut() {
                for frame in set.iter_mut() {
                    frame.unsynchronise_payload()?;
                }
            }
        }
        self.flags.unsynchronisation = unsynchronisation;
        Ok(())
    }

    pub fn set_experimental(&mut self, experimental: bool) {
        self.flags.experimental = experimental;
    }

    pub fn set_compression(&mut self, compression: bool) -> Result<()> {
        if compression && !self.version.rules().supports_compression {
            return Err(Error::IllegalArgument(format!(
                "compression flag is not defined for v{}",
                self.version
            )));
        }
        self.flags.compression = compression;
        Ok(())
    }

    /// A footer replaces any padding.
    pub fn set_footer(&mut self, footer: bool) -> Result<()> {
        if footer && !self.version.rules().supports_footer {
            return Err(Error::IllegalArgument(format!(
                "footer is not defined for v{}",
                self.version
            )));
        }
        self.flags.footer = footer;
        Ok(())
    }

    pub fn padding(&self) -> bool {
        self.padding > 0
    }

    pub fn padding_length(&self) -> usize {
        self.padding
    }

    pub fn set_padding(&mut self, padding: bool) {
        self.padding = if padding { PADDING_LENGTH } else { 0 };
    }

    pub fn extended_header(&self) -> Option<&[u8]> {
        self.extended_header.as_deref()
    }

    pub fn clear_extended_header(&mut self) {
        self.extended_header = None;
    }

    pub fn frame_sets(&self) -> &BTreeMap<String, FrameSet> {
        &self.frame_sets
    }

    pub fn frame_set(&self, id: &str) -> Option<&FrameSet> {
        self.frame_sets.get(id)
    }

    /// First frame with `id`.
    pub fn frame(&self, id: &str) -> Option<&Frame> {
        self.frame_sets.get(id).and_then(FrameSet::first)
    }

    fn insert_frame(&mut self, frame: Frame) {
        self.frame_sets
            .entry(frame.id().to_string())
            .or_insert_with(|| FrameSet::new(frame.id()))
            .add_frame(frame);
    }

    /// Add a frame, replacing the whole set of its id when `replace` is set.
    pub fn add_frame(&mut self, frame: Frame, replace: bool) -> Result<()> {
        if frame.version() != self.version {
            return Err(Error::IllegalArgument(format!(
                "v{} frame {} cannot be added to a v{} tag",
                frame.version(),
                frame.id(),
                self.version
            )));
        }
        if replace {
            self.frame_sets.remove(frame.id());
        }
        self.insert_frame(frame);
        Ok(())
    }

    pub fn remove_frame_set(&mut self, id: &str) -> Option<FrameSet> {
        self.frame_sets.remove(id)
    }

    /// Whether a frame's payload is byte-stuffed on its own.
    fn payload_unsynchronised(&self, frame: &Frame) -> bool {
        self.version == TagVersion::V24
            && (self.flags.unsynchronisation || frame.flags().unsynchronisation)
    }

    /// Decode a frame's payload according to its id.
    pub fn frame_data(&self, frame: &Frame) -> Result<FrameData> {
        FrameData::decode(frame.id(), frame.data(), frame.version(), self.payload_unsynchronised(frame))
    }

    /// Build a frame for `data` in this tag's version and stuffing rules.
    pub fn build_frame(&self, id: &str, data: &FrameData) -> Result<Frame> {
        let unsynchronised = self.version == TagVersion::V24 && self.flags.unsynchronisation;
        let mut frame = Frame::new(self.version, id, data.encode(unsynchronised))?;
        frame.flags_mut().unsynchronisation = unsynchronised;
        Ok(frame)
    }

    /// Replace every frame of `id` with one holding `data`.
    pub fn set_frame_data(&mut self, id: &str, data: &FrameData) -> Result<()> {
        let frame = self.build_frame(id, data)?;
        self.add_frame(frame, true)
    }
}
