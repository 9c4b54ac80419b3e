// ID3v2 frames and same-id frame sets

use tracing::trace;

use crate::error::{Error, Result};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{pack_synchsafe, read_synchsafe, slice, unsynchronise};

/// Per-frame status and format flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub preserve_on_tag_alter: bool,
    pub preserve_on_file_alter: bool,
    pub read_only: bool,
    pub grouping: bool,
    pub compression: bool,
    pub encryption: bool,
    pub unsynchronisation: bool,
    pub data_length_indicator: bool,
}

impl FrameFlags {
    /// Decode the two flag bytes of a v2.3 or v2.4 frame header.
    pub fn unpack(version: TagVersion, bytes: [u8; 2]) -> Self {
        let [status, format] = bytes;
        match version {
            TagVersion::V22 => FrameFlags::default(),
            TagVersion::V23 => FrameFlags {
                preserve_on_tag_alter: status & 0x80 != 0,
                preserve_on_file_alter: status & 0x40 != 0,
                read_only: status & 0x20 != 0,
                compression: format & 0x80 != 0,
                encryption: format & 0x40 != 0,
                grouping: format & 0x20 != 0,
                unsynchronisation: false,
                data_length_indicator: false,
            },
            TagVersion::V24 => FrameFlags {
                preserve_on_tag_alter: status & 0x40 != 0,
                preserve_on_file_alter: status & 0x20 != 0,
                read_only: status & 0x10 != 0,
                grouping: format & 0x40 != 0,
                compression: format & 0x08 != 0,
                encryption: format & 0x04 != 0,
                unsynchronisation: format & 0x02 != 0,
                data_length_indicator: format & 0x01 != 0,
            },
        }
    }

    pub fn pack(&self, version: TagVersion) -> [u8; 2] {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        match version {
            TagVersion::V22 => [0, 0],
            TagVersion::V23 => [
                bit(self.preserve_on_tag_alter, 0x80)
                    | bit(self.preserve_on_file_alter, 0x40)
                    | bit(self.read_only, 0x20),
                bit(self.compression, 0x80) | bit(self.encryption, 0x40) | bit(self.grouping, 0x20),
            ],
            TagVersion::V24 => [
                bit(self.preserve_on_tag_alter, 0x40)
                    | bit(self.preserve_on_file_alter, 0x20)
                    | bit(self.read_only, 0x10),
                bit(self.grouping, 0x40)
                    | bit(self.compression, 0x08)
                    | bit(self.encryption, 0x04)
                    | bit(self.unsynchronisation, 0x02)
                    | bit(self.data_length_indicator, 0x01),
            ],
        }
    }
}

/// True when `id` is a well-formed frame id for `version`.
pub fn is_valid_frame_id(version: TagVersion, id: &str) -> bool {
    id.len() == version.rules().id_width
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Payloads must fit the version's size field, with room for a data length indicator.
fn check_payload_size(version: TagVersion, id: &str, length: usize) -> Result<()> {
    let max = version.rules().max_size() as usize;
    if length.saturating_add(4) > max {
        return Err(Error::IllegalArgument(format!(
            "frame {id} payload of {length} bytes exceeds the v{version} limit of {max}"
        )));
    }
    Ok(())
}

/// One id + flags + payload record inside a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    version: TagVersion,
    id: String,
    flags: FrameFlags,
    data_length_indicator: Option<u32>,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(version: TagVersion, id: &str, data: Vec<u8>) -> Result<Self> {
        if !is_valid_frame_id(version, id) {
            return Err(Error::invalid(format!("invalid frame id {id:?} for v{version}")));
        }
        check_payload_size(version, id, data.len())?;
        Ok(Frame {
            version,
            id: id.to_string(),
            flags: FrameFlags::default(),
            data_length_indicator: None,
            data,
        })
    }

    /// Decode one frame starting at `offset`.
    pub fn decode(version: TagVersion, buffer: &[u8], offset: usize) -> Result<Self> {
        let rules = version.rules();
        let header = slice(buffer, offset, rules.frame_header_len())
            .map_err(|_| Error::invalid(format!("truncated frame header at offset {offset}")))?;

        let id = String::from_utf8_lossy(&header[..rules.id_width]).into_owned();
        if !is_valid_frame_id(version, &id) {
            return Err(Error::invalid(format!("invalid frame id {id:?} at offset {offset}")));
        }

        let size_start = rules.id_width;
        let size = rules.unpack_size(&header[size_start..size_start + rules.size_width()]) as usize;
        let flags = if rules.has_frame_flags {
            let at = size_start + rules.size_width();
            FrameFlags::unpack(version, [header[at], header[at + 1]])
        } else {
            FrameFlags::default()
        };

        let payload_start = offset + rules.frame_header_len();
        let payload = slice(buffer, payload_start, size).map_err(|_| {
            Error::invalid(format!("frame {id} size {size} exceeds available data"))
        })?;

        let (data_length_indicator, data) = if flags.data_length_indicator {
            if payload.len() < 4 {
                return Err(Error::invalid(format!("frame {id} too short for data length indicator")));
            }
            (Some(read_synchsafe(payload, 0)?), payload[4..].to_vec())
        } else {
            (None, payload.to_vec())
        };

        trace!(frame = %id, size, "decoded frame");
        Ok(Frame {
            version,
            id,
            flags,
            data_length_indicator,
            data,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let rules = self.version.rules();
        let mut out = Vec::with_capacity(self.length());
        out.extend_from_slice(self.id.as_bytes());
        out.extend(rules.pack_size(self.payload_len() as u32));
        if rules.has_frame_flags {
            out.extend_from_slice(&self.flags.pack(self.version));
        }
        if self.flags.data_length_indicator {
            let indicator = self.data_length_indicator.unwrap_or(self.data.len() as u32);
            out.extend_from_slice(&pack_synchsafe(indicator));
        }
        out.extend_from_slice(&self.data);
        out
    }

    fn payload_len(&self) -> usize {
        self.data.len() + if self.flags.data_length_indicator { 4 } else { 0 }
    }

    /// Encoded length including the frame header.
    pub fn length(&self) -> usize {
        self.version.rules().frame_header_len() + self.payload_len()
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn flags(&self) -> &FrameFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FrameFlags {
        &mut self.flags
    }

    pub fn data_length_indicator(&self) -> Option<u32> {
        self.data_length_indicator
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the payload; the size field follows on the next encode.
    pub fn set_data(&mut self, data: Vec<u8>) -> Result<()> {
        check_payload_size(self.version, &self.id, data.len())?;
        self.data = data;
        self.data_length_indicator = None;
        Ok(())
    }

    /// Byte-stuff the payload and flag it, unless it already is.
    pub(crate) fn unsynchronise_payload(&mut self) -> Result<()> {
        if self.flags.unsynchronisation {
            return Ok(());
        }
        let data = unsynchronise(&self.data);
        check_payload_size(self.version, &self.id, data.len())?;
        self.data = data;
        self.flags.unsynchronisation = true;
        Ok(())
    }
}

/// All frames sharing one id, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    id: String,
    frames: Vec<Frame>,
}

impl FrameSet {
    pub fn new(id: impl Into<String>) -> Self {
        FrameSet {
            id: id.into(),
            frames: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn remove_all(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Frame> {
        self.frames.iter_mut()
    }
}

impl<'a> IntoIterator for &'a FrameSet {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tit2_bytes() -> Vec<u8> {
        let mut bytes = b"TIT2".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 6, 0, 0, 0]);
        bytes.extend_from_slice(b"Title");
        bytes
    }

    #[test]
    fn test_decode_v23_frame() {
        let frame = Frame::decode(TagVersion::V23, &tit2_bytes(), 0).unwrap();
        assert_eq!(frame.id(), "TIT2");
        assert_eq!(frame.data(), b"\0Title");
        assert_eq!(frame.length(), 16);
        assert_eq!(frame.encode(), tit2_bytes());
    }

    #[test]
    fn test_decode_v22_frame() {
        let bytes = [b'T', b'T', b'2', 0, 0, 2, 0, b'x'];
        let frame = Frame::decode(TagVersion::V22, &bytes, 0).unwrap();
        assert_eq!(frame.id(), "TT2");
        assert_eq!(frame.data(), &[0, b'x']);
        assert_eq!(frame.encode(), bytes.to_vec());
    }

    #[test]
    fn test_decode_rejects_bad_id() {
        let mut bytes = tit2_bytes();
        bytes[1] = b'i';
        assert!(matches!(
            Frame::decode(TagVersion::V23, &bytes, 0),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_frame() {
        let mut bytes = tit2_bytes();
        bytes[7] = 0x40;
        assert!(Frame::decode(TagVersion::V23, &bytes, 0).is_err());
    }

    #[test]
    fn test_v24_flags_and_data_length_indicator() {
        let mut bytes = b"TIT2".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 7, 0x40, 0x01, 0, 0, 0, 3, 0, b'a', b'b']);
        let frame = Frame::decode(TagVersion::V24, &bytes, 0).unwrap();
        assert!(frame.flags().preserve_on_tag_alter);
        assert!(frame.flags().data_length_indicator);
        assert_eq!(frame.data_length_indicator(), Some(3));
        assert_eq!(frame.data(), &[0, b'a', b'b']);
        assert_eq!(frame.encode(), bytes);
    }

    #[test]
    fn test_flag_layouts() {
        let flags = FrameFlags {
            read_only: true,
            compression: true,
            grouping: true,
            ..FrameFlags::default()
        };
        assert_eq!(flags.pack(TagVersion::V23), [0x20, 0xA0]);
        assert_eq!(flags.pack(TagVersion::V24), [0x10, 0x48]);
        assert_eq!(FrameFlags::unpack(TagVersion::V24, [0x10, 0x48]), flags);
    }

    #[test]
    fn test_set_data_updates_size() {
        let mut frame = Frame::new(TagVersion::V23, "TALB", vec![0, b'a']).unwrap();
        frame.set_data(vec![0, b'a', b'b', b'c']).unwrap();
        let bytes = frame.encode();
        assert_eq!(&bytes[4..8], &[0, 0, 0, 4]);
        assert_eq!(frame.length(), 14);
    }

    #[test]
    fn test_frame_set_keeps_order() {
        let mut set = FrameSet::new("COMM");
        set.add_frame(Frame::new(TagVersion::V23, "COMM", vec![1]).unwrap());
        set.add_frame(Frame::new(TagVersion::V23, "COMM", vec![2]).unwrap());
        assert_eq!(set.len(), 2);
        assert_eq!(set.first().unwrap().data(), &[1]);
        set.remove_all();
        assert!(set.is_empty());
    }

    #[test]
    fn test_new_validates_id_width() {
        assert!(Frame::new(TagVersion::V22, "TIT2", vec![]).is_err());
        assert!(Frame::new(TagVersion::V22, "TT2", vec![]).is_ok());
    }

    #[test]
    fn test_new_rejects_payload_beyond_size_field() {
        let oversized = vec![0; 0x0100_0000];
        assert!(matches!(
            Frame::new(TagVersion::V22, "TT2", oversized.clone()),
            Err(Error::IllegalArgument(_))
        ));
        assert!(Frame::new(TagVersion::V23, "TIT2", oversized).is_ok());

        let mut frame = Frame::new(TagVersion::V24, "TIT2", vec![0]).unwrap();
        assert!(frame.set_data(vec![0; 0x1000_0000]).is_err());
        assert_eq!(frame.data(), &[0]);
    }

    #[test]
    fn test_unsynchronise_payload_flags_frame_once() {
        let mut frame = Frame::new(TagVersion::V24, "APIC", vec![0xFF, 0x00, 0x01]).unwrap();
        frame.unsynchronise_payload().unwrap();
        assert!(frame.flags().unsynchronisation);
        assert_eq!(frame.data(), &[0xFF, 0x00, 0x00, 0x01]);

        frame.unsynchronise_payload().unwrap();
        assert_eq!(frame.data(), &[0xFF, 0x00, 0x00, 0x01]);
    }
}
