// Chapter (CHAP) and table of contents (CTOC) frames

use crate::error::{Error, Result};
use crate::id3::encoded_text::EncodedText;
use crate::id3::frame::Frame;
use crate::id3::frames::{ids, FrameData, FramePayload, TextFrameData};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{index_of_terminator, pack_u32, read_u32};
use crate::utils::encoding::{decode_text, encode_text, TextEncoding};

const UNKNOWN_OFFSET: u32 = 0xFFFF_FFFF;

/// Reads a Latin-1 element id terminated by a zero byte.
fn read_element_id(data: &[u8], offset: usize, frame: &str) -> Result<(String, usize)> {
    let end = index_of_terminator(data, offset, 1)
        .ok_or_else(|| Error::invalid(format!("{frame} element id is not terminated")))?;
    Ok((decode_text(&data[offset..end], TextEncoding::Latin1), end + 1))
}

fn write_element_id(bytes: &mut Vec<u8>, id: &str) {
    bytes.extend(encode_text(id, TextEncoding::Latin1));
    bytes.push(0);
}

/// Decode embedded frames until the payload ends or padding starts.
fn read_subframes(data: &[u8], mut offset: usize, version: TagVersion) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    while offset < data.len() && data[offset] != 0 {
        let frame = Frame::decode(version, data, offset)?;
        offset += frame.length();
        frames.push(frame);
    }
    Ok(frames)
}

fn write_subframes(bytes: &mut Vec<u8>, frames: &[Frame]) {
    for frame in frames {
        bytes.extend(frame.encode());
    }
}

/// Build a title subframe for a chapter or table of contents.
fn title_frame(version: TagVersion, title: &str) -> Result<Frame> {
    let data = TextFrameData::new(EncodedText::new(title));
    Frame::new(version, ids::TITLE.for_version(version), data.write())
}

fn title_of(frames: &[Frame]) -> Option<String> {
    frames
        .iter()
        .find(|frame| frame.id() == ids::TITLE.for_version(frame.version()))
        .and_then(|frame| TextFrameData::parse(frame.data(), frame.version()).ok())
        .map(|data| data.text.text().to_string())
}

/// A named time range with optional byte offsets and embedded frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFrameData {
    pub id: String,
    pub start_time_ms: u32,
    pub end_time_ms: u32,
    /// `None` is stored as 0xFFFFFFFF.
    pub start_offset: Option<u32>,
    pub end_offset: Option<u32>,
    pub subframes: Vec<Frame>,
    version: TagVersion,
}

impl ChapterFrameData {
    pub fn new(
        version: TagVersion,
        id: impl Into<String>,
        start_time_ms: u32,
        end_time_ms: u32,
        start_offset: Option<u32>,
        end_offset: Option<u32>,
    ) -> Self {
        ChapterFrameData {
            id: id.into(),
            start_time_ms,
            end_time_ms,
            start_offset,
            end_offset,
            subframes: Vec::new(),
            version,
        }
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn add_subframe(&mut self, id: &str, data: &FrameData) -> Result<()> {
        let frame = Frame::new(self.version, id, data.encode(false))?;
        self.subframes.push(frame);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.subframes.push(title_frame(self.version, title)?);
        Ok(())
    }

    /// Text of the first title subframe.
    pub fn title(&self) -> Option<String> {
        title_of(&self.subframes)
    }
}

impl FramePayload for ChapterFrameData {
    fn parse(data: &[u8], version: TagVersion) -> Result<Self> {
        let (id, mut offset) = read_element_id(data, 0, "chapter")?;
        let mut times = [0u32; 4];
        for value in times.iter_mut() {
            *value = read_u32(data, offset)
                .map_err(|_| Error::invalid(format!("chapter {id} is truncated")))?;
            offset += 4;
        }
        let known = |value: u32| (value != UNKNOWN_OFFSET).then_some(value);
        Ok(ChapterFrameData {
            id,
            start_time_ms: times[0],
            end_time_ms: times[1],
            start_offset: known(times[2]),
            end_offset: known(times[3]),
            subframes: read_subframes(data, offset, version)?,
            version,
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_element_id(&mut bytes, &self.id);
        bytes.extend_from_slice(&pack_u32(self.start_time_ms));
        bytes.extend_from_slice(&pack_u32(self.end_time_ms));
        bytes.extend_from_slice(&pack_u32(self.start_offset.unwrap_or(UNKNOWN_OFFSET)));
        bytes.extend_from_slice(&pack_u32(self.end_offset.unwrap_or(UNKNOWN_OFFSET)));
        write_subframes(&mut bytes, &self.subframes);
        bytes
    }
}

/// An ordered list of child chapter ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTocFrameData {
    pub id: String,
    pub is_root: bool,
    pub is_ordered: bool,
    pub children: Vec<String>,
    pub subframes: Vec<Frame>,
    version: TagVersion,
}

impl ChapterTocFrameData {
    pub fn new(
        version: TagVersion,
        id: impl Into<String>,
        is_root: bool,
        is_ordered: bool,
        children: Vec<String>,
    ) -> Self {
        ChapterTocFrameData {
            id: id.into(),
            is_root,
            is_ordered,
            children,
            subframes: Vec::new(),
            version,
        }
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn add_subframe(&mut self, id: &str, data: &FrameData) -> Result<()> {
        let frame = Frame::new(self.version, id, data.encode(false))?;
        self.subframes.push(frame);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.subframes.push(title_frame(self.version, title)?);
        Ok(())
    }

    pub fn title(&self) -> Option<String> {
        title_of(&self.subframes)
    }
}

impl FramePayload for ChapterTocFrameData {
    fn parse(data: &[u8], version: TagVersion) -> Result<Self> {
        let (id, offset) = read_element_id(data, 0, "table of contents")?;
        let header = data
            .get(offset..offset + 2)
            .ok_or_else(|| Error::invalid(format!("table of contents {id} is truncated")))?;
        let (flags, count) = (header[0], header[1]);

        let mut offset = offset + 2;
        let mut children = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let (child, next) = read_element_id(data, offset, "table of contents")?;
            children.push(child);
            offset = next;
        }

        Ok(ChapterTocFrameData {
            id,
            is_root: flags & 0x02 != 0,
            is_ordered: flags & 0x01 != 0,
            children,
            subframes: read_subframes(data, offset, version)?,
            version,
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_element_id(&mut bytes, &self.id);
        let flags = (if self.is_root { 0x02 } else { 0 }) | (if self.is_ordered { 0x01 } else { 0 });
        bytes.push(flags);
        bytes.push(self.children.len().min(usize::from(u8::MAX)) as u8);
        for child in self.children.iter().take(usize::from(u8::MAX)) {
            write_element_id(&mut bytes, child);
        }
        write_subframes(&mut bytes, &self.subframes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter() -> ChapterFrameData {
        let mut chapter = ChapterFrameData::new(TagVersion::V23, "ch1", 1, 380, Some(3), Some(400));
        chapter.set_title("Hello there").unwrap();
        chapter
    }

    fn chapter_bytes() -> Vec<u8> {
        let mut bytes = b"ch1\0".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0x01, 0x7C, 0, 0, 0, 3, 0, 0, 0x01, 0x90]);
        bytes.extend_from_slice(b"TIT2");
        bytes.extend_from_slice(&[0, 0, 0, 12, 0, 0, 0]);
        bytes.extend_from_slice(b"Hello there");
        bytes
    }

    #[test]
    fn test_pack_chapter() {
        assert_eq!(chapter().write(), chapter_bytes());
    }

    #[test]
    fn test_unpack_chapter() {
        let parsed = ChapterFrameData::parse(&chapter_bytes(), TagVersion::V23).unwrap();
        assert_eq!(parsed, chapter());
        assert_eq!(parsed.title().as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_unknown_offsets() {
        let chapter = ChapterFrameData::new(TagVersion::V24, "c", 0, 10, None, None);
        let bytes = chapter.write();
        assert_eq!(&bytes[10..18], &[0xFF; 8]);
        assert_eq!(ChapterFrameData::parse(&bytes, TagVersion::V24).unwrap(), chapter);
    }

    #[test]
    fn test_truncated_chapter() {
        assert!(ChapterFrameData::parse(b"ch1\0\0\0", TagVersion::V23).is_err());
        assert!(ChapterFrameData::parse(b"ch1", TagVersion::V23).is_err());
    }

    #[test]
    fn test_pack_toc() {
        let mut toc = ChapterTocFrameData::new(
            TagVersion::V23,
            "toc1",
            true,
            true,
            vec!["ch1".to_string(), "ch2".to_string()],
        );
        toc.set_title("Contents").unwrap();

        let mut expected = b"toc1\0\x03\x02ch1\0ch2\0TIT2".to_vec();
        expected.extend_from_slice(&[0, 0, 0, 9, 0, 0, 0]);
        expected.extend_from_slice(b"Contents");
        assert_eq!(toc.write(), expected);

        let parsed = ChapterTocFrameData::parse(&expected, TagVersion::V23).unwrap();
        assert_eq!(parsed, toc);
        assert_eq!(parsed.title().as_deref(), Some("Contents"));
    }

    #[test]
    fn test_toc_flags() {
        let toc = ChapterTocFrameData::new(TagVersion::V24, "t", false, true, vec![]);
        assert_eq!(toc.write(), b"t\0\x01\x00".to_vec());
    }
}
