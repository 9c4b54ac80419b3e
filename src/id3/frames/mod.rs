// Typed frame payloads

pub mod chapter;
pub mod comment;
pub mod ids;
pub mod picture;
pub mod popularimeter;
pub mod text;
pub mod url;

pub use chapter::{ChapterFrameData, ChapterTocFrameData};
pub use comment::CommentFrameData;
pub use picture::{ObsoletePictureFrameData, PictureFrameData, PictureType};
pub use popularimeter::PopularimeterFrameData;
pub use text::TextFrameData;
pub use url::{UrlFrameData, WwwFrameData};

use crate::error::{Error, Result};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{synchronise, unsynchronise};
use crate::utils::encoding::TextEncoding;

/// A payload codec for one family of frames.
///
/// `parse`/`write` handle the plain payload layout. `decode`/`encode` wrap
/// them with the byte stuffing applied when the owning tag is unsynchronised.
pub trait FramePayload: Sized {
    fn parse(data: &[u8], version: TagVersion) -> Result<Self>;

    fn write(&self) -> Vec<u8>;

    fn decode(data: &[u8], version: TagVersion, unsynchronisation: bool) -> Result<Self> {
        if unsynchronisation {
            Self::parse(&synchronise(data), version)
        } else {
            Self::parse(data, version)
        }
    }

    fn encode(&self, unsynchronisation: bool) -> Vec<u8> {
        let bytes = self.write();
        if unsynchronisation {
            unsynchronise(&bytes)
        } else {
            bytes
        }
    }
}

/// Read the leading encoding byte of a payload.
pub(crate) fn leading_encoding(data: &[u8], frame: &str) -> Result<TextEncoding> {
    let byte = *data
        .first()
        .ok_or_else(|| Error::invalid(format!("empty {frame} payload")))?;
    TextEncoding::from_byte(byte)
        .ok_or_else(|| Error::invalid(format!("unknown text encoding {byte} in {frame} payload")))
}

/// Any frame payload, selected by frame id.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    Text(TextFrameData),
    Url(UrlFrameData),
    Www(WwwFrameData),
    Comment(CommentFrameData),
    Picture(PictureFrameData),
    ObsoletePicture(ObsoletePictureFrameData),
    Chapter(ChapterFrameData),
    ChapterToc(ChapterTocFrameData),
    Popularimeter(PopularimeterFrameData),
    /// Frames without a typed decoder keep their payload bytes.
    Binary(Vec<u8>),
}

impl FrameData {
    /// Decode `data` using the payload layout implied by `id`.
    pub fn decode(id: &str, data: &[u8], version: TagVersion, unsynchronisation: bool) -> Result<Self> {
        macro_rules! typed {
            ($variant:ident, $payload:ty) => {
                <$payload>::decode(data, version, unsynchronisation).map(FrameData::$variant)
            };
        }
        match id {
            "WXXX" | "WXX" => typed!(Url, UrlFrameData),
            "TXXX" | "TXX" => Ok(FrameData::binary(data, unsynchronisation)),
            "COMM" | "COM" | "USLT" | "ULT" => typed!(Comment, CommentFrameData),
            "APIC" => typed!(Picture, PictureFrameData),
            "PIC" => typed!(ObsoletePicture, ObsoletePictureFrameData),
            "CHAP" | "CHP" => typed!(Chapter, ChapterFrameData),
            "CTOC" | "CTO" => typed!(ChapterToc, ChapterTocFrameData),
            "POPM" | "POP" => typed!(Popularimeter, PopularimeterFrameData),
            _ if id.starts_with('T') => typed!(Text, TextFrameData),
            _ if id.starts_with('W') => typed!(Www, WwwFrameData),
            _ => Ok(FrameData::binary(data, unsynchronisation)),
        }
    }

    fn binary(data: &[u8], unsynchronisation: bool) -> Self {
        if unsynchronisation {
            FrameData::Binary(synchronise(data))
        } else {
            FrameData::Binary(data.to_vec())
        }
    }

    pub fn encode(&self, unsynchronisation: bool) -> Vec<u8> {
        match self {
            FrameData::Text(data) => data.encode(unsynchronisation),
            FrameData::Url(data) => data.encode(unsynchronisation),
            FrameData::Www(data) => data.encode(unsynchronisation),
            FrameData::Comment(data) => data.encode(unsynchronisation),
            FrameData::Picture(data) => data.encode(unsynchronisation),
            FrameData::ObsoletePicture(data) => data.encode(unsynchronisation),
            FrameData::Chapter(data) => data.encode(unsynchronisation),
            FrameData::ChapterToc(data) => data.encode(unsynchronisation),
            FrameData::Popularimeter(data) => data.encode(unsynchronisation),
            FrameData::Binary(bytes) if unsynchronisation => unsynchronise(bytes),
            FrameData::Binary(bytes) => bytes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::EncodedText;

    #[test]
    fn test_dispatch_by_id() {
        let text = FrameData::decode("TIT2", b"\0Title", TagVersion::V23, false).unwrap();
        assert_eq!(text, FrameData::Text(TextFrameData::new(EncodedText::new("Title"))));

        let www = FrameData::decode("WOAR", b"http://a", TagVersion::V23, false).unwrap();
        assert!(matches!(www, FrameData::Www(_)));

        let unknown = FrameData::decode("PRIV", &[1, 2, 3], TagVersion::V23, false).unwrap();
        assert_eq!(unknown, FrameData::Binary(vec![1, 2, 3]));
    }

    #[test]
    fn test_unsynchronised_payload() {
        let data = FrameData::Binary(vec![0xFF, 0xE0]);
        assert_eq!(data.encode(false), vec![0xFF, 0xE0]);
        assert_eq!(data.encode(true), vec![0xFF, 0x00, 0xE0]);
        assert_eq!(FrameData::decode("PRIV", &[0xFF, 0x00, 0xE0], TagVersion::V24, true).unwrap(), data);

        let text = TextFrameData::new(EncodedText::with_encoding(TextEncoding::Utf16, "a"));
        let encoded = text.encode(true);
        assert_eq!(encoded, vec![1, 0xFF, 0, 0xFE, b'a', 0]);
        assert_eq!(TextFrameData::decode(&encoded, TagVersion::V24, true).unwrap(), text);
    }

    #[test]
    fn test_leading_encoding() {
        assert_eq!(leading_encoding(&[3], "TIT2").unwrap(), TextEncoding::Utf8);
        assert!(leading_encoding(&[], "TIT2").is_err());
        assert!(leading_encoding(&[9], "TIT2").is_err());
    }
}
