// Link frames: user-defined WXXX and the fixed W??? frames

use crate::error::Result;
use crate::id3::encoded_text::EncodedText;
use crate::id3::frames::{leading_encoding, FramePayload};
use crate::id3::version::TagVersion;
use crate::utils::encoding::{decode_text, encode_text, TextEncoding};
use crate::utils::buffer::index_of_terminator;

fn read_url(bytes: &[u8]) -> String {
    let end = index_of_terminator(bytes, 0, 1).unwrap_or(bytes.len());
    decode_text(&bytes[..end], TextEncoding::Latin1)
}

/// `[encoding][description][terminator][url]`; the url is always Latin-1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFrameData {
    pub description: EncodedText,
    pub url: String,
}

impl UrlFrameData {
    pub fn new(description: EncodedText, url: impl Into<String>) -> Self {
        UrlFrameData {
            description,
            url: url.into(),
        }
    }
}

impl FramePayload for UrlFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let encoding = leading_encoding(data, "url")?;
        let (description, consumed) = EncodedText::read_terminated(encoding, data, 1);
        Ok(UrlFrameData {
            description,
            url: read_url(&data[1 + consumed..]),
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = vec![self.description.encoding().as_byte()];
        bytes.extend(self.description.to_terminated_bytes());
        bytes.extend(encode_text(&self.url, TextEncoding::Latin1));
        bytes
    }
}

/// A bare Latin-1 url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WwwFrameData {
    pub url: String,
}

impl WwwFrameData {
    pub fn new(url: impl Into<String>) -> Self {
        WwwFrameData { url: url.into() }
    }
}

impl FramePayload for WwwFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        Ok(WwwFrameData { url: read_url(data) })
    }

    fn write(&self) -> Vec<u8> {
        encode_text(&self.url, TextEncoding::Latin1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_url() {
        let data = UrlFrameData::new(EncodedText::new("ABCDEFGHIJKLMNOPQ"), "http://ABCDEFGHIJKLMNOPQ");
        let mut expected = vec![0];
        expected.extend_from_slice(b"ABCDEFGHIJKLMNOPQ\0http://ABCDEFGHIJKLMNOPQ");
        assert_eq!(data.write(), expected);
        assert_eq!(UrlFrameData::parse(&expected, TagVersion::V23).unwrap(), data);
    }

    #[test]
    fn test_unicode_description() {
        let description = EncodedText::with_encoding(TextEncoding::Utf16, "\u{03b4}\u{03b5}");
        let data = UrlFrameData::new(description, "http://example.com");
        let bytes = data.write();
        assert_eq!(&bytes[..3], &[1, 0xFF, 0xFE]);
        assert_eq!(UrlFrameData::parse(&bytes, TagVersion::V24).unwrap(), data);
    }

    #[test]
    fn test_empty_description() {
        let data = UrlFrameData::new(EncodedText::default(), "http://x");
        assert_eq!(data.write(), b"\0\0http://x".to_vec());
        assert_eq!(UrlFrameData::parse(b"\0\0http://x", TagVersion::V23).unwrap(), data);
    }

    #[test]
    fn test_www() {
        let data = WwwFrameData::new("http://example.com/buy");
        assert_eq!(data.write(), b"http://example.com/buy".to_vec());
        assert_eq!(WwwFrameData::parse(&data.write(), TagVersion::V23).unwrap(), data);
    }
}
