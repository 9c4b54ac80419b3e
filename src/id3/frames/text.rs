// Plain text frames (T???)

use crate::error::Result;
use crate::id3::encoded_text::EncodedText;
use crate::id3::frames::{leading_encoding, FramePayload};
use crate::id3::version::TagVersion;

/// `[encoding][text]`, with no terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrameData {
    pub text: EncodedText,
}

impl TextFrameData {
    pub fn new(text: EncodedText) -> Self {
        TextFrameData { text }
    }
}

impl FramePayload for TextFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let encoding = leading_encoding(data, "text")?;
        Ok(TextFrameData {
            text: EncodedText::from_bytes(encoding, &data[1..]),
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = vec![self.text.encoding().as_byte()];
        bytes.extend(self.text.to_bytes());
        bytes
    }
}
