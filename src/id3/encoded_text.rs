// Text values tagged with their on-disk encoding

use std::fmt;

use crate::utils::buffer::index_of_terminator;
use crate::utils::encoding::{decode_text, encode_text, is_latin1, TextEncoding};

/// A string together with the encoding it is stored in.
///
/// Two values compare equal when both encoding and text match, or when
/// both texts are empty regardless of encoding.
#[derive(Debug, Clone, Eq)]
pub struct EncodedText {
    encoding: TextEncoding,
    text: String,
}

impl EncodedText {
    /// Latin-1 when every character is representable, UTF-16 otherwise.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let encoding = if is_latin1(&text) {
            TextEncoding::Latin1
        } else {
            TextEncoding::Utf16
        };
        Self { encoding, text }
    }

    pub fn with_encoding(encoding: TextEncoding, text: impl Into<String>) -> Self {
        Self {
            encoding,
            text: text.into(),
        }
    }

    /// Decode a text span. A terminator inside the span ends the text.
    pub fn from_bytes(encoding: TextEncoding, bytes: &[u8]) -> Self {
        let end = index_of_terminator(bytes, 0, encoding.terminator_width()).unwrap_or(bytes.len());
        Self {
            encoding,
            text: decode_text(&bytes[..end], encoding),
        }
    }

    /// Decode a terminated string starting at `offset`.
    ///
    /// Returns the text and the number of bytes consumed including the
    /// terminator. Without a terminator the rest of the buffer is used.
    pub fn read_terminated(encoding: TextEncoding, buffer: &[u8], offset: usize) -> (Self, usize) {
        let rest = buffer.get(offset..).unwrap_or(&[]);
        match index_of_terminator(rest, 0, encoding.terminator_width()) {
            Some(end) => (
                Self::with_encoding(encoding, decode_text(&rest[..end], encoding)),
                end + encoding.terminator_width(),
            ),
            None => (
                Self::with_encoding(encoding, decode_text(rest, encoding)),
                rest.len(),
            ),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Encoded bytes, with a BOM for UTF-16 and no terminator.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_text(&self.text, self.encoding)
    }

    /// Encoded bytes followed by the encoding's terminator.
    pub fn to_terminated_bytes(&self) -> Vec<u8> {
        let mut bytes = self.to_bytes();
        bytes.extend_from_slice(self.encoding.terminator());
        bytes
    }

    pub fn length_in_bytes_including_terminator(&self) -> usize {
        self.to_bytes().len() + self.encoding.terminator_width()
    }
}

impl Default for EncodedText {
    fn default() -> Self {
        Self::with_encoding(TextEncoding::Latin1, String::new())
    }
}

impl PartialEq for EncodedText {
    fn eq(&self, other: &Self) -> bool {
        if self.text.is_empty() && other.text.is_empty() {
            return true;
        }
        self.encoding == other.encoding && self.text == other.text
    }
}

impl fmt::Display for EncodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
