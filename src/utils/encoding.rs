// Encoding utilities

use encoding_rs::{mem, UTF_16BE, UTF_16LE, UTF_8};
use serde::Serialize;

/// Text encodings a tag can declare, keyed by their on-disk byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextEncoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Latin1),
            1 => Some(TextEncoding::Utf16),
            2 => Some(TextEncoding::Utf16BE),
            3 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Width of the string terminator in bytes.
    pub fn terminator_width(self) -> usize {
        match self {
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
        }
    }

    pub fn terminator(self) -> &'static [u8] {
        match self.terminator_width() {
            1 => &[0],
            _ => &[0, 0],
        }
    }
}

/// Decode text with specified encoding
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Latin1 => mem::decode_latin1(data).into_owned(),
        TextEncoding::Utf16 => {
            // Detect BOM, little-endian when absent
            if data.starts_with(&[0xFF, 0xFE]) {
                UTF_16LE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else if data.starts_with(&[0xFE, 0xFF]) {
                UTF_16BE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else {
                UTF_16LE.decode_without_bom_handling(data).0.into_owned()
            }
        }
        TextEncoding::Utf16BE => UTF_16BE.decode_without_bom_handling(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(data).0.into_owned(),
    }
}

/// Encode text with specified encoding. Latin-1 maps unrepresentable characters to `?`.
pub fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Latin1 => {
            if mem::is_str_latin1(text) {
                mem::encode_latin1_lossy(text).into_owned()
            } else {
                text.chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                    .collect()
            }
        }
        TextEncoding::Utf16 => {
            let mut bytes = vec![0xFF, 0xFE];
            bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            bytes
        }
        TextEncoding::Utf16BE => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
    }
}

/// True when every character of `text` fits in a single Latin-1 byte.
pub fn is_latin1(text: &str) -> bool {
    mem::is_str_latin1(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte() {
        assert_eq!(TextEncoding::from_byte(0), Some(TextEncoding::Latin1));
        assert_eq!(TextEncoding::from_byte(3), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_byte(4), None);
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = encode_text("Caf\u{e9}", TextEncoding::Latin1);
        assert_eq!(bytes, vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(decode_text(&bytes, TextEncoding::Latin1), "Caf\u{e9}");
    }

    #[test]
    fn test_latin1_replaces_wide_characters() {
        assert_eq!(encode_text("a\u{3b1}b", TextEncoding::Latin1), b"a?b".to_vec());
    }

    #[test]
    fn test_utf16_emits_bom() {
        assert_eq!(
            encode_text("AB", TextEncoding::Utf16),
            vec![0xFF, 0xFE, b'A', 0, b'B', 0]
        );
        assert_eq!(encode_text("AB", TextEncoding::Utf16BE), vec![0, b'A', 0, b'B']);
    }

    #[test]
    fn test_utf16_decodes_either_bom() {
        assert_eq!(decode_text(&[0xFE, 0xFF, 0, b'A'], TextEncoding::Utf16), "A");
        assert_eq!(decode_text(&[0xFF, 0xFE, b'A', 0], TextEncoding::Utf16), "A");
        assert_eq!(decode_text(&[b'A', 0], TextEncoding::Utf16), "A");
    }

    #[test]
    fn test_terminator_width() {
        assert_eq!(TextEncoding::Latin1.terminator(), &[0]);
        assert_eq!(TextEncoding::Utf16BE.terminator(), &[0, 0]);
    }
}
