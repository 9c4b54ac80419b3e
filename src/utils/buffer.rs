// Byte-level primitives shared by the tag, frame and header codecs

use crate::error::{Error, Result};
use crate::utils::encoding::{decode_text, encode_text, TextEncoding};

/// Decode `length` bytes starting at `offset` as text.
pub fn bytes_to_text(
    buffer: &[u8],
    offset: usize,
    length: usize,
    encoding: TextEncoding,
) -> Result<String> {
    Ok(decode_text(slice(buffer, offset, length)?, encoding))
}

/// Encode the `length` characters of `text` starting at character `offset`.
pub fn text_to_bytes(
    text: &str,
    offset: usize,
    length: usize,
    encoding: TextEncoding,
) -> Result<Vec<u8>> {
    let available = text.chars().count();
    if offset > available || length > available - offset {
        return Err(Error::range(offset, length, available));
    }
    let part: String = text.chars().skip(offset).take(length).collect();
    Ok(encode_text(&part, encoding))
}

/// Borrow `length` bytes at `offset`, failing instead of clamping.
pub fn slice(buffer: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
    offset
        .checked_add(length)
        .and_then(|end| buffer.get(offset..end))
        .ok_or_else(|| Error::range(offset, length, buffer.len()))
}

/// Copy `length` bytes at `offset` into a new buffer.
pub fn copy_buffer(buffer: &[u8], offset: usize, length: usize) -> Result<Vec<u8>> {
    slice(buffer, offset, length).map(<[u8]>::to_vec)
}

pub fn pack_u32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn unpack_u32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Read a big-endian u32 at `offset`.
pub fn read_u32(buffer: &[u8], offset: usize) -> Result<u32> {
    let bytes = slice(buffer, offset, 4)?;
    Ok(unpack_u32([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Three-byte big-endian integer used by v2.2 frame headers.
pub fn pack_u24(value: u32) -> [u8; 3] {
    let [_, a, b, c] = value.to_be_bytes();
    [a, b, c]
}

pub fn unpack_u24(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

/// Largest value a synchsafe integer can carry.
pub const SYNCHSAFE_MAX: u32 = 0x0FFF_FFFF;

/// Pack the low 28 bits of `value` into 4 bytes of 7 bits each.
pub fn pack_synchsafe(value: u32) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    for (i, byte) in bytes.iter_mut().rev().enumerate() {
        *byte = ((value >> (7 * i)) & 0x7F) as u8;
    }
    bytes
}

pub fn unpack_synchsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// Read a synchsafe integer at `offset`.
pub fn read_synchsafe(buffer: &[u8], offset: usize) -> Result<u32> {
    let bytes = slice(buffer, offset, 4)?;
    Ok(unpack_synchsafe([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Test bit `position` of `byte`, where 0 is the least significant bit.
pub fn check_bit(byte: u8, position: u8) -> bool {
    (byte >> position) & 1 == 1
}

pub fn set_bit(byte: u8, position: u8, value: bool) -> u8 {
    if value {
        byte | (1 << position)
    } else {
        byte & !(1 << position)
    }
}

/// Find the first terminator at or after `from`.
///
/// Double-width terminators are only matched on positions reachable from
/// `from` in steps of two, so an odd-aligned zero pair is never reported.
pub fn index_of_terminator(buffer: &[u8], from: usize, width: usize) -> Option<usize> {
    if width == 1 {
        return buffer
            .iter()
            .skip(from)
            .position(|&b| b == 0)
            .map(|i| i + from);
    }
    (from..buffer.len().saturating_sub(1))
        .step_by(2)
        .find(|&i| buffer[i] == 0 && buffer[i + 1] == 0)
}

/// A byte following 0xFF that would read as a false sync, or be ambiguous
/// with an inserted zero.
fn needs_stuffing(next: Option<&u8>) -> bool {
    match next {
        None => true,
        Some(&b) => b & 0xE0 == 0xE0 || b == 0,
    }
}

/// Number of zero bytes `unsynchronise` would insert.
pub fn size_unsynchronisation_would_add(buffer: &[u8]) -> usize {
    buffer
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == 0xFF && needs_stuffing(buffer.get(i + 1)))
        .count()
}

/// Number of zero bytes `synchronise` would remove.
pub fn size_synchronisation_would_subtract(buffer: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < buffer.len() {
        if is_stuffed_zero(buffer, i) {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// True when `buffer[i]` is 0xFF followed by an inserted zero.
fn is_stuffed_zero(buffer: &[u8], i: usize) -> bool {
    buffer[i] == 0xFF && buffer.get(i + 1) == Some(&0) && needs_stuffing(buffer.get(i + 2))
}

/// Insert a zero after every 0xFF that could start a false frame sync.
pub fn unsynchronise(buffer: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buffer.len() + size_unsynchronisation_would_add(buffer));
    for (i, &b) in buffer.iter().enumerate() {
        out.push(b);
        if b == 0xFF && needs_stuffing(buffer.get(i + 1)) {
            out.push(0);
        }
    }
    out
}

/// Remove the zeros inserted by `unsynchronise`.
pub fn synchronise(buffer: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(buffer.len() - size_synchronisation_would_subtract(buffer));
    let mut i = 0;
    while i < buffer.len() {
        out.push(buffer[i]);
        i += if is_stuffed_zero(buffer, i) { 2 } else { 1 };
    }
    out
}

/// Pad `text` on the right with `pad` up to `width` characters.
pub fn pad_right(text: &str, width: usize, pad: char) -> String {
    let mut padded = text.to_string();
    let missing = width.saturating_sub(text.chars().count());
    padded.extend(std::iter::repeat(pad).take(missing));
    padded
}

/// Trim trailing whitespace and NUL characters.
pub fn trim_right(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}

/// Replace every occurrence of `token`; an absent replacement removes it.
pub fn substitute(source: &str, token: &str, replacement: Option<&str>) -> String {
    if token.is_empty() {
        return source.to_string();
    }
    source.replace(token, replacement.unwrap_or(""))
}

/// Map every character outside printable 7-bit ASCII to `?`.
pub fn to_ascii_only(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_u32() {
        assert_eq!(pack_u32(0xFFFB9044), [0xFF, 0xFB, 0x90, 0x44]);
        assert_eq!(unpack_u32([0xFF, 0xFB, 0x90, 0x44]), 0xFFFB9044);
    }

    #[test]
    fn test_u24() {
        assert_eq!(pack_u24(0x0A0B0C), [0x0A, 0x0B, 0x0C]);
        assert_eq!(unpack_u24([0x00, 0x01, 0x02]), 0x0102);
    }

    #[test]
    fn test_synchsafe() {
        assert_eq!(pack_synchsafe(1217), [0, 0, 9, 0x41]);
        assert_eq!(unpack_synchsafe([0, 0, 9, 0x41]), 1217);
        assert_eq!(unpack_synchsafe([8, 4, 2, 1]), 0x01010101);
        assert_eq!(pack_synchsafe(0x01010101), [8, 4, 2, 1]);
    }

    #[test]
    fn test_bits() {
        assert!(check_bit(0x01, 0));
        assert!(!check_bit(0x01, 1));
        assert!(check_bit(0x80, 7));
        assert_eq!(set_bit(0, 7, true), 0x80);
        assert_eq!(set_bit(0xFF, 0, false), 0xFE);
    }

    #[test]
    fn test_index_of_terminator() {
        assert_eq!(index_of_terminator(&[0, b'T', 0xDF, b'G', b'T'], 0, 1), Some(0));
        assert_eq!(index_of_terminator(&[b'T', b'A', 0, b'G'], 1, 1), Some(2));
        assert_eq!(index_of_terminator(&[b'T', b'A', b'G'], 0, 1), None);
        assert_eq!(
            index_of_terminator(&[b'T', 0, b'G', b'T', b'T', 0, 0, b'G', b'A'], 0, 2),
            None
        );
        assert_eq!(
            index_of_terminator(&[b'T', 0xDF, b'G', 0, 0, b'T', b'G', b'A', 0, 0, 0, 0], 0, 2),
            Some(8)
        );
        assert_eq!(index_of_terminator(&[b'A', 0, 0, 0], 1, 2), Some(1));
    }

    #[test]
    fn test_unsynchronise() {
        assert_eq!(unsynchronise(&[0xFF]), vec![0xFF, 0]);
        assert_eq!(
            unsynchronise(&[0xFF, 0xFF, 0xFF, 0xFF]),
            vec![0xFF, 0, 0xFF, 0, 0xFF, 0, 0xFF, 0]
        );
        assert_eq!(unsynchronise(&[0xFF, 0, 1]), vec![0xFF, 0, 0, 1]);
        assert_eq!(unsynchronise(&[0xFF, 0x1F]), vec![0xFF, 0x1F]);
    }

    #[test]
    fn test_unsynchronisation_sizes() {
        assert_eq!(size_unsynchronisation_would_add(&[0xFF, 0xFB]), 1);
        assert_eq!(size_unsynchronisation_would_add(&[0, 0xFF]), 1);
        assert_eq!(size_unsynchronisation_would_add(&[0xFF, 0xFF, 0xFF]), 3);
        assert_eq!(size_unsynchronisation_would_add(&[0x10, 0xFF, 0x10]), 0);
        assert_eq!(
            size_synchronisation_would_subtract(&[0xFF, 0, 0xFF, 0, 0xFF, 0]),
            3
        );
    }

    #[test]
    fn test_synchronise_inverts() {
        let original = [0xFF, 0, 0xFF, 0xE0, 0x12, 0xFF];
        assert_eq!(synchronise(&unsynchronise(&original)), original.to_vec());
    }

    #[test]
    fn test_range_errors() {
        assert!(bytes_to_text(b"abc", 2, 2, TextEncoding::Latin1).is_err());
        assert_eq!(bytes_to_text(b"abcd", 1, 2, TextEncoding::Latin1).unwrap(), "bc");
        let text = "0123456789abcdefghij";
        assert!(text_to_bytes(text, 20, 1, TextEncoding::Latin1).is_err());
        assert!(text_to_bytes(text, 0, 21, TextEncoding::Latin1).is_err());
        assert!(text_to_bytes(text, 3, 18, TextEncoding::Latin1).is_err());
        assert_eq!(text_to_bytes(text, 3, 2, TextEncoding::Latin1).unwrap(), b"34".to_vec());
        assert!(copy_buffer(&[1, 2, 3], 2, 5).is_err());
        assert_eq!(copy_buffer(&[1, 2, 3], 1, 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_string_helpers() {
        assert_eq!(pad_right("ab", 4, ' '), "ab  ");
        assert_eq!(pad_right("abcde", 4, ' '), "abcde");
        assert_eq!(trim_right("title \0\0 \t"), "title");
        assert_eq!(substitute("a-b-c", "-", Some("+")), "a+b+c");
        assert_eq!(substitute("a-b-c", "-", None), "abc");
        assert_eq!(substitute("a-b-c", "", Some("+")), "a-b-c");
        assert_eq!(to_ascii_only("\u{fc}12\u{ac}34"), "?12?34");
    }
}
