// ID3v1 tag implementation

use std::io::{Read, Seek};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::id3::genres::genre_name;
use crate::utils::buffer::{bytes_to_text, trim_right};
use crate::utils::encoding::{encode_text, TextEncoding};
use crate::utils::io::read_tail;

/// ID3v1 tag structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// Present for ID3v1.1 tags. Track 0 cannot be stored and means no track.
    pub track: Option<u8>,
    pub genre: u8,
}

impl Default for Id3v1Tag {
    fn default() -> Self {
        Id3v1Tag {
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            year: String::new(),
            comment: String::new(),
            track: None,
            genre: Self::NO_GENRE,
        }
    }
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];
    /// Genre byte meaning "no genre".
    pub const NO_GENRE: u8 = 0xFF;

    /// Read the ID3v1 tag at the end of a stream
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Option<Self>> {
        let Some(buffer) = read_tail(reader, Self::TAG_SIZE)? else {
            return Ok(None);
        };
        match Self::decode(&buffer) {
            Ok(tag) => Ok(Some(tag)),
            Err(err) if err.is_absent() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Decode a 128-byte tag
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        if buffer.len() != Self::TAG_SIZE {
            return Err(Error::invalid(format!(
                "ID3v1 tag must be {} bytes, got {}",
                Self::TAG_SIZE,
                buffer.len()
            )));
        }
        if buffer[0..3] != Self::TAG_ID {
            return Err(Error::NoSuchTag);
        }

        // ID3v1.1 keeps the track in the last byte of a zero-terminated comment
        let track = (buffer[125] == 0 && buffer[126] != 0).then_some(buffer[126]);
        let comment_len = if track.is_some() { 28 } else { 30 };

        Ok(Id3v1Tag {
            title: Self::parse_string(buffer, 3, 30)?,
            artist: Self::parse_string(buffer, 33, 30)?,
            album: Self::parse_string(buffer, 63, 30)?,
            year: Self::parse_string(buffer, 93, 4)?,
            comment: Self::parse_string(buffer, 97, comment_len)?,
            track,
            genre: buffer[127],
        })
    }

    /// Parse a zero-padded field
    fn parse_string(buffer: &[u8], offset: usize, length: usize) -> Result<String> {
        let text = bytes_to_text(buffer, offset, length, TextEncoding::Latin1)?;
        let end = text.find('\0').unwrap_or(text.len());
        Ok(trim_right(&text[..end]).to_string())
    }

    fn write_string(buffer: &mut [u8], offset: usize, length: usize, text: &str) {
        let bytes = encode_text(text, TextEncoding::Latin1);
        let count = bytes.len().min(length);
        buffer[offset..offset + count].copy_from_slice(&bytes[..count]);
    }

    /// Encode to the fixed 128-byte layout. Over-long fields are truncated.
    pub fn encode(&self) -> [u8; 128] {
        let mut buffer = [0u8; Self::TAG_SIZE];
        buffer[0..3].copy_from_slice(&Self::TAG_ID);
        Self::write_string(&mut buffer, 3, 30, &self.title);
        Self::write_string(&mut buffer, 33, 30, &self.artist);
        Self::write_string(&mut buffer, 63, 30, &self.album);
        Self::write_string(&mut buffer, 93, 4, &self.year);
        match self.stored_track() {
            Some(track) => {
                Self::write_string(&mut buffer, 97, 28, &self.comment);
                buffer[126] = track;
            }
            None => Self::write_string(&mut buffer, 97, 30, &self.comment),
        }
        buffer[127] = self.genre;
        buffer
    }

    /// The track as written; zero reads back as absent so it is dropped.
    fn stored_track(&self) -> Option<u8> {
        self.track.filter(|&track| track != 0)
    }

    pub fn version(&self) -> &'static str {
        if self.stored_track().is_some() {
            "1.1"
        } else {
            "1.0"
        }
    }

    pub fn genre_description(&self) -> Option<&'static str> {
        genre_name(i32::from(self.genre))
    }
}
