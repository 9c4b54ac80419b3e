// Popularimeter frames (POPM), used for the Windows Media Player rating

use crate::error::{Error, Result};
use crate::id3::frames::FramePayload;
use crate::id3::version::TagVersion;
use crate::utils::buffer::index_of_terminator;
use crate::utils::encoding::{decode_text, encode_text, TextEncoding};

/// Email address Windows Media Player writes its ratings under.
pub const WMP_EMAIL: &str = "Windows Media Player 9 Series";

/// Rating bytes written by Windows Media Player for 0 to 5 stars.
const WMP_RATINGS: [u8; 6] = [0, 1, 64, 128, 196, 255];

/// `[email][0][rating][counter...]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularimeterFrameData {
    pub email: String,
    pub rating: u8,
    /// Big-endian play counter, kept at its stored width.
    pub counter: Vec<u8>,
}

impl PopularimeterFrameData {
    /// A Windows Media Player rating of `stars` (0 to 5).
    pub fn wmp(stars: u8) -> Option<Self> {
        WMP_RATINGS.get(usize::from(stars)).map(|&rating| PopularimeterFrameData {
            email: WMP_EMAIL.to_string(),
            rating,
            counter: Vec::new(),
        })
    }

    /// Star count for the stored rating byte, or `None` if it is not one WMP writes.
    pub fn wmp_stars(&self) -> Option<u8> {
        WMP_RATINGS
            .iter()
            .position(|&rating| rating == self.rating)
            .map(|stars| stars as u8)
    }

    pub fn play_count(&self) -> Option<u64> {
        if self.counter.is_empty() || self.counter.len() > 8 {
            return None;
        }
        Some(self.counter.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }
}

impl FramePayload for PopularimeterFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let end = index_of_terminator(data, 0, 1)
            .ok_or_else(|| Error::invalid("popularimeter email is not terminated"))?;
        let rating = *data
            .get(end + 1)
            .ok_or_else(|| Error::invalid("popularimeter payload has no rating"))?;
        Ok(PopularimeterFrameData {
            email: decode_text(&data[..end], TextEncoding::Latin1),
            rating,
            counter: data[end + 2..].to_vec(),
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = encode_text(&self.email, TextEncoding::Latin1);
        bytes.push(0);
        bytes.push(self.rating);
        bytes.extend_from_slice(&self.counter);
        bytes
    }
}
