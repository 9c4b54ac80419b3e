// MP3 file scanning: locate tags and the run of MPEG audio frames

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::id3::v2::{Id3v2Header, HEADER_SIZE};
use crate::id3::{Id3v1Tag, Id3v2Tag, TagVersion};
use crate::mpeg::MpegFrameHeader;
use crate::utils::io::{check_signature, read_at};

const XING_IDS: [&[u8; 4]; 2] = [b"Xing", b"Info"];

/// An MP3 file held in memory with its tags and audio frame summary.
#[derive(Debug, Clone)]
pub struct Mp3File {
    data: Vec<u8>,
    id3v2: Option<Id3v2Tag>,
    id3v1: Option<Id3v1Tag>,
    /// Bytes occupied by the leading ID3v2 tag in `data`.
    id3v2_length: usize,
    audio: Option<AudioSummary>,
}

/// The run of consecutive MPEG frames found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSummary {
    pub start_offset: usize,
    pub end_offset: usize,
    pub frame_count: usize,
    pub first_header: MpegFrameHeader,
    pub has_xing: bool,
    /// Frame count per bitrate in kbps.
    pub bitrates: BTreeMap<u32, usize>,
}

impl AudioSummary {
    pub fn is_vbr(&self) -> bool {
        self.has_xing || self.bitrates.len() > 1
    }

    /// Most common bitrate in kbps.
    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrates
            .iter()
            .max_by_key(|&(_, count)| *count)
            .map_or(self.first_header.bitrate_kbps, |(&bitrate, _)| bitrate)
    }

    /// Duration estimated from the audio byte length and the dominant bitrate.
    pub fn length_in_milliseconds(&self) -> u64 {
        let bytes = (self.end_offset - self.start_offset) as u64;
        bytes * 8 / u64::from(self.bitrate_kbps().max(1))
    }
}

impl Mp3File {
    /// Read and scan a file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        info!(path = %path.display(), bytes = data.len(), "scanning MP3 file");
        Self::from_bytes(data)
    }

    /// Scan an in-memory file
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (id3v2, id3v2_length) = match Id3v2Header::parse(&data) {
            Ok(header) => {
                let footer = if header.flags.footer { HEADER_SIZE } else { 0 };
                let length = HEADER_SIZE + header.size as usize + footer;
                (Some(Id3v2Tag::decode(&data)?), length)
            }
            Err(err) if err.is_absent() => (None, 0),
            Err(err) => return Err(err),
        };

        let id3v1 = match data.len().checked_sub(Id3v1Tag::TAG_SIZE) {
            Some(start) if start >= id3v2_length => match Id3v1Tag::decode(&data[start..]) {
                Ok(tag) => Some(tag),
                Err(err) if err.is_absent() => None,
                Err(err) => return Err(err),
            },
            _ => None,
        };

        let audio_end = data.len() - if id3v1.is_some() { Id3v1Tag::TAG_SIZE } else { 0 };
        let audio = scan_frames(&data[..audio_end], id3v2_length);
        match &audio {
            Some(audio) => debug!(
                start = audio.start_offset,
                frames = audio.frame_count,
                xing = audio.has_xing,
                "found MPEG frames"
            ),
            None => debug!("no MPEG frames found"),
        }

        Ok(Mp3File {
            data,
            id3v2,
            id3v1,
            id3v2_length,
            audio,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn id3v2(&self) -> Option<&Id3v2Tag> {
        self.id3v2.as_ref()
    }

    pub fn id3v2_mut(&mut self) -> Option<&mut Id3v2Tag> {
        self.id3v2.as_mut()
    }

    /// The ID3v2 tag, created empty with `version` if the file has none.
    pub fn id3v2_or_insert(&mut self, version: TagVersion) -> &mut Id3v2Tag {
        self.id3v2.get_or_insert_with(|| Id3v2Tag::new(version))
    }

    pub fn set_id3v2(&mut self, tag: Option<Id3v2Tag>) {
        self.id3v2 = tag;
    }

    pub fn id3v1(&self) -> Option<&Id3v1Tag> {
        self.id3v1.as_ref()
    }

    pub fn set_id3v1(&mut self, tag: Option<Id3v1Tag>) {
        self.id3v1 = tag;
    }

    pub fn audio(&self) -> Option<&AudioSummary> {
        self.audio.as_ref()
    }

    /// Reassemble the file with the current tags around the original audio.
    pub fn to_bytes(&self) -> Vec<u8> {
        let original_v1 = self
            .data
            .len()
            .checked_sub(Id3v1Tag::TAG_SIZE)
            .filter(|&start| start >= self.id3v2_length && self.data[start..].starts_with(b"TAG"));
        let body = &self.data[self.id3v2_length..original_v1.unwrap_or(self.data.len())];

        let mut bytes = self.id3v2.as_ref().map(Id3v2Tag::encode).unwrap_or_default();
        bytes.extend_from_slice(body);
        if let Some(tag) = &self.id3v1 {
            bytes.extend_from_slice(&tag.encode());
        }
        bytes
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved MP3 file");
        Ok(())
    }
}

/// Decode a header at `offset` whose whole frame fits before `end`.
fn frame_at(data: &[u8], offset: usize) -> Option<MpegFrameHeader> {
    let header = MpegFrameHeader::parse(data.get(offset..)?).ok()?;
    (offset + header.length_in_bytes <= data.len()).then_some(header)
}

/// A frame sync is trusted only when the next frame also decodes or the data ends.
fn is_frame_start(data: &[u8], offset: usize) -> Option<MpegFrameHeader> {
    let header = frame_at(data, offset)?;
    let next = offset + header.length_in_bytes;
    (next == data.len() || frame_at(data, next).is_some()).then_some(header)
}

fn scan_frames(data: &[u8], from: usize) -> Option<AudioSummary> {
    let (start, first_header) = (from..data.len())
        .filter(|&offset| data[offset] == 0xFF)
        .find_map(|offset| is_frame_start(data, offset).map(|header| (offset, header)))?;

    let xing_at = start + first_header.xing_offset();
    let has_xing = data
        .get(xing_at..xing_at + 4)
        .is_some_and(|id| XING_IDS.iter().any(|xing| id == xing.as_slice()));

    let mut bitrates = BTreeMap::new();
    let mut frame_count = 0;
    let mut offset = start;
    while let Some(header) = frame_at(data, offset) {
        let is_xing_frame = has_xing && offset == start;
        if !is_xing_frame {
            *bitrates.entry(header.bitrate_kbps).or_insert(0) += 1;
            frame_count += 1;
        }
        offset += header.length_in_bytes;
    }

    Some(AudioSummary {
        start_offset: start,
        end_offset: offset,
        frame_count,
        first_header,
        has_xing,
        bitrates,
    })
}

/// What a quick look at the start and end of a file reveals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detected {
    pub id3v2: Option<TagVersion>,
    pub id3v1: bool,
}

/// Check for tags without reading the whole file.
pub fn detect<P: AsRef<Path>>(path: P) -> Result<Detected> {
    let mut reader = BufReader::new(File::open(path)?);
    let id3v2 = if check_signature(&mut reader, 0, b"ID3")? {
        let header = read_at(&mut reader, 0, HEADER_SIZE)?;
        match Id3v2Header::parse(&header) {
            Ok(header) => Some(header.version),
            Err(Error::NoSuchTag) => None,
            Err(err) => return Err(err),
        }
    } else {
        None
    };
    let id3v1 = Id3v1Tag::read_from(&mut reader)?.is_some();
    Ok(Detected { id3v2, id3v1 })
}
