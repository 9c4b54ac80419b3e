// Attached picture frames (APIC, and PIC in v2.2 tags)

use serde::Serialize;

use crate::error::{Error, Result};
use crate::id3::encoded_text::EncodedText;
use crate::id3::frames::{leading_encoding, FramePayload};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{bytes_to_text, index_of_terminator, pad_right};
use crate::utils::encoding::{decode_text, encode_text, TextEncoding};

/// Picture types defined for attached pictures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureType {
    Other = 0,
    FileIcon = 1,
    OtherFileIcon = 2,
    CoverFront = 3,
    CoverBack = 4,
    LeafletPage = 5,
    Media = 6,
    LeadArtist = 7,
    Artist = 8,
    Conductor = 9,
    Band = 10,
    Composer = 11,
    Lyricist = 12,
    RecordingLocation = 13,
    DuringRecording = 14,
    DuringPerformance = 15,
    VideoScreenCapture = 16,
    BrightColouredFish = 17,
    Illustration = 18,
    BandLogo = 19,
    PublisherLogo = 20,
}

impl PictureType {
    const ALL: [PictureType; 21] = [
        PictureType::Other,
        PictureType::FileIcon,
        PictureType::OtherFileIcon,
        PictureType::CoverFront,
        PictureType::CoverBack,
        PictureType::LeafletPage,
        PictureType::Media,
        PictureType::LeadArtist,
        PictureType::Artist,
        PictureType::Conductor,
        PictureType::Band,
        PictureType::Composer,
        PictureType::Lyricist,
        PictureType::RecordingLocation,
        PictureType::DuringRecording,
        PictureType::DuringPerformance,
        PictureType::VideoScreenCapture,
        PictureType::BrightColouredFish,
        PictureType::Illustration,
        PictureType::BandLogo,
        PictureType::PublisherLogo,
    ];

    /// `None` for bytes outside the defined range.
    pub fn from_byte(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PictureType::Other => "Other",
            PictureType::FileIcon => "File Icon",
            PictureType::OtherFileIcon => "Other File Icon",
            PictureType::CoverFront => "Cover (front)",
            PictureType::CoverBack => "Cover (back)",
            PictureType::LeafletPage => "Leaflet page",
            PictureType::Media => "Media",
            PictureType::LeadArtist => "Lead artist",
            PictureType::Artist => "Artist",
            PictureType::Conductor => "Conductor",
            PictureType::Band => "Band",
            PictureType::Composer => "Composer",
            PictureType::Lyricist => "Lyricist",
            PictureType::RecordingLocation => "Recording Location",
            PictureType::DuringRecording => "During recording",
            PictureType::DuringPerformance => "During performance",
            PictureType::VideoScreenCapture => "Video screen capture",
            PictureType::BrightColouredFish => "A bright coloured fish",
            PictureType::Illustration => "Illustration",
            PictureType::BandLogo => "Band/artist logotype",
            PictureType::PublisherLogo => "Publisher/Studio logotype",
        }
    }
}

/// `[encoding][mime][0][picture type][description][terminator][image]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureFrameData {
    pub mime_type: String,
    pub picture_type: u8,
    pub description: EncodedText,
    pub image_data: Vec<u8>,
}

impl PictureFrameData {
    pub fn new(
        mime_type: impl Into<String>,
        picture_type: u8,
        description: EncodedText,
        image_data: Vec<u8>,
    ) -> Self {
        PictureFrameData {
            mime_type: mime_type.into(),
            picture_type,
            description,
            image_data,
        }
    }
}

/// Reads `[picture type][description][terminator][image]` at `offset`.
fn read_picture_tail(
    data: &[u8],
    offset: usize,
    encoding: TextEncoding,
) -> Result<(u8, EncodedText, Vec<u8>)> {
    let picture_type = *data
        .get(offset)
        .ok_or_else(|| Error::invalid("picture payload too short for picture type"))?;
    let (description, consumed) = EncodedText::read_terminated(encoding, data, offset + 1);
    let image_data = data[offset + 1 + consumed..].to_vec();
    Ok((picture_type, description, image_data))
}

impl FramePayload for PictureFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let encoding = leading_encoding(data, "picture")?;
        let mime_end = index_of_terminator(data, 1, 1)
            .ok_or_else(|| Error::invalid("picture mime type is not terminated"))?;
        let mime_type = decode_text(&data[1..mime_end], TextEncoding::Latin1);
        let (picture_type, description, image_data) =
            read_picture_tail(data, mime_end + 1, encoding)?;
        Ok(PictureFrameData {
            mime_type,
            picture_type,
            description,
            image_data,
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = vec![self.description.encoding().as_byte()];
        bytes.extend(encode_text(&self.mime_type, TextEncoding::Latin1));
        bytes.push(0);
        bytes.push(self.picture_type);
        bytes.extend(self.description.to_terminated_bytes());
        bytes.extend_from_slice(&self.image_data);
        bytes
    }
}

/// v2.2 picture: a three-letter image format in place of the mime type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObsoletePictureFrameData {
    pub picture: PictureFrameData,
    /// Format as read, kept while the mime type still matches it.
    format: Option<String>,
}

impl ObsoletePictureFrameData {
    pub fn new(picture: PictureFrameData) -> Self {
        ObsoletePictureFrameData {
            picture,
            format: None,
        }
    }

    fn mime_type_for(format: &str) -> String {
        format!("image/{}", format.trim_end().to_lowercase())
    }

    /// "image/png" becomes "PNG" and "image/jpeg" becomes "JPG".
    fn image_format(&self) -> String {
        if let Some(format) = &self.format {
            if Self::mime_type_for(format) == self.picture.mime_type {
                return pad_right(format, 3, ' ');
            }
        }
        let subtype = self
            .picture
            .mime_type
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        let subtype = if subtype == "JPEG" { "JPG".to_string() } else { subtype };
        pad_right(&subtype.chars().take(3).collect::<String>(), 3, ' ')
    }
}

impl FramePayload for ObsoletePictureFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let encoding = leading_encoding(data, "picture")?;
        let format = bytes_to_text(data, 1, 3, TextEncoding::Latin1)
            .map_err(|_| Error::invalid("picture payload too short for image format"))?;
        let (picture_type, description, image_data) = read_picture_tail(data, 4, encoding)?;
        Ok(ObsoletePictureFrameData {
            picture: PictureFrameData {
                mime_type: Self::mime_type_for(&format),
                picture_type,
                description,
                image_data,
            },
            format: Some(format),
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = vec![self.picture.description.encoding().as_byte()];
        bytes.extend(encode_text(&self.image_format(), TextEncoding::Latin1));
        bytes.push(self.picture.picture_type);
        bytes.extend(self.picture.description.to_terminated_bytes());
        bytes.extend_from_slice(&self.picture.image_data);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PictureFrameData {
        PictureFrameData::new(
            "mime/type",
            2,
            EncodedText::new("ABCDEFGHIJKLMNOPQ"),
            vec![b'D', b'E', b'F', b'G', b'H', b'I'],
        )
    }

    #[test]
    fn test_pack() {
        let mut expected = vec![0];
        expected.extend_from_slice(b"mime/type\0\x02ABCDEFGHIJKLMNOPQ\0DEFGHI");
        assert_eq!(sample().write(), expected);
        assert_eq!(PictureFrameData::parse(&expected, TagVersion::V23).unwrap(), sample());
    }

    #[test]
    fn test_unsynchronised_image() {
        let mut picture = sample();
        picture.image_data = vec![0xFF, 0xFB, 0x00, 0xFF];
        let encoded = picture.encode(true);
        assert!(encoded.ends_with(&[0xFF, 0x00, 0xFB, 0x00, 0xFF, 0x00]));
        assert_eq!(PictureFrameData::decode(&encoded, TagVersion::V24, true).unwrap(), picture);
    }

    #[test]
    fn test_unicode_description() {
        let mut picture = sample();
        picture.description = EncodedText::with_encoding(TextEncoding::Utf16, "\u{03c0}");
        let bytes = picture.write();
        assert_eq!(bytes[0], 1);
        assert_eq!(PictureFrameData::parse(&bytes, TagVersion::V24).unwrap(), picture);
    }

    #[test]
    fn test_obsolete_picture() {
        let mut bytes = vec![0];
        bytes.extend_from_slice(b"PNG\x03cover\0");
        bytes.extend_from_slice(&[1, 2, 3]);
        let data = ObsoletePictureFrameData::parse(&bytes, TagVersion::V22).unwrap();
        assert_eq!(data.picture.mime_type, "image/png");
        assert_eq!(data.picture.picture_type, 3);
        assert_eq!(data.picture.description.text(), "cover");
        assert_eq!(data.picture.image_data, vec![1, 2, 3]);
        assert_eq!(data.write(), bytes);
    }

    #[test]
    fn test_obsolete_jpeg_format() {
        let data = ObsoletePictureFrameData::new(PictureFrameData::new(
            "image/jpeg",
            3,
            EncodedText::default(),
            vec![],
        ));
        assert_eq!(&data.write()[1..4], b"JPG");
    }

    #[test]
    fn test_obsolete_format_case_preserved() {
        let mut bytes = vec![0];
        bytes.extend_from_slice(b"jpg\x03\0");
        bytes.extend_from_slice(&[1, 2, 3]);
        let mut data = ObsoletePictureFrameData::parse(&bytes, TagVersion::V22).unwrap();
        assert_eq!(data.picture.mime_type, "image/jpg");
        assert_eq!(data.write(), bytes);

        data.picture.mime_type = "image/png".into();
        assert_eq!(&data.write()[1..4], b"PNG");
    }

    #[test]
    fn test_picture_type_names() {
        assert_eq!(PictureType::from_byte(3), Some(PictureType::CoverFront));
        assert_eq!(PictureType::from_byte(3).unwrap().name(), "Cover (front)");
        assert_eq!(PictureType::from_byte(21), None);
    }
}
