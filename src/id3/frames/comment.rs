// Comment and unsynchronised lyrics frames (COMM, USLT)

use crate::error::{Error, Result};
use crate::id3::encoded_text::EncodedText;
use crate::id3::frames::{leading_encoding, FramePayload};
use crate::id3::version::TagVersion;
use crate::utils::buffer::{bytes_to_text, pad_right};
use crate::utils::encoding::{encode_text, TextEncoding};

const DEFAULT_LANGUAGE: &str = "eng";

/// `[encoding][language:3][description][terminator][text]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrameData {
    language: String,
    description: EncodedText,
    comment: EncodedText,
}

impl CommentFrameData {
    /// Description and comment must share an encoding. A missing
    /// description is an empty one in the comment's encoding.
    pub fn new(
        language: Option<&str>,
        description: Option<EncodedText>,
        comment: EncodedText,
    ) -> Result<Self> {
        let description = match description {
            Some(description) if description.encoding() != comment.encoding() => {
                return Err(Error::IllegalArgument(format!(
                    "description encoding {:?} differs from comment encoding {:?}",
                    description.encoding(),
                    comment.encoding()
                )));
            }
            Some(description) => description,
            None => EncodedText::with_encoding(comment.encoding(), ""),
        };
        Ok(CommentFrameData {
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_string(),
            description,
            comment,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn description(&self) -> &EncodedText {
        &self.description
    }

    pub fn comment(&self) -> &EncodedText {
        &self.comment
    }

    fn language_bytes(&self) -> Vec<u8> {
        let language = if self.language.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            pad_right(&self.language.chars().take(3).collect::<String>(), 3, '\0')
        };
        encode_text(&language, TextEncoding::Latin1)
    }
}

impl FramePayload for CommentFrameData {
    fn parse(data: &[u8], _version: TagVersion) -> Result<Self> {
        let encoding = leading_encoding(data, "comment")?;
        let language = bytes_to_text(data, 1, 3, TextEncoding::Latin1)
            .map_err(|_| Error::invalid("comment payload too short for language"))?;
        let (description, consumed) = EncodedText::read_terminated(encoding, data, 4);
        let comment = EncodedText::from_bytes(encoding, &data[4 + consumed..]);
        Ok(CommentFrameData {
            language,
            description,
            comment,
        })
    }

    fn write(&self) -> Vec<u8> {
        let mut bytes = vec![self.comment.encoding().as_byte()];
        bytes.extend(self.language_bytes());
        bytes.extend(self.description.to_terminated_bytes());
        bytes.extend(self.comment.to_bytes());
        bytes
    }
}
