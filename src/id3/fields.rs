// Typed field accessors over an ID3v2 tag's frames

use tracing::warn;

use crate::error::{Error, Result};
use crate::id3::encoded_text::EncodedText;
use crate::id3::frame::Frame;
use crate::id3::frames::ids::{self, FrameId};
use crate::id3::frames::popularimeter::WMP_EMAIL;
use crate::id3::frames::{
    ChapterFrameData, ChapterTocFrameData, CommentFrameData, FrameData, ObsoletePictureFrameData,
    PictureFrameData, PopularimeterFrameData, TextFrameData, UrlFrameData, WwwFrameData,
};
use crate::id3::genres::{genre_name, match_genre_description};
use crate::id3::v2::Id3v2Tag;
use crate::id3::version::TagVersion;

/// Description iTunes uses for its volume normalisation comment.
pub const ITUNES_COMMENT_DESCRIPTION: &str = "iTunNORM";

/// Parse the numeric code of a combined genre such as "(13)Pop" or "13".
pub fn extract_genre_number(value: &str) -> Result<i32> {
    let value = value.trim();
    let number = match (value.strip_prefix('('), value.find(')')) {
        (Some(_), Some(close)) if close > 0 => &value[1..close],
        _ => value,
    };
    number
        .parse()
        .map_err(|_| Error::NumberFormat(format!("no genre number in {value:?}")))
}

/// The text after a parenthesised genre code, or the whole value without one.
pub fn extract_genre_description(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match (value.strip_prefix('('), value.find(')')) {
        (Some(_), Some(close)) if close > 0 => Some(value[close + 1..].to_string()),
        _ => Some(value.to_string()),
    }
}

/// Parse a BPM value written either as an integer or a decimal with `.` or `,`.
fn parse_bpm(value: &str) -> Option<i32> {
    let value = value.trim();
    value
        .parse::<i32>()
        .ok()
        .or_else(|| value.replace(',', ".").parse::<f64>().ok().map(|bpm| bpm.round() as i32))
}

macro_rules! text_fields {
    ($($(#[$doc:meta])* $get:ident, $set:ident => $id:path;)*) => {
        impl Id3v2Tag {
            $(
                $(#[$doc])*
                pub fn $get(&self) -> Option<String> {
                    self.text_field($id)
                }

                pub fn $set(&mut self, value: &str) -> Result<()> {
                    self.set_text_field($id, value)
                }
            )*
        }
    };
}

text_fields! {
    /// Track number, possibly with a total such as "3/12".
    track, set_track => ids::TRACK;
    part_of_set, set_part_of_set => ids::PART_OF_SET;
    grouping, set_grouping => ids::GROUPING;
    artist, set_artist => ids::ARTIST;
    album_artist, set_album_artist => ids::ALBUM_ARTIST;
    title, set_title => ids::TITLE;
    album, set_album => ids::ALBUM;
    year, set_year => ids::YEAR;
    date, set_date => ids::DATE;
    composer, set_composer => ids::COMPOSER;
    publisher, set_publisher => ids::PUBLISHER;
    original_artist, set_original_artist => ids::ORIGINAL_ARTIST;
    copyright, set_copyright => ids::COPYRIGHT;
    encoder, set_encoder => ids::ENCODER;
    key, set_key => ids::KEY;
}

macro_rules! link_fields {
    ($($get:ident, $set:ident => $id:path;)*) => {
        impl Id3v2Tag {
            $(
                pub fn $get(&self) -> Option<String> {
                    match self.field_data($id.for_version(self.version()))? {
                        FrameData::Www(data) => Some(data.url),
                        _ => None,
                    }
                }

                pub fn $set(&mut self, url: &str) -> Result<()> {
                    if url.is_empty() {
                        return Ok(());
                    }
                    let data = FrameData::Www(WwwFrameData::new(url));
                    self.set_frame_data($id.for_version(self.version()), &data)
                }
            )*
        }
    };
}

link_fields! {
    artist_url, set_artist_url => ids::ARTIST_URL;
    commercial_url, set_commercial_url => ids::COMMERCIAL_URL;
    copyright_url, set_copyright_url => ids::COPYRIGHT_URL;
    audiofile_url, set_audiofile_url => ids::AUDIOFILE_URL;
    audio_source_url, set_audio_source_url => ids::AUDIO_SOURCE_URL;
    radiostation_url, set_radiostation_url => ids::RADIOSTATION_URL;
    payment_url, set_payment_url => ids::PAYMENT_URL;
    publisher_url, set_publisher_url => ids::PUBLISHER_URL;
}

impl Id3v2Tag {
    /// Decoded payload of the first frame with `id`, logging undecodable ones.
    fn field_data(&self, id: &str) -> Option<FrameData> {
        let frame = self.frame(id)?;
        self.frame_data(frame)
            .map_err(|err| warn!(frame = id, error = %err, "skipping undecodable frame"))
            .ok()
    }

    /// Every decodable payload of frames with `id`.
    fn all_field_data(&self, id: &str) -> Vec<FrameData> {
        self.frame_set(id)
            .into_iter()
            .flat_map(|set| set.iter())
            .filter_map(|frame| {
                self.frame_data(frame)
                    .map_err(|err| warn!(frame = id, error = %err, "skipping undecodable frame"))
                    .ok()
            })
            .collect()
    }

    /// Clear every frame of a field.
    pub fn clear_field(&mut self, id: FrameId) {
        self.remove_frame_set(id.for_version(self.version()));
    }

    fn text_field(&self, id: FrameId) -> Option<String> {
        match self.field_data(id.for_version(self.version()))? {
            FrameData::Text(data) => Some(data.text.text().to_string()),
            _ => None,
        }
    }

    /// Replace a text field; empty values leave the tag unchanged.
    fn set_text_field(&mut self, id: FrameId, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        let data = FrameData::Text(TextFrameData::new(EncodedText::new(value)));
        self.set_frame_data(id.for_version(self.version()), &data)
    }

    pub fn compilation(&self) -> bool {
        self.text_field(ids::COMPILATION).as_deref() == Some("1")
    }

    pub fn set_compilation(&mut self, compilation: bool) -> Result<()> {
        self.set_text_field(ids::COMPILATION, if compilation { "1" } else { "0" })
    }

    pub fn bpm(&self) -> Option<i32> {
        self.text_field(ids::BPM).as_deref().and_then(parse_bpm)
    }

    /// Negative values leave the tag unchanged.
    pub fn set_bpm(&mut self, bpm: i32) -> Result<()> {
        if bpm < 0 {
            return Ok(());
        }
        self.set_text_field(ids::BPM, &bpm.to_string())
    }

    /// Numeric genre, or -1 when the stored text names no known genre.
    pub fn genre(&self) -> Option<i32> {
        let value = self.text_field(ids::GENRE)?;
        if let Ok(number) = extract_genre_number(&value) {
            return Some(number);
        }
        let description = extract_genre_description(&value)?;
        Some(match_genre_description(&description).map_or(-1, i32::from))
    }

    /// Genre name from the numeric code when present, else the stored text.
    pub fn genre_description(&self) -> Option<String> {
        let value = self.text_field(ids::GENRE)?;
        match extract_genre_number(&value) {
            Ok(number) => genre_name(number)
                .map(str::to_string)
                .or_else(|| extract_genre_description(&value)),
            Err(_) => extract_genre_description(&value),
        }
    }

    /// Negative values leave the tag unchanged.
    pub fn set_genre(&mut self, genre: i32) -> Result<()> {
        if genre < 0 {
            return Ok(());
        }
        let name = genre_name(genre).unwrap_or_default();
        let value = match self.version() {
            TagVersion::V24 if !name.is_empty() => name.to_string(),
            TagVersion::V24 => genre.to_string(),
            _ => format!("({genre}){name}"),
        };
        self.set_text_field(ids::GENRE, &value)
    }

    /// v2.4 stores the text as given; older versions need a known genre name.
    pub fn set_genre_description(&mut self, description: &str) -> Result<()> {
        if self.version() == TagVersion::V24 {
            return self.set_text_field(ids::GENRE, description);
        }
        let genre = match_genre_description(description).ok_or_else(|| {
            Error::IllegalArgument(format!("unknown genre {description:?}"))
        })?;
        self.set_genre(i32::from(genre))
    }

    fn comment_frames(&self, id: FrameId) -> Vec<CommentFrameData> {
        self.all_field_data(id.for_version(self.version()))
            .into_iter()
            .filter_map(|data| match data {
                FrameData::Comment(comment) => Some(comment),
                _ => None,
            })
            .collect()
    }

    fn is_itunes(comment: &CommentFrameData) -> bool {
        comment.description().text() == ITUNES_COMMENT_DESCRIPTION
    }

    /// Replace the frames of `id` whose payload `replaced` selects with one
    /// holding `data`. Frames that fail to decode are kept untouched.
    fn replace_matching_frames(
        &mut self,
        id: &str,
        replaced: impl Fn(&FrameData) -> bool,
        data: &FrameData,
    ) -> Result<()> {
        let frame = self.build_frame(id, data)?;
        let kept: Vec<Frame> = self
            .frame_set(id)
            .into_iter()
            .flat_map(|set| set.iter())
            .filter(|existing| match self.frame_data(existing) {
                Ok(existing) => !replaced(&existing),
                Err(err) => {
                    warn!(frame = id, error = %err, "keeping undecodable frame");
                    true
                }
            })
            .cloned()
            .collect();
        self.remove_frame_set(id);
        for existing in kept.into_iter().chain(std::iter::once(frame)) {
            self.add_frame(existing, false)?;
        }
        Ok(())
    }

    /// Replace the comments matching `itunes`, keeping the others.
    fn set_comment_frame(&mut self, itunes: bool, comment: CommentFrameData) -> Result<()> {
        let id = ids::COMMENT.for_version(self.version());
        self.replace_matching_frames(
            id,
            |existing| matches!(existing, FrameData::Comment(existing) if Self::is_itunes(existing) == itunes),
            &FrameData::Comment(comment),
        )
    }

    pub fn comment(&self) -> Option<String> {
        self.comment_frames(ids::COMMENT)
            .into_iter()
            .find(|comment| !Self::is_itunes(comment))
            .map(|comment| comment.comment().text().to_string())
    }

    pub fn set_comment(&mut self, comment: &str) -> Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        let data = CommentFrameData::new(None, None, EncodedText::new(comment))?;
        self.set_comment_frame(false, data)
    }

    pub fn itunes_comment(&self) -> Option<String> {
        self.comment_frames(ids::COMMENT)
            .into_iter()
            .find(Self::is_itunes)
            .map(|comment| comment.comment().text().to_string())
    }

    pub fn set_itunes_comment(&mut self, comment: &str) -> Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        let text = EncodedText::new(comment);
        let description = EncodedText::with_encoding(text.encoding(), ITUNES_COMMENT_DESCRIPTION);
        let data = CommentFrameData::new(None, Some(description), text)?;
        self.set_comment_frame(true, data)
    }

    pub fn lyrics(&self) -> Option<String> {
        self.comment_frames(ids::LYRICS)
            .into_iter()
            .next()
            .map(|lyrics| lyrics.comment().text().to_string())
    }

    pub fn set_lyrics(&mut self, lyrics: &str) -> Result<()> {
        if lyrics.is_empty() {
            return Ok(());
        }
        let data = CommentFrameData::new(None, None, EncodedText::new(lyrics))?;
        self.set_frame_data(ids::LYRICS.for_version(self.version()), &FrameData::Comment(data))
    }

    /// User-defined link (WXXX).
    pub fn url(&self) -> Option<String> {
        match self.field_data(ids::URL.for_version(self.version()))? {
            FrameData::Url(data) => Some(data.url),
            _ => None,
        }
    }

    pub fn set_url(&mut self, url: &str) -> Result<()> {
        if url.is_empty() {
            return Ok(());
        }
        let data = FrameData::Url(UrlFrameData::new(EncodedText::default(), url));
        self.set_frame_data(ids::URL.for_version(self.version()), &data)
    }

    /// The first attached picture, with v2.2 formats mapped to a mime type.
    pub fn album_picture(&self) -> Option<PictureFrameData> {
        match self.field_data(ids::PICTURE.for_version(self.version()))? {
            FrameData::Picture(picture) => Some(picture),
            FrameData::ObsoletePicture(obsolete) => Some(obsolete.picture),
            _ => None,
        }
    }

    pub fn album_image(&self) -> Option<Vec<u8>> {
        self.album_picture().map(|picture| picture.image_data)
    }

    pub fn album_image_mime_type(&self) -> Option<String> {
        self.album_picture().map(|picture| picture.mime_type)
    }

    /// Store a front cover; empty image data leaves the tag unchanged.
    pub fn set_album_image(&mut self, image: Vec<u8>, mime_type: &str) -> Result<()> {
        if image.is_empty() {
            return Ok(());
        }
        let picture = PictureFrameData::new(mime_type, 3, EncodedText::default(), image);
        let data = match self.version() {
            TagVersion::V22 => FrameData::ObsoletePicture(ObsoletePictureFrameData::new(picture)),
            _ => FrameData::Picture(picture),
        };
        self.set_frame_data(ids::PICTURE.for_version(self.version()), &data)
    }

    pub fn clear_album_image(&mut self) {
        self.clear_field(ids::PICTURE);
    }

    pub fn chapters(&self) -> Vec<ChapterFrameData> {
        self.all_field_data(ids::CHAPTER.for_version(self.version()))
            .into_iter()
            .filter_map(|data| match data {
                FrameData::Chapter(chapter) => Some(chapter),
                _ => None,
            })
            .collect()
    }

    /// Replace all chapters.
    pub fn set_chapters(&mut self, chapters: Vec<ChapterFrameData>) -> Result<()> {
        let id = ids::CHAPTER.for_version(self.version());
        self.remove_frame_set(id);
        for chapter in chapters {
            let frame = self.build_frame(id, &FrameData::Chapter(chapter))?;
            self.add_frame(frame, false)?;
        }
        Ok(())
    }

    pub fn chapter_tocs(&self) -> Vec<ChapterTocFrameData> {
        self.all_field_data(ids::CHAPTER_TOC.for_version(self.version()))
            .into_iter()
            .filter_map(|data| match data {
                FrameData::ChapterToc(toc) => Some(toc),
                _ => None,
            })
            .collect()
    }

    /// Replace all chapter tables of contents.
    pub fn set_chapter_tocs(&mut self, tocs: Vec<ChapterTocFrameData>) -> Result<()> {
        let id = ids::CHAPTER_TOC.for_version(self.version());
        self.remove_frame_set(id);
        for toc in tocs {
            let frame = self.build_frame(id, &FrameData::ChapterToc(toc))?;
            self.add_frame(frame, false)?;
        }
        Ok(())
    }

    fn wmp_popularimeter(&self) -> Option<PopularimeterFrameData> {
        self.all_field_data(ids::RATING.for_version(self.version()))
            .into_iter()
            .find_map(|data| match data {
                FrameData::Popularimeter(popm) if popm.email == WMP_EMAIL => Some(popm),
                _ => None,
            })
    }

    /// Windows Media Player stars (0 to 5), `None` if absent or not a WMP value.
    pub fn wmp_rating(&self) -> Option<u8> {
        self.wmp_popularimeter()?.wmp_stars()
    }

    /// Values above 5 are ignored and leave any existing rating in place.
    pub fn set_wmp_rating(&mut self, stars: u8) -> Result<()> {
        let Some(rating) = PopularimeterFrameData::wmp(stars) else {
            return Ok(());
        };
        let id = ids::RATING.for_version(self.version());
        self.replace_matching_frames(
            id,
            |existing| matches!(existing, FrameData::Popularimeter(popm) if popm.email == WMP_EMAIL),
            &FrameData::Popularimeter(rating),
        )
    }

    /// Recording time (TDRC), defined only for v2.4.
    pub fn recording_time(&self) -> Option<String> {
        if self.version() != TagVersion::V24 {
            return None;
        }
        match self.field_data(ids::RECORDING_TIME)? {
            FrameData::Text(data) => Some(data.text.text().to_string()),
            _ => None,
        }
    }

    pub fn set_recording_time(&mut self, time: &str) -> Result<()> {
        if self.version() != TagVersion::V24 {
            return Err(Error::IllegalArgument(format!(
                "recording time is not defined for v{}",
                self.version()
            )));
        }
        if time.is_empty() {
            return Ok(());
        }
        let data = FrameData::Text(TextFrameData::new(EncodedText::new(time)));
        self.set_frame_data(ids::RECORDING_TIME, &data)
    }
}
