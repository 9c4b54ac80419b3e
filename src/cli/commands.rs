// CLI command implementations
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::Engine;
use serde::Serialize;
use tracing::warn;

use mp3meta::file::{detect, AudioSummary};
use mp3meta::id3::frames::ChapterFrameData;
use mp3meta::mpeg::MpegFrameHeader;
use mp3meta::{Id3v1Tag, Id3v2Tag, Mp3File, TagVersion};

use crate::cli::config::FieldArgs;
use crate::cli::output::OutputFormatter;

#[derive(Serialize)]
struct FileReport {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id3v2: Option<TagReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id3v1: Option<Id3v1Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio: Option<AudioReport>,
}

#[derive(Serialize)]
struct TagReport {
    version: String,
    title: Option<String>,
    artist: Option<String>,
    album_artist: Option<String>,
    album: Option<String>,
    year: Option<String>,
    track: Option<String>,
    genre: Option<i32>,
    genre_description: Option<String>,
    comment: Option<String>,
    composer: Option<String>,
    bpm: Option<i32>,
    wmp_rating: Option<u8>,
    compilation: bool,
    chapters: Vec<ChapterReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover: Option<CoverReport>,
}

#[derive(Serialize)]
struct ChapterReport {
    id: String,
    title: Option<String>,
    start_ms: u32,
    end_ms: u32,
}

#[derive(Serialize)]
struct CoverReport {
    mime_type: String,
    picture_type: u8,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

#[derive(Serialize)]
struct AudioReport {
    start_offset: usize,
    end_offset: usize,
    frame_count: usize,
    bitrate_kbps: u32,
    vbr: bool,
    xing: bool,
    length_ms: u64,
    header: MpegFrameHeader,
}

impl From<&ChapterFrameData> for ChapterReport {
    fn from(chapter: &ChapterFrameData) -> Self {
        ChapterReport {
            id: chapter.id.clone(),
            title: chapter.title(),
            start_ms: chapter.start_time_ms,
            end_ms: chapter.end_time_ms,
        }
    }
}

impl From<&AudioSummary> for AudioReport {
    fn from(audio: &AudioSummary) -> Self {
        AudioReport {
            start_offset: audio.start_offset,
            end_offset: audio.end_offset,
            frame_count: audio.frame_count,
            bitrate_kbps: audio.bitrate_kbps(),
            vbr: audio.is_vbr(),
            xing: audio.has_xing,
            length_ms: audio.length_in_milliseconds(),
            header: audio.first_header.clone(),
        }
    }
}

fn tag_report(tag: &Id3v2Tag, include_cover: bool) -> TagReport {
    let cover = tag.album_picture().map(|picture| CoverReport {
        mime_type: picture.mime_type.clone(),
        picture_type: picture.picture_type,
        size: picture.image_data.len(),
        data: include_cover
            .then(|| base64::engine::general_purpose::STANDARD.encode(&picture.image_data)),
    });
    TagReport {
        version: tag.version().to_string(),
        title: tag.title(),
        artist: tag.artist(),
        album_artist: tag.album_artist(),
        album: tag.album(),
        year: tag.year(),
        track: tag.track(),
        genre: tag.genre(),
        genre_description: tag.genre_description(),
        comment: tag.comment(),
        composer: tag.composer(),
        bpm: tag.bpm(),
        wmp_rating: tag.wmp_rating(),
        compilation: tag.compilation(),
        chapters: tag.chapters().iter().map(ChapterReport::from).collect(),
        cover,
    }
}

/// Expand glob patterns; plain paths pass through unchanged
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            files.push(PathBuf::from(pattern));
            continue;
        }
        let entries = glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern}"))?;
        for entry in entries {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    if files.is_empty() {
        bail!("no files matched");
    }
    Ok(files)
}

/// Read tags and audio summary from files
pub fn command_read(
    files: &[String],
    include_cover: bool,
    output: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {path}"))?,
        )),
        None => Box::new(std::io::stdout()),
    };

    for path in expand_patterns(files)? {
        match Mp3File::open(&path) {
            Ok(file) => {
                let report = FileReport {
                    path: path.display().to_string(),
                    id3v2: file.id3v2().map(|tag| tag_report(tag, include_cover)),
                    id3v1: file.id3v1().cloned(),
                    audio: file.audio().map(AudioReport::from),
                };
                formatter.output_report(&serde_json::to_value(&report)?, &mut writer)?;
            }
            Err(e) => formatter.print_error(&format!("{}: {}", path.display(), e)),
        }
    }
    writer.flush()?;
    Ok(())
}

/// Report which tag versions files carry
pub fn command_detect(files: &[String], formatter: &OutputFormatter) -> Result<()> {
    for path in expand_patterns(files)? {
        match detect(&path) {
            Ok(found) => {
                let id3v2 = found
                    .id3v2
                    .map_or_else(|| "none".to_string(), |version| format!("ID3v{version}"));
                let id3v1 = if found.id3v1 { "ID3v1" } else { "no ID3v1" };
                formatter.print_info(&format!("{}: {}, {}", path.display(), id3v2, id3v1));
            }
            Err(e) => formatter.print_error(&format!("{}: {}", path.display(), e)),
        }
    }
    Ok(())
}

/// List ID3v2 frames with their sizes and flags
pub fn command_frames(files: &[String], formatter: &OutputFormatter) -> Result<()> {
    for path in expand_patterns(files)? {
        let file = match Mp3File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                continue;
            }
        };
        let Some(tag) = file.id3v2() else {
            formatter.print_info(&format!("{}: no ID3v2 tag", path.display()));
            continue;
        };
        let frames: Vec<_> = tag
            .frame_sets()
            .values()
            .flat_map(|set| set.iter())
            .map(|frame| {
                serde_json::json!({
                    "id": frame.id(),
                    "size": frame.data().len(),
                    "unsynchronised": frame.flags().unsynchronisation,
                    "compressed": frame.flags().compression,
                })
            })
            .collect();
        let report = serde_json::json!({
            "path": path.display().to_string(),
            "version": tag.version().to_string(),
            "length": tag.length(),
            "padding": tag.padding_length(),
            "frames": frames,
        });
        formatter.output_report(&report, &mut std::io::stdout())?;
    }
    Ok(())
}

fn guess_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

fn apply_fields(tag: &mut Id3v2Tag, fields: &FieldArgs) -> Result<()> {
    let text_setters: [(&Option<String>, fn(&mut Id3v2Tag, &str) -> mp3meta::Result<()>); 8] = [
        (&fields.title, Id3v2Tag::set_title),
        (&fields.artist, Id3v2Tag::set_artist),
        (&fields.album, Id3v2Tag::set_album),
        (&fields.album_artist, Id3v2Tag::set_album_artist),
        (&fields.year, Id3v2Tag::set_year),
        (&fields.track, Id3v2Tag::set_track),
        (&fields.comment, Id3v2Tag::set_comment),
        (&fields.composer, Id3v2Tag::set_composer),
    ];
    for (value, setter) in text_setters {
        if let Some(value) = value {
            setter(tag, value)?;
        }
    }
    if let Some(genre) = &fields.genre {
        tag.set_genre_description(genre)?;
    }
    if let Some(bpm) = fields.bpm {
        tag.set_bpm(bpm)?;
    }
    if let Some(rating) = fields.rating {
        tag.set_wmp_rating(rating)?;
    }
    if let Some(cover) = &fields.cover {
        let path = Path::new(cover);
        let image = std::fs::read(path).with_context(|| format!("cannot read {cover}"))?;
        tag.set_album_image(image, guess_mime_type(path))?;
    }
    Ok(())
}

/// Set fields on a file's ID3v2 tag
pub fn command_set(
    file: &str,
    fields: &FieldArgs,
    tag_version: Option<u8>,
    padding: bool,
    output: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut mp3 = Mp3File::open(file).with_context(|| format!("cannot open {file}"))?;
    let requested = tag_version.map(|major| TagVersion::from_major(major, 0)).transpose()?;
    let existing = mp3.id3v2().map(Id3v2Tag::version);
    if let Some((existing, requested)) = ignored_tag_version(existing, requested) {
        warn!(file, %existing, %requested, "existing tag keeps its version");
        formatter.print_info(&format!(
            "{file} already has a v{existing} tag; --tag-version {} ignored",
            requested.major()
        ));
    }
    let tag = mp3.id3v2_or_insert(requested.unwrap_or(TagVersion::V24));
    apply_fields(tag, fields)?;
    if padding {
        tag.set_padding(true);
    }
    let target = output.unwrap_or(file);
    mp3.save(target)?;
    formatter.print_success(&format!("Updated tags in {}", target));
    Ok(())
}

/// A requested version that differs from the tag already in the file.
fn ignored_tag_version(
    existing: Option<TagVersion>,
    requested: Option<TagVersion>,
) -> Option<(TagVersion, TagVersion)> {
    match (existing, requested) {
        (Some(existing), Some(requested)) if existing != requested => Some((existing, requested)),
        _ => None,
    }
}

/// Write the album image to a file
pub fn command_export_cover(file: &str, output: &str, formatter: &OutputFormatter) -> Result<()> {
    let mp3 = Mp3File::open(file).with_context(|| format!("cannot open {file}"))?;
    let Some(picture) = mp3.id3v2().and_then(Id3v2Tag::album_picture) else {
        bail!("{file} has no album image");
    };
    std::fs::write(output, &picture.image_data)?;
    formatter.print_success(&format!(
        "Exported {} ({} bytes) to {}",
        picture.mime_type,
        picture.image_data.len(),
        output
    ));
    Ok(())
}
