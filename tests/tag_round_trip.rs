//! Encode/decode cycles over complete ID3v2 tags

mod common;

use mp3meta::id3::frames::{ChapterFrameData, ChapterTocFrameData};
use mp3meta::{Error, FrameData, Id3v2Tag, TagVersion};

/// Raw text of the first frame with `id`.
fn stored_text(tag: &Id3v2Tag, id: &str) -> Option<String> {
    match tag.frame_data(tag.frame(id)?).ok()? {
        FrameData::Text(data) => Some(data.text.text().to_string()),
        _ => None,
    }
}

fn populated_tag(version: TagVersion) -> Id3v2Tag {
    let mut tag = Id3v2Tag::new(version);
    tag.set_track("3/12").unwrap();
    tag.set_part_of_set("1/2").unwrap();
    tag.set_artist("Artist").unwrap();
    tag.set_album_artist("Album Artist").unwrap();
    tag.set_title("Title").unwrap();
    tag.set_album("Album").unwrap();
    tag.set_year("2001").unwrap();
    tag.set_genre(13).unwrap();
    tag.set_comment("A comment").unwrap();
    tag.set_itunes_comment(" 00000A2B 00000A2B").unwrap();
    tag.set_lyrics("la la la").unwrap();
    tag.set_composer("Composer").unwrap();
    tag.set_publisher("Publisher").unwrap();
    tag.set_original_artist("Original Artist").unwrap();
    tag.set_copyright("(c) 2001").unwrap();
    tag.set_encoder("Encoder").unwrap();
    tag.set_grouping("Grouping").unwrap();
    tag.set_key("Am").unwrap();
    tag.set_compilation(true).unwrap();
    tag.set_bpm(120).unwrap();
    tag.set_wmp_rating(4).unwrap();
    tag.set_url("http://example.com/user").unwrap();
    tag.set_artist_url("http://example.com/artist").unwrap();
    tag.set_album_image(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], "image/jpeg").unwrap();
    tag.set_padding(true);
    tag
}

fn assert_fields(tag: &Id3v2Tag) {
    assert_eq!(tag.track().as_deref(), Some("3/12"));
    assert_eq!(tag.part_of_set().as_deref(), Some("1/2"));
    assert_eq!(tag.artist().as_deref(), Some("Artist"));
    assert_eq!(tag.album_artist().as_deref(), Some("Album Artist"));
    assert_eq!(tag.title().as_deref(), Some("Title"));
    assert_eq!(tag.album().as_deref(), Some("Album"));
    assert_eq!(tag.year().as_deref(), Some("2001"));
    assert_eq!(tag.genre(), Some(13));
    assert_eq!(tag.genre_description().as_deref(), Some("Pop"));
    assert_eq!(tag.comment().as_deref(), Some("A comment"));
    assert_eq!(tag.itunes_comment().as_deref(), Some(" 00000A2B 00000A2B"));
    assert_eq!(tag.lyrics().as_deref(), Some("la la la"));
    assert_eq!(tag.composer().as_deref(), Some("Composer"));
    assert_eq!(tag.publisher().as_deref(), Some("Publisher"));
    assert_eq!(tag.original_artist().as_deref(), Some("Original Artist"));
    assert_eq!(tag.copyright().as_deref(), Some("(c) 2001"));
    assert_eq!(tag.encoder().as_deref(), Some("Encoder"));
    assert_eq!(tag.grouping().as_deref(), Some("Grouping"));
    assert_eq!(tag.key().as_deref(), Some("Am"));
    assert!(tag.compilation());
    assert_eq!(tag.bpm(), Some(120));
    assert_eq!(tag.wmp_rating(), Some(4));
    assert_eq!(tag.url().as_deref(), Some("http://example.com/user"));
    assert_eq!(tag.artist_url().as_deref(), Some("http://example.com/artist"));
    // v2.2 stores a three-letter format, read back as image/jpg
    let mime = match tag.version() {
        TagVersion::V22 => "image/jpg",
        _ => "image/jpeg",
    };
    assert_eq!(tag.album_image_mime_type().as_deref(), Some(mime));
    assert_eq!(tag.album_image(), Some(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]));
}

#[test]
fn v23_full_field_set_round_trip() {
    common::init_tracing();
    let tag = populated_tag(TagVersion::V23);
    assert_fields(&tag);

    let bytes = tag.encode();
    assert_eq!(&bytes[..5], b"ID3\x03\x00");
    assert_eq!(bytes.len(), tag.length());

    let decoded = Id3v2Tag::decode(&bytes).unwrap();
    assert_eq!(decoded.version(), TagVersion::V23);
    assert!(decoded.padding());
    assert_eq!(decoded.padding_length(), 256);
    assert_fields(&decoded);
    assert_eq!(decoded, tag);
    assert_eq!(decoded.encode(), bytes);
}

#[test]
fn v22_and_v24_round_trip() {
    common::init_tracing();
    for version in [TagVersion::V22, TagVersion::V24] {
        let tag = populated_tag(version);
        let bytes = tag.encode();
        assert_eq!(bytes[3], version.major());

        let decoded = Id3v2Tag::decode(&bytes).unwrap();
        assert_fields(&decoded);
        assert_eq!(decoded.encode(), bytes);
    }
}

#[test]
fn v22_uses_three_character_ids() {
    let tag = populated_tag(TagVersion::V22);
    let decoded = Id3v2Tag::decode(&tag.encode()).unwrap();
    assert!(decoded.frame("TT2").is_some());
    assert!(decoded.frame("PIC").is_some());
    assert!(decoded.frame("TIT2").is_none());
}

#[test]
fn pictures_are_written_last() {
    let tag = populated_tag(TagVersion::V23);
    let bytes = tag.encode();
    let apic = bytes.windows(4).position(|window| window == b"APIC").unwrap();
    let wxxx = bytes.windows(4).position(|window| window == b"WXXX").unwrap();
    let tpe1 = bytes.windows(4).position(|window| window == b"TPE1").unwrap();
    assert!(tpe1 < wxxx);
    assert!(wxxx < apic);
}

#[test]
fn unsynchronised_tags_round_trip() {
    for version in [TagVersion::V23, TagVersion::V24] {
        let mut tag = Id3v2Tag::new(version);
        tag.set_unsynchronisation(true).unwrap();
        tag.set_title("Title").unwrap();
        tag.set_album_image(vec![0xFF, 0xE0, 0xFF, 0x00, 0xFF], "image/png").unwrap();

        let bytes = tag.encode();
        let decoded = Id3v2Tag::decode(&bytes).unwrap();
        assert!(decoded.flags().unsynchronisation);
        assert_eq!(decoded.title().as_deref(), Some("Title"));
        assert_eq!(decoded.album_image(), Some(vec![0xFF, 0xE0, 0xFF, 0x00, 0xFF]));
    }
}

#[test]
fn unsynchronisation_enabled_after_fields_are_set() {
    for version in [TagVersion::V23, TagVersion::V24] {
        let mut tag = populated_tag(version);
        tag.set_album_image(vec![0xFF, 0x00, 0x00, 0x01], "image/png").unwrap();
        tag.set_unsynchronisation(true).unwrap();
        assert_eq!(tag.album_image(), Some(vec![0xFF, 0x00, 0x00, 0x01]));

        let bytes = tag.encode();
        let decoded = Id3v2Tag::decode(&bytes).unwrap();
        assert!(decoded.flags().unsynchronisation);
        assert_eq!(decoded.title().as_deref(), Some("Title"));
        assert_eq!(decoded.album_image(), Some(vec![0xFF, 0x00, 0x00, 0x01]));
        assert_eq!(decoded.encode(), bytes);
    }
}

#[test]
fn genre_stored_per_version() {
    let mut v23 = Id3v2Tag::new(TagVersion::V23);
    v23.set_genre_description("jazz").unwrap();
    let decoded = Id3v2Tag::decode(&v23.encode()).unwrap();
    assert_eq!(stored_text(&decoded, "TCON").as_deref(), Some("(8)Jazz"));
    assert_eq!(decoded.genre(), Some(8));
    assert_eq!(decoded.genre_description().as_deref(), Some("Jazz"));

    let mut v24 = Id3v2Tag::new(TagVersion::V24);
    v24.set_genre_description("Jazz").unwrap();
    let decoded = Id3v2Tag::decode(&v24.encode()).unwrap();
    assert_eq!(stored_text(&decoded, "TCON").as_deref(), Some("Jazz"));
    assert_eq!(decoded.genre(), Some(8));
    assert_eq!(decoded.genre_description().as_deref(), Some("Jazz"));

    let mut custom = Id3v2Tag::new(TagVersion::V24);
    custom.set_genre_description("Chiptune").unwrap();
    assert_eq!(custom.genre(), Some(-1));
    assert_eq!(custom.genre_description().as_deref(), Some("Chiptune"));

    let mut older = Id3v2Tag::new(TagVersion::V23);
    assert!(matches!(
        older.set_genre_description("Chiptune"),
        Err(Error::IllegalArgument(_))
    ));
}

#[test]
fn chapters_extracted_from_tag() {
    common::init_tracing();
    let version = TagVersion::V23;
    let mut intro = ChapterFrameData::new(version, "ch1", 0, 5_000, None, None);
    intro.set_title("Intro").unwrap();
    let mut verse = ChapterFrameData::new(version, "ch2", 5_000, 65_000, Some(1_024), Some(9_000));
    verse.set_title("Verse").unwrap();
    let mut toc = ChapterTocFrameData::new(version, "toc1", true, true, vec!["ch1".into(), "ch2".into()]);
    toc.set_title("Contents").unwrap();

    let mut tag = Id3v2Tag::new(version);
    tag.set_title("Podcast").unwrap();
    tag.set_chapters(vec![intro, verse]).unwrap();
    tag.set_chapter_tocs(vec![toc]).unwrap();

    let decoded = Id3v2Tag::decode(&tag.encode()).unwrap();
    let chapters = decoded.chapters();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].id, "ch1");
    assert_eq!(chapters[0].title().as_deref(), Some("Intro"));
    assert_eq!((chapters[0].start_time_ms, chapters[0].end_time_ms), (0, 5_000));
    assert_eq!(chapters[0].start_offset, None);
    assert_eq!(chapters[1].id, "ch2");
    assert_eq!(chapters[1].title().as_deref(), Some("Verse"));
    assert_eq!(chapters[1].start_offset, Some(1_024));
    assert_eq!(chapters[1].end_offset, Some(9_000));

    let tocs = decoded.chapter_tocs();
    assert_eq!(tocs.len(), 1);
    assert!(tocs[0].is_root);
    assert!(tocs[0].is_ordered);
    assert_eq!(tocs[0].children, vec!["ch1", "ch2"]);
    assert_eq!(tocs[0].title().as_deref(), Some("Contents"));
}

#[test]
fn footer_replaces_padding() {
    let mut tag = Id3v2Tag::new(TagVersion::V24);
    tag.set_title("Title").unwrap();
    tag.set_padding(true);
    tag.set_footer(true).unwrap();

    let bytes = tag.encode();
    assert_eq!(&bytes[bytes.len() - 10..bytes.len() - 7], b"3DI");
    let decoded = Id3v2Tag::decode(&bytes).unwrap();
    assert!(decoded.flags().footer);
    assert!(!decoded.padding());
    assert_eq!(decoded.title().as_deref(), Some("Title"));

    assert!(Id3v2Tag::new(TagVersion::V23).set_footer(true).is_err());
}

#[test]
fn recording_time_only_for_v24() {
    let mut tag = Id3v2Tag::new(TagVersion::V24);
    tag.set_recording_time("2001-02-03T04:05").unwrap();
    let decoded = Id3v2Tag::decode(&tag.encode()).unwrap();
    assert_eq!(decoded.recording_time().as_deref(), Some("2001-02-03T04:05"));

    let mut older = Id3v2Tag::new(TagVersion::V23);
    assert!(older.set_recording_time("2001").is_err());
    assert_eq!(older.recording_time(), None);
}

#[test]
fn unicode_text_survives() {
    let mut tag = Id3v2Tag::new(TagVersion::V23);
    tag.set_title("Ünïcödé ✓ 日本語").unwrap();
    tag.set_artist("Björk").unwrap();
    let decoded = Id3v2Tag::decode(&tag.encode()).unwrap();
    assert_eq!(decoded.title().as_deref(), Some("Ünïcödé ✓ 日本語"));
    assert_eq!(decoded.artist().as_deref(), Some("Björk"));
}
