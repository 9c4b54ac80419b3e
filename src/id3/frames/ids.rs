// Frame identifiers, as (v2.2, v2.3/v2.4) pairs where both exist

/// A frame id pair: the obsolete three-character id and the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId {
    pub obsolete: &'static str,
    pub current: &'static str,
}

impl FrameId {
    const fn new(obsolete: &'static str, current: &'static str) -> Self {
        FrameId { obsolete, current }
    }

    /// The id used by tags of `version`.
    pub fn for_version(&self, version: crate::id3::TagVersion) -> &'static str {
        match version {
            crate::id3::TagVersion::V22 => self.obsolete,
            _ => self.current,
        }
    }
}

pub const TRACK: FrameId = FrameId::new("TRK", "TRCK");
pub const PART_OF_SET: FrameId = FrameId::new("TPA", "TPOS");
pub const COMPILATION: FrameId = FrameId::new("TCP", "TCMP");
pub const GROUPING: FrameId = FrameId::new("TT1", "TIT1");
pub const ARTIST: FrameId = FrameId::new("TP1", "TPE1");
pub const ALBUM_ARTIST: FrameId = FrameId::new("TP2", "TPE2");
pub const TITLE: FrameId = FrameId::new("TT2", "TIT2");
pub const ALBUM: FrameId = FrameId::new("TAL", "TALB");
pub const YEAR: FrameId = FrameId::new("TYE", "TYER");
pub const DATE: FrameId = FrameId::new("TDA", "TDAT");
pub const GENRE: FrameId = FrameId::new("TCO", "TCON");
pub const COMPOSER: FrameId = FrameId::new("TCM", "TCOM");
pub const PUBLISHER: FrameId = FrameId::new("TPB", "TPUB");
pub const ORIGINAL_ARTIST: FrameId = FrameId::new("TOA", "TOPE");
pub const COPYRIGHT: FrameId = FrameId::new("TCR", "TCOP");
pub const ENCODER: FrameId = FrameId::new("TEN", "TENC");
pub const KEY: FrameId = FrameId::new("TKE", "TKEY");
pub const BPM: FrameId = FrameId::new("TBP", "TBPM");
pub const COMMENT: FrameId = FrameId::new("COM", "COMM");
pub const LYRICS: FrameId = FrameId::new("ULT", "USLT");
pub const URL: FrameId = FrameId::new("WXX", "WXXX");
pub const ARTIST_URL: FrameId = FrameId::new("WAR", "WOAR");
pub const COMMERCIAL_URL: FrameId = FrameId::new("WCM", "WCOM");
pub const COPYRIGHT_URL: FrameId = FrameId::new("WCP", "WCOP");
pub const AUDIOFILE_URL: FrameId = FrameId::new("WAF", "WOAF");
pub const AUDIO_SOURCE_URL: FrameId = FrameId::new("WAS", "WOAS");
pub const RADIOSTATION_URL: FrameId = FrameId::new("WRS", "WORS");
pub const PAYMENT_URL: FrameId = FrameId::new("WPY", "WPAY");
pub const PUBLISHER_URL: FrameId = FrameId::new("WPB", "WPUB");
pub const PICTURE: FrameId = FrameId::new("PIC", "APIC");
pub const RATING: FrameId = FrameId::new("POP", "POPM");
pub const CHAPTER: FrameId = FrameId::new("CHP", "CHAP");
pub const CHAPTER_TOC: FrameId = FrameId::new("CTO", "CTOC");

/// Recording time, defined only for v2.4.
pub const RECORDING_TIME: &str = "TDRC";
