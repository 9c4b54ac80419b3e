// ID3 metadata handling module
pub mod encoded_text;
pub mod fields;
pub mod frame;
pub mod frames;
pub mod genres;
pub mod v1;
pub mod v2;
pub mod version;

pub use encoded_text::EncodedText;
pub use frame::{Frame, FrameFlags, FrameSet};
pub use frames::{FrameData, FramePayload};
pub use v1::Id3v1Tag;
pub use v2::{Id3v2Header, Id3v2Tag, TagFlags};
pub use version::{TagVersion, VersionRules};
