//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::Once;

use mp3meta::MpegFrameHeader;

static INIT: Once = Once::new();

/// Route library tracing output through the test harness
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// MPEG-1 layer 3, 128 kbps, 44.1 kHz, joint stereo
pub const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

/// `count` silent frames with the fixture header
pub fn audio_frames(count: usize) -> Vec<u8> {
    let length = MpegFrameHeader::parse(&FRAME_HEADER)
        .expect("fixture header is valid")
        .length_in_bytes;
    let mut bytes = Vec::with_capacity(count * length);
    for _ in 0..count {
        let start = bytes.len();
        bytes.resize(start + length, 0);
        bytes[start..start + 4].copy_from_slice(&FRAME_HEADER);
    }
    bytes
}
