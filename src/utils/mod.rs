// Shared byte, text and I/O helpers

pub mod buffer;
pub mod encoding;
pub mod io;

pub use encoding::TextEncoding;
