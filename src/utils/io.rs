// I/O utilities for reading MP3 files

use std::io::{Read, Seek, SeekFrom};

/// Read `length` bytes at absolute `offset`, returning fewer near end of stream.
pub fn read_at<R: Read + Seek>(reader: &mut R, offset: u64, length: usize) -> std::io::Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buffer = Vec::with_capacity(length);
    reader.by_ref().take(length as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Read the last `length` bytes of the stream, or `None` if it is shorter.
pub fn read_tail<R: Read + Seek>(reader: &mut R, length: usize) -> std::io::Result<Option<Vec<u8>>> {
    let size = stream_len(reader)?;
    if size < length as u64 {
        return Ok(None);
    }
    read_at(reader, size - length as u64, length).map(Some)
}

/// Total stream length in bytes.
pub fn stream_len<R: Seek>(reader: &mut R) -> std::io::Result<u64> {
    reader.seek(SeekFrom::End(0))
}

/// Check if the stream has `signature` at `offset`
pub fn check_signature<R: Read + Seek>(reader: &mut R, offset: u64, signature: &[u8]) -> std::io::Result<bool> {
    let buffer = read_at(reader, offset, signature.len())?;
    Ok(buffer == signature)
}
