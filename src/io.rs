//! File I/O layer (C4): reads and writes a single block at its byte offset
//! within a datafile. Synchronous and blocking, per the session's
//! single-threaded driver model.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Read exactly `block_size` bytes from `path` at `block_id * block_size`.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_block(path: impl AsRef<Path>, block_id: u32, block_size: usize) -> Result<Vec<u8>> {
    let mut file = OpenOptions::new().read(true).open(path.as_ref())?;
    let offset = block_id as u64 * block_size as u64;
    file.seek(SeekFrom::Start(offset))?;

    let mut buf = vec![0u8; block_size];
    file.read_exact(&mut buf)?;
    debug!(block_id, offset, "read block");
    Ok(buf)
}

/// Write `data` (exactly `block_size` bytes) to `path` at
/// `block_id * block_size`, returning the bytes that were on disk there
/// beforehand (for use as a revert backup).
#[instrument(skip(path, data), fields(path = %path.as_ref().display()))]
pub fn write_block(
    path: impl AsRef<Path>,
    block_id: u32,
    block_size: usize,
    data: &[u8],
) -> Result<Vec<u8>> {
    debug_assert_eq!(data.len(), block_size);

    let mut file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;
    let offset = block_id as u64 * block_size as u64;

    file.seek(SeekFrom::Start(offset))?;
    let mut previous = vec![0u8; block_size];
    file.read_exact(&mut previous)?;

    file.seek(SeekFrom::Start(offset))?;
    file.write_all(data)?;
    file.flush()?;
    debug!(block_id, offset, "wrote block");

    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn scratch_file(blocks: usize, block_size: usize) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let data = vec![0u8; blocks * block_size];
        f.write_all(&data).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_block_at_correct_offset() {
        let block_size = 8192;
        let mut f = scratch_file(3, block_size);
        let marker = vec![0xAB; block_size];
        let offset = 1 * block_size as u64;
        use std::io::Seek;
        f.as_file_mut().seek(SeekFrom::Start(offset)).unwrap();
        f.as_file_mut().write_all(&marker).unwrap();
        f.as_file_mut().flush().unwrap();

        let block = read_block(f.path(), 1, block_size).unwrap();
        assert_eq!(block, marker);
    }

    #[test]
    fn write_block_returns_previous_bytes() {
        let block_size = 8192;
        let f = scratch_file(2, block_size);

        let new_data = vec![0x42; block_size];
        let previous = write_block(f.path(), 0, block_size, &new_data).unwrap();
        assert_eq!(previous, vec![0u8; block_size]);

        let reread = read_block(f.path(), 0, block_size).unwrap();
        assert_eq!(reread, new_data);
    }

    #[test]
    fn read_past_end_of_file_errors() {
        let block_size = 8192;
        let f = scratch_file(1, block_size);
        assert!(read_block(f.path(), 5, block_size).is_err());
    }
}
