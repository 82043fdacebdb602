//! Block checksum engine (C6, part): XOR-fold over 64-bit words with the
//! `chkval` slot masked out before folding.

use crate::error::{Error, Result};

/// Byte offset of the 2-byte `chkval` slot within every block.
const CHKVAL_OFFSET: usize = 16;

/// Compute the XOR-fold checksum of `block`, without mutating it.
///
/// `block.len()` must equal `block_size` and be a multiple of 8.
pub fn compute(block: &[u8], block_size: usize) -> Result<u16> {
    if block.len() != block_size {
        return Err(Error::decode(format!(
            "block length {} does not match block_size {}",
            block.len(),
            block_size
        )));
    }
    if block_size % 8 != 0 {
        return Err(Error::decode(format!(
            "block_size {block_size} is not a multiple of 8"
        )));
    }

    let mut masked = block.to_vec();
    masked[CHKVAL_OFFSET..CHKVAL_OFFSET + 2].copy_from_slice(&[0, 0]);

    let mut acc: u64 = 0;
    for word in masked.chunks_exact(8) {
        acc ^= u64::from_le_bytes(word.try_into().unwrap());
    }
    acc ^= acc >> 32;
    acc ^= acc >> 16;

    Ok((acc & 0xFFFF) as u16)
}

/// Compute the checksum and, if `apply`, write it into `block` at offset 16.
pub fn apply(block: &mut [u8], block_size: usize, apply: bool) -> Result<u16> {
    let sum = compute(block, block_size)?;
    if apply {
        block[CHKVAL_OFFSET..CHKVAL_OFFSET + 2].copy_from_slice(&sum.to_le_bytes());
    }
    Ok(sum)
}
