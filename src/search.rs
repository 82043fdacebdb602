//! Search (C7): single-block byte-pattern scan, and a full-file scan
//! filterable by block type and embedded object ID.

use crate::error::{Error, Result};
use crate::io::read_block;
use std::path::Path;
use tracing::instrument;

/// A single match of a needle within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub block_id: u32,
    pub offset: usize,
}

/// A block whose embedded object ID matched, with no needle involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjdHit {
    pub block_id: u32,
    pub block_type: u8,
}

/// Result of a full-file search: either needle matches (Mode A) or a
/// listing of blocks by object ID (Mode B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindResult {
    Matches(Vec<Match>),
    ObjdBlocks(Vec<ObjdHit>),
}

/// Fixed per-block-type byte offset of the embedded object ID (OBJD).
pub fn objd_offset(block_type: u8) -> Option<usize> {
    match block_type {
        6 => Some(24),
        32 => Some(192),
        33 => Some(104),
        34 => Some(192),
        35 => Some(272),
        _ => None,
    }
}

/// Human-readable label for a block type, for Mode B listings.
pub fn block_type_label(block_type: u8) -> &'static str {
    match block_type {
        6 => "DATA",
        32 => "FIRST LEVEL BITMAP BLOCK",
        33 => "SECOND LEVEL BITMAP BLOCK",
        34 => "THIRD LEVEL BITMAP BLOCK",
        35 => "PAGETABLE SEGMENT HEADER",
        _ => "UNKNOWN BLOCK TYPE",
    }
}

/// Every occurrence of `needle` within `block`, in ascending offset order.
pub fn search_block(block: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > block.len() {
        return Vec::new();
    }
    block
        .windows(needle.len())
        .enumerate()
        .filter_map(|(offset, window)| (window == needle).then_some(offset))
        .collect()
}

/// Read the embedded OBJD of a block buffer, per the block-type lookup
/// table. Unmapped block types report `0`, matching no object ID filter.
fn objd_at(block: &[u8]) -> u32 {
    let block_type = block[0];
    match objd_offset(block_type).and_then(|off| block.get(off..off + 4)) {
        Some(bytes) => u32::from_le_bytes(bytes.try_into().unwrap()),
        None => 0,
    }
}

/// Scan every block of `path` from block 1 onward (block 0 is skipped).
///
/// `needle`, when present, selects Mode A (pattern matches, optionally
/// filtered by `objd`, with `objd == -1` meaning "any"). With no needle,
/// `objd` is required and selects Mode B (block listing by object ID).
#[instrument(skip(path, needle), fields(path = %path.as_ref().display()))]
pub fn find(
    path: impl AsRef<Path>,
    block_size: usize,
    block_count: u32,
    objd: Option<i64>,
    needle: Option<&[u8]>,
) -> Result<FindResult> {
    if needle.is_none() && objd.is_none() {
        return Err(Error::usage("find requires a needle, an objd filter, or both"));
    }

    match needle {
        Some(needle) => {
            let mut matches = Vec::new();
            for block_id in 1..block_count {
                let block = read_block(path.as_ref(), block_id, block_size)?;
                if let Some(filter) = objd {
                    if filter != -1 && objd_at(&block) as i64 != filter {
                        continue;
                    }
                }
                for offset in search_block(&block, needle) {
                    matches.push(Match { block_id, offset });
                }
            }
            Ok(FindResult::Matches(matches))
        }
        None => {
            let filter = objd.expect("checked above");
            let mut hits = Vec::new();
            for block_id in 1..block_count {
                let block = read_block(path.as_ref(), block_id, block_size)?;
                if objd_at(&block) as i64 == filter {
                    hits.push(ObjdHit {
                        block_id,
                        block_type: block[0],
                    });
                }
            }
            Ok(FindResult::ObjdBlocks(hits))
        }
    }
}

/// Search a single already-loaded block for every occurrence of `needle`.
pub fn find_in_block(block: &[u8], block_id: u32, needle: &[u8]) -> Vec<Match> {
    search_block(block, needle)
        .into_iter()
        .map(|offset| Match { block_id, offset })
        .collect()
}
