//! Block analyzer (C3): classifies a raw block and, for DATA-table blocks,
//! walks the row directory to populate per-row column metadata.

use super::header::{ItlEntry, Kcbh, KtbbhPrefix};
use super::row::{ColumnValue, KdbrEntry, RowData, NULL_SENTINEL};
use crate::error::{Error, Result};
use tracing::{debug, trace};

const DATA_BLOCK_TYPE: u8 = 6;
const DATA_BLOCK_SUBTYPE: u8 = 1;

const FLAG_HEAD_FULL: u8 = 0x2C;
const FLAG_CONTINUATION: u8 = 0x3C;
const FLAG_HEAD_COUNTED: u8 = 0x6C;

/// Structural summary of a loaded block, independent of any particular file.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    pub dba: u32,
    pub file_id: u32,
    pub file_name: String,
    pub block_type: u8,
    pub block_subtype: u8,
    pub itls: u8,
    pub ntab: u8,
    pub offset_mod: i32,
    pub declared_rows: u32,
    pub actual_rows: u32,
    pub first_kdbr: usize,
    pub kdbr: Vec<KdbrEntry>,
    pub rows: Vec<RowData>,
    pub min_rowdata: Option<usize>,
    pub max_rowdata: Option<usize>,
}

impl BlockDescriptor {
    pub fn kcbh(&self, block: &[u8]) -> Result<Kcbh> {
        Kcbh::read(block)
    }

    pub fn ktbbh_prefix(&self, block: &[u8]) -> Result<KtbbhPrefix> {
        KtbbhPrefix::read(&block[20..44])
    }

    pub fn itl_entries(&self, block: &[u8]) -> Result<Vec<ItlEntry>> {
        ItlEntry::read_all(block, self.itls)
    }

    pub fn is_data_table(&self) -> bool {
        self.block_type == DATA_BLOCK_TYPE && self.block_subtype == DATA_BLOCK_SUBTYPE
    }
}

/// Analyze a raw block buffer, producing its descriptor.
///
/// `manual_offset`, when nonzero, overrides the automatically-derived
/// `offset_mod` for this load only.
pub fn analyze(
    block: &[u8],
    dba: u32,
    file_id: u32,
    file_name: &str,
    manual_offset: i32,
) -> Result<BlockDescriptor> {
    let block_type = block[0];
    let block_subtype = *block.get(20).unwrap_or(&0);

    let mut desc = BlockDescriptor {
        dba,
        file_id,
        file_name: file_name.to_string(),
        block_type,
        block_subtype,
        itls: 0,
        ntab: 0,
        offset_mod: 0,
        declared_rows: 0,
        actual_rows: 0,
        first_kdbr: 0,
        kdbr: Vec::new(),
        rows: Vec::new(),
        min_rowdata: None,
        max_rowdata: None,
    };

    if block_type != DATA_BLOCK_TYPE {
        return Ok(desc);
    }

    let itls = block[36];
    desc.itls = itls;

    let flag_off = 20 + 24 + 24 * itls as usize;
    let offset_mod = if manual_offset != 0 {
        manual_offset
    } else {
        derive_offset_mod(block, flag_off)
    };
    desc.offset_mod = offset_mod;

    if block_subtype != DATA_BLOCK_SUBTYPE {
        return Ok(desc);
    }

    let ntab_off = (53 + 24 * itls as i64 + offset_mod as i64) as usize;
    let ntab = *block.get(ntab_off).unwrap_or(&0);
    desc.ntab = ntab;

    let declared_off = ntab_off + 1;
    let declared_rows = *block.get(declared_off).unwrap_or(&0) as u32;
    desc.declared_rows = declared_rows;

    if declared_rows == 0 {
        return Ok(desc);
    }

    let rpo0 = (70 + 24 * itls as i64 + 4 * (ntab as i64 - 1) + offset_mod as i64) as usize;
    desc.first_kdbr = rpo0;

    let mut actual_rows = 0u32;
    let mut min_rowdata: Option<usize> = None;
    let mut max_rowdata: Option<usize> = None;

    for i in 0..declared_rows as usize {
        let rp_off = rpo0 + 2 * i;
        let rp_slice = block.get(rp_off..rp_off + 2).ok_or_else(|| {
            Error::parse(rp_off, format!("row directory entry {i} out of bounds"))
        })?;
        let rp = u16::from_le_bytes(rp_slice.try_into().unwrap());

        let abs = (rp as i64 + 100 + 24 * (itls as i64 - 2) + offset_mod as i64) as usize;
        desc.kdbr.push(KdbrEntry {
            rp_index: i,
            row_pointer: rp,
            abs_offset: abs as u64,
        });

        min_rowdata = Some(min_rowdata.map_or(abs, |m: usize| m.min(abs)));

        match parse_row(block, abs) {
            Some(row) => {
                if matches!(row.flag, FLAG_HEAD_FULL | FLAG_HEAD_COUNTED) {
                    actual_rows += 1;
                }
                if let Some(touched) = row_max_touched(&row, abs) {
                    max_rowdata = Some(max_rowdata.map_or(touched, |m: usize| m.max(touched)));
                }
                desc.rows.push(row);
            }
            None => {
                trace!(offset = abs, "row parse failed, keeping header only");
            }
        }
    }

    desc.actual_rows = actual_rows;
    desc.min_rowdata = min_rowdata;
    desc.max_rowdata = max_rowdata;

    debug!(
        dba,
        declared_rows,
        actual_rows,
        "analyzed data-table block"
    );

    Ok(desc)
}

/// Derive `offset_mod` from the two consecutive u32 flags at `flag_off`.
fn derive_offset_mod(block: &[u8], flag_off: usize) -> i32 {
    let first = read_u32_or_zero(block, flag_off);
    let second = read_u32_or_zero(block, flag_off + 4);
    match (first == 0, second == 0) {
        (true, true) => 0,
        (true, false) => -4,
        (false, _) => -8,
    }
}

fn read_u32_or_zero(block: &[u8], off: usize) -> u32 {
    block
        .get(off..off + 4)
        .map(|s| u32::from_le_bytes(s.try_into().unwrap()))
        .unwrap_or(0)
}

/// Parse a row piece at `abs`, swallowing any out-of-bounds failure and
/// returning `None` (the caller keeps only the directory entry for it).
fn parse_row(block: &[u8], abs: usize) -> Option<RowData> {
    let flag = *block.get(abs)?;
    let lock = *block.get(abs + 1)?;

    if !matches!(flag, FLAG_HEAD_FULL | FLAG_CONTINUATION | FLAG_HEAD_COUNTED) {
        return Some(RowData {
            offset: abs,
            flag,
            lock,
            ncols: None,
            columns: Vec::new(),
        });
    }

    if !matches!(flag, FLAG_HEAD_FULL | FLAG_CONTINUATION) {
        return Some(RowData {
            offset: abs,
            flag,
            lock,
            ncols: None,
            columns: Vec::new(),
        });
    }

    // A truncated column directory is swallowed per-row (spec step 7): the
    // row keeps its flag/lock and whatever columns parsed before the
    // failure, with `ncols` left `None` rather than discarding the row.
    let (ncols, columns) = parse_columns(block, abs + 2);

    Some(RowData {
        offset: abs,
        flag,
        lock,
        ncols,
        columns,
    })
}

/// Parse the column directory starting at `pos`, stopping (but not
/// discarding what was already read) the first time a read runs past the
/// block. Returns `Some(ncols)` only when every declared column was read.
fn parse_columns(block: &[u8], start: usize) -> (Option<u32>, Vec<ColumnValue>) {
    let mut pos = start;
    let (ncols, new_pos) = match read_escalating_count(block, pos) {
        Some(v) => v,
        None => return (None, Vec::new()),
    };
    pos = new_pos;

    let mut columns = Vec::with_capacity(ncols as usize);
    for _ in 0..ncols {
        let col_off = pos;
        let len_byte = match block.get(pos) {
            Some(&b) => b,
            None => return (None, columns),
        };
        pos += 1;

        if len_byte == 255 {
            columns.push(ColumnValue {
                len: None,
                offset: col_off,
                hex: NULL_SENTINEL.to_string(),
            });
            continue;
        }

        let (clen, new_pos) = if len_byte == 254 {
            match block.get(pos..pos + 2) {
                Some(s) => (u16::from_le_bytes(s.try_into().unwrap()) as usize, pos + 2),
                None => return (None, columns),
            }
        } else {
            (len_byte as usize, pos)
        };
        pos = new_pos;

        let data = match block.get(pos..pos + clen) {
            Some(d) => d,
            None => return (None, columns),
        };
        columns.push(ColumnValue {
            len: Some(clen),
            offset: col_off,
            hex: hex::encode(data),
        });
        pos += clen;
    }

    (Some(ncols), columns)
}

/// Read a u8 count with 254-sentinel escalation to a following u16.
fn read_escalating_count(block: &[u8], pos: usize) -> Option<(u32, usize)> {
    let b = *block.get(pos)?;
    if b == 254 {
        let s = block.get(pos + 1..pos + 3)?;
        Some((u16::from_le_bytes(s.try_into().unwrap()) as u32, pos + 3))
    } else {
        Some((b as u32, pos + 1))
    }
}

fn row_max_touched(row: &RowData, abs: usize) -> Option<usize> {
    row.columns
        .last()
        .map(|c| c.offset + 1 + c.len.unwrap_or(0))
        .or(Some(abs + 2))
}
