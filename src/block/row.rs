//! Row-level types produced by the block analyzer.

/// Sentinel string used in place of a hex dump for a NULL column.
pub const NULL_SENTINEL: &str = "*NULL*";

/// One entry of the row directory (KDBR), a 2-byte little-endian offset
/// into the block pointing at the start of a row piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdbrEntry {
    /// Index of this entry within the row directory.
    pub rp_index: usize,
    /// Raw row pointer: the byte offset of the row piece, relative to the
    /// start of the block.
    pub row_pointer: u16,
    /// Absolute file offset of the row piece (`row_pointer` plus the
    /// block's base offset in the file).
    pub abs_offset: u64,
}

/// One column value inside a row piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValue {
    /// Declared column length, `0xFF` (255) meaning NULL.
    pub len: Option<usize>,
    /// Byte offset of this column's length byte, relative to the block.
    pub offset: usize,
    /// Hex dump of the column's raw bytes, or [`NULL_SENTINEL`] for NULL.
    pub hex: String,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        self.len.is_none()
    }
}

/// A fully parsed row piece: flag/lock byte pair, column count, and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowData {
    /// Byte offset of this row piece, relative to the start of the block.
    pub offset: usize,
    pub flag: u8,
    pub lock: u8,
    /// Column count, `None` when the row piece could not be fully parsed
    /// (a cluster key, chained row head, or corrupted piece).
    pub ncols: Option<u32>,
    pub columns: Vec<ColumnValue>,
}
