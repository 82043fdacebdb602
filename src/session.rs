//! Session state (C5) and the mutation/checksum/save/revert lifecycle (C6).

use crate::block::{analyze, BlockDescriptor};
use crate::checksum;
use crate::config::SessionConfig;
use crate::decode::OracleType;
use crate::error::{Error, Result};
use crate::io::{read_block, write_block};
use tracing::{info, instrument};

/// A byte payload supplied to [`Session::modify`], replacing the legacy
/// tool's magic-string sentinels with an explicit tagged variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteSource {
    Raw(Vec<u8>),
    Hex(String),
}

impl ByteSource {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ByteSource::Raw(bytes) => Ok(bytes),
            ByteSource::Hex(hex_string) => hex::decode(&hex_string)
                .map_err(|e| Error::decode(format!("malformed hex {hex_string:?}: {e}"))),
        }
    }
}

/// Interactive forensic-editor session state.
pub struct Session {
    config: SessionConfig,
    file_names: Vec<String>,
    block_data: Vec<u8>,
    block_data_backup: Vec<u8>,
    current_offset: usize,
    current_rowp: usize,
    edit_mode: bool,
    manual_offset: i32,
    current_block_desc: Option<BlockDescriptor>,
}

impl Session {
    /// Create a new session over the given ordered datafile paths
    /// (`file_names[0]` is `file_id == 1`, and so on).
    pub fn new(file_names: Vec<String>) -> Self {
        Self {
            config: SessionConfig::default(),
            file_names,
            block_data: Vec::new(),
            block_data_backup: Vec::new(),
            current_offset: 0,
            current_rowp: 0,
            edit_mode: false,
            manual_offset: 0,
            current_block_desc: None,
        }
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn set_blocksize(&mut self, block_size: usize) {
        self.config.block_size = block_size;
    }

    pub fn set_manual_offset(&mut self, offset: i32) {
        self.manual_offset = offset;
    }

    pub fn set_mode_edit(&mut self) {
        self.edit_mode = true;
    }

    pub fn current_offset(&self) -> usize {
        self.current_offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.current_offset = offset;
    }

    pub fn block_data(&self) -> &[u8] {
        &self.block_data
    }

    pub fn descriptor(&self) -> Option<&BlockDescriptor> {
        self.current_block_desc.as_ref()
    }

    fn file_path(&self, file_id: u32) -> Result<&str> {
        self.file_names
            .get(file_id as usize - 1)
            .map(String::as_str)
            .ok_or_else(|| Error::state(format!("no file registered for file_id {file_id}")))
    }

    /// Load block `block_id` of file `file_id`, replacing the current
    /// block buffer and recomputing its descriptor.
    #[instrument(skip(self))]
    pub fn get_block(&mut self, file_id: u32, block_id: u32) -> Result<()> {
        let path = self.file_path(file_id)?.to_string();
        let block_size = self.config.block_size;
        let data = read_block(&path, block_id, block_size)?;

        let dba = file_id * self.config.max_block + block_id;
        let desc = analyze(&data, dba, file_id, &path, self.manual_offset)?;

        self.block_data = data;
        self.current_offset = 0;
        self.current_rowp = 0;
        self.current_block_desc = Some(desc);

        info!(file_id, block_id, "loaded block");
        Ok(())
    }

    /// Overwrite `block_data[current_offset..current_offset + len(bytes)]`.
    /// Never writes past `block_size`; the length written is clamped to
    /// what remains in the block.
    pub fn modify(&mut self, source: ByteSource) -> Result<usize> {
        if self.block_data.is_empty() {
            return Err(Error::state("no block loaded"));
        }
        let bytes = source.into_bytes()?;
        let start = self.current_offset;
        let end = start
            .checked_add(bytes.len())
            .filter(|&e| e <= self.block_data.len())
            .ok_or_else(|| {
                Error::state(format!(
                    "modify at offset {start} with {} bytes would exceed block_size {}",
                    bytes.len(),
                    self.block_data.len()
                ))
            })?;

        self.block_data[start..end].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Compute (and optionally apply) the XOR-fold checksum of the current block.
    pub fn checksum(&mut self, apply: bool) -> Result<u16> {
        if self.block_data.is_empty() {
            return Err(Error::state("no block loaded"));
        }
        checksum::apply(&mut self.block_data, self.config.block_size, apply)
    }

    /// Persist `block_data` to disk, capturing the pre-save bytes as the backup.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Result<()> {
        if !self.edit_mode {
            return Err(Error::state("save requires edit mode"));
        }
        let desc = self
            .current_block_desc
            .as_ref()
            .ok_or_else(|| Error::state("no block loaded"))?;

        let file_id = desc.file_id;
        let block_id = desc.dba % self.config.max_block;
        let path = self.file_path(file_id)?.to_string();

        let previous = write_block(&path, block_id, self.config.block_size, &self.block_data)?;
        self.block_data_backup = previous;

        info!(file_id, block_id, "saved block");
        Ok(())
    }

    /// Revert the current block's file to the captured backup bytes.
    ///
    /// Uses `current_block_desc.file_id`, not whatever `file_id` happened
    /// to be bound at the call site — the legacy tool's revert command
    /// read a stale binding here.
    #[instrument(skip(self))]
    pub fn revert(&mut self) -> Result<()> {
        if self.block_data_backup.is_empty() {
            return Err(Error::state("no backup to revert to"));
        }
        let desc = self
            .current_block_desc
            .as_ref()
            .ok_or_else(|| Error::state("no block loaded"))?;

        let file_id = desc.file_id;
        let block_id = desc.dba % self.config.max_block;
        let path = self.file_path(file_id)?.to_string();

        write_block(&path, block_id, self.config.block_size, &self.block_data_backup)?;
        info!(file_id, block_id, "reverted block");
        Ok(())
    }

    /// Linear scan of the current block's parsed rows (`kdbr_data`),
    /// returning the indices of every row whose column `col` (0-based)
    /// decodes, under type tag `tag`, to exactly `value`.
    ///
    /// A row is skipped, not matched, when column `col` doesn't exist,
    /// is NULL, or fails to decode under `tag` — a `select` is a filter,
    /// not a validator.
    pub fn select(&self, col: usize, tag: char, value: &str) -> Result<Vec<usize>> {
        let desc = self
            .current_block_desc
            .as_ref()
            .ok_or_else(|| Error::state("no block loaded"))?;

        let matches = desc
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.columns
                    .get(col)
                    .filter(|column| !column.is_null())
                    .and_then(|column| OracleType::new(&column.hex, tag).ok())
                    .is_some_and(|decoded| decoded.value_string == value)
            })
            .map(|(idx, _)| idx)
            .collect();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_datafile(blocks: usize, block_size: usize) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&vec![0u8; blocks * block_size]).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn get_block_loads_and_resets_offsets() {
        let f = scratch_datafile(2, 8192);
        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.set_offset(50);
        session.get_block(1, 1).unwrap();
        assert_eq!(session.current_offset(), 0);
        assert_eq!(session.block_data().len(), 8192);
    }

    #[test]
    fn modify_preserves_block_size() {
        let f = scratch_datafile(1, 8192);
        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.get_block(1, 0).unwrap();
        session.set_offset(10);
        session.modify(ByteSource::Raw(vec![1, 2, 3])).unwrap();
        assert_eq!(session.block_data().len(), 8192);
        assert_eq!(&session.block_data()[10..13], &[1, 2, 3]);
    }

    #[test]
    fn modify_past_block_size_errors() {
        let f = scratch_datafile(1, 8192);
        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.get_block(1, 0).unwrap();
        session.set_offset(8190);
        assert!(session.modify(ByteSource::Raw(vec![1, 2, 3, 4])).is_err());
    }

    #[test]
    fn save_without_edit_mode_is_state_error() {
        let f = scratch_datafile(1, 8192);
        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.get_block(1, 0).unwrap();
        assert!(matches!(session.save(), Err(Error::State { .. })));
    }

    #[test]
    fn save_then_revert_round_trips() {
        let f = scratch_datafile(1, 8192);
        let path = f.path().to_string_lossy().into_owned();
        let mut session = Session::new(vec![path.clone()]);

        session.get_block(1, 0).unwrap();
        session.set_mode_edit();
        session.set_offset(0);
        session.modify(ByteSource::Raw(vec![0xAA; 4])).unwrap();
        session.save().unwrap();

        let on_disk = read_block(&path, 0, 8192).unwrap();
        assert_eq!(&on_disk[0..4], &[0xAA; 4]);

        session.revert().unwrap();
        let reverted = read_block(&path, 0, 8192).unwrap();
        assert_eq!(&reverted[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn checksum_apply_then_recompute_matches() {
        let f = scratch_datafile(1, 8192);
        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.get_block(1, 0).unwrap();
        session.set_offset(16);
        session
            .modify(ByteSource::Raw(vec![0xFF, 0xFF]))
            .unwrap();

        let applied = session.checksum(true).unwrap();
        let recomputed = session.checksum(false).unwrap();
        assert_eq!(applied, recomputed);
        assert_eq!(&session.block_data()[16..18], &applied.to_le_bytes());
    }

    fn synthetic_data_block(block_size: usize) -> Vec<u8> {
        // ITLS=2, NTAB=1, DECLARED_ROWS=1, one row at flag 0x2C with a
        // single NUMBER column encoding the value 1 (hex c1 02).
        let mut block = vec![0u8; block_size];
        block[0] = 6;
        block[20] = 1;
        block[36] = 2; // itls

        let ntab_off = 53 + 24 * 2;
        block[ntab_off] = 1; // NTAB
        block[ntab_off + 1] = 1; // DECLARED_ROWS

        let rpo0 = 70 + 24 * 2;
        block[rpo0..rpo0 + 2].copy_from_slice(&0u16.to_le_bytes());

        let row_abs = 100usize;
        block[row_abs] = 0x2C; // flag
        block[row_abs + 1] = 0x00; // lock
        block[row_abs + 2] = 1; // ncols
        block[row_abs + 3] = 2; // col0 len
        block[row_abs + 4] = 0xc1;
        block[row_abs + 5] = 0x02;

        block
    }

    #[test]
    fn select_matches_rows_by_decoded_column_value() {
        let block_size = 8192;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&synthetic_data_block(block_size)).unwrap();
        f.flush().unwrap();

        let mut session = Session::new(vec![f.path().to_string_lossy().into_owned()]);
        session.get_block(1, 0).unwrap();

        assert_eq!(session.select(0, 'n', "1").unwrap(), vec![0]);
        assert!(session.select(0, 'n', "2").unwrap().is_empty());
    }

    #[test]
    fn select_without_a_loaded_block_is_state_error() {
        let session = Session::new(vec!["/nonexistent".to_string()]);
        assert!(matches!(session.select(0, 'n', "1"), Err(Error::State { .. })));
    }
}
