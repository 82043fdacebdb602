//! Session configuration.

/// Block-size parameters for a session.
///
/// A single configuration covers an entire session; the block size can be
/// changed between block loads (`set blocksize`) but every block loaded
/// while a given size is in effect is interpreted with that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bytes per block. Default matches Oracle's common tablespace block size.
    pub block_size: usize,
    /// Upper bound on a DBA's block component, used to split/recover `(file_id, block_id)`.
    pub max_block: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            block_size: 8192,
            max_block: 4_194_304,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with an explicit block size and the default `max_block`.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size,
            ..Self::default()
        }
    }
}
