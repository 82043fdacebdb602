//! Structural readers (C2): pure functions unpacking the fixed-size header
//! records out of a block buffer. No bounds checking beyond slice length —
//! callers are expected to hand over correctly sized slices (the analyzer
//! does).

use crate::error::{require_len, Result};

/// Size in bytes of the cache header (KCBH), at offset 0 of every block.
pub const KCBH_LEN: usize = 20;
/// Size in bytes of the fixed KTBBH prefix, before the ITL array.
pub const KTBBH_PREFIX_LEN: usize = 24;
/// Size in bytes of a single ITL entry.
pub const ITL_ENTRY_LEN: usize = 24;

/// Cache block header, the first 20 bytes of every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kcbh {
    pub block_type: u8,
    pub frmt: u8,
    pub spare1: u8,
    pub spare2: u8,
    pub rdba: u32,
    pub bas: u32,
    pub wrp: u16,
    pub seq: u8,
    pub flg: u8,
    pub chkval: u16,
    pub spare3: u16,
}

impl Kcbh {
    /// Parse a KCBH from the first 20 bytes of `block`.
    pub fn read(block: &[u8]) -> Result<Self> {
        require_len(block, KCBH_LEN)?;
        Ok(Self {
            block_type: block[0],
            frmt: block[1],
            spare1: block[2],
            spare2: block[3],
            rdba: u32::from_le_bytes(block[4..8].try_into().unwrap()),
            bas: u32::from_le_bytes(block[8..12].try_into().unwrap()),
            wrp: u16::from_le_bytes(block[12..14].try_into().unwrap()),
            seq: block[14],
            flg: block[15],
            chkval: u16::from_le_bytes(block[16..18].try_into().unwrap()),
            spare3: u16::from_le_bytes(block[18..20].try_into().unwrap()),
        })
    }
}

/// Fixed 24-byte prefix of the transaction header (KTBBH), before its ITL array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KtbbhPrefix {
    pub ktbbhtyp: u8,
    /// Union of `ktbbhsg1`/`ktbbhod1` (object ID for DATA-table blocks).
    pub ktbbhsid: u32,
    pub kscnbas: u32,
    pub kscnwrp: u16,
    pub ktbbhict: u8,
    pub ktbbhflg: u8,
    pub ktbbhfsl: u8,
    pub ktbbhfnx: u32,
}

impl KtbbhPrefix {
    /// Parse the KTBBH prefix from a 24-byte slice starting at block offset 20.
    pub fn read(prefix: &[u8]) -> Result<Self> {
        require_len(prefix, KTBBH_PREFIX_LEN)?;
        Ok(Self {
            ktbbhtyp: prefix[0],
            ktbbhsid: u32::from_le_bytes(prefix[4..8].try_into().unwrap()),
            kscnbas: u32::from_le_bytes(prefix[8..12].try_into().unwrap()),
            kscnwrp: u16::from_le_bytes(prefix[12..14].try_into().unwrap()),
            ktbbhict: prefix[16],
            ktbbhflg: prefix[18],
            ktbbhfsl: prefix[19],
            ktbbhfnx: u32::from_le_bytes(prefix[20..24].try_into().unwrap()),
        })
    }
}

/// A single Interested Transaction List slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItlEntry {
    pub xid_usn: u16,
    pub xid_slt: u16,
    pub xid_sqn: u32,
    pub uba_dba: u32,
    pub uba_seq: u16,
    pub uba_rec: u8,
    pub flag: u16,
    /// Union of `_ktbitfsc`/`_ktbitwrp`.
    pub fsc_wrp: u16,
    pub base_scn: u32,
}

impl ItlEntry {
    /// Parse a single 24-byte ITL entry.
    pub fn read(entry: &[u8]) -> Result<Self> {
        require_len(entry, ITL_ENTRY_LEN)?;
        Ok(Self {
            xid_usn: u16::from_le_bytes(entry[0..2].try_into().unwrap()),
            xid_slt: u16::from_le_bytes(entry[2..4].try_into().unwrap()),
            xid_sqn: u32::from_le_bytes(entry[4..8].try_into().unwrap()),
            uba_dba: u32::from_le_bytes(entry[8..12].try_into().unwrap()),
            uba_seq: u16::from_le_bytes(entry[12..14].try_into().unwrap()),
            uba_rec: entry[14],
            flag: u16::from_le_bytes(entry[16..18].try_into().unwrap()),
            fsc_wrp: u16::from_le_bytes(entry[18..20].try_into().unwrap()),
            base_scn: u32::from_le_bytes(entry[20..24].try_into().unwrap()),
        })
    }

    /// Parse `count` consecutive ITL entries starting at block offset 44.
    pub fn read_all(block: &[u8], count: u8) -> Result<Vec<Self>> {
        let mut pos = KCBH_LEN + KTBBH_PREFIX_LEN;
        let mut out = Vec::with_capacity(count as usize);
        for _ in 0..count {
            require_len(&block[pos..], ITL_ENTRY_LEN)?;
            out.push(Self::read(&block[pos..pos + ITL_ENTRY_LEN])?);
            pos += ITL_ENTRY_LEN;
        }
        Ok(out)
    }
}
