//! Decoders for the variable-length payload (PDU) attached to a trace event.
//!
//! What the payload holds depends on the action:
//! - unplug and split events carry a big-endian `u64` (request count / split sector),
//! - remap events carry a [`Remap`] descriptor,
//! - packet command events (`ActionFlags::PC`) carry a raw command block, which is only ever
//!   hex dumped.

use crate::action::{ActionFlags, RwbsFlags};
use crate::err::Result;
use crate::trace_event::Device;
use crate::utils::bytes;

pub use crate::utils::{dump_pdu, write_pdu_dump};

/// Size of an encoded remap descriptor.
pub const REMAP_PDU_SIZE: usize = 16;

/// Where a remapped request originally pointed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remap {
    pub device: Device,
    pub sector: u64,
}

/// Derives the `R`/`W` + `B` + `S` flag string.
pub fn rwbs(flags: ActionFlags) -> RwbsFlags {
    RwbsFlags::from_flags(flags)
}

/// The first 8 payload bytes as a big-endian integer.
pub fn read_be_u64(payload: &[u8]) -> Result<u64> {
    bytes::read_u64_be_r(payload, 0, "pdu integer")
}

/// Decodes a remap descriptor.
///
/// The device is a big-endian `u32` at the start, the sector a big-endian `u64` at offset 8
/// (the descriptor keeps the sector naturally aligned).
pub fn read_remap(payload: &[u8]) -> Result<Remap> {
    let device = bytes::read_u32_be_r(payload, 0, "remap device")?;
    let sector = bytes::read_u64_be_r(payload, 8, "remap sector")?;

    Ok(Remap {
        device: Device::from_dev_t(device),
        sector,
    })
}

/// Encodes a remap descriptor, the inverse of [`read_remap`].
pub fn encode_remap(remap: &Remap) -> [u8; REMAP_PDU_SIZE] {
    let mut out = [0_u8; REMAP_PDU_SIZE];
    out[..4].copy_from_slice(&remap.device.to_dev_t().to_be_bytes());
    out[8..].copy_from_slice(&remap.sector.to_be_bytes());
    out
}
