//! Error taxonomy for conditions that abort instruction processing.

use thiserror::Error;

/// Fatal conditions surfaced synchronously from [`crate::Cpu::tick`].
///
/// Unmapped memory is deliberately not represented here: the router
/// makes unmapped reads return zero and discards unmapped writes, so
/// no memory access can fail. There is no retry path; every operation
/// is deterministic given the current state and memory contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CpuError {
    /// The fetched opcode byte is outside the defined encoding set.
    ///
    /// `pc` is the address the opcode was fetched from. The register
    /// file is left as it was immediately before dispatch, with the
    /// program counter already advanced past the two fetched bytes.
    #[error("invalid opcode {opcode:#04x} at {pc:#06x}")]
    IllegalOpcode {
        /// The undefined opcode value.
        opcode: u8,
        /// Address of the offending opcode byte.
        pc: u16,
    },
}
