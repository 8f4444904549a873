//! Instruction-level MOS 6502 emulator core.
//!
//! The crate models the processor at instruction granularity: one
//! [`Cpu::tick`] fetches, decodes, and fully executes a single
//! instruction against a pluggable [`Addressable`] bus and returns the
//! cycle cost for host-side pacing. Everything is deterministic and
//! single-threaded; the host owns all timing and I/O policy.

/// Architectural register file and `FLAGS` bit masks.
pub mod state;
pub use state::{
    Registers, FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_U, FLAG_V, FLAG_Z,
};

/// Byte-addressed bus trait, the range router, and RAM/ROM devices.
pub mod memory;
pub use memory::{Addressable, MemoryMap, Ram, Rom};

/// Memory-mapped devices beyond plain storage.
pub mod peripherals;
pub use peripherals::Console;

/// Deterministic opcode decode table and instruction encoding model.
pub mod opcode;
pub use opcode::{
    decode, AddressingMode, Index, Instruction, ShiftTarget, ValueSource, DEFINED_OPCODE_COUNT,
    OPCODE_TABLE,
};

/// Fault taxonomy for conditions that abort instruction processing.
pub mod fault;
pub use fault::CpuError;

/// Structured per-instruction trace frames and sinks.
pub mod trace;
pub use trace::{RecordingSink, TraceFrame, TraceSink};

/// The fetch/decode/execute engine.
pub mod cpu;
pub use cpu::{Cpu, IRQ_VECTOR, RESET_VECTOR, STACK_BASE};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
