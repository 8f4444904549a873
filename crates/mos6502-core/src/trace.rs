//! Structured per-instruction diagnostics.
//!
//! Tracing is a pull-free sink: the processor emits one frame per
//! traced tick (and unconditionally before an illegal-opcode error)
//! and never changes execution semantics based on whether a sink is
//! installed.

use std::fmt;

/// Register and decode state captured around one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TraceFrame {
    /// Program counter before the opcode fetch.
    pub initial_pc: u16,
    /// Program counter after execution.
    pub pc: u16,
    /// Stack pointer after execution.
    pub sp: u8,
    /// Accumulator after execution.
    pub a: u8,
    /// `X` index register after execution.
    pub x: u8,
    /// `Y` index register after execution.
    pub y: u8,
    /// `FLAGS` byte after execution.
    pub flags: u8,
    /// The fetched opcode byte.
    pub opcode: u8,
    /// The unconditionally fetched second byte.
    pub operand: u8,
}

impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pc {:04x}->{:04x} op {:02x} {:02x} a {:02x} x {:02x} y {:02x} sp {:02x} flags {:08b}",
            self.initial_pc,
            self.pc,
            self.opcode,
            self.operand,
            self.a,
            self.x,
            self.y,
            self.sp,
            self.flags
        )
    }
}

/// Sink for trace frames in execution order.
pub trait TraceSink {
    /// Records one frame.
    fn on_frame(&mut self, frame: &TraceFrame);
}

/// Sink that retains every frame, for tests and debuggers.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Frames in the order they were emitted.
    pub frames: Vec<TraceFrame>,
}

impl TraceSink for RecordingSink {
    fn on_frame(&mut self, frame: &TraceFrame) {
        self.frames.push(*frame);
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingSink, TraceFrame, TraceSink};

    #[test]
    fn display_renders_the_register_dump() {
        let frame = TraceFrame {
            initial_pc: 0x8000,
            pc: 0x8002,
            sp: 0xFF,
            a: 0x42,
            x: 0x00,
            y: 0x01,
            flags: 0b1010_0001,
            opcode: 0xA9,
            operand: 0x42,
        };
        assert_eq!(
            frame.to_string(),
            "pc 8000->8002 op a9 42 a 42 x 00 y 01 sp ff flags 10100001"
        );
    }

    #[test]
    fn recording_sink_keeps_frames_in_order() {
        let mut sink = RecordingSink::default();
        let mut frame = TraceFrame {
            initial_pc: 0,
            pc: 2,
            sp: 0,
            a: 0,
            x: 0,
            y: 0,
            flags: 0,
            opcode: 0xEA,
            operand: 0,
        };
        sink.on_frame(&frame);
        frame.initial_pc = 2;
        sink.on_frame(&frame);

        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.frames[0].initial_pc, 0);
        assert_eq!(sink.frames[1].initial_pc, 2);
    }
}
