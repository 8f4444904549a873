//! Text-stream byte port: a FIFO input queue and a drainable output
//! buffer the host pumps.

use std::collections::VecDeque;

use crate::memory::Addressable;

/// Console device mapped into the address space as a byte port.
///
/// Any read anywhere in its range pops the next pending input byte, or
/// returns `0x00` when the queue is empty; any write emits one byte to
/// the output buffer. The device holds no terminal state itself, so
/// tests stay deterministic and the host decides how input arrives and
/// where output goes.
#[derive(Debug, Default)]
pub struct Console {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl Console {
    /// Creates a console with empty input and output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one byte for the emulated program to read.
    pub fn push_input(&mut self, byte: u8) {
        self.input.push_back(byte);
    }

    /// Queues a string's bytes for the emulated program to read.
    pub fn push_input_str(&mut self, text: &str) {
        self.input.extend(text.bytes());
    }

    /// Number of input bytes not yet consumed by the program.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Drains and returns everything the program has written so far.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Addressable for Console {
    fn read(&mut self, _addr: u16) -> u8 {
        self.input.pop_front().unwrap_or(0)
    }

    fn write(&mut self, _addr: u16, data: u8) {
        self.output.push(data);
    }
}
