//! Ordered first-match address router over boxed devices.

use super::Addressable;

struct Mapping {
    start: u16,
    end: u16,
    device: Box<dyn Addressable>,
}

/// Routes reads and writes to the first device whose inclusive
/// `[start, end]` range contains the address.
///
/// Ranges are checked in attachment order, so overlapping bindings
/// resolve to the earliest one; layered/overlay memory designs rely on
/// this. Devices see local addresses (`addr - start`). Unmapped reads
/// return `0x00` and unmapped writes are discarded, matching the
/// floating-bus-adjacent policy the core assumes; the processor
/// performs no bounds checks of its own.
#[derive(Default)]
pub struct MemoryMap {
    parts: Vec<Mapping>,
}

impl MemoryMap {
    /// Creates an empty map where every address is unmapped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `device` to the inclusive range `[start, end]`.
    pub fn attach(&mut self, start: u16, end: u16, device: Box<dyn Addressable>) {
        self.parts.push(Mapping { start, end, device });
    }

    /// Builder form of [`MemoryMap::attach`].
    #[must_use]
    pub fn with(mut self, start: u16, end: u16, device: Box<dyn Addressable>) -> Self {
        self.attach(start, end, device);
        self
    }
}

impl Addressable for MemoryMap {
    fn read(&mut self, addr: u16) -> u8 {
        for part in &mut self.parts {
            if addr >= part.start && addr <= part.end {
                return part.device.read(addr - part.start);
            }
        }
        0x00
    }

    fn write(&mut self, addr: u16, data: u8) {
        for part in &mut self.parts {
            if addr >= part.start && addr <= part.end {
                part.device.write(addr - part.start, data);
                return;
            }
        }
    }
}
