//! Memory model primitives: the byte-port capability and its backings.

use std::cell::RefCell;
use std::rc::Rc;

mod map;
mod ram;
mod rom;

pub use map::MemoryMap;
pub use ram::Ram;
pub use rom::Rom;

/// Byte-addressable port implemented by every memory-like device.
///
/// The processor core never owns device storage; all memory side
/// effects flow through one `Addressable` supplied at construction
/// (normally a [`MemoryMap`]). Reads take `&mut self` because some
/// devices consume state on read (a console port pops its input
/// queue).
pub trait Addressable {
    /// Reads one byte at `addr`.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes one byte at `addr`.
    fn write(&mut self, addr: u16, data: u8);
}

/// Shared-handle forwarding so a host can keep a device it also mapped
/// into the router. Device-side mutation stays single-threaded; the
/// core makes no locking guarantees.
impl<T: Addressable> Addressable for Rc<RefCell<T>> {
    fn read(&mut self, addr: u16) -> u8 {
        self.borrow_mut().read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.borrow_mut().write(addr, data);
    }
}
