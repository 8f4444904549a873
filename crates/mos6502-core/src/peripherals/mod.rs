//! Memory-mapped peripheral devices.

mod console;

pub use console::Console;
