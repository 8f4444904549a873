//! Architectural CPU state model primitives.

mod registers;

pub use registers::{
    Registers, FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_U, FLAG_V, FLAG_Z,
};
