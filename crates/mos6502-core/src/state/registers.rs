/// `FLAGS` bit for carry/borrow.
pub const FLAG_C: u8 = 1 << 0;
/// `FLAGS` bit for zero result.
pub const FLAG_Z: u8 = 1 << 1;
/// `FLAGS` bit for interrupt disable.
pub const FLAG_I: u8 = 1 << 2;
/// `FLAGS` bit for decimal (BCD) arithmetic mode.
pub const FLAG_D: u8 = 1 << 3;
/// `FLAGS` bit for break.
pub const FLAG_B: u8 = 1 << 4;
/// `FLAGS` bit that is unused on the hardware but always pushed as set.
pub const FLAG_U: u8 = 1 << 5;
/// `FLAGS` bit for signed overflow.
pub const FLAG_V: u8 = 1 << 6;
/// `FLAGS` bit for negative result.
pub const FLAG_N: u8 = 1 << 7;

/// Architecturally visible register file for the 6502 core.
///
/// The stack pointer indexes into the fixed `0x0100..=0x01FF` window
/// and wraps modulo 256 on push/pull, exactly as the hardware does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    pc: u16,
    sp: u8,
    a: u8,
    x: u8,
    y: u8,
    flags: u8,
}

impl Registers {
    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the stack pointer.
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.sp
    }

    /// Writes the stack pointer.
    pub const fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Writes the accumulator.
    pub const fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Reads the `X` index register.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Writes the `X` index register.
    pub const fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Reads the `Y` index register.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Writes the `Y` index register.
    pub const fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Reads the full `FLAGS` byte.
    #[must_use]
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// Writes the full `FLAGS` byte.
    pub const fn set_flags(&mut self, value: u8) {
        self.flags = value;
    }

    /// Returns `true` when every bit in `mask` is set.
    #[must_use]
    pub const fn flag(&self, mask: u8) -> bool {
        (self.flags & mask) != 0
    }

    /// Sets the `FLAGS` bits in `mask`.
    pub const fn set_flag(&mut self, mask: u8) {
        self.flags |= mask;
    }

    /// Clears the `FLAGS` bits in `mask`.
    pub const fn clear_flag(&mut self, mask: u8) {
        self.flags &= !mask;
    }

    /// Sets or clears the `FLAGS` bits in `mask`.
    pub const fn update_flag(&mut self, mask: u8, enabled: bool) {
        if enabled {
            self.set_flag(mask);
        } else {
            self.clear_flag(mask);
        }
    }

    /// Recomputes Negative and Zero from a result byte.
    ///
    /// Negative tracks bit 7 and Zero tracks `value == 0`; every other
    /// flag is left untouched. Essentially every data-producing
    /// operation applies this as a side effect.
    pub const fn derive_nz(&mut self, value: u8) {
        self.update_flag(FLAG_N, value & 0x80 != 0);
        self.update_flag(FLAG_Z, value == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::{Registers, FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_U, FLAG_V, FLAG_Z};

    #[test]
    fn default_register_file_is_all_zero() {
        let regs = Registers::default();
        assert_eq!(regs.pc(), 0);
        assert_eq!(regs.sp(), 0);
        assert_eq!(regs.a(), 0);
        assert_eq!(regs.x(), 0);
        assert_eq!(regs.y(), 0);
        assert_eq!(regs.flags(), 0);
    }

    #[test]
    fn flag_masks_match_hardware_bit_positions() {
        assert_eq!(FLAG_C, 0b0000_0001);
        assert_eq!(FLAG_Z, 0b0000_0010);
        assert_eq!(FLAG_I, 0b0000_0100);
        assert_eq!(FLAG_D, 0b0000_1000);
        assert_eq!(FLAG_B, 0b0001_0000);
        assert_eq!(FLAG_U, 0b0010_0000);
        assert_eq!(FLAG_V, 0b0100_0000);
        assert_eq!(FLAG_N, 0b1000_0000);
    }

    #[test]
    fn individual_flags_can_be_set_and_cleared() {
        let mut regs = Registers::default();

        for mask in [FLAG_C, FLAG_Z, FLAG_I, FLAG_D, FLAG_B, FLAG_U, FLAG_V, FLAG_N] {
            regs.set_flag(mask);
            assert!(regs.flag(mask));
        }
        assert_eq!(regs.flags(), 0xFF);

        for mask in [FLAG_C, FLAG_Z, FLAG_I, FLAG_D, FLAG_B, FLAG_U, FLAG_V, FLAG_N] {
            regs.clear_flag(mask);
            assert!(!regs.flag(mask));
        }
        assert_eq!(regs.flags(), 0);
    }

    #[test]
    fn derive_nz_tracks_bit_seven_and_zero_only() {
        let mut regs = Registers::default();
        regs.set_flag(FLAG_C | FLAG_V | FLAG_D);

        regs.derive_nz(0x80);
        assert!(regs.flag(FLAG_N));
        assert!(!regs.flag(FLAG_Z));

        regs.derive_nz(0x00);
        assert!(!regs.flag(FLAG_N));
        assert!(regs.flag(FLAG_Z));

        regs.derive_nz(0x42);
        assert!(!regs.flag(FLAG_N));
        assert!(!regs.flag(FLAG_Z));

        // carry/overflow/decimal survive every recomputation
        assert!(regs.flag(FLAG_C));
        assert!(regs.flag(FLAG_V));
        assert!(regs.flag(FLAG_D));
    }

    #[test]
    fn update_flag_selects_between_set_and_clear() {
        let mut regs = Registers::default();
        regs.update_flag(FLAG_C, true);
        assert!(regs.flag(FLAG_C));
        regs.update_flag(FLAG_C, false);
        assert!(!regs.flag(FLAG_C));
    }
}
