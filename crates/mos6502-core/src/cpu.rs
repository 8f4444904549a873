//! Fetch/decode/execute engine with per-instruction cycle accounting.
//!
//! A tick runs exactly one instruction to completion; there are no
//! suspension points. The cycle counter is zeroed at the start of each
//! tick and charged once per bus read or write, plus one extra for a
//! taken branch and for each page-crossing indexed/relative
//! computation. The returned total is the unit hosts use for
//! real-time pacing; the core itself holds no timers.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines
)]

use crate::fault::CpuError;
use crate::memory::Addressable;
use crate::opcode::{decode, AddressingMode, Index, Instruction, ShiftTarget, ValueSource};
use crate::state::{Registers, FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_U, FLAG_V, FLAG_Z};
use crate::trace::{TraceFrame, TraceSink};

/// Base address of the fixed 256-byte stack window (`0x0100..=0x01FF`).
pub const STACK_BASE: u16 = 0x0100;

/// Location of the little-endian reset vector (low byte here).
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Location of the little-endian interrupt/BRK vector (low byte here).
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Instruction-level 6502 processor.
///
/// Owns the register file and a cycle counter; every memory side
/// effect flows through the [`Addressable`] supplied at construction.
/// Construction performs a [`reset`](Self::reset). Single-threaded and
/// non-reentrant: no two ticks may run concurrently against one
/// instance.
pub struct Cpu<B: Addressable> {
    bus: B,
    registers: Registers,
    cycles: u16,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl<B: Addressable> Cpu<B> {
    /// Creates a processor on `bus` and resets it.
    pub fn new(bus: B) -> Self {
        let mut cpu = Self {
            bus,
            registers: Registers::default(),
            cycles: 0,
            trace_sink: None,
        };
        cpu.reset();
        cpu
    }

    /// Reinitializes all registers and flags to zero, then loads the
    /// program counter from the reset vector at [`RESET_VECTOR`].
    pub fn reset(&mut self) {
        self.registers = Registers::default();
        let low = self.read_mem(RESET_VECTOR);
        let high = self.read_mem(RESET_VECTOR.wrapping_add(1));
        self.registers.set_pc(u16::from_le_bytes([low, high]));
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn program_counter(&self) -> u16 {
        self.registers.pc()
    }

    /// Writes the program counter.
    pub const fn set_program_counter(&mut self, pc: u16) {
        self.registers.set_pc(pc);
    }

    /// Read-only view of the register file.
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Mutable register file access for hosts and test harnesses.
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Borrows the bus.
    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrows the bus.
    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Installs a sink receiving structured per-instruction frames.
    ///
    /// Frames are emitted for ticks requested with `trace` and, always,
    /// immediately before an illegal-opcode error. Tracing never
    /// alters execution semantics.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    /// Executes exactly one instruction and returns its cycle cost.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::IllegalOpcode`] when the fetched opcode is
    /// outside the defined set. The register file is left as it was
    /// immediately before dispatch (program counter already advanced
    /// past the two fetched bytes), so the host can log state and
    /// stop.
    pub fn tick(&mut self, trace: bool) -> Result<u16, CpuError> {
        self.cycles = 0;
        let initial_pc = self.registers.pc();

        let opcode = self.fetch();
        // the hardware reads a second byte even for one-byte forms
        let operand = self.fetch();

        let Some(instruction) = decode(opcode) else {
            self.emit_trace(initial_pc, opcode, operand);
            return Err(CpuError::IllegalOpcode {
                opcode,
                pc: initial_pc,
            });
        };

        if instruction.is_one_byte() {
            // undo the superfluous operand advance
            self.registers
                .set_pc(self.registers.pc().wrapping_sub(1));
        }

        self.execute(instruction, operand);

        if trace {
            self.emit_trace(initial_pc, opcode, operand);
        }

        Ok(self.cycles)
    }

    fn emit_trace(&mut self, initial_pc: u16, opcode: u8, operand: u8) {
        if let Some(sink) = self.trace_sink.as_mut() {
            sink.on_frame(&TraceFrame {
                initial_pc,
                pc: self.registers.pc(),
                sp: self.registers.sp(),
                a: self.registers.a(),
                x: self.registers.x(),
                y: self.registers.y(),
                flags: self.registers.flags(),
                opcode,
                operand,
            });
        }
    }

    fn fetch(&mut self) -> u8 {
        let data = self.read_mem(self.registers.pc());
        self.registers
            .set_pc(self.registers.pc().wrapping_add(1));
        data
    }

    fn read_mem(&mut self, addr: u16) -> u8 {
        let data = self.bus.read(addr);
        self.cycles += 1;
        data
    }

    fn write_mem(&mut self, addr: u16, data: u8) {
        self.bus.write(addr, data);
        self.cycles += 1;
    }

    fn index_value(&self, index: Index) -> u8 {
        match index {
            Index::X => self.registers.x(),
            Index::Y => self.registers.y(),
        }
    }

    /// Resolves an addressing mode to an effective address, charging
    /// any extra fetches, pointer reads, and page-cross penalties.
    fn effective_address(&mut self, mode: AddressingMode, operand: u8) -> u16 {
        match mode {
            AddressingMode::ZeroPage => u16::from(operand),
            AddressingMode::ZeroPageIndexed(index) => {
                // wraps within page zero, never penalized
                u16::from(operand.wrapping_add(self.index_value(index)))
            }
            AddressingMode::Absolute => {
                let high = self.fetch();
                u16::from_le_bytes([operand, high])
            }
            AddressingMode::AbsoluteIndirect => {
                let high = self.fetch();
                let pointer = u16::from_le_bytes([operand, high]);
                let low = self.read_mem(pointer);
                let high = self.read_mem(pointer.wrapping_add(1));
                u16::from_le_bytes([low, high])
            }
            AddressingMode::AbsoluteIndexed(index) => {
                let high = self.fetch();
                let index = self.index_value(index);
                self.indexed_address(high, operand, index)
            }
            AddressingMode::IndexedIndirect => {
                let base = operand.wrapping_add(self.registers.x());
                let low = self.read_mem(u16::from(base));
                let high = self.read_mem(u16::from(base.wrapping_add(1)));
                u16::from_le_bytes([low, high])
            }
            AddressingMode::IndirectIndexed => {
                let low = self.read_mem(u16::from(operand));
                let high = self.read_mem(u16::from(operand.wrapping_add(1)));
                let index = self.registers.y();
                self.indexed_address(high, low, index)
            }
            AddressingMode::Relative => self.relative_target(operand),
        }
    }

    /// Adds `index` to the low address byte; a carry out of the low
    /// byte crosses a page and costs one cycle. The carry still
    /// propagates into the high byte of the final address.
    fn indexed_address(&mut self, high: u8, low: u8, index: u8) -> u16 {
        let low = u16::from(low) + u16::from(index);
        if low > 0xFF {
            self.cycles += 1;
        }
        ((u32::from(high) << 8) + u32::from(low)) as u16
    }

    /// Signed displacement from the post-fetch program counter; a
    /// low-byte under/overflow crosses a page and costs one cycle.
    fn relative_target(&mut self, operand: u8) -> u16 {
        let displacement = i16::from(operand as i8);
        let pc = self.registers.pc();
        let low = i16::from((pc & 0x00FF) as u8) + displacement;
        if !(0x00..=0xFF).contains(&low) {
            self.cycles += 1;
        }
        (i32::from(pc & 0xFF00) + i32::from(low)) as u16
    }

    /// Reads the operand value: the literal byte for immediate forms,
    /// one charged bus read at the mode's address otherwise.
    fn value_of(&mut self, source: ValueSource, operand: u8) -> u8 {
        match source {
            ValueSource::Immediate => operand,
            ValueSource::Memory(mode) => {
                let addr = self.effective_address(mode, operand);
                self.read_mem(addr)
            }
        }
    }

    fn execute(&mut self, instruction: Instruction, operand: u8) {
        match instruction {
            Instruction::Adc(source) => {
                let value = self.value_of(source, operand);
                let result = self.add_with_carry(self.registers.a(), value);
                self.registers.set_a(result);
            }
            // same adder with the operand bits inverted: two's-complement
            // subtract-via-add-with-carry
            Instruction::Sbc(source) => {
                let value = self.value_of(source, operand);
                let result = self.add_with_carry(self.registers.a(), !value);
                self.registers.set_a(result);
            }
            Instruction::And(source) => {
                let value = self.value_of(source, operand);
                let result = self.registers.a() & value;
                self.registers.set_a(result);
                self.registers.derive_nz(result);
            }
            Instruction::Ora(source) => {
                let value = self.value_of(source, operand);
                let result = self.registers.a() | value;
                self.registers.set_a(result);
                self.registers.derive_nz(result);
            }
            Instruction::Eor(source) => {
                let value = self.value_of(source, operand);
                let result = self.registers.a() ^ value;
                self.registers.set_a(result);
                self.registers.derive_nz(result);
            }
            Instruction::Lda(source) => {
                let value = self.value_of(source, operand);
                self.registers.set_a(value);
                self.registers.derive_nz(value);
            }
            Instruction::Ldx(source) => {
                let value = self.value_of(source, operand);
                self.registers.set_x(value);
                self.registers.derive_nz(value);
            }
            Instruction::Ldy(source) => {
                let value = self.value_of(source, operand);
                self.registers.set_y(value);
                self.registers.derive_nz(value);
            }
            Instruction::Sta(mode) => {
                let addr = self.effective_address(mode, operand);
                let a = self.registers.a();
                self.write_mem(addr, a);
            }
            Instruction::Stx(mode) => {
                let addr = self.effective_address(mode, operand);
                let x = self.registers.x();
                self.write_mem(addr, x);
            }
            Instruction::Sty(mode) => {
                let addr = self.effective_address(mode, operand);
                let y = self.registers.y();
                self.write_mem(addr, y);
            }
            Instruction::Cmp(source) => {
                let register = self.registers.a();
                self.compare(register, source, operand);
            }
            Instruction::Cpx(source) => {
                let register = self.registers.x();
                self.compare(register, source, operand);
            }
            Instruction::Cpy(source) => {
                let register = self.registers.y();
                self.compare(register, source, operand);
            }
            Instruction::Bit(mode) => {
                let addr = self.effective_address(mode, operand);
                let value = self.read_mem(addr);
                self.registers.update_flag(FLAG_N, value & 0x80 != 0);
                self.registers.update_flag(FLAG_V, value & 0x40 != 0);
                self.registers
                    .update_flag(FLAG_Z, value & self.registers.a() == 0);
            }
            Instruction::Asl(target) => self.shift(target, operand, Self::asl_value),
            Instruction::Lsr(target) => self.shift(target, operand, Self::lsr_value),
            Instruction::Rol(target) => self.shift(target, operand, Self::rol_value),
            Instruction::Ror(target) => self.shift(target, operand, Self::ror_value),
            Instruction::Inc(mode) => self.modify_memory(mode, operand, 1),
            Instruction::Dec(mode) => self.modify_memory(mode, operand, 1_u8.wrapping_neg()),
            Instruction::Inx => {
                let result = self.registers.x().wrapping_add(1);
                self.registers.set_x(result);
                self.registers.derive_nz(result);
            }
            Instruction::Iny => {
                let result = self.registers.y().wrapping_add(1);
                self.registers.set_y(result);
                self.registers.derive_nz(result);
            }
            Instruction::Dex => {
                let result = self.registers.x().wrapping_sub(1);
                self.registers.set_x(result);
                self.registers.derive_nz(result);
            }
            Instruction::Dey => {
                let result = self.registers.y().wrapping_sub(1);
                self.registers.set_y(result);
                self.registers.derive_nz(result);
            }
            Instruction::Bcc => self.branch_on_flag(operand, FLAG_C, false),
            Instruction::Bcs => self.branch_on_flag(operand, FLAG_C, true),
            Instruction::Beq => self.branch_on_flag(operand, FLAG_Z, true),
            Instruction::Bne => self.branch_on_flag(operand, FLAG_Z, false),
            Instruction::Bmi => self.branch_on_flag(operand, FLAG_N, true),
            Instruction::Bpl => self.branch_on_flag(operand, FLAG_N, false),
            Instruction::Bvc => self.branch_on_flag(operand, FLAG_V, false),
            Instruction::Bvs => self.branch_on_flag(operand, FLAG_V, true),
            Instruction::Jmp(mode) => {
                let target = self.effective_address(mode, operand);
                self.registers.set_pc(target);
            }
            Instruction::Jsr => {
                let target = self.effective_address(AddressingMode::Absolute, operand);
                // push pc - 1 so the RTS +1 lands on the next instruction
                self.push_pc(-1);
                self.registers.set_pc(target);
            }
            Instruction::Rts => self.return_subroutine(1),
            Instruction::Rti => {
                self.pull_processor_flags();
                self.return_subroutine(0);
            }
            Instruction::Brk => {
                // BRK is a logical two-byte instruction; only the opcode
                // byte is meaningful but the return address skips both
                self.push_pc(1);
                let flags = self.registers.flags() | FLAG_B | FLAG_U;
                self.push(flags);
                self.registers.set_flag(FLAG_I);
                let low = self.read_mem(IRQ_VECTOR);
                let high = self.read_mem(IRQ_VECTOR.wrapping_add(1));
                self.registers.set_pc(u16::from_le_bytes([low, high]));
            }
            Instruction::Pha => {
                let a = self.registers.a();
                self.push(a);
            }
            Instruction::Php => {
                let flags = self.registers.flags() | FLAG_B | FLAG_U;
                self.push(flags);
            }
            Instruction::Pla => {
                let value = self.pull();
                self.registers.set_a(value);
                self.registers.derive_nz(value);
            }
            Instruction::Plp => self.pull_processor_flags(),
            Instruction::Tax => {
                let value = self.registers.a();
                self.registers.set_x(value);
                self.registers.derive_nz(value);
            }
            Instruction::Tay => {
                let value = self.registers.a();
                self.registers.set_y(value);
                self.registers.derive_nz(value);
            }
            Instruction::Txa => {
                let value = self.registers.x();
                self.registers.set_a(value);
                self.registers.derive_nz(value);
            }
            Instruction::Tya => {
                let value = self.registers.y();
                self.registers.set_a(value);
                self.registers.derive_nz(value);
            }
            Instruction::Tsx => {
                let value = self.registers.sp();
                self.registers.set_x(value);
                self.registers.derive_nz(value);
            }
            // the only transfer that does not derive N/Z
            Instruction::Txs => {
                let value = self.registers.x();
                self.registers.set_sp(value);
            }
            Instruction::Sec => self.registers.set_flag(FLAG_C),
            Instruction::Clc => self.registers.clear_flag(FLAG_C),
            Instruction::Sed => self.registers.set_flag(FLAG_D),
            Instruction::Cld => self.registers.clear_flag(FLAG_D),
            Instruction::Sei => self.registers.set_flag(FLAG_I),
            Instruction::Cli => self.registers.clear_flag(FLAG_I),
            Instruction::Clv => self.registers.clear_flag(FLAG_V),
            Instruction::Nop => {}
        }
    }

    /// Shared adder for ADC/SBC, decimal-aware.
    ///
    /// In decimal mode the operands are BCD-decoded before the add and
    /// the result re-encoded; carry tracks a raw sum above 99 (decimal)
    /// or 255 (binary). Overflow uses the signed test on the operands
    /// the adder actually summed.
    fn add_with_carry(&mut self, lhs: u8, rhs: u8) -> u8 {
        let carry_in = u16::from(self.registers.flag(FLAG_C));
        let decimal = self.registers.flag(FLAG_D);
        let (v1, v2) = if decimal {
            (from_bcd(lhs), from_bcd(rhs))
        } else {
            (lhs, rhs)
        };
        let sum = u16::from(v1) + u16::from(v2) + carry_in;
        let limit = if decimal { 99 } else { 0xFF };
        self.registers.update_flag(FLAG_C, sum > limit);
        let result = if decimal { to_bcd(sum) } else { sum as u8 };
        self.registers
            .update_flag(FLAG_V, (v1 ^ result) & (v2 ^ result) & 0x80 != 0);
        self.registers.derive_nz(result);
        result
    }

    fn compare(&mut self, register: u8, source: ValueSource, operand: u8) {
        let value = self.value_of(source, operand);
        let result = register.wrapping_sub(value);
        self.registers.derive_nz(result);
        self.registers.update_flag(FLAG_C, register >= value);
    }

    fn shift(&mut self, target: ShiftTarget, operand: u8, op: fn(&mut Self, u8) -> u8) {
        match target {
            ShiftTarget::Accumulator => {
                let value = self.registers.a();
                let result = op(self, value);
                self.registers.set_a(result);
            }
            ShiftTarget::Memory(mode) => {
                let addr = self.effective_address(mode, operand);
                let value = self.read_mem(addr);
                let result = op(self, value);
                self.write_mem(addr, result);
            }
        }
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.registers.update_flag(FLAG_C, value & 0x80 != 0);
        self.registers.derive_nz(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.registers.update_flag(FLAG_C, value & 0x01 != 0);
        self.registers.derive_nz(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.registers.flag(FLAG_C));
        let result = (value << 1) | carry_in;
        self.registers.update_flag(FLAG_C, value & 0x80 != 0);
        self.registers.derive_nz(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.registers.flag(FLAG_C));
        let result = (value >> 1) | (carry_in << 7);
        self.registers.update_flag(FLAG_C, value & 0x01 != 0);
        self.registers.derive_nz(result);
        result
    }

    fn modify_memory(&mut self, mode: AddressingMode, operand: u8, delta: u8) {
        let addr = self.effective_address(mode, operand);
        let value = self.read_mem(addr);
        let result = value.wrapping_add(delta);
        self.write_mem(addr, result);
        self.registers.derive_nz(result);
    }

    fn branch_on_flag(&mut self, operand: u8, mask: u8, branch_if: bool) {
        if self.registers.flag(mask) == branch_if {
            self.cycles += 1;
            let target = self.effective_address(AddressingMode::Relative, operand);
            self.registers.set_pc(target);
        }
    }

    fn push(&mut self, byte: u8) {
        self.write_mem(STACK_BASE + u16::from(self.registers.sp()), byte);
        self.registers
            .set_sp(self.registers.sp().wrapping_sub(1));
    }

    fn pull(&mut self) -> u8 {
        self.registers
            .set_sp(self.registers.sp().wrapping_add(1));
        self.read_mem(STACK_BASE + u16::from(self.registers.sp()))
    }

    /// Pushes `pc + offset` high byte first, so the bytes sit
    /// little-endian in the downward-growing stack.
    fn push_pc(&mut self, offset: i16) {
        let pc = self.registers.pc().wrapping_add_signed(offset);
        let [low, high] = pc.to_le_bytes();
        self.push(high);
        self.push(low);
    }

    fn return_subroutine(&mut self, offset: u16) {
        let low = self.pull();
        let high = self.pull();
        self.registers
            .set_pc(u16::from_le_bytes([low, high]).wrapping_add(offset));
    }

    /// Pulls the flags byte, keeping Break and Unused at their
    /// pre-pull values rather than what the stack holds.
    fn pull_processor_flags(&mut self) {
        let preserved = self.registers.flags() & (FLAG_B | FLAG_U);
        let pulled = self.pull();
        self.registers
            .set_flags((pulled & !(FLAG_B | FLAG_U)) | preserved);
    }
}

/// Decodes a packed BCD byte (each nibble one decimal digit).
const fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Packs a sum into BCD, discarding anything above 99.
const fn to_bcd(sum: u16) -> u8 {
    let value = (sum % 100) as u8;
    ((value / 10) << 4) | (value % 10)
}
