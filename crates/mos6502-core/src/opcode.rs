//! Deterministic opcode classification: the 256-entry decode table.
//!
//! Every defined opcode maps to an operation plus the way it sources
//! its operand. Pairings the hardware does not define are
//! unrepresentable: value-consuming operations carry a [`ValueSource`],
//! shift/rotate forms a [`ShiftTarget`], stores and read-modify-write
//! forms a bare [`AddressingMode`], and one-byte operations carry
//! nothing.

/// Index register selector for indexed addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// Index by the `X` register.
    X,
    /// Index by the `Y` register.
    Y,
}

/// How an operand byte resolves to an effective memory address.
///
/// Modes are interpreted by the processor, which charges a cycle for
/// each extra fetch or pointer read and a penalty cycle when an
/// indexed or relative computation crosses a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Address is the operand byte itself.
    ZeroPage,
    /// Operand plus index, wrapped within page zero.
    ZeroPageIndexed(Index),
    /// Operand is the low byte; one more fetch supplies the high byte.
    Absolute,
    /// Absolute address of a little-endian pointer to the target.
    AbsoluteIndirect,
    /// Absolute base plus index; page crossings cost one cycle.
    AbsoluteIndexed(Index),
    /// Pointer read from page zero at `(operand + X) mod 256`.
    IndexedIndirect,
    /// Pointer read from page zero at `operand`, then indexed by `Y`.
    IndirectIndexed,
    /// Signed displacement from the post-fetch program counter.
    Relative,
}

/// Operand source for value-consuming operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The operand byte is the value.
    Immediate,
    /// The value is read through the bus at the mode's address.
    Memory(AddressingMode),
}

/// Target of a shift/rotate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftTarget {
    /// Operate on the accumulator in place.
    Accumulator,
    /// Read-modify-write a memory cell.
    Memory(AddressingMode),
}

/// A decoded operation and its operand plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Instruction {
    Adc(ValueSource),
    And(ValueSource),
    Asl(ShiftTarget),
    Bcc,
    Bcs,
    Beq,
    Bit(AddressingMode),
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp(ValueSource),
    Cpx(ValueSource),
    Cpy(ValueSource),
    Dec(AddressingMode),
    Dex,
    Dey,
    Eor(ValueSource),
    Inc(AddressingMode),
    Inx,
    Iny,
    Jmp(AddressingMode),
    Jsr,
    Lda(ValueSource),
    Ldx(ValueSource),
    Ldy(ValueSource),
    Lsr(ShiftTarget),
    Nop,
    Ora(ValueSource),
    Pha,
    Php,
    Pla,
    Plp,
    Rol(ShiftTarget),
    Ror(ShiftTarget),
    Rti,
    Rts,
    Sbc(ValueSource),
    Sec,
    Sed,
    Sei,
    Sta(AddressingMode),
    Stx(AddressingMode),
    Sty(AddressingMode),
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Instruction {
    /// Returns `true` for the fixed set of one-byte encodings.
    ///
    /// The fetch stage always reads an operand byte; for these opcodes
    /// the program counter is stepped back afterwards and the byte is
    /// discarded.
    #[must_use]
    pub const fn is_one_byte(self) -> bool {
        matches!(
            self,
            Self::Asl(ShiftTarget::Accumulator)
                | Self::Lsr(ShiftTarget::Accumulator)
                | Self::Rol(ShiftTarget::Accumulator)
                | Self::Ror(ShiftTarget::Accumulator)
                | Self::Brk
                | Self::Clc
                | Self::Cld
                | Self::Cli
                | Self::Clv
                | Self::Dex
                | Self::Dey
                | Self::Inx
                | Self::Iny
                | Self::Nop
                | Self::Pha
                | Self::Php
                | Self::Pla
                | Self::Plp
                | Self::Rti
                | Self::Rts
                | Self::Sec
                | Self::Sed
                | Self::Sei
                | Self::Tax
                | Self::Tay
                | Self::Tsx
                | Self::Txa
                | Self::Txs
                | Self::Tya
        )
    }
}

/// Number of opcode values the hardware defines.
pub const DEFINED_OPCODE_COUNT: usize = 151;

/// Single source-of-truth decode table over all 256 opcode values.
///
/// `None` entries are illegal by definition and abort the tick.
#[allow(clippy::too_many_lines)]
pub const OPCODE_TABLE: [Option<Instruction>; 256] = build_opcode_table();

/// Returns the decoded form of `opcode`, or `None` for an undefined
/// encoding.
#[must_use]
pub const fn decode(opcode: u8) -> Option<Instruction> {
    OPCODE_TABLE[opcode as usize]
}

#[allow(clippy::too_many_lines)]
const fn build_opcode_table() -> [Option<Instruction>; 256] {
    use AddressingMode as Am;
    use Instruction as I;
    use ShiftTarget as St;
    use ValueSource as Vs;

    const ZP: Vs = Vs::Memory(Am::ZeroPage);
    const ZP_X: Vs = Vs::Memory(Am::ZeroPageIndexed(Index::X));
    const ZP_Y: Vs = Vs::Memory(Am::ZeroPageIndexed(Index::Y));
    const ABS: Vs = Vs::Memory(Am::Absolute);
    const ABS_X: Vs = Vs::Memory(Am::AbsoluteIndexed(Index::X));
    const ABS_Y: Vs = Vs::Memory(Am::AbsoluteIndexed(Index::Y));
    const IND_X: Vs = Vs::Memory(Am::IndexedIndirect);
    const IND_Y: Vs = Vs::Memory(Am::IndirectIndexed);

    let mut t: [Option<Instruction>; 256] = [None; 256];

    // ADC
    t[0x69] = Some(I::Adc(Vs::Immediate));
    t[0x65] = Some(I::Adc(ZP));
    t[0x75] = Some(I::Adc(ZP_X));
    t[0x6D] = Some(I::Adc(ABS));
    t[0x7D] = Some(I::Adc(ABS_X));
    t[0x79] = Some(I::Adc(ABS_Y));
    t[0x61] = Some(I::Adc(IND_X));
    t[0x71] = Some(I::Adc(IND_Y));

    // AND
    t[0x29] = Some(I::And(Vs::Immediate));
    t[0x25] = Some(I::And(ZP));
    t[0x35] = Some(I::And(ZP_X));
    t[0x2D] = Some(I::And(ABS));
    t[0x3D] = Some(I::And(ABS_X));
    t[0x39] = Some(I::And(ABS_Y));
    t[0x21] = Some(I::And(IND_X));
    t[0x31] = Some(I::And(IND_Y));

    // ASL
    t[0x0A] = Some(I::Asl(St::Accumulator));
    t[0x06] = Some(I::Asl(St::Memory(Am::ZeroPage)));
    t[0x16] = Some(I::Asl(St::Memory(Am::ZeroPageIndexed(Index::X))));
    t[0x0E] = Some(I::Asl(St::Memory(Am::Absolute)));
    t[0x1E] = Some(I::Asl(St::Memory(Am::AbsoluteIndexed(Index::X))));

    // branches
    t[0x90] = Some(I::Bcc);
    t[0xB0] = Some(I::Bcs);
    t[0xF0] = Some(I::Beq);
    t[0x30] = Some(I::Bmi);
    t[0xD0] = Some(I::Bne);
    t[0x10] = Some(I::Bpl);
    t[0x50] = Some(I::Bvc);
    t[0x70] = Some(I::Bvs);

    // BIT
    t[0x24] = Some(I::Bit(Am::ZeroPage));
    t[0x2C] = Some(I::Bit(Am::Absolute));

    // BRK
    t[0x00] = Some(I::Brk);

    // flag clears
    t[0x18] = Some(I::Clc);
    t[0xD8] = Some(I::Cld);
    t[0x58] = Some(I::Cli);
    t[0xB8] = Some(I::Clv);

    // CMP
    t[0xC9] = Some(I::Cmp(Vs::Immediate));
    t[0xC5] = Some(I::Cmp(ZP));
    t[0xD5] = Some(I::Cmp(ZP_X));
    t[0xCD] = Some(I::Cmp(ABS));
    t[0xDD] = Some(I::Cmp(ABS_X));
    t[0xD9] = Some(I::Cmp(ABS_Y));
    t[0xC1] = Some(I::Cmp(IND_X));
    t[0xD1] = Some(I::Cmp(IND_Y));

    // CPX / CPY
    t[0xE0] = Some(I::Cpx(Vs::Immediate));
    t[0xE4] = Some(I::Cpx(ZP));
    t[0xEC] = Some(I::Cpx(ABS));
    t[0xC0] = Some(I::Cpy(Vs::Immediate));
    t[0xC4] = Some(I::Cpy(ZP));
    t[0xCC] = Some(I::Cpy(ABS));

    // DEC / DEX / DEY
    t[0xC6] = Some(I::Dec(Am::ZeroPage));
    t[0xD6] = Some(I::Dec(Am::ZeroPageIndexed(Index::X)));
    t[0xCE] = Some(I::Dec(Am::Absolute));
    t[0xDE] = Some(I::Dec(Am::AbsoluteIndexed(Index::X)));
    t[0xCA] = Some(I::Dex);
    t[0x88] = Some(I::Dey);

    // EOR
    t[0x49] = Some(I::Eor(Vs::Immediate));
    t[0x45] = Some(I::Eor(ZP));
    t[0x55] = Some(I::Eor(ZP_X));
    t[0x4D] = Some(I::Eor(ABS));
    t[0x5D] = Some(I::Eor(ABS_X));
    t[0x59] = Some(I::Eor(ABS_Y));
    t[0x41] = Some(I::Eor(IND_X));
    t[0x51] = Some(I::Eor(IND_Y));

    // INC / INX / INY
    t[0xE6] = Some(I::Inc(Am::ZeroPage));
    t[0xF6] = Some(I::Inc(Am::ZeroPageIndexed(Index::X)));
    t[0xEE] = Some(I::Inc(Am::Absolute));
    t[0xFE] = Some(I::Inc(Am::AbsoluteIndexed(Index::X)));
    t[0xE8] = Some(I::Inx);
    t[0xC8] = Some(I::Iny);

    // JMP / JSR
    t[0x4C] = Some(I::Jmp(Am::Absolute));
    t[0x6C] = Some(I::Jmp(Am::AbsoluteIndirect));
    t[0x20] = Some(I::Jsr);

    // LDA
    t[0xA9] = Some(I::Lda(Vs::Immediate));
    t[0xA5] = Some(I::Lda(ZP));
    t[0xB5] = Some(I::Lda(ZP_X));
    t[0xAD] = Some(I::Lda(ABS));
    t[0xBD] = Some(I::Lda(ABS_X));
    t[0xB9] = Some(I::Lda(ABS_Y));
    t[0xA1] = Some(I::Lda(IND_X));
    t[0xB1] = Some(I::Lda(IND_Y));

    // LDX
    t[0xA2] = Some(I::Ldx(Vs::Immediate));
    t[0xA6] = Some(I::Ldx(ZP));
    t[0xB6] = Some(I::Ldx(ZP_Y));
    t[0xAE] = Some(I::Ldx(ABS));
    t[0xBE] = Some(I::Ldx(ABS_Y));

    // LDY
    t[0xA0] = Some(I::Ldy(Vs::Immediate));
    t[0xA4] = Some(I::Ldy(ZP));
    t[0xB4] = Some(I::Ldy(ZP_X));
    t[0xAC] = Some(I::Ldy(ABS));
    t[0xBC] = Some(I::Ldy(ABS_X));

    // LSR
    t[0x4A] = Some(I::Lsr(St::Accumulator));
    t[0x46] = Some(I::Lsr(St::Memory(Am::ZeroPage)));
    t[0x56] = Some(I::Lsr(St::Memory(Am::ZeroPageIndexed(Index::X))));
    t[0x4E] = Some(I::Lsr(St::Memory(Am::Absolute)));
    t[0x5E] = Some(I::Lsr(St::Memory(Am::AbsoluteIndexed(Index::X))));

    // NOP
    t[0xEA] = Some(I::Nop);

    // ORA
    t[0x09] = Some(I::Ora(Vs::Immediate));
    t[0x05] = Some(I::Ora(ZP));
    t[0x15] = Some(I::Ora(ZP_X));
    t[0x0D] = Some(I::Ora(ABS));
    t[0x1D] = Some(I::Ora(ABS_X));
    t[0x19] = Some(I::Ora(ABS_Y));
    t[0x01] = Some(I::Ora(IND_X));
    t[0x11] = Some(I::Ora(IND_Y));

    // stack
    t[0x48] = Some(I::Pha);
    t[0x08] = Some(I::Php);
    t[0x68] = Some(I::Pla);
    t[0x28] = Some(I::Plp);

    // ROL
    t[0x2A] = Some(I::Rol(St::Accumulator));
    t[0x26] = Some(I::Rol(St::Memory(Am::ZeroPage)));
    t[0x36] = Some(I::Rol(St::Memory(Am::ZeroPageIndexed(Index::X))));
    t[0x2E] = Some(I::Rol(St::Memory(Am::Absolute)));
    t[0x3E] = Some(I::Rol(St::Memory(Am::AbsoluteIndexed(Index::X))));

    // ROR
    t[0x6A] = Some(I::Ror(St::Accumulator));
    t[0x66] = Some(I::Ror(St::Memory(Am::ZeroPage)));
    t[0x76] = Some(I::Ror(St::Memory(Am::ZeroPageIndexed(Index::X))));
    t[0x6E] = Some(I::Ror(St::Memory(Am::Absolute)));
    t[0x7E] = Some(I::Ror(St::Memory(Am::AbsoluteIndexed(Index::X))));

    // returns
    t[0x40] = Some(I::Rti);
    t[0x60] = Some(I::Rts);

    // SBC
    t[0xE9] = Some(I::Sbc(Vs::Immediate));
    t[0xE5] = Some(I::Sbc(ZP));
    t[0xF5] = Some(I::Sbc(ZP_X));
    t[0xED] = Some(I::Sbc(ABS));
    t[0xFD] = Some(I::Sbc(ABS_X));
    t[0xF9] = Some(I::Sbc(ABS_Y));
    t[0xE1] = Some(I::Sbc(IND_X));
    t[0xF1] = Some(I::Sbc(IND_Y));

    // flag sets
    t[0x38] = Some(I::Sec);
    t[0xF8] = Some(I::Sed);
    t[0x78] = Some(I::Sei);

    // STA
    t[0x85] = Some(I::Sta(Am::ZeroPage));
    t[0x95] = Some(I::Sta(Am::ZeroPageIndexed(Index::X)));
    t[0x8D] = Some(I::Sta(Am::Absolute));
    t[0x9D] = Some(I::Sta(Am::AbsoluteIndexed(Index::X)));
    t[0x99] = Some(I::Sta(Am::AbsoluteIndexed(Index::Y)));
    t[0x81] = Some(I::Sta(Am::IndexedIndirect));
    t[0x91] = Some(I::Sta(Am::IndirectIndexed));

    // STX / STY
    t[0x86] = Some(I::Stx(Am::ZeroPage));
    t[0x96] = Some(I::Stx(Am::ZeroPageIndexed(Index::Y)));
    t[0x8E] = Some(I::Stx(Am::Absolute));
    t[0x84] = Some(I::Sty(Am::ZeroPage));
    t[0x94] = Some(I::Sty(Am::ZeroPageIndexed(Index::X)));
    t[0x8C] = Some(I::Sty(Am::Absolute));

    // transfers
    t[0xAA] = Some(I::Tax);
    t[0xA8] = Some(I::Tay);
    t[0xBA] = Some(I::Tsx);
    t[0x8A] = Some(I::Txa);
    t[0x9A] = Some(I::Txs);
    t[0x98] = Some(I::Tya);

    t
}
