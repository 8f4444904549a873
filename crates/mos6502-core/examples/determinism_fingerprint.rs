//! Deterministic execution fingerprint generator used for cross-host
//! comparison: same binary, same program, same hash.

use mos6502_core::{Console, Cpu, MemoryMap, Ram, Rom, TraceFrame, TraceSink};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use std::cell::RefCell;
use std::rc::Rc;

/// Exercises arithmetic (binary and decimal), shifts, the stack, a
/// subroutine, and console I/O before parking in a self-loop.
const PROGRAM: &[u8] = &[
    0xA2, 0xFF, //       LDX #$FF
    0x9A, //             TXS
    0xA9, 0x19, //       LDA #$19
    0xF8, //             SED
    0x18, //             CLC
    0x69, 0x27, //       ADC #$27 (BCD 19 + 27 = 46)
    0xD8, //             CLD
    0x48, //             PHA
    0x0A, //             ASL A
    0x20, 0x16, 0x80, // JSR $8016
    0x68, //             PLA
    0x8D, 0x00, 0x70, // STA $7000
    0x4C, 0x13, 0x80, // JMP $8013 (self-loop)
    0xE8, //             $8016: INX
    0x60, //             RTS
];

struct Fingerprint(Rc<RefCell<u64>>);

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

impl TraceSink for Fingerprint {
    fn on_frame(&mut self, frame: &TraceFrame) {
        let mut hash = self.0.borrow_mut();
        hash_bytes(&mut hash, &frame.initial_pc.to_le_bytes());
        hash_bytes(&mut hash, &frame.pc.to_le_bytes());
        hash_bytes(
            &mut hash,
            &[
                frame.sp,
                frame.a,
                frame.x,
                frame.y,
                frame.flags,
                frame.opcode,
                frame.operand,
            ],
        );
    }
}

fn fingerprint() -> String {
    let mut image = vec![0x00; 0x8000];
    image[..PROGRAM.len()].copy_from_slice(PROGRAM);
    image[0x7FFC..0x7FFE].copy_from_slice(&0x8000_u16.to_le_bytes());

    let console = Rc::new(RefCell::new(Console::new()));
    let map = MemoryMap::new()
        .with(0x0000, 0x6FFF, Box::new(Ram::new(0x7000)))
        .with(0x7000, 0x7FFF, Box::new(Rc::clone(&console)))
        .with(0x8000, 0xFFFF, Box::new(Rom::new(image)));

    let hash = Rc::new(RefCell::new(0xcbf2_9ce4_8422_2325_u64));
    let mut cpu = Cpu::new(map);
    cpu.set_trace_sink(Box::new(Fingerprint(Rc::clone(&hash))));

    let mut total_cycles = 0_u64;
    for _ in 0..64 {
        match cpu.tick(true) {
            Ok(cycles) => total_cycles += u64::from(cycles),
            Err(err) => {
                eprintln!("unexpected fault: {err}");
                break;
            }
        }
    }

    let mut hash = *hash.borrow();
    hash_bytes(&mut hash, &total_cycles.to_le_bytes());
    hash_bytes(&mut hash, &console.borrow_mut().take_output());
    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
