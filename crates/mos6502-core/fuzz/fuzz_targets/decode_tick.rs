#![no_main]

use mos6502_core::{decode, Cpu, Ram};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let _ = decode(data[0]);

    // scatter the corpus across the whole address space, point the
    // reset vector at it, and run a bounded burst; no input may panic
    let mut ram = Ram::new(0x1_0000);
    ram.load(0x0200, data);
    ram.load(0xFFFC, &0x0200_u16.to_le_bytes());

    let mut cpu = Cpu::new(ram);
    for _ in 0..32 {
        if cpu.tick(false).is_err() {
            break;
        }
    }
});
