//! CLI entry point for the 6502 machine runner binary.
//!
//! Assembles the reference machine (RAM, console port, ROM), boots the
//! processor from the ROM's reset vector, and paces execution against
//! the wall clock at the requested rate. The run ends when the program
//! parks in a self-loop, when the user presses Ctrl-C or Escape, or
//! when the processor fetches an undefined opcode.

mod pacer;
mod terminal;

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use mos6502_core::{Console, Cpu, MemoryMap, Ram, Rom, TraceFrame, TraceSink};

use crate::pacer::Pacer;
use crate::terminal::{Pump, Terminal};

const RAM_END: u16 = 0x6FFF;
const CONSOLE_START: u16 = 0x7000;
const CONSOLE_END: u16 = 0x7FFF;
const ROM_START: u16 = 0x8000;
const ROM_SIZE: usize = 0x8000;

/// Instruction-level 6502 machine runner.
#[derive(Debug, Parser)]
#[clap(name = "mos6502-run", version, about)]
struct Args {
    /// ROM image mapped at $8000 (at most 32 KiB, zero padded).
    rom: PathBuf,

    /// Target clock rate in cycles per second.
    #[clap(long, default_value_t = 1_000_000)]
    hz: u64,

    /// Bytes queued on the console input port before the first tick.
    #[clap(long)]
    input: Option<String>,

    /// Print one register frame per instruction to stderr.
    #[clap(long)]
    trace: bool,
}

/// Stderr sink for `--trace`; `\r\n` keeps raw-mode lines aligned.
struct StderrTrace {
    raw: bool,
}

impl TraceSink for StderrTrace {
    fn on_frame(&mut self, frame: &TraceFrame) {
        if self.raw {
            eprint!("{frame}\r\n");
        } else {
            eprintln!("{frame}");
        }
    }
}

fn load_rom(path: &Path) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    if bytes.len() > ROM_SIZE {
        return Err(format!(
            "ROM image is {} bytes; the window holds {ROM_SIZE}",
            bytes.len()
        ));
    }
    let mut image = bytes;
    image.resize(ROM_SIZE, 0x00);
    Ok(image)
}

fn build_machine(image: Vec<u8>) -> (Cpu<MemoryMap>, Rc<RefCell<Console>>) {
    let console = Rc::new(RefCell::new(Console::new()));
    let map = MemoryMap::new()
        .with(0x0000, RAM_END, Box::new(Ram::new(usize::from(RAM_END) + 1)))
        .with(CONSOLE_START, CONSOLE_END, Box::new(Rc::clone(&console)))
        .with(ROM_START, 0xFFFF, Box::new(Rom::new(image)));
    (Cpu::new(map), console)
}

fn run(args: &Args) -> Result<(), String> {
    if args.hz == 0 {
        return Err("--hz must be at least 1".to_string());
    }

    let image = load_rom(&args.rom)?;
    let (mut cpu, console) = build_machine(image);
    if let Some(input) = &args.input {
        console.borrow_mut().push_input_str(input);
    }
    let mut terminal = Terminal::new();
    if args.trace {
        cpu.set_trace_sink(Box::new(StderrTrace {
            raw: terminal.is_raw(),
        }));
    }

    let mut pacer = Pacer::new(args.hz);
    let mut halted = false;

    while !halted {
        let pump = terminal
            .pump_input(&mut console.borrow_mut())
            .map_err(|e| format!("terminal input failed: {e}"))?;
        if pump == Pump::Quit {
            break;
        }

        // catch up to where the wall clock says we should be
        let expected = pacer.expected();
        while pacer.executed() < expected {
            let before = cpu.program_counter();
            match cpu.tick(args.trace) {
                Ok(cycles) => pacer.record(cycles),
                Err(err) => {
                    terminal
                        .flush_output(&console.borrow_mut().take_output())
                        .map_err(|e| format!("terminal output failed: {e}"))?;
                    return Err(err.to_string());
                }
            }
            if cpu.program_counter() == before {
                // jump-to-self: the program is done
                halted = true;
                break;
            }
        }

        terminal
            .flush_output(&console.borrow_mut().take_output())
            .map_err(|e| format!("terminal output failed: {e}"))?;
        pacer.rest();
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_machine, Args, ROM_SIZE, ROM_START};
    use clap::Parser;

    fn image_with(program: &[u8]) -> Vec<u8> {
        let mut image = vec![0x00; ROM_SIZE];
        image[..program.len()].copy_from_slice(program);
        image[0x7FFC..0x7FFE].copy_from_slice(&ROM_START.to_le_bytes());
        image
    }

    #[test]
    fn args_default_to_one_megahertz_without_tracing() {
        let args = Args::parse_from(["mos6502-run", "demo.bin"]);
        assert_eq!(args.hz, 1_000_000);
        assert!(!args.trace);
        assert!(args.input.is_none());
    }

    #[test]
    fn machine_boots_from_the_rom_reset_vector() {
        let (cpu, _console) = build_machine(image_with(&[0xEA]));
        assert_eq!(cpu.program_counter(), 0x8000);
    }

    #[test]
    fn console_port_is_reachable_from_the_program() {
        // LDA #$68 / STA $7000 / JMP self
        let (mut cpu, console) = build_machine(image_with(&[
            0xA9, 0x68, 0x8D, 0x00, 0x70, 0x4C, 0x05, 0x80,
        ]));

        cpu.tick(false).unwrap();
        cpu.tick(false).unwrap();
        let before = cpu.program_counter();
        cpu.tick(false).unwrap();

        assert_eq!(console.borrow_mut().take_output(), b"h");
        assert_eq!(cpu.program_counter(), before);
    }
}
