//! Instruction-level MOS 6502 core.
//!
//! Executes one whole instruction per step: fetch the opcode at PC, decode
//! it through a 256-entry table, resolve the operand for its addressing
//! mode, then apply the instruction. There is no cycle-by-cycle bus model
//! and no interrupt handling; the table records nominal cycle counts only.
//!
//! `BRK` ($00) halts the run loop. Opcodes without a table entry are
//! skipped as one-byte no-ops and reported to the diagnostic hook.
//!
//! ```
//! use cpu_6502::Mos6502;
//!
//! let mut cpu = Mos6502::new();
//! cpu.load(&[0xA9, 0xFE, 0xAA, 0xE8, 0x00])?; // LDA #$FE; TAX; INX; BRK
//! cpu.run()?;
//! assert_eq!(cpu.x(), 0xFF);
//! # Ok::<(), cpu_6502::Error>(())
//! ```

mod addressing;
mod config;
mod cpu;
mod error;
mod execute;
pub mod flags;
pub mod opcodes;
mod registers;

pub use config::{CpuConfig, DEFAULT_LOAD_ADDRESS};
pub use cpu::{Mos6502, RESET_VECTOR};
pub use emu_core::{Bus, Cpu, Observable, Ram, Value};
pub use error::{Error, Result};
pub use flags::Status;
pub use opcodes::{AddressingMode, Mnemonic, Opcode};
pub use registers::Registers;
