//! The CPU core: state, program loading and the run loop.

use std::fmt::{self, Write as _};
use std::ops::RangeInclusive;

use emu_core::{Bus, Cpu, Observable, Ram, Value};
use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::execute::Flow;
use crate::flags::{C, D, I, N, V, Z};
use crate::opcodes;
use crate::{CpuConfig, Registers, Status};

/// Address of the little-endian reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Nominal cycles charged for an undocumented opcode skipped as a no-op.
const UNKNOWN_OPCODE_CYCLES: u32 = 2;

type DiagnosticHook = Box<dyn FnMut(&Error)>;

/// The MOS 6502 core.
///
/// Owns the registers and the whole 64 KiB address space (through `B`,
/// flat [`Ram`] unless the host supplies its own bus). All state starts at
/// zero. Nothing here is shared: one core, one session.
pub struct Mos6502<B: Bus = Ram> {
    pub(crate) regs: Registers,
    pub(crate) bus: B,
    config: CpuConfig,
    halted: bool,
    /// Instructions executed since construction (for debugging).
    instructions: u64,
    diagnostic: Option<DiagnosticHook>,
}

impl Mos6502<Ram> {
    /// Create a core with default configuration and zeroed RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CpuConfig) -> Self {
        Self::with_bus(Ram::new(), config)
    }
}

impl Default for Mos6502<Ram> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus> Mos6502<B> {
    /// Create a core on a host-supplied bus.
    pub fn with_bus(bus: B, config: CpuConfig) -> Self {
        Self {
            regs: Registers::new(),
            bus,
            config,
            halted: false,
            instructions: 0,
            diagnostic: None,
        }
    }

    // =========================================================================
    // Program loading
    // =========================================================================

    /// Copy `program` to the load address and point PC at it.
    ///
    /// Fails without touching memory or PC if the program runs past $FFFF.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let capacity = self.config.capacity();
        if program.len() > capacity {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                capacity,
            });
        }

        let base = self.config.load_address;
        self.bus.load(base, program);
        self.regs.pc = base;
        self.halted = false;
        debug!("loaded {} bytes at ${base:04X}", program.len());
        Ok(())
    }

    /// Load, point the reset vector at the program, reset and run.
    ///
    /// The program may not reach into the reset vector at $FFFC.
    pub fn load_and_run(&mut self, program: &[u8]) -> Result<u64> {
        let base = self.config.load_address;
        let capacity = (RESET_VECTOR as usize).saturating_sub(base as usize);
        if program.len() > capacity {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                capacity,
            });
        }

        self.load(program)?;
        let [low, high] = base.to_le_bytes();
        self.bus.write(RESET_VECTOR, low);
        self.bus.write(RESET_VECTOR.wrapping_add(1), high);
        self.reset();
        self.run()
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run until `BRK`. Returns the number of instructions executed,
    /// counting the `BRK`.
    ///
    /// Fails with [`Error::StepLimitExceeded`] if a step limit is configured
    /// and reached first; the core is left where it stopped.
    pub fn run(&mut self) -> Result<u64> {
        self.run_with_callback(|_| {})
    }

    /// Like [`run`](Self::run), calling `callback` before every fetch.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<u64>
    where
        F: FnMut(&Self),
    {
        let mut executed: u64 = 0;
        while !self.halted {
            if let Some(limit) = self.config.step_limit.filter(|&limit| executed >= limit) {
                warn!("step limit of {limit} reached at ${:04X}", self.regs.pc);
                return Err(Error::StepLimitExceeded { limit });
            }
            callback(self);
            self.execute_next();
            executed += 1;
        }
        Ok(executed)
    }

    /// Fetch, decode and execute one instruction. Returns nominal cycles.
    fn execute_next(&mut self) -> u32 {
        let address = self.regs.pc;
        let code = self.fetch();
        trace!("${address:04X}: {code:02X}  {}", self.regs);
        self.instructions += 1;

        let Some(opcode) = opcodes::lookup(code) else {
            self.report(&Error::UnknownOpcode {
                opcode: code,
                address,
            });
            return UNKNOWN_OPCODE_CYCLES;
        };

        let operand = self.resolve(opcode.mode);
        if self.execute(opcode, operand) == Flow::Halt {
            self.halted = true;
            debug!("BRK at ${address:04X}, halted: {}", self.regs);
        }
        u32::from(opcode.cycles)
    }

    fn report(&mut self, error: &Error) {
        warn!("{error}; skipped");
        if let Some(hook) = self.diagnostic.as_mut() {
            hook(error);
        }
    }

    /// Install a hook that receives advisory diagnostics (unknown opcodes).
    ///
    /// Replaces any previous hook.
    pub fn on_diagnostic(&mut self, hook: impl FnMut(&Error) + 'static) {
        self.diagnostic = Some(Box::new(hook));
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    #[must_use]
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    #[must_use]
    pub fn sp(&self) -> u8 {
        self.regs.s
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.regs.p
    }

    /// Instructions executed since construction, unknown opcodes included.
    #[must_use]
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Read memory without side effects.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Replace the register file, e.g. to start from a known state.
    pub fn set_registers(&mut self, regs: Registers) {
        self.regs = regs;
    }

    /// Hex dump of `range`, 16 bytes per line, each line prefixed by its
    /// address.
    #[must_use]
    pub fn dump_memory(&self, range: RangeInclusive<u16>) -> String {
        let mut out = String::new();
        let (start, end) = (u32::from(*range.start()), u32::from(*range.end()));
        let mut line = start;
        while line <= end {
            let last = (line + 15).min(end);
            let _ = write!(out, "{line:04X}:");
            for addr in line..=last {
                let _ = write!(out, " {:02X}", self.bus.peek(addr as u16));
            }
            out.push('\n');
            line = last + 1;
        }
        out
    }
}

impl<B: Bus> fmt::Debug for Mos6502<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mos6502")
            .field("regs", &self.regs)
            .field("config", &self.config)
            .field("halted", &self.halted)
            .field("instructions", &self.instructions)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl<B: Bus> Cpu for Mos6502<B> {
    type Registers = Registers;
    type Error = Error;

    fn step(&mut self) -> Result<u32> {
        if self.halted {
            return Ok(0);
        }
        Ok(self.execute_next())
    }

    /// A, X, Y and P cleared, SP at $FD, PC from the reset vector.
    fn reset(&mut self) {
        let pc = self.read_word(RESET_VECTOR);
        self.regs = Registers::after_reset(pc);
        self.halted = false;
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }
}

impl<B: Bus> Observable for Mos6502<B> {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "instructions" => Some(self.instructions.into()),
            "halted" => Some(self.halted.into()),
            _ => path
                .strip_prefix("mem.")
                .and_then(|addr| u16::from_str_radix(addr.trim_start_matches('$'), 16).ok())
                .map(|addr| self.bus.peek(addr).into()),
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "instructions",
            "halted",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_core_is_zeroed() {
        let cpu = Mos6502::new();
        assert_eq!(cpu.registers(), Registers::new());
        assert!(!cpu.is_halted());
        assert!(cpu.bus().as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn step_returns_nominal_cycles() {
        let mut cpu = Mos6502::new();
        cpu.load(&[0xA9, 0x42, 0x8D, 0x00, 0x02, 0x00]).unwrap();
        assert_eq!(cpu.step().unwrap(), 2);
        assert_eq!(cpu.step().unwrap(), 4);
        assert_eq!(cpu.step().unwrap(), 7);
        assert!(cpu.is_halted());
        assert_eq!(cpu.step().unwrap(), 0);
        assert_eq!(cpu.pc(), 0x8006);
    }

    #[test]
    fn unknown_opcode_step_costs_two_cycles() {
        let mut cpu = Mos6502::new();
        cpu.load(&[0x02]).unwrap();
        assert_eq!(cpu.step().unwrap(), UNKNOWN_OPCODE_CYCLES);
        assert_eq!(cpu.pc(), 0x8001);
    }

    #[test]
    fn reset_reads_vector() {
        let mut cpu = Mos6502::new();
        cpu.bus_mut().write(0xFFFC, 0x34);
        cpu.bus_mut().write(0xFFFD, 0x12);
        cpu.regs.a = 9;
        cpu.regs.p = Status(0xFF);
        cpu.reset();
        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.status(), Status::new());
    }

    #[test]
    fn query_paths_all_resolve() {
        let cpu = Mos6502::new();
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
    }

    #[test]
    fn query_memory() {
        let mut cpu = Mos6502::new();
        cpu.bus_mut().write(0x0200, 0x99);
        assert_eq!(cpu.query("mem.0200"), Some(Value::U8(0x99)));
        assert_eq!(cpu.query("mem.$0200"), Some(Value::U8(0x99)));
        assert_eq!(cpu.query("mem.zz"), None);
        assert_eq!(cpu.query("nope"), None);
    }

    #[test]
    fn dump_memory_lines() {
        let mut cpu = Mos6502::new();
        cpu.load(&[0xA9, 0x01, 0x00]).unwrap();
        let dump = cpu.dump_memory(0x8000..=0x8011);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("8000: A9 01 00 00"));
        assert_eq!(lines[0].split(' ').count(), 17);
        assert_eq!(lines[1], "8010: 00 00");
    }

    #[test]
    fn dump_memory_top_of_memory() {
        let cpu = Mos6502::new();
        assert_eq!(cpu.dump_memory(0xFFFE..=0xFFFF), "FFFE: 00 00\n");
        #[allow(clippy::reversed_empty_ranges)]
        let empty = cpu.dump_memory(0x10..=0x0F);
        assert_eq!(empty, "");
    }
}
