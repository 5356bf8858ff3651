//! Table-driven program tests.
//!
//! Each case in `tests/data/programs.json` names a program, optional
//! initial RAM, and the register and memory state expected after it runs
//! to `BRK`.

use std::fs;
use std::path::Path;

use cpu_6502::{Bus, Cpu, CpuConfig, DEFAULT_LOAD_ADDRESS, Mos6502};
use serde::Deserialize;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    #[serde(default = "default_load_address")]
    load_address: u16,
    #[serde(default)]
    ram: Vec<(u16, u8)>,
    program: Vec<u8>,
    instructions: u64,
    #[serde(rename = "final")]
    final_state: CpuState,
}

/// Expected CPU state after the program halts.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn default_load_address() -> u16 {
    DEFAULT_LOAD_ADDRESS
}

/// Compare the core against expected, returning a list of mismatches.
fn compare(cpu: &Mos6502, expected: &CpuState) -> Vec<String> {
    let regs = cpu.registers();
    let mut errors = Vec::new();

    if regs.pc != expected.pc {
        errors.push(format!("PC: got ${:04X}, want ${:04X}", regs.pc, expected.pc));
    }
    for (name, got, want) in [
        ("S", regs.s, expected.s),
        ("A", regs.a, expected.a),
        ("X", regs.x, expected.x),
        ("Y", regs.y, expected.y),
    ] {
        if got != want {
            errors.push(format!("{name}: got ${got:02X}, want ${want:02X}"));
        }
    }

    let actual_p = regs.p.bits();
    if actual_p != expected.p {
        errors.push(format!(
            "P: got ${actual_p:02X} ({actual_p:08b}), want ${:02X} ({:08b})",
            expected.p, expected.p
        ));
    }

    for &(addr, want) in &expected.ram {
        let got = cpu.peek(addr);
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }

    errors
}

#[test]
fn run_program_fixtures() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/programs.json");
    let data = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!("Failed to read {}: {e}", path.display());
    });
    let cases: Vec<TestCase> = serde_json::from_str(&data).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {e}", path.display());
    });
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in &cases {
        let config = CpuConfig::new()
            .with_load_address(case.load_address)
            .with_step_limit(100_000);
        let mut cpu = Mos6502::with_config(config);
        for &(addr, value) in &case.ram {
            cpu.bus_mut().write(addr, value);
        }
        cpu.load(&case.program).expect("program fits");

        match cpu.run() {
            Ok(executed) if executed != case.instructions => failures.push(format!(
                "{}: executed {executed} instructions, want {}",
                case.name, case.instructions
            )),
            Ok(_) => {}
            Err(e) => failures.push(format!("{}: {e}", case.name)),
        }

        let errors = compare(&cpu, &case.final_state);
        if !errors.is_empty() {
            failures.push(format!("{}: {}", case.name, errors.join("; ")));
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}
