//! 6502 CPU registers.

use std::fmt;

use crate::Status;

/// Base of the hardware stack page.
pub(crate) const STACK_PAGE: u16 = 0x0100;

/// Stack pointer value after `reset`.
pub(crate) const STACK_RESET: u8 = 0xFD;

/// 6502 CPU register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - S: 8-bit stack pointer (stack is at $0100-$01FF)
/// - PC: 16-bit program counter
/// - P: 8-bit processor status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (points to next free location).
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Registers {
    /// All registers zero, as on construction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0,
            pc: 0,
            p: Status::new(),
        }
    }

    /// Registers after `reset`, with PC taken from the reset vector.
    #[must_use]
    pub const fn after_reset(pc: u16) -> Self {
        Self {
            s: STACK_RESET,
            pc,
            ..Self::new()
        }
    }

    /// Push a value onto the stack, return the address written.
    pub(crate) fn push(&mut self) -> u16 {
        let addr = STACK_PAGE | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Pop a value from the stack, return the address to read.
    pub(crate) fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        STACK_PAGE | u16::from(self.s)
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} PC:{:04X} P:{:02X} [{}]",
            self.a, self.x, self.y, self.s, self.pc, self.p.0, self.p
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{N, Z};

    #[test]
    fn stack_wraps_within_page_one() {
        let mut regs = Registers::new();
        assert_eq!(regs.push(), 0x0100);
        assert_eq!(regs.s, 0xFF);
        assert_eq!(regs.pop(), 0x0100);
        assert_eq!(regs.s, 0x00);
        assert_eq!(regs.pop(), 0x0101);
    }

    #[test]
    fn after_reset() {
        let regs = Registers::after_reset(0x8000);
        assert_eq!(regs.s, 0xFD);
        assert_eq!(regs.pc, 0x8000);
        assert_eq!(regs.p, Status::new());
    }

    #[test]
    fn display() {
        let regs = Registers {
            a: 0xFE,
            x: 0xFF,
            y: 0,
            s: 0xFD,
            pc: 0x8005,
            p: Status(N | Z),
        };
        assert_eq!(
            regs.to_string(),
            "A:FE X:FF Y:00 SP:FD PC:8005 P:82 [N.....Z.]"
        );
    }
}
