//! Operand fetch and effective-address resolution.
//!
//! Each addressing mode consumes its operand bytes at PC and yields either
//! an effective address or a marker for the register/implied forms. The
//! immediate mode resolves to the address of the operand byte itself, so
//! every read-type instruction can simply read its operand address.

use emu_core::Bus;

use crate::opcodes::AddressingMode;
use crate::Mos6502;

/// Resolved operand of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// No operand.
    Implied,
    /// The instruction works on A.
    Accumulator,
    /// Effective address (for branches, the branch target).
    Address(u16),
}

impl<B: Bus> Mos6502<B> {
    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch(&mut self) -> u8 {
        let value = self.bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit word (little-endian) at PC.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let low = self.fetch();
        let high = self.fetch();
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit word from memory (little-endian), wrapping at $FFFF.
    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let low = self.bus.read(addr);
        let high = self.bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Read a pointer from page zero; the high byte wraps to $00.
    fn read_word_zero_page(&mut self, ptr: u8) -> u16 {
        let low = self.bus.read(u16::from(ptr));
        let high = self.bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit word with 6502 page boundary bug (for indirect JMP).
    /// If addr is $xxFF, high byte comes from $xx00 instead of $xx00+$100.
    pub(crate) fn read_word_page_bug(&mut self, addr: u16) -> u16 {
        let low = self.bus.read(addr);
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = self.bus.read(high_addr);
        u16::from_le_bytes([low, high])
    }

    /// Push a byte onto the stack.
    pub(crate) fn push(&mut self, value: u8) {
        let addr = self.regs.push();
        self.bus.write(addr, value);
    }

    /// Pull a byte from the stack.
    pub(crate) fn pull(&mut self) -> u8 {
        let addr = self.regs.pop();
        self.bus.read(addr)
    }

    /// Push a 16-bit word onto the stack (high byte first).
    pub(crate) fn push_word(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push(high);
        self.push(low);
    }

    /// Pull a 16-bit word from the stack (low byte first).
    pub(crate) fn pull_word(&mut self) -> u16 {
        let low = self.pull();
        let high = self.pull();
        u16::from_le_bytes([low, high])
    }

    /// Consume the operand bytes for `mode` and resolve them.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> Operand {
        let addr = match mode {
            AddressingMode::Implied => return Operand::Implied,
            AddressingMode::Accumulator => return Operand::Accumulator,
            AddressingMode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPage => u16::from(self.fetch()),
            AddressingMode::ZeroPageX => u16::from(self.fetch().wrapping_add(self.regs.x)),
            AddressingMode::ZeroPageY => u16::from(self.fetch().wrapping_add(self.regs.y)),
            AddressingMode::Absolute => self.fetch_word(),
            AddressingMode::AbsoluteX => self.fetch_word().wrapping_add(u16::from(self.regs.x)),
            AddressingMode::AbsoluteY => self.fetch_word().wrapping_add(u16::from(self.regs.y)),
            AddressingMode::Indirect => {
                let ptr = self.fetch_word();
                self.read_word_page_bug(ptr)
            }
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch().wrapping_add(self.regs.x);
                self.read_word_zero_page(ptr)
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch();
                self.read_word_zero_page(ptr)
                    .wrapping_add(u16::from(self.regs.y))
            }
            AddressingMode::Relative => {
                let offset = self.fetch() as i8;
                self.regs.pc.wrapping_add_signed(i16::from(offset))
            }
        };
        Operand::Address(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_at(pc: u16, bytes: &[u8]) -> Mos6502 {
        let mut cpu = Mos6502::new();
        cpu.bus_mut().load(pc, bytes);
        cpu.regs.pc = pc;
        cpu
    }

    #[test]
    fn immediate_points_at_operand() {
        let mut cpu = cpu_at(0x8001, &[0x42]);
        assert_eq!(cpu.resolve(AddressingMode::Immediate), Operand::Address(0x8001));
        assert_eq!(cpu.regs.pc, 0x8002);
    }

    #[test]
    fn zero_page_x_wraps_in_page_zero() {
        let mut cpu = cpu_at(0x0200, &[0xF0]);
        cpu.regs.x = 0x20;
        assert_eq!(cpu.resolve(AddressingMode::ZeroPageX), Operand::Address(0x0010));
    }

    #[test]
    fn absolute_y_wraps_at_top_of_memory() {
        let mut cpu = cpu_at(0x0200, &[0xFF, 0xFF]);
        cpu.regs.y = 0x02;
        assert_eq!(cpu.resolve(AddressingMode::AbsoluteY), Operand::Address(0x0001));
        assert_eq!(cpu.regs.pc, 0x0202);
    }

    #[test]
    fn indexed_indirect_pointer_wraps() {
        let mut cpu = cpu_at(0x0200, &[0xFE]);
        cpu.regs.x = 0x01;
        // Pointer at $FF/$00
        cpu.bus_mut().write(0x00FF, 0x34);
        cpu.bus_mut().write(0x0000, 0x12);
        assert_eq!(
            cpu.resolve(AddressingMode::IndexedIndirect),
            Operand::Address(0x1234)
        );
    }

    #[test]
    fn indirect_indexed_adds_y_after_lookup() {
        let mut cpu = cpu_at(0x0200, &[0x10]);
        cpu.regs.y = 0x10;
        cpu.bus_mut().write(0x0010, 0xF8);
        cpu.bus_mut().write(0x0011, 0x12);
        assert_eq!(
            cpu.resolve(AddressingMode::IndirectIndexed),
            Operand::Address(0x1308)
        );
    }

    #[test]
    fn indirect_jump_page_bug() {
        let mut cpu = cpu_at(0x0200, &[0xFF, 0x30]);
        cpu.bus_mut().write(0x30FF, 0x80);
        cpu.bus_mut().write(0x3000, 0x50);
        cpu.bus_mut().write(0x3100, 0x40);
        assert_eq!(cpu.resolve(AddressingMode::Indirect), Operand::Address(0x5080));
    }

    #[test]
    fn relative_is_signed_from_next_instruction() {
        let mut cpu = cpu_at(0x8001, &[0xFC]);
        assert_eq!(cpu.resolve(AddressingMode::Relative), Operand::Address(0x7FFE));

        let mut cpu = cpu_at(0x8001, &[0x05]);
        assert_eq!(cpu.resolve(AddressingMode::Relative), Operand::Address(0x8007));
    }

    #[test]
    fn stack_word_round_trip_order() {
        let mut cpu = Mos6502::new();
        cpu.regs.s = 0xFF;
        cpu.push_word(0x1234);
        assert_eq!(cpu.peek(0x01FF), 0x12);
        assert_eq!(cpu.peek(0x01FE), 0x34);
        assert_eq!(cpu.regs.s, 0xFD);
        assert_eq!(cpu.pull_word(), 0x1234);
        assert_eq!(cpu.regs.s, 0xFF);
    }
}
