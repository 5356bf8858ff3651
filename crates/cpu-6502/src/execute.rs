//! Instruction semantics.
//!
//! `execute` receives a decoded table entry with its operand already
//! resolved and applies the effect. Handlers never touch PC except to
//! transfer control; operand bytes were consumed during resolution.

use emu_core::Bus;

use crate::addressing::Operand;
use crate::flags::{C, D, I, N, V, Z};
use crate::opcodes::{Mnemonic, Opcode};
use crate::Mos6502;

/// What the run loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Halt,
}

impl<B: Bus> Mos6502<B> {
    /// Read the operand value: A for accumulator forms, memory otherwise.
    fn operand_value(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => self.bus.read(addr),
            Operand::Accumulator | Operand::Implied => self.regs.a,
        }
    }

    fn operand_address(operand: Operand) -> u16 {
        match operand {
            Operand::Address(addr) => addr,
            // The table never pairs these modes with a memory instruction.
            Operand::Accumulator | Operand::Implied => 0,
        }
    }

    /// Read-modify-write on A or memory.
    fn modify(&mut self, operand: Operand, f: impl FnOnce(&mut Self, u8) -> u8) {
        match operand {
            Operand::Address(addr) => {
                let value = self.bus.read(addr);
                let result = f(self, value);
                self.bus.write(addr, result);
            }
            Operand::Accumulator | Operand::Implied => {
                let value = self.regs.a;
                self.regs.a = f(self, value);
            }
        }
    }

    fn branch(&mut self, operand: Operand, condition: bool) {
        if condition {
            self.regs.pc = Self::operand_address(operand);
        }
    }

    pub(crate) fn execute(&mut self, opcode: &Opcode, operand: Operand) -> Flow {
        match opcode.mnemonic {
            // =================================================================
            // Load/Store
            // =================================================================
            Mnemonic::Lda => {
                self.regs.a = self.operand_value(operand);
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Ldx => {
                self.regs.x = self.operand_value(operand);
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Ldy => {
                self.regs.y = self.operand_value(operand);
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Sta => self.bus.write(Self::operand_address(operand), self.regs.a),
            Mnemonic::Stx => self.bus.write(Self::operand_address(operand), self.regs.x),
            Mnemonic::Sty => self.bus.write(Self::operand_address(operand), self.regs.y),

            // =================================================================
            // Transfers
            // =================================================================
            Mnemonic::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            // TXS does not affect flags
            Mnemonic::Txs => self.regs.s = self.regs.x,

            // =================================================================
            // Stack
            // =================================================================
            Mnemonic::Pha => self.push(self.regs.a),
            Mnemonic::Php => self.push(self.regs.p.to_byte_php()),
            Mnemonic::Pla => {
                self.regs.a = self.pull();
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Plp => {
                let value = self.pull();
                self.regs.p.load_pulled(value);
            }

            // =================================================================
            // Arithmetic
            // =================================================================
            Mnemonic::Adc => {
                let value = self.operand_value(operand);
                self.adc(value);
            }
            Mnemonic::Sbc => {
                let value = self.operand_value(operand);
                self.sbc(value);
            }
            Mnemonic::Inc => self.modify(operand, |cpu, value| {
                let result = value.wrapping_add(1);
                cpu.regs.p.update_nz(result);
                result
            }),
            Mnemonic::Dec => self.modify(operand, |cpu, value| {
                let result = value.wrapping_sub(1);
                cpu.regs.p.update_nz(result);
                result
            }),
            Mnemonic::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }

            // =================================================================
            // Logic
            // =================================================================
            Mnemonic::And => {
                let value = self.operand_value(operand);
                self.regs.a &= value;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Ora => {
                let value = self.operand_value(operand);
                self.regs.a |= value;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Eor => {
                let value = self.operand_value(operand);
                self.regs.a ^= value;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Bit => {
                let value = self.operand_value(operand);
                self.bit(value);
            }

            // =================================================================
            // Shifts and rotates
            // =================================================================
            Mnemonic::Asl => self.modify(operand, Self::asl),
            Mnemonic::Lsr => self.modify(operand, Self::lsr),
            Mnemonic::Rol => self.modify(operand, Self::rol),
            Mnemonic::Ror => self.modify(operand, Self::ror),

            // =================================================================
            // Compare
            // =================================================================
            Mnemonic::Cmp => {
                let value = self.operand_value(operand);
                self.compare(self.regs.a, value);
            }
            Mnemonic::Cpx => {
                let value = self.operand_value(operand);
                self.compare(self.regs.x, value);
            }
            Mnemonic::Cpy => {
                let value = self.operand_value(operand);
                self.compare(self.regs.y, value);
            }

            // =================================================================
            // Branches
            // =================================================================
            Mnemonic::Bcc => self.branch(operand, !self.regs.p.is_set(C)),
            Mnemonic::Bcs => self.branch(operand, self.regs.p.is_set(C)),
            Mnemonic::Bne => self.branch(operand, !self.regs.p.is_set(Z)),
            Mnemonic::Beq => self.branch(operand, self.regs.p.is_set(Z)),
            Mnemonic::Bpl => self.branch(operand, !self.regs.p.is_set(N)),
            Mnemonic::Bmi => self.branch(operand, self.regs.p.is_set(N)),
            Mnemonic::Bvc => self.branch(operand, !self.regs.p.is_set(V)),
            Mnemonic::Bvs => self.branch(operand, self.regs.p.is_set(V)),

            // =================================================================
            // Jumps
            // =================================================================
            Mnemonic::Jmp => self.regs.pc = Self::operand_address(operand),
            Mnemonic::Jsr => {
                // Push PC-1 (address of last byte of JSR)
                self.push_word(self.regs.pc.wrapping_sub(1));
                self.regs.pc = Self::operand_address(operand);
            }
            Mnemonic::Rts => {
                self.regs.pc = self.pull_word().wrapping_add(1);
            }
            Mnemonic::Rti => {
                let value = self.pull();
                self.regs.p.load_pulled(value);
                self.regs.pc = self.pull_word();
            }

            // =================================================================
            // Flags
            // =================================================================
            Mnemonic::Clc => self.regs.p.clear(C),
            Mnemonic::Sec => self.regs.p.set(C),
            Mnemonic::Cli => self.regs.p.clear(I),
            Mnemonic::Sei => self.regs.p.set(I),
            Mnemonic::Cld => self.regs.p.clear(D),
            Mnemonic::Sed => self.regs.p.set(D),
            Mnemonic::Clv => self.regs.p.clear(V),

            Mnemonic::Nop => {}
            Mnemonic::Brk => return Flow::Halt,
        }
        Flow::Continue
    }

    // =========================================================================
    // ALU operations
    // =========================================================================

    /// ADC - Add with Carry. Binary only: the 2A03 has no decimal mode.
    fn adc(&mut self, value: u8) {
        let carry = u16::from(self.regs.p.is_set(C));
        let result = u16::from(self.regs.a) + u16::from(value) + carry;
        let result8 = result as u8;

        self.regs.p.set_if(C, result > 0xFF);
        self.regs
            .p
            .set_if(V, (self.regs.a ^ result8) & (value ^ result8) & 0x80 != 0);
        self.regs.a = result8;
        self.regs.p.update_nz(result8);
    }

    /// SBC - Subtract with Carry (borrow). A - M - !C is A + !M + C.
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    /// CMP/CPX/CPY
    fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.set_if(C, register >= value);
        self.regs.p.update_nz(register.wrapping_sub(value));
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    /// BIT - Z from A AND M, N and V copied from M.
    fn bit(&mut self, value: u8) {
        self.regs.p.set_if(Z, self.regs.a & value == 0);
        self.regs.p.set_if(N, value & 0x80 != 0);
        self.regs.p.set_if(V, value & 0x40 != 0);
    }
}
