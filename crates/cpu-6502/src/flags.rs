//! 6502 processor status register (P).
//!
//! ```text
//!  7 6 5 4 3 2 1 0
//!  N V - B D I Z C
//! ```
//!
//! The register is kept as a raw byte so every bit stays addressable, even
//! the ones no instruction defines.

use std::fmt;

/// Carry flag - set if operation resulted in carry/borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable.
pub const I: u8 = 0x04;

/// Decimal mode. Settable, but the 2A03 ignores it in ADC/SBC.
pub const D: u8 = 0x08;

/// Break flag - only meaningful in the copy pushed by PHP.
pub const B: u8 = 0x10;

/// Unused bit.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Status(pub u8);

impl Status {
    /// All flags clear.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Raw byte value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Value pushed by PHP: B and U always set.
    #[must_use]
    pub const fn to_byte_php(self) -> u8 {
        self.0 | B | U
    }

    /// Load from a byte pulled by PLP/RTI.
    ///
    /// B and U are not real latches, so they keep their current value.
    pub fn load_pulled(&mut self, value: u8) {
        self.0 = (value & !(B | U)) | (self.0 & (B | U));
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from the value just written to a register.
    ///
    /// Only bits 7 and 1 change; earlier flag state is irrelevant.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(Z, value == 0);
        self.set_if(N, value & 0x80 != 0);
    }
}

impl fmt::Display for Status {
    /// `NV-BDIZC`, with `.` for a clear bit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u8, char); 8] = [
            (N, 'N'),
            (V, 'V'),
            (U, '-'),
            (B, 'B'),
            (D, 'D'),
            (I, 'I'),
            (Z, 'Z'),
            (C, 'C'),
        ];
        for (flag, name) in NAMES {
            let c = if self.is_set(flag) { name } else { '.' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_nz_leaves_other_bits() {
        let mut p = Status(C | V | D);
        p.update_nz(0x00);
        assert_eq!(p.bits(), C | V | D | Z);
        p.update_nz(0x80);
        assert_eq!(p.bits(), C | V | D | N);
        p.update_nz(0x01);
        assert_eq!(p.bits(), C | V | D);
    }

    #[test]
    fn update_nz_ignores_prior_flags() {
        let mut p = Status(N | Z);
        p.update_nz(0x7F);
        assert!(!p.is_set(N));
        assert!(!p.is_set(Z));
    }

    #[test]
    fn php_byte_sets_break_and_unused() {
        assert_eq!(Status::new().to_byte_php(), B | U);
        assert_eq!(Status(C).to_byte_php(), B | U | C);
    }

    #[test]
    fn pulled_byte_keeps_break_and_unused() {
        let mut p = Status::new();
        p.load_pulled(0xFF);
        assert_eq!(p.bits(), 0xFF & !(B | U));

        let mut p = Status(U);
        p.load_pulled(0x00);
        assert_eq!(p.bits(), U);
    }

    #[test]
    fn display() {
        assert_eq!(Status(N | Z).to_string(), "N.....Z.");
        assert_eq!(Status(0xFF).to_string(), "NV-BDIZC");
    }
}
