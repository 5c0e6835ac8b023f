//! Named accessors over the fixed memory addresses that make up the
//! register window: A, B, Y, Z and their shadows, the 1-bit flag F, and
//! the two-nibble PC/SP pair.

use crate::memory;
use crate::vm::Vm;

/// A named register. `Copy` so call sites read like `vm.get_register(Register::A)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    A,
    B,
    Y,
    Z,
    A2,
    B2,
    Y2,
    Z2,
    F,
    Pc,
    Sp,
}

impl Register {
    /// Address of the single nibble cell holding this register, for the
    /// 4-bit and flag registers. Panics for the two-nibble `Pc`/`Sp`.
    fn cell(self) -> u8 {
        match self {
            Register::B => *memory::PRIMARY.start(),
            Register::Z => *memory::PRIMARY.start() + 1,
            Register::Y => *memory::PRIMARY.start() + 2,
            Register::A => *memory::PRIMARY.start() + 3,
            Register::Z2 => *memory::SHADOW.start(),
            Register::B2 => *memory::SHADOW.start() + 1,
            Register::Y2 => *memory::SHADOW.start() + 2,
            Register::A2 => *memory::SHADOW.start() + 3,
            Register::F => memory::FLAG,
            Register::Pc | Register::Sp => unreachable!("two-nibble register has no single cell"),
        }
    }

    /// High-nibble address for the two-nibble registers.
    fn high_cell(self) -> u8 {
        match self {
            Register::Pc => memory::PC,
            Register::Sp => memory::SP,
            _ => unreachable!("single-nibble register has no high cell"),
        }
    }

    fn is_wide(self) -> bool {
        matches!(self, Register::Pc | Register::Sp)
    }
}

impl Vm {
    /// Reads `reg`. 4-bit registers return 0x0..=0xF, `F` returns 0 or 1,
    /// `Pc`/`Sp` return 0x00..=0xFF.
    pub fn get_register(&self, reg: Register) -> u16 {
        match reg {
            Register::Pc | Register::Sp => {
                let hi = reg.high_cell();
                (u16::from(self.memory.read_nibble(hi)) << 4)
                    | u16::from(self.memory.read_nibble(hi + 1))
            }
            Register::F => u16::from((self.memory.read_nibble(memory::FLAG) >> 3) & 0x1),
            _ => u16::from(self.memory.read_nibble(reg.cell())),
        }
    }

    /// Writes `value` to `reg`. A negative `value` wraps to the top of the
    /// register's width (0xFF for `Pc`/`Sp`, 0xF for the 4-bit registers) —
    /// the decrement-below-zero convention RET/POP rely on. Values at or
    /// above the register's width are a programmer error.
    pub fn set_register(&mut self, reg: Register, value: i32) {
        match reg {
            Register::Pc | Register::Sp => {
                let value = if value < 0 { value + 0x100 } else { value };
                assert!((0..=0xFF).contains(&value), "register value out of range");
                let hi = reg.high_cell();
                self.memory.write_nibble(hi, (value as u8) >> 4);
                self.memory.write_nibble(hi + 1, (value as u8) & 0xF);
            }
            Register::F => {
                assert!((0..=1).contains(&value), "flag value out of range");
                self.memory.write_nibble(memory::FLAG, (value as u8) << 3);
            }
            _ => {
                let value = if value < 0 { value + 0x10 } else { value };
                assert!((0..=0xF).contains(&value), "register value out of range");
                self.memory.write_nibble(reg.cell(), value as u8);
            }
        }
    }

    /// `set(r, (get(r) + 1) & mask(r))`.
    pub fn inc_register(&mut self, reg: Register) {
        let mask = if reg.is_wide() { 0xFF } else { 0xF };
        let next = (self.get_register(reg) as i32 + 1) & mask;
        self.set_register(reg, next);
    }

    /// Decrement that wraps across the register's width (-1 convention).
    pub fn dec_register(&mut self, reg: Register) {
        let next = self.get_register(reg) as i32 - 1;
        self.set_register(reg, next);
    }

    /// Decrements `Sp` by one, then stores `get(reg)` at address `SP+1`.
    pub fn push_register(&mut self, reg: Register) {
        self.dec_register(Register::Sp);
        let sp = self.get_register(Register::Sp) as u8;
        let value = self.get_register(reg) as u8;
        self.memory.write_nibble(sp + 1, value);
    }

    /// Loads from address `SP+1`, then increments `Sp` by one.
    pub fn pop_register(&mut self, reg: Register) {
        let sp = self.get_register(Register::Sp) as u8;
        let value = self.memory.read_nibble(sp + 1);
        self.set_register(reg, i32::from(value));
        self.inc_register(Register::Sp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::IMAGE_BYTES;

    #[test]
    fn reset_state_has_sp_ff() {
        let vm = Vm::new([0; IMAGE_BYTES]);
        assert_eq!(vm.get_register(Register::Sp), 0xFF);
    }

    #[test]
    fn four_bit_register_wraps_on_negative_set() {
        let mut vm = Vm::new([0; IMAGE_BYTES]);
        vm.set_register(Register::A, -1);
        assert_eq!(vm.get_register(Register::A), 0xF);
    }

    #[test]
    fn wide_register_wraps_on_negative_set() {
        let mut vm = Vm::new([0; IMAGE_BYTES]);
        vm.set_register(Register::Pc, -1);
        assert_eq!(vm.get_register(Register::Pc), 0xFF);
    }

    #[test]
    fn flag_reads_back_zero_or_one() {
        let mut vm = Vm::new([0; IMAGE_BYTES]);
        vm.set_register(Register::F, 1);
        assert_eq!(vm.get_register(Register::F), 1);
        vm.set_register(Register::F, 0);
        assert_eq!(vm.get_register(Register::F), 0);
    }

    #[test]
    fn push_then_pop_restores_register() {
        let mut vm = Vm::new([0; IMAGE_BYTES]);
        vm.set_register(Register::A, 0x7);
        vm.push_register(Register::A);
        vm.set_register(Register::A, 0x0);
        vm.pop_register(Register::A);
        assert_eq!(vm.get_register(Register::A), 0x7);
        assert_eq!(vm.get_register(Register::Sp), 0xFF);
    }

    #[test]
    fn call_style_push_pop_uses_a_pair_of_cells() {
        // Mirrors CALL/RET: two pushes land at SP+1 and SP+2, not SP and SP+1.
        let mut vm = Vm::new([0; IMAGE_BYTES]);
        vm.dec_register(Register::Sp);
        vm.dec_register(Register::Sp);
        let sp = vm.get_register(Register::Sp) as u8;
        vm.memory.write_nibble(sp + 1, 0xA);
        vm.memory.write_nibble(sp + 2, 0xB);
        assert_eq!(vm.memory.read_nibble(sp + 1), 0xA);
        assert_eq!(vm.memory.read_nibble(sp + 2), 0xB);
    }
}
