//! Fetches the opcode nibble (and any operand nibbles) at `Pc`, advancing
//! `Pc` as it reads each one, and returns the decoded `Instruction`. This is
//! the two-tier decode: a primary nibble, escaping through JMPF into the
//! extended 12-bit opcode space when its target address falls in the
//! system region.

use crate::memory;
use crate::opcode::{Instruction, ServiceCall};
use crate::registers::Register;
use crate::vm::Vm;

impl Vm {
    /// Fetches and decodes the instruction at the current `Pc`, consuming
    /// whatever operand nibbles it needs and leaving `Pc` on the last one.
    pub(crate) fn fetch_decode(&mut self) -> Instruction {
        let op = self.memory.read_nibble(self.get_register(Register::Pc) as u8);
        match op {
            0x0 => Instruction::Ink,
            0x1 => Instruction::Outn,
            0x2 => Instruction::Abyz,
            0x3 => Instruction::Ay,
            0x4 => Instruction::St,
            0x5 => Instruction::Ld,
            0x6 => Instruction::Add,
            0x7 => Instruction::Sub,
            0x8 => Instruction::Ldi(self.fetch_operand()),
            0x9 => Instruction::Addi(self.fetch_operand()),
            0xA => Instruction::Ldyi(self.fetch_operand()),
            0xB => Instruction::Addyi(self.fetch_operand()),
            0xC => Instruction::Cpi(self.fetch_operand()),
            0xD => Instruction::Cpyi(self.fetch_operand()),
            0xE => Instruction::Scall(ServiceCall::from_index(self.fetch_operand())),
            0xF => self.fetch_escape(),
            _ => unreachable!("opcode nibble is masked to 4 bits"),
        }
    }

    /// Advances `Pc` by one nibble and reads the cell it now points at —
    /// the pattern every operand-carrying opcode uses.
    fn fetch_operand(&mut self) -> u8 {
        self.inc_register(Register::Pc);
        self.memory.read_nibble(self.get_register(Register::Pc) as u8)
    }

    /// Reads the two nibbles forming JMPF's 8-bit target, then decides
    /// whether that address is a real jump target or an escape into the
    /// extended opcode space.
    fn fetch_escape(&mut self) -> Instruction {
        let hi = self.fetch_operand();
        let lo = self.fetch_operand();
        let addr = (hi << 4) | lo;
        if memory::SYSTEM.contains(&addr) {
            self.fetch_extended(addr)
        } else {
            Instruction::Jmpf(addr)
        }
    }

    /// Decodes an extended opcode `0xF00 | addr`, fetching CALL's own
    /// 2-nibble target operand when applicable.
    fn fetch_extended(&mut self, addr: u8) -> Instruction {
        match addr {
            0x60 => {
                let hi = self.fetch_operand();
                let lo = self.fetch_operand();
                Instruction::Call((hi << 4) | lo)
            }
            0x61 => Instruction::Ret,
            0x62 => Instruction::PushA,
            0x63 => Instruction::PopA,
            0x64 => Instruction::PushB,
            0x65 => Instruction::PopB,
            0x66 => Instruction::PushY,
            0x67 => Instruction::PopY,
            0x68 => Instruction::PushZ,
            0x69 => Instruction::PopZ,
            0x70 => Instruction::Ioctrl,
            0x71 => Instruction::Out,
            0x72 => Instruction::In,
            _ => Instruction::UnknownExtended(0xF00 | u16::from(addr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::IMAGE_BYTES;

    fn vm_with_program(nibbles: &[u8]) -> Vm {
        let mut image = [0u8; IMAGE_BYTES];
        for (addr, &nibble) in nibbles.iter().enumerate() {
            let byte = &mut image[addr / 2];
            if addr % 2 == 0 {
                *byte = (*byte & 0x0F) | (nibble << 4);
            } else {
                *byte = (*byte & 0xF0) | nibble;
            }
        }
        Vm::new(image)
    }

    #[test]
    fn decodes_ldi_and_advances_pc_to_operand() {
        let mut vm = vm_with_program(&[0x8, 0x3]);
        let instr = vm.fetch_decode();
        assert_eq!(instr, Instruction::Ldi(0x3));
        assert_eq!(vm.get_register(Register::Pc), 0x01);
    }

    #[test]
    fn decodes_scall() {
        let mut vm = vm_with_program(&[0xE, 0x6]);
        assert_eq!(
            vm.fetch_decode(),
            Instruction::Scall(ServiceCall::RightShift)
        );
    }

    #[test]
    fn jmpf_outside_system_area_is_a_jump() {
        let mut vm = vm_with_program(&[0xF, 0x4, 0x2]);
        assert_eq!(vm.fetch_decode(), Instruction::Jmpf(0x42));
    }

    #[test]
    fn jmpf_into_system_area_escapes_to_extended_ret() {
        let mut vm = vm_with_program(&[0xF, 0x6, 0x1]);
        assert_eq!(vm.fetch_decode(), Instruction::Ret);
    }

    #[test]
    fn call_reads_its_own_target_after_the_escape() {
        let mut vm = vm_with_program(&[0xF, 0x6, 0x0, 0x0, 0x8]);
        assert_eq!(vm.fetch_decode(), Instruction::Call(0x08));
        assert_eq!(vm.get_register(Register::Pc), 0x04);
    }

    #[test]
    fn undefined_extended_opcode_decodes_as_unknown() {
        let mut vm = vm_with_program(&[0xF, 0x7, 0x3]);
        assert_eq!(vm.fetch_decode(), Instruction::UnknownExtended(0xF73));
    }
}
