//! Applies a decoded `Instruction`'s effects: memory/register writes, `F`,
//! and the trace/log output for each executed instruction.

use crate::opcode::{Instruction, ServiceCall};
use crate::registers::Register;
use crate::vm::Vm;

impl Vm {
    /// Applies `instr`'s effects and records it as the last trace.
    pub(crate) fn execute(&mut self, instr: Instruction) {
        match instr {
            Instruction::Ink => self.exec_ink(),
            Instruction::Outn => self.exec_outn(),
            Instruction::Abyz => self.exec_abyz(),
            Instruction::Ay => self.exec_ay(),
            Instruction::St => self.exec_st(),
            Instruction::Ld => self.exec_ld(),
            Instruction::Add => self.exec_add(),
            Instruction::Sub => self.exec_sub(),
            Instruction::Ldi(n) => self.exec_ldi(n),
            Instruction::Addi(n) => self.exec_addi(n),
            Instruction::Ldyi(n) => self.exec_ldyi(n),
            Instruction::Addyi(n) => self.exec_addyi(n),
            Instruction::Cpi(n) => self.exec_cpi(n),
            Instruction::Cpyi(n) => self.exec_cpyi(n),
            Instruction::Scall(s) => self.exec_scall(s),
            Instruction::Jmpf(addr) => self.exec_jmpf(addr),
            Instruction::Call(addr) => self.exec_call(addr),
            Instruction::Ret => self.exec_ret(),
            Instruction::PushA => self.exec_push(Register::A),
            Instruction::PopA => self.exec_pop(Register::A),
            Instruction::PushB => self.exec_push(Register::B),
            Instruction::PopB => self.exec_pop(Register::B),
            Instruction::PushY => self.exec_push(Register::Y),
            Instruction::PopY => self.exec_pop(Register::Y),
            Instruction::PushZ => self.exec_push(Register::Z),
            Instruction::PopZ => self.exec_pop(Register::Z),
            Instruction::Ioctrl => self.exec_placeholder("ioctrl"),
            Instruction::Out => self.exec_placeholder("out"),
            Instruction::In => self.exec_placeholder("in"),
            Instruction::UnknownExtended(op) => {
                log::warn!("unimplemented extended opcode {:#05x}, treating as no-op", op);
                self.set_register(Register::F, 1);
            }
        }

        self.last_trace = instr.to_string();
        log::debug!("{}", self.last_trace);
    }

    fn exec_ink(&mut self) {
        for key in 0x0..=0xF {
            if self.is_key_pressed(key) {
                self.set_register(Register::A, i32::from(key));
                self.set_register(Register::F, 0);
                return;
            }
        }
        self.set_register(Register::F, 1);
    }

    fn exec_outn(&mut self) {
        let a = self.get_register(Register::A) as u8;
        self.set_numeric_led(a);
        self.set_register(Register::F, 1);
    }

    fn swap_registers(&mut self, r1: Register, r2: Register) {
        let v1 = self.get_register(r1) as i32;
        let v2 = self.get_register(r2) as i32;
        self.set_register(r1, v2);
        self.set_register(r2, v1);
    }

    fn exec_abyz(&mut self) {
        self.swap_registers(Register::A, Register::B);
        self.swap_registers(Register::Y, Register::Z);
        self.set_register(Register::F, 1);
    }

    fn exec_ay(&mut self) {
        self.swap_registers(Register::A, Register::Y);
        self.set_register(Register::F, 1);
    }

    fn data_cell(&self) -> u8 {
        self.get_register(Register::Y) as u8 + *crate::memory::DATA.start()
    }

    fn exec_st(&mut self) {
        let cell = self.data_cell();
        let a = self.get_register(Register::A) as u8;
        self.memory.write_nibble(cell, a);
        self.set_register(Register::F, 1);
    }

    fn exec_ld(&mut self) {
        let cell = self.data_cell();
        let val = self.memory.read_nibble(cell);
        self.set_register(Register::A, i32::from(val));
        self.set_register(Register::F, 1);
    }

    fn exec_add(&mut self) {
        let cell = self.data_cell();
        let sum = u16::from(self.memory.read_nibble(cell)) + self.get_register(Register::A);
        self.set_register(Register::A, (sum & 0xF) as i32);
        self.set_register(Register::F, (sum >> 4) as i32);
    }

    fn exec_sub(&mut self) {
        let cell = self.data_cell();
        let diff = i32::from(self.memory.read_nibble(cell)) - self.get_register(Register::A) as i32;
        if diff < 0 {
            self.set_register(Register::A, (diff + 0x10) & 0xF);
            self.set_register(Register::F, 1);
        } else {
            self.set_register(Register::A, diff & 0xF);
            self.set_register(Register::F, 0);
        }
    }

    fn exec_ldi(&mut self, n: u8) {
        self.set_register(Register::A, i32::from(n));
        self.set_register(Register::F, 1);
    }

    fn exec_addi(&mut self, n: u8) {
        let sum = self.get_register(Register::A) + u16::from(n);
        self.set_register(Register::A, (sum & 0xF) as i32);
        self.set_register(Register::F, (sum >> 4) as i32);
    }

    fn exec_ldyi(&mut self, n: u8) {
        self.set_register(Register::Y, i32::from(n));
        self.set_register(Register::F, 1);
    }

    fn exec_addyi(&mut self, n: u8) {
        let sum = self.get_register(Register::Y) + u16::from(n);
        self.set_register(Register::Y, (sum & 0xF) as i32);
        self.set_register(Register::F, (sum >> 4) as i32);
    }

    fn exec_cpi(&mut self, n: u8) {
        let eq = self.get_register(Register::A) == u16::from(n);
        self.set_register(Register::F, if eq { 0 } else { 1 });
    }

    fn exec_cpyi(&mut self, n: u8) {
        let eq = self.get_register(Register::Y) == u16::from(n);
        self.set_register(Register::F, if eq { 0 } else { 1 });
    }

    fn exec_jmpf(&mut self, addr: u8) {
        if self.get_register(Register::F) == 0 {
            self.set_register(Register::F, 1);
        } else {
            self.set_register(Register::Pc, i32::from(addr) - 1);
        }
    }

    fn exec_call(&mut self, addr: u8) {
        let ret = self.get_register(Register::Pc) as u8;
        self.dec_register(Register::Sp);
        self.dec_register(Register::Sp);
        let sp = self.get_register(Register::Sp) as u8;
        self.memory.write_nibble(sp + 1, ret >> 4);
        self.memory.write_nibble(sp + 2, ret & 0xF);
        self.set_register(Register::Pc, i32::from(addr) - 1);
        self.set_register(Register::F, 1);
    }

    fn exec_ret(&mut self) {
        let sp = self.get_register(Register::Sp) as u8;
        let ret = (u16::from(self.memory.read_nibble(sp + 1)) << 4)
            | u16::from(self.memory.read_nibble(sp + 2));
        self.inc_register(Register::Sp);
        self.inc_register(Register::Sp);
        self.set_register(Register::Pc, ret as i32);
        self.set_register(Register::F, 1);
    }

    fn exec_push(&mut self, reg: Register) {
        self.push_register(reg);
        self.set_register(Register::F, 1);
    }

    fn exec_pop(&mut self, reg: Register) {
        self.pop_register(reg);
        self.set_register(Register::F, 1);
    }

    fn exec_placeholder(&mut self, name: &str) {
        log::info!("unimplemented extension opcode `{}`, treating as no-op", name);
        self.set_register(Register::F, 1);
    }

    fn exec_scall(&mut self, s: ServiceCall) {
        match s {
            ServiceCall::TurnOffNumericLed => {
                log::info!("unimplemented service call TURN_OFF_NUMERIC_LED");
                self.set_register(Register::F, 1);
            }
            ServiceCall::TurnOnRegister => {
                let y = self.get_register(Register::Y);
                let led = u16::from(self.get_binary_led()) | (1 << y);
                self.set_binary_led(led as u8);
                self.set_register(Register::F, 1);
            }
            ServiceCall::TurnOffRegister => {
                let y = self.get_register(Register::Y);
                let led = u16::from(self.get_binary_led()) & !(1u16 << y);
                self.set_binary_led(led as u8);
                self.set_register(Register::F, 1);
            }
            ServiceCall::Unused => {
                self.set_register(Register::F, 1);
            }
            ServiceCall::InvertAllBits => {
                let a = self.get_register(Register::A) as u8;
                self.set_register(Register::A, i32::from((!a) & 0xF));
                self.set_register(Register::F, 1);
            }
            ServiceCall::SwapAuxRegisters => {
                self.swap_registers(Register::A, Register::A2);
                self.swap_registers(Register::B, Register::B2);
                self.swap_registers(Register::Y, Register::Y2);
                self.swap_registers(Register::Z, Register::Z2);
                self.set_register(Register::F, 1);
            }
            ServiceCall::RightShift => {
                let a = self.get_register(Register::A) as u8;
                self.set_register(Register::A, i32::from(a >> 1));
                self.set_register(Register::F, i32::from(a & 1));
            }
            ServiceCall::BeepEnd => {
                log::info!("beep: end");
                self.set_register(Register::F, 1);
            }
            ServiceCall::BeepError => {
                log::info!("beep: error");
                self.set_register(Register::F, 1);
            }
            ServiceCall::BeepLong => {
                log::info!("beep: long");
                self.set_register(Register::F, 1);
            }
            ServiceCall::BeepShort => {
                log::info!("beep: short");
                self.set_register(Register::F, 1);
            }
            ServiceCall::BeepScale => {
                let a = self.get_register(Register::A);
                log::info!("beep: scale {:#x}", a);
                self.set_register(Register::F, 1);
            }
            ServiceCall::Wait => {
                // (A+1) * HZ/10 does not fit the nibble-wide WAIT_COUNT cell
                // for any A, so this stays a no-op.
                log::info!("unimplemented service call WAIT");
                self.set_register(Register::F, 1);
            }
            ServiceCall::TurnOnMemory => {
                let lo = self.memory.read_nibble(0x5E);
                let hi = self.memory.read_nibble(0x5F) & 0x7;
                let v = u16::from(lo) | (u16::from(hi) << 4);
                if v < 7 {
                    let led = u16::from(self.get_binary_led()) | (1 << v);
                    self.set_binary_led(led as u8);
                }
                self.set_register(Register::F, 1);
            }
            ServiceCall::DecimalSub => {
                log::info!("unimplemented service call DECIMAL_SUB");
                self.set_register(Register::F, 1);
            }
            ServiceCall::DecimalAdd => {
                log::info!("unimplemented service call DECIMAL_ADD");
                self.set_register(Register::F, 1);
            }
        }
    }
}
