//! The instruction and service-call enums, and their trace/mnemonic
//! rendering. Decoding (turning memory nibbles into these types, advancing
//! `Pc` as operands are read) lives in `decode.rs`; applying their effects
//! lives in `execute.rs`.

use std::fmt;

/// A fully-decoded instruction, already carrying any operand nibbles it
/// consumed. Primary opcodes and the Orange-4 extended opcodes reached
/// through JMPF's escape are both represented here, so dispatch over all
/// three opcode tiers is one exhaustive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Ink,
    Outn,
    Abyz,
    Ay,
    St,
    Ld,
    Add,
    Sub,
    Ldi(u8),
    Addi(u8),
    Ldyi(u8),
    Addyi(u8),
    Cpi(u8),
    Cpyi(u8),
    Scall(ServiceCall),
    /// JMPF with its target address; whether it actually jumps depends on
    /// `F` at execute time.
    Jmpf(u8),
    Call(u8),
    Ret,
    PushA,
    PopA,
    PushB,
    PopB,
    PushY,
    PopY,
    PushZ,
    PopZ,
    Ioctrl,
    Out,
    In,
    /// Any extended opcode (0xF60..=0xF7F) with no named effect. Treated as
    /// a no-op with F=1 and a trace.
    UnknownExtended(u16),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Ink => write!(f, "ink"),
            Instruction::Outn => write!(f, "outn"),
            Instruction::Abyz => write!(f, "abyz"),
            Instruction::Ay => write!(f, "ay"),
            Instruction::St => write!(f, "st"),
            Instruction::Ld => write!(f, "ld"),
            Instruction::Add => write!(f, "add"),
            Instruction::Sub => write!(f, "sub"),
            Instruction::Ldi(n) => write!(f, "ldi {:#x}", n),
            Instruction::Addi(n) => write!(f, "addi {:#x}", n),
            Instruction::Ldyi(n) => write!(f, "ldyi {:#x}", n),
            Instruction::Addyi(n) => write!(f, "addyi {:#x}", n),
            Instruction::Cpi(n) => write!(f, "cpi {:#x}", n),
            Instruction::Cpyi(n) => write!(f, "cpyi {:#x}", n),
            Instruction::Scall(s) => write!(f, "scall {:#x}", s.index()),
            Instruction::Jmpf(addr) => write!(f, "jmpf {:#x}", addr),
            Instruction::Call(addr) => write!(f, "call {:#x}", addr),
            Instruction::Ret => write!(f, "ret"),
            Instruction::PushA => write!(f, "pusha"),
            Instruction::PopA => write!(f, "popa"),
            Instruction::PushB => write!(f, "pushb"),
            Instruction::PopB => write!(f, "popb"),
            Instruction::PushY => write!(f, "pushy"),
            Instruction::PopY => write!(f, "popy"),
            Instruction::PushZ => write!(f, "pushz"),
            Instruction::PopZ => write!(f, "popz"),
            Instruction::Ioctrl => write!(f, "ioctrl"),
            Instruction::Out => write!(f, "out"),
            Instruction::In => write!(f, "in"),
            Instruction::UnknownExtended(op) => write!(f, "unknown {:#05x}", op),
        }
    }
}

/// The service call index dispatched by SCALL (opcode 0xE). Index 0x3 has
/// no defined effect and is folded into `Unused`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceCall {
    TurnOffNumericLed,
    TurnOnRegister,
    TurnOffRegister,
    Unused,
    InvertAllBits,
    SwapAuxRegisters,
    RightShift,
    BeepEnd,
    BeepError,
    BeepLong,
    BeepShort,
    BeepScale,
    Wait,
    TurnOnMemory,
    DecimalSub,
    DecimalAdd,
}

impl ServiceCall {
    pub fn from_index(idx: u8) -> ServiceCall {
        match idx & 0xF {
            0x0 => ServiceCall::TurnOffNumericLed,
            0x1 => ServiceCall::TurnOnRegister,
            0x2 => ServiceCall::TurnOffRegister,
            0x3 => ServiceCall::Unused,
            0x4 => ServiceCall::InvertAllBits,
            0x5 => ServiceCall::SwapAuxRegisters,
            0x6 => ServiceCall::RightShift,
            0x7 => ServiceCall::BeepEnd,
            0x8 => ServiceCall::BeepError,
            0x9 => ServiceCall::BeepLong,
            0xA => ServiceCall::BeepShort,
            0xB => ServiceCall::BeepScale,
            0xC => ServiceCall::Wait,
            0xD => ServiceCall::TurnOnMemory,
            0xE => ServiceCall::DecimalSub,
            0xF => ServiceCall::DecimalAdd,
            _ => unreachable!("index masked to a nibble"),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            ServiceCall::TurnOffNumericLed => 0x0,
            ServiceCall::TurnOnRegister => 0x1,
            ServiceCall::TurnOffRegister => 0x2,
            ServiceCall::Unused => 0x3,
            ServiceCall::InvertAllBits => 0x4,
            ServiceCall::SwapAuxRegisters => 0x5,
            ServiceCall::RightShift => 0x6,
            ServiceCall::BeepEnd => 0x7,
            ServiceCall::BeepError => 0x8,
            ServiceCall::BeepLong => 0x9,
            ServiceCall::BeepShort => 0xA,
            ServiceCall::BeepScale => 0xB,
            ServiceCall::Wait => 0xC,
            ServiceCall::TurnOnMemory => 0xD,
            ServiceCall::DecimalSub => 0xE,
            ServiceCall::DecimalAdd => 0xF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_call_index_round_trips() {
        for idx in 0x0..=0xFu8 {
            assert_eq!(ServiceCall::from_index(idx).index(), idx);
        }
    }

    #[test]
    fn mnemonics_render_hex_operands() {
        assert_eq!(Instruction::Ldi(0x3).to_string(), "ldi 0x3");
        assert_eq!(Instruction::Jmpf(0x42).to_string(), "jmpf 0x42");
        assert_eq!(Instruction::Ret.to_string(), "ret");
        assert_eq!(
            Instruction::Scall(ServiceCall::RightShift).to_string(),
            "scall 0x6"
        );
    }
}
