pub mod decode;
pub mod error;
pub mod execute;
pub mod handle;
pub mod hex;
pub mod memory;
pub mod opcode;
pub mod periphery;
pub mod registers;
pub mod vm;

pub use error::Error;
pub use handle::VmHandle;
pub use opcode::{Instruction, ServiceCall};
pub use registers::Register;
pub use vm::Vm;

/// Ticks per second a driver should aim for; also what `SCALL WAIT` counts
/// its tenths-of-a-second against.
pub const HZ: u32 = 1000;
