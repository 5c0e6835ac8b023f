//! The `Vm` struct itself: the memory image plus the fetch/decode/execute
//! tick loop. Everything else (registers, peripherals, decode, execute) adds
//! methods to `Vm` from its own file.

use crate::memory::{MemoryImage, IMAGE_BYTES, NIBBLE_COUNT};
use crate::registers::Register;

/// A GMC-4/Orange-4 machine: one memory image and the last instruction it
/// traced, stepped one tick at a time by a driver (`VmHandle`, `monitor`).
pub struct Vm {
    pub(crate) memory: MemoryImage,
    pub(crate) last_trace: String,
}

impl Vm {
    /// Loads `image` and resets the stack pointer to 0xFF.
    pub fn new(image: [u8; IMAGE_BYTES]) -> Self {
        let mut vm = Vm {
            memory: MemoryImage::new(),
            last_trace: String::new(),
        };
        vm.memory.load_byte_image(image);
        vm.set_register(Register::Sp, 0xFF);
        vm
    }

    /// Advances the machine by one tick: if `WAIT_COUNT` is nonzero, decrements
    /// it and returns without fetching; otherwise fetches, decodes, executes,
    /// then advances `Pc` past the instruction just executed.
    pub fn tick(&mut self) {
        let remaining = self.wait_count();
        if remaining > 0 {
            self.set_wait_count(remaining - 1);
            return;
        }

        let instr = self.fetch_decode();
        self.execute(instr);
        self.inc_register(Register::Pc);
    }

    /// The mnemonic of the most recently executed instruction.
    pub fn last_trace(&self) -> &str {
        &self.last_trace
    }

    /// Snapshot of the packed 128-byte memory image.
    pub fn read_byte_image(&self) -> [u8; IMAGE_BYTES] {
        self.memory.read_byte_image()
    }

    /// Snapshot of all 256 cells, one nibble per element.
    pub fn get_memory_image(&self) -> [u8; NIBBLE_COUNT] {
        self.memory.read_nibbles()
    }

    /// Replaces the memory image wholesale, leaving registers untouched.
    pub fn load_byte_image(&mut self, image: [u8; IMAGE_BYTES]) {
        self.memory.load_byte_image(image);
    }
}
