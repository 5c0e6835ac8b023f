//! `VmHandle`: the single shared-exclusion boundary around the VM, so a
//! driver can tick it from a worker thread while another thread reads
//! display/register state for rendering.

use std::sync::{Arc, Mutex};

use crate::memory::{IMAGE_BYTES, NIBBLE_COUNT};
use crate::registers::Register;
use crate::vm::Vm;

/// A cloneable, thread-safe reference to one `Vm`. Every method takes the
/// lock for the duration of the call; there is no finer-grained locking.
#[derive(Clone)]
pub struct VmHandle {
    inner: Arc<Mutex<Vm>>,
}

impl VmHandle {
    pub fn new(image: [u8; IMAGE_BYTES]) -> Self {
        VmHandle {
            inner: Arc::new(Mutex::new(Vm::new(image))),
        }
    }

    pub fn tick(&self) {
        self.inner.lock().unwrap().tick();
    }

    pub fn press_key(&self, k: u8) {
        self.inner.lock().unwrap().press_key(k);
    }

    pub fn release_key(&self, k: u8) {
        self.inner.lock().unwrap().release_key(k);
    }

    pub fn release_all_keys(&self) {
        self.inner.lock().unwrap().release_all_keys();
    }

    pub fn get_numeric_led(&self) -> u8 {
        self.inner.lock().unwrap().get_numeric_led()
    }

    pub fn get_binary_led(&self) -> u8 {
        self.inner.lock().unwrap().get_binary_led()
    }

    pub fn get_register(&self, reg: Register) -> u16 {
        self.inner.lock().unwrap().get_register(reg)
    }

    pub fn get_memory_image(&self) -> [u8; NIBBLE_COUNT] {
        self.inner.lock().unwrap().get_memory_image()
    }

    pub fn last_trace(&self) -> String {
        self.inner.lock().unwrap().last_trace().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_through_handle_advances_state_like_a_direct_vm() {
        let mut image = [0u8; IMAGE_BYTES];
        image[0] = 0x83; // LDI 0x3
        let handle = VmHandle::new(image);
        handle.tick();
        assert_eq!(handle.get_register(Register::A), 0x3);
        assert_eq!(handle.last_trace(), "ldi 0x3");
    }

    #[test]
    fn keys_pressed_through_the_handle_are_observed_by_ink() {
        let image = [0u8; IMAGE_BYTES]; // opcode 0x0 = INK
        let handle = VmHandle::new(image);
        handle.press_key(0x5);
        handle.tick();
        assert_eq!(handle.get_register(Register::A), 0x5);
        assert_eq!(handle.get_register(Register::F), 0);
    }
}
