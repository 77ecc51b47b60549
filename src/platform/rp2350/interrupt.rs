//! Cortex-M33 interrupt mask control

use crate::platform::traits::InterruptControl;
use cortex_m::register::primask;

/// PRIMASK-based interrupt control for the RP2350 cores
///
/// Saves whether interrupts were active, disables them, and re-enables only
/// if they were active before. Nested guards therefore keep the outer mask.
#[derive(Debug, Default)]
pub struct CortexInterrupts {
    _private: (),
}

impl CortexInterrupts {
    /// Create the controller
    pub fn new() -> Self {
        Self::default()
    }
}

impl InterruptControl for CortexInterrupts {
    type State = bool;

    fn save_and_disable(&mut self) -> bool {
        let was_active = primask::read().is_active();
        cortex_m::interrupt::disable();
        was_active
    }

    fn restore(&mut self, was_active: bool) {
        if was_active {
            // SAFETY: interrupts were enabled when the matching save ran
            unsafe { cortex_m::interrupt::enable() };
        }
    }
}
