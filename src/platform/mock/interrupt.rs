//! Mock interrupt controller
//!
//! Tracks mask depth instead of touching hardware, so the store's critical
//! sections can be verified on the host.

use crate::platform::traits::InterruptControl;
use core::cell::Cell;
use std::rc::Rc;

/// Mock interrupt controller
///
/// `save_and_disable` increments a shared depth counter and returns the
/// previous depth; `restore` puts it back. A [`MaskProbe`] shares the counter
/// so a mock flash can check the mask at the moment of each mutation.
#[derive(Debug, Default)]
pub struct MockInterrupts {
    depth: Rc<Cell<u32>>,
    sections: u32,
}

impl MockInterrupts {
    /// Create a controller with interrupts enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer sharing this controller's mask state
    pub fn probe(&self) -> MaskProbe {
        MaskProbe {
            depth: Rc::clone(&self.depth),
        }
    }

    /// True while at least one guard is alive
    pub fn is_masked(&self) -> bool {
        self.depth.get() > 0
    }

    /// Number of `save_and_disable` calls so far
    pub fn critical_sections(&self) -> u32 {
        self.sections
    }
}

impl InterruptControl for MockInterrupts {
    type State = u32;

    fn save_and_disable(&mut self) -> u32 {
        let prev = self.depth.get();
        self.depth.set(prev + 1);
        self.sections += 1;
        prev
    }

    fn restore(&mut self, state: u32) {
        self.depth.set(state);
    }
}

/// Read-only view of a [`MockInterrupts`] mask
#[derive(Debug, Clone)]
pub struct MaskProbe {
    depth: Rc<Cell<u32>>,
}

impl MaskProbe {
    /// True while interrupts are masked
    pub fn is_masked(&self) -> bool {
        self.depth.get() > 0
    }
}
