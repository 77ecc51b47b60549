//! Interrupt mask abstraction
//!
//! Erase and program operations on XIP flash must not be interrupted: any
//! handler fetched from flash while the chip is mid-erase faults the core or
//! corrupts the sector. Platforms expose their save/disable/restore primitive
//! through [`InterruptControl`]; callers never use it directly but go through
//! [`InterruptGuard`], which restores the saved state when dropped.

use core::marker::PhantomData;

/// Save/disable/restore primitive for the processor interrupt mask
///
/// # Contract
///
/// - `save_and_disable` returns the mask state as it was before the call
/// - `restore` puts back exactly that state (it does not unconditionally enable)
/// - Nested use must work: restoring an inner state leaves interrupts disabled
pub trait InterruptControl {
    /// Opaque saved mask state
    type State: Copy;

    /// Disable interrupts, returning the previous state
    fn save_and_disable(&mut self) -> Self::State;

    /// Restore a state returned by `save_and_disable`
    fn restore(&mut self, state: Self::State);
}

/// Proof that interrupts are masked for lifetime `'a`
///
/// Mutating [`FlashInterface`](super::FlashInterface) methods require this
/// token, so an erase or program outside a guard does not compile. It can
/// only be obtained from a live [`InterruptGuard`].
#[derive(Debug, Clone, Copy)]
pub struct Masked<'a> {
    _guard: PhantomData<&'a ()>,
}

impl Masked<'static> {
    /// Token with no guard behind it, for exercising unmasked mutations
    #[cfg(test)]
    pub(crate) fn unguarded() -> Self {
        Masked {
            _guard: PhantomData,
        }
    }
}

/// Scoped interrupt mask
///
/// Construction saves and disables interrupts; `Drop` restores them. Because
/// restoration happens in `Drop`, it runs on every exit path, including `?`
/// returns from a failed erase.
///
/// # Example
///
/// ```
/// use pico_flash_store::platform::mock::MockInterrupts;
/// use pico_flash_store::platform::traits::InterruptGuard;
///
/// let mut irq = MockInterrupts::new();
/// {
///     let _guard = InterruptGuard::new(&mut irq);
/// }
/// assert!(!irq.is_masked());
/// assert_eq!(irq.critical_sections(), 1);
/// ```
pub struct InterruptGuard<'a, I: InterruptControl> {
    control: &'a mut I,
    saved: I::State,
}

impl<'a, I: InterruptControl> InterruptGuard<'a, I> {
    /// Disable interrupts until the guard is dropped
    pub fn new(control: &'a mut I) -> Self {
        let saved = control.save_and_disable();
        Self { control, saved }
    }

    /// Token for masked-only flash operations
    pub fn masked(&self) -> Masked<'_> {
        Masked {
            _guard: PhantomData,
        }
    }
}

impl<I: InterruptControl> Drop for InterruptGuard<'_, I> {
    fn drop(&mut self) {
        self.control.restore(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal controller that models a single enable bit
    struct Bit {
        enabled: bool,
    }

    impl InterruptControl for Bit {
        type State = bool;

        fn save_and_disable(&mut self) -> bool {
            let prev = self.enabled;
            self.enabled = false;
            prev
        }

        fn restore(&mut self, state: bool) {
            self.enabled = state;
        }
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let mut irq = Bit { enabled: true };
        {
            let guard = InterruptGuard::new(&mut irq);
            let _ = guard.masked();
        }
        assert!(irq.enabled);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn fails(irq: &mut Bit) -> Result<(), ()> {
            let _guard = InterruptGuard::new(irq);
            let erase: Result<(), ()> = Err(());
            erase?;
            Ok(())
        }

        let mut irq = Bit { enabled: true };
        assert!(fails(&mut irq).is_err());
        assert!(irq.enabled);
    }

    #[test]
    fn test_guard_keeps_outer_mask() {
        // Interrupts already disabled by the caller stay disabled afterwards
        let mut irq = Bit { enabled: false };
        {
            let _guard = InterruptGuard::new(&mut irq);
        }
        assert!(!irq.enabled);
    }
}
