//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod flash;
pub mod interrupt;

// Re-export trait interfaces
pub use flash::{FlashInterface, ERASED_BYTE};
pub use interrupt::{InterruptControl, InterruptGuard, Masked};
