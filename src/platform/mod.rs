//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the flash device and the
//! processor interrupt mask. All platform-specific code is isolated here.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{FlashError, PlatformError, Result};
pub use traits::{FlashInterface, InterruptControl, InterruptGuard, Masked};
