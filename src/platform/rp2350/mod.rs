//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! This module provides concrete implementations of the platform abstraction
//! traits for the RP2350 microcontroller using the `rp235x-hal` ROM bindings
//! and `cortex-m` register access.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! pico_flash_store = { version = "0.1", features = ["pico2_w"] }
//! ```

mod flash;
mod interrupt;

pub use flash::Rp2350Flash;
pub use interrupt::CortexInterrupts;
