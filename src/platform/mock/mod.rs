//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
//! use pico_flash_store::storage::FlashStore;
//!
//! let mut store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
//! store.write_record(0, b"hello").unwrap();
//! ```

#![cfg(any(test, feature = "mock"))]

mod flash;
mod interrupt;

pub use flash::MockFlash;
pub use interrupt::{MaskProbe, MockInterrupts};
