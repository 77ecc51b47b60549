#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! pico_flash_store - Persistent record store on raw NOR flash for Raspberry Pi Pico 2 W
//!
//! This library provides a platform abstraction for the flash chip and the
//! interrupt mask, a bounds-checked record store that erases and programs
//! under a masked-interrupt guard, and a line-oriented command shell.

// Platform abstraction layer (flash device, interrupt mask)
pub mod platform;

// Core infrastructure (logging)
pub mod core;

// Record store on the reserved flash window
pub mod storage;

// Operator command interface
pub mod cli;
