//! Core infrastructure
//!
//! Cross-cutting facilities shared by the storage and console layers.

pub mod logging;
