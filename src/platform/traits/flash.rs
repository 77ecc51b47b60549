//! Flash interface trait
//!
//! This module defines the Flash storage interface that platform implementations must provide.
//! The record store uses it for every access to the reserved flash window.

use super::interrupt::Masked;
use crate::platform::Result;

/// Value of every byte in an erased sector
pub const ERASED_BYTE: u8 = 0xFF;

/// Flash interface trait
///
/// Platform implementations must provide this interface for Flash read/program/erase operations.
///
/// # Flash Characteristics
///
/// - Flash is organized in sectors (4 KB on RP2040/RP2350)
/// - Erase operations set all bytes to 0xFF
/// - Program operations can only change bits from 1→0 (must erase first to reset to 1)
/// - Erase/program are blocking and synchronous
///
/// # Safety Invariants
///
/// - Only one owner per Flash instance (no concurrent access)
/// - Must not erase/program the firmware region (implementations must validate addresses)
/// - Erase/program run with interrupts masked; the [`Masked`] token enforces it
///
/// # Memory Layout (RP2350, 4 MB)
///
/// ```text
/// [Firmware]           0x000000 - 0x040000 (256 KB) - DO NOT WRITE
/// [Record Window]      0x040000 - 0x400000 (3.75 MB)
/// ```
pub trait FlashInterface {
    /// Read data from Flash
    ///
    /// Reads `buf.len()` bytes from Flash starting at `address`. Reads are
    /// memory-mapped and safe to interleave with interrupts.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the range is out of bounds.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Program data into Flash
    ///
    /// The target range must have been erased: programming only clears bits,
    /// so writing over stale data yields the AND of old and new contents.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the range touches the firmware region.
    /// Returns `PlatformError::Flash(FlashError::WriteFailed)` if the program operation fails.
    fn program(&mut self, masked: Masked<'_>, address: u32, data: &[u8]) -> Result<()>;

    /// Erase Flash sectors
    ///
    /// Erases `size` bytes starting at `address`, setting them to 0xFF.
    /// `address` and `size` must be multiples of [`sector_size`](Self::sector_size).
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if:
    /// - Address is in firmware region
    /// - Address is not sector-aligned
    /// - Size is not a multiple of sector size
    ///
    /// Returns `PlatformError::Flash(FlashError::EraseFailed)` if the erase operation fails.
    fn erase(&mut self, masked: Masked<'_>, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit (4096 bytes on RP2350)
    fn sector_size(&self) -> u32;

    /// Total Flash capacity in bytes
    fn capacity(&self) -> u32;
}
