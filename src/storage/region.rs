//! Reserved flash window
//!
//! # Flash Layout (RP2350, 4 MB)
//!
//! ```text
//! [Firmware]       0x000000 - 0x040000 (256 KB) - never touched
//! [Record Window]  0x040000 - 0x400000 (3.75 MB)
//! ```
//!
//! Offsets accepted by the store are relative to the window base. Every check
//! here is pure and runs before any hardware access: once a sector erase has
//! started there is nothing to roll back to.

use super::StoreError;

/// Start of the record window (end of the firmware image)
pub const FLASH_TARGET_OFFSET: u32 = 256 * 1024;

/// Total flash capacity of the Pico 2 W
pub const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// Erase granularity
pub const FLASH_SECTOR_SIZE: u32 = 4096;

/// Program granularity
pub const FLASH_PAGE_SIZE: u32 = 256;

/// Window from the end of the firmware image to the end of the chip
pub const DEFAULT_REGION: FlashRegion =
    FlashRegion::new(FLASH_TARGET_OFFSET, FLASH_CAPACITY - FLASH_TARGET_OFFSET);

/// Reserved address window `[base, base + size)` of the flash device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct FlashRegion {
    base: u32,
    size: u32,
}

impl FlashRegion {
    /// Create a window
    ///
    /// `base` should be sector-aligned: erases are widened to whole sectors and
    /// an unaligned base lets the first erase reach below the window.
    pub const fn new(base: u32, size: u32) -> Self {
        Self { base, size }
    }

    /// Absolute flash address of offset 0
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Window size in bytes
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Check that `[offset, offset + len)` lies in the window
    ///
    /// Returns the absolute flash address of `offset`.
    pub fn validate(&self, offset: u32, len: usize) -> Result<u32, StoreError> {
        let fits = u32::try_from(len)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .is_some_and(|end| end <= self.size);

        match self.base.checked_add(offset) {
            Some(address) if fits => Ok(address),
            _ => Err(StoreError::OutOfBounds { offset, len }),
        }
    }

    /// Check that `offset` names a byte inside the window
    pub fn validate_erase(&self, offset: u32) -> Result<u32, StoreError> {
        if offset >= self.size {
            return Err(StoreError::OutOfBounds { offset, len: 0 });
        }
        self.base
            .checked_add(offset)
            .ok_or(StoreError::OutOfBounds { offset, len: 0 })
    }

    /// Sector-aligned `[start, end)` covering `len` bytes at `address`
    ///
    /// A zero-length range still covers the sector containing `address`.
    pub fn sector_span(address: u32, len: usize, sector_size: u32) -> (u32, u32) {
        let start = address - address % sector_size;
        let last = address.saturating_add((len as u32).saturating_sub(1));
        let end = (last - last % sector_size).saturating_add(sector_size);
        (start, end)
    }
}
