//! RP2350 Flash implementation
//!
//! This module provides Flash storage support for RP2350 using ROM functions.
//!
//! # Flash Layout
//!
//! ```text
//! [Firmware]           0x000000 - 0x040000 (256 KB) - PROTECTED
//! [Record Window]      0x040000 - 0x400000 (3.75 MB)
//! ```
//!
//! # Safety
//!
//! Flash operations use unsafe ROM functions and must:
//! - Run with interrupts masked (XIP inaccessible); the caller's [`Masked`] token proves it
//! - Not access XIP memory during erase/program
//! - Validate addresses are not in firmware region

use crate::platform::{
    error::FlashError,
    traits::{FlashInterface, Masked, ERASED_BYTE},
    Result,
};
use rp235x_hal::rom_data;

/// Minimum firmware size (protect first 256 KB)
const FIRMWARE_SIZE: u32 = 0x40000;

/// Flash sector size (minimum erase unit)
const SECTOR_SIZE: u32 = 4096;

/// Flash page size (program granularity)
const PAGE_SIZE: usize = 256;

/// Flash sector erase command (0x20 for 4KB sector)
const SECTOR_ERASE_CMD: u8 = 0x20;

/// Total Flash capacity for Pico 2 W
const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// Flash is memory-mapped here for reads
const XIP_BASE: usize = 0x1000_0000;

/// RP2350 Flash implementation
///
/// Provides Flash read/program/erase operations using RP2350 ROM functions.
///
/// # Important
///
/// - Flash operations are blocking (a sector erase takes tens of milliseconds)
/// - XIP is inaccessible during erase/program (other core will fault)
/// - Firmware region (0x000000-0x03FFFF) is protected from writes
/// - Programs are issued in whole pages; bytes outside the request are padded
///   with 0xFF so they are left untouched
///
/// # Example
///
/// ```no_run
/// use pico_flash_store::platform::rp2350::{CortexInterrupts, Rp2350Flash};
/// use pico_flash_store::platform::traits::{FlashInterface, InterruptGuard};
///
/// let mut flash = Rp2350Flash::new();
/// let mut irq = CortexInterrupts::new();
///
/// {
///     let guard = InterruptGuard::new(&mut irq);
///     flash.erase(guard.masked(), 0x040000, 4096).unwrap();
///     flash.program(guard.masked(), 0x040000, b"DATA").unwrap();
/// }
///
/// let mut buf = [0u8; 4];
/// flash.read(0x040000, &mut buf).unwrap();
/// assert_eq!(&buf, b"DATA");
/// ```
pub struct Rp2350Flash {
    /// Staging page for programs that are not page-aligned
    page: [u8; PAGE_SIZE],
}

impl Rp2350Flash {
    /// Create a new RP2350 Flash instance
    pub fn new() -> Self {
        Self {
            page: [ERASED_BYTE; PAGE_SIZE],
        }
    }

    /// Check if `[address, address + len)` is in the writable region
    fn is_writable(&self, address: u32, len: usize) -> bool {
        let Ok(len) = u32::try_from(len) else {
            return false;
        };
        address >= FIRMWARE_SIZE
            && address
                .checked_add(len)
                .is_some_and(|end| end <= FLASH_CAPACITY)
    }

    /// Check if address is sector-aligned
    fn is_sector_aligned(&self, address: u32) -> bool {
        address.is_multiple_of(SECTOR_SIZE)
    }

    /// Execute Flash operation with XIP disabled
    ///
    /// # Safety
    ///
    /// - Interrupts must be masked for the whole call
    /// - XIP is inaccessible (other core will fault if accessing Flash)
    /// - Must not access XIP memory in the closure
    #[inline(never)]
    #[link_section = ".data.ram_func"]
    unsafe fn with_xip_disabled<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // SAFETY: Prepare Flash for serial operations
        // This must be called before any erase/program operations
        rom_data::connect_internal_flash();
        rom_data::flash_exit_xip();

        let result = f();

        // SAFETY: Flush cache so the next XIP read sees the new contents
        rom_data::flash_flush_cache();
        rom_data::flash_enter_cmd_xip();

        result
    }
}

impl Default for Rp2350Flash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for Rp2350Flash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if address as usize + buf.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress.into());
        }

        let flash_ptr = (XIP_BASE + address as usize) as *const u8;

        // SAFETY: We validated the address range above, and XIP is enabled
        // whenever no erase/program is running
        unsafe {
            core::ptr::copy_nonoverlapping(flash_ptr, buf.as_mut_ptr(), buf.len());
        }

        Ok(())
    }

    fn program(&mut self, _masked: Masked<'_>, address: u32, data: &[u8]) -> Result<()> {
        if !self.is_writable(address, data.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let mut remaining = data;
        let mut cursor = address;

        while !remaining.is_empty() {
            let page_start = cursor - cursor % PAGE_SIZE as u32;
            let in_page = (cursor - page_start) as usize;
            let chunk = remaining.len().min(PAGE_SIZE - in_page);

            self.page.fill(ERASED_BYTE);
            self.page[in_page..in_page + chunk].copy_from_slice(&remaining[..chunk]);

            let page = self.page.as_ptr();
            // SAFETY: interrupts are masked (token), the range was validated
            // and the staging page lives in RAM
            unsafe {
                Self::with_xip_disabled(|| {
                    rom_data::flash_range_program(page_start, page, PAGE_SIZE);
                });
            }

            remaining = &remaining[chunk..];
            cursor += chunk as u32;
        }

        Ok(())
    }

    fn erase(&mut self, _masked: Masked<'_>, address: u32, size: u32) -> Result<()> {
        if !self.is_writable(address, size as usize) {
            return Err(FlashError::InvalidAddress.into());
        }

        if !self.is_sector_aligned(address) || !size.is_multiple_of(SECTOR_SIZE) {
            return Err(FlashError::InvalidAddress.into());
        }

        // SAFETY: interrupts are masked (token) and the range was validated
        unsafe {
            Self::with_xip_disabled(|| {
                rom_data::flash_range_erase(address, size as usize, SECTOR_SIZE, SECTOR_ERASE_CMD);
            });
        }

        Ok(())
    }

    fn sector_size(&self) -> u32 {
        SECTOR_SIZE
    }

    fn capacity(&self) -> u32 {
        FLASH_CAPACITY
    }
}
