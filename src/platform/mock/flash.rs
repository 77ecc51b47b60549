//! Mock Flash implementation for testing
//!
//! Provides in-memory Flash simulation for unit tests.

use super::interrupt::MaskProbe;
use crate::platform::{
    error::FlashError,
    traits::{FlashInterface, Masked, ERASED_BYTE},
    Result,
};
use std::vec::Vec;

/// Flash sector size (4 KB)
const SECTOR_SIZE: u32 = 4096;

/// Flash capacity (4 MB, same as Pico 2 W)
const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// Minimum firmware size (protect first 256 KB)
const FIRMWARE_SIZE: u32 = 0x40000;

/// Mock Flash implementation
///
/// Simulates NOR Flash in memory for testing. Supports:
/// - Read/program/erase with real NOR semantics (program can only clear bits)
/// - Call counters so tests can assert that no hardware access happened
/// - Per-sector erase counts
/// - Fault injection for read/erase/program failures
/// - An optional [`MaskProbe`] that records mutations made with interrupts enabled
///
/// # Example
///
/// ```
/// use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
/// use pico_flash_store::platform::traits::{FlashInterface, InterruptGuard};
///
/// let mut flash = MockFlash::new();
/// let mut irq = MockInterrupts::new();
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
/// assert_eq!(flash.get_erase_count(0x040000), 1);
/// ```
#[derive(Debug)]
pub struct MockFlash {
    /// Flash storage (initialized to 0xFF - erased state)
    storage: Vec<u8>,
    /// Erase count per sector
    erase_counts: Vec<u32>,
    /// Number of `read` calls
    reads: u32,
    /// Number of `program` calls
    programs: u32,
    /// Number of `erase` calls
    erases: u32,
    /// Fail the next read with `ReadFailed`
    fail_next_read: bool,
    /// Fail the next erase with `EraseFailed`
    fail_next_erase: bool,
    /// Fail the next program with `WriteFailed`
    fail_next_program: bool,
    /// Interrupt mask observer
    probe: Option<MaskProbe>,
    /// Mutations performed while the probe reported interrupts enabled
    unmasked_mutations: u32,
}

impl MockFlash {
    /// Create a new mock Flash instance, fully erased
    pub fn new() -> Self {
        let sector_count = (FLASH_CAPACITY / SECTOR_SIZE) as usize;

        Self {
            storage: vec![ERASED_BYTE; FLASH_CAPACITY as usize],
            erase_counts: vec![0; sector_count],
            reads: 0,
            programs: 0,
            erases: 0,
            fail_next_read: false,
            fail_next_erase: false,
            fail_next_program: false,
            probe: None,
            unmasked_mutations: 0,
        }
    }

    /// Attach an interrupt mask observer
    ///
    /// Every erase/program then checks that the mask is held.
    pub fn with_probe(mut self, probe: MaskProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Get Flash contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> Vec<u8> {
        self.storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Inject corruption at address (for testing decoding of damaged data)
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA; // Corrupt pattern
        }
    }

    /// Get erase count for the sector containing `address`
    pub fn get_erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / SECTOR_SIZE) as usize]
    }

    /// Number of `read` calls so far
    pub fn read_calls(&self) -> u32 {
        self.reads
    }

    /// Number of `program` calls so far
    pub fn program_calls(&self) -> u32 {
        self.programs
    }

    /// Number of `erase` calls so far
    pub fn erase_calls(&self) -> u32 {
        self.erases
    }

    /// Total number of mutating calls (erase + program)
    pub fn mutation_calls(&self) -> u32 {
        self.programs + self.erases
    }

    /// Erase/program calls observed while interrupts were enabled
    pub fn unmasked_mutations(&self) -> u32 {
        self.unmasked_mutations
    }

    /// Make the next read fail with `ReadFailed`
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }

    /// Make the next erase fail with `EraseFailed`
    pub fn fail_next_erase(&mut self) {
        self.fail_next_erase = true;
    }

    /// Make the next program fail with `WriteFailed`
    pub fn fail_next_program(&mut self) {
        self.fail_next_program = true;
    }

    /// Check if address is in writable region
    fn is_writable(&self, address: u32) -> bool {
        (FIRMWARE_SIZE..FLASH_CAPACITY).contains(&address)
    }

    /// Check if address is sector-aligned
    fn is_sector_aligned(&self, address: u32) -> bool {
        address.is_multiple_of(SECTOR_SIZE)
    }

    fn observe_mask(&mut self) {
        if let Some(probe) = &self.probe {
            if !probe.is_masked() {
                self.unmasked_mutations += 1;
            }
        }
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.reads += 1;

        // Validate address range
        if address as usize + buf.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress.into());
        }

        if core::mem::take(&mut self.fail_next_read) {
            return Err(FlashError::ReadFailed.into());
        }

        buf.copy_from_slice(&self.storage[address as usize..(address as usize + buf.len())]);

        Ok(())
    }

    fn program(&mut self, _masked: Masked<'_>, address: u32, data: &[u8]) -> Result<()> {
        self.programs += 1;
        self.observe_mask();

        // Validate address is in writable region
        if !self.is_writable(address) {
            return Err(FlashError::InvalidAddress.into());
        }

        // Validate program doesn't exceed capacity
        if address as usize + data.len() > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress.into());
        }

        if core::mem::take(&mut self.fail_next_program) {
            return Err(FlashError::WriteFailed.into());
        }

        // Flash can only change bits from 1→0 (simulate this behavior)
        let target = &mut self.storage[address as usize..address as usize + data.len()];
        for (byte, new) in target.iter_mut().zip(data) {
            *byte &= *new;
        }

        Ok(())
    }

    fn erase(&mut self, _masked: Masked<'_>, address: u32, size: u32) -> Result<()> {
        self.erases += 1;
        self.observe_mask();

        // Validate address is in writable region
        if !self.is_writable(address) {
            return Err(FlashError::InvalidAddress.into());
        }

        // Validate address is sector-aligned
        if !self.is_sector_aligned(address) {
            return Err(FlashError::InvalidAddress.into());
        }

        // Validate size is multiple of sector size
        if !size.is_multiple_of(SECTOR_SIZE) {
            return Err(FlashError::InvalidAddress.into());
        }

        // Validate erase doesn't exceed capacity
        if address as u64 + size as u64 > FLASH_CAPACITY as u64 {
            return Err(FlashError::InvalidAddress.into());
        }

        if core::mem::take(&mut self.fail_next_erase) {
            return Err(FlashError::EraseFailed.into());
        }

        self.storage[address as usize..(address + size) as usize].fill(ERASED_BYTE);

        let start_sector = (address / SECTOR_SIZE) as usize;
        let sector_count = (size / SECTOR_SIZE) as usize;
        for count in &mut self.erase_counts[start_sector..start_sector + sector_count] {
            *count += 1;
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
