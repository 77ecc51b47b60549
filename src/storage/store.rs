//! Flash transaction executor
//!
//! Every mutating operation follows the same sequence:
//!
//! 1. Validate the range against the [`FlashRegion`] (no hardware access on failure)
//! 2. Mask interrupts with an [`InterruptGuard`]
//! 3. Erase every sector the range overlaps
//! 4. Program the new bytes
//! 5. Drop the guard, restoring the saved interrupt state
//!
//! Reads are memory-mapped and run with interrupts enabled.

use super::record::{decode, Record, Slot, RECORD_CAPACITY, RECORD_SIZE};
use super::region::{FlashRegion, DEFAULT_REGION};
use super::StoreError;
use crate::platform::traits::{FlashInterface, InterruptControl, InterruptGuard};

/// Record store over a flash device
///
/// Owns the flash handle and the interrupt controller; nothing else in the
/// program touches either.
///
/// # Example
///
/// ```
/// use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
/// use pico_flash_store::storage::{FlashStore, Slot};
///
/// let mut store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
///
/// store.write_record(0, b"a").unwrap();
/// assert_eq!(store.write_record(0, b"a").unwrap(), 2);
///
/// store.erase(0).unwrap();
/// assert_eq!(store.read_record(0).unwrap(), Slot::Empty);
/// ```
pub struct FlashStore<F: FlashInterface, I: InterruptControl> {
    flash: F,
    interrupts: I,
    region: FlashRegion,
}

impl<F: FlashInterface, I: InterruptControl> FlashStore<F, I> {
    /// Create a store over the default window
    pub fn new(flash: F, interrupts: I) -> Self {
        Self::with_region(flash, interrupts, DEFAULT_REGION)
    }

    /// Create a store over a custom window
    pub fn with_region(flash: F, interrupts: I, region: FlashRegion) -> Self {
        Self {
            flash,
            interrupts,
            region,
        }
    }

    /// The window this store operates in
    pub fn region(&self) -> FlashRegion {
        self.region
    }

    /// Access the flash device
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Access the interrupt controller
    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }

    /// Release the flash device and interrupt controller
    pub fn into_parts(self) -> (F, I) {
        (self.flash, self.interrupts)
    }

    /// Write a structured record at `offset`
    ///
    /// Reads the current record to carry its write count forward (an empty
    /// slot counts as 0), then erases and programs the new image. Any other
    /// data in the affected sector(s) is lost.
    ///
    /// Returns the new write count.
    pub fn write_record(&mut self, offset: u32, payload: &[u8]) -> Result<u32, StoreError> {
        let address = self.checked(self.region.validate(offset, RECORD_SIZE))?;

        if payload.len() > RECORD_CAPACITY {
            return self.checked(Err(StoreError::PayloadTooLarge {
                len: payload.len(),
                capacity: RECORD_CAPACITY,
            }));
        }

        let previous = match self.load(address)? {
            Slot::Empty => 0,
            Slot::Occupied(record) => record.write_count(),
        };

        let record = Record::encode(previous, payload)?;
        self.commit(address, &record.to_bytes())?;

        crate::log_info!(
            "Record written at offset {} (write count {})",
            offset,
            record.write_count()
        );
        Ok(record.write_count())
    }

    /// Read the record slot at `offset`
    pub fn read_record(&mut self, offset: u32) -> Result<Slot, StoreError> {
        let address = self.checked(self.region.validate(offset, RECORD_SIZE))?;
        self.load(address)
    }

    /// Write `bytes` verbatim at `offset`
    ///
    /// Same erase-then-program sequence as [`write_record`](Self::write_record)
    /// without the record framing.
    pub fn write_raw(&mut self, offset: u32, bytes: &[u8]) -> Result<(), StoreError> {
        let address = self.checked(self.region.validate(offset, bytes.len()))?;
        self.commit(address, bytes)?;

        crate::log_info!("Raw write of {} bytes at offset {}", bytes.len(), offset);
        Ok(())
    }

    /// Fill `buf` from `offset`
    ///
    /// `buf` is cleared first, so on a flash error it never holds stale data.
    pub fn read_raw(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        let address = self.checked(self.region.validate(offset, buf.len()))?;
        buf.fill(0);
        self.flash.read(address, buf)?;
        Ok(())
    }

    /// Erase the sector(s) a record at `offset` would occupy
    ///
    /// Covers the same span as [`write_record`](Self::write_record), clipped
    /// to the window, so a record straddling a sector boundary leaves no tail
    /// behind. Erasing an already-erased sector still issues the hardware
    /// erase.
    pub fn erase(&mut self, offset: u32) -> Result<(), StoreError> {
        let address = self.checked(self.region.validate_erase(offset))?;
        let len = RECORD_SIZE.min((self.region.size() - offset) as usize);
        let (start, end) = FlashRegion::sector_span(address, len, self.flash.sector_size());

        {
            let guard = InterruptGuard::new(&mut self.interrupts);
            crate::log_debug!("Erasing 0x{:x}..0x{:x}", start, end);
            self.flash.erase(guard.masked(), start, end - start)?;
        }

        crate::log_info!("Sector erased at offset {}", offset);
        Ok(())
    }

    /// Read and decode the slot at absolute `address`
    fn load(&mut self, address: u32) -> Result<Slot, StoreError> {
        let mut raw = [0u8; RECORD_SIZE];
        self.flash.read(address, &mut raw)?;
        Ok(decode(&raw))
    }

    /// Erase the sectors covering `bytes` at `address`, then program them
    fn commit(&mut self, address: u32, bytes: &[u8]) -> Result<(), StoreError> {
        let (start, end) = FlashRegion::sector_span(address, bytes.len(), self.flash.sector_size());

        let guard = InterruptGuard::new(&mut self.interrupts);
        crate::log_debug!("Erasing 0x{:x}..0x{:x}", start, end);
        self.flash.erase(guard.masked(), start, end - start)?;
        crate::log_debug!("Programming {} bytes at 0x{:x}", bytes.len(), address);
        self.flash.program(guard.masked(), address, bytes)?;

        Ok(())
    }

    /// Log a rejected operation on its way out
    fn checked<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(err) = &result {
            crate::log_warn!("Rejected flash operation: {}", err);
        }
        result
    }
}
