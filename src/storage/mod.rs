//! Persistent record storage on raw NOR flash
//!
//! The store owns a flash handle and an interrupt controller and exposes
//! write/read/erase at caller-chosen offsets inside a reserved window.
//!
//! # Layers
//!
//! - [`region`]: the reserved window and its bounds checks
//! - [`record`]: the 264-byte on-flash record and erased-slot detection
//! - [`store`]: erase-then-program transactions under a masked-interrupt guard
//!
//! # Example
//!
//! ```
//! use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
//! use pico_flash_store::storage::{FlashStore, Slot};
//!
//! let mut store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
//! assert_eq!(store.write_record(0, b"hello").unwrap(), 1);
//!
//! match store.read_record(0).unwrap() {
//!     Slot::Occupied(record) => assert_eq!(record.payload(), b"hello"),
//!     Slot::Empty => unreachable!(),
//! }
//! ```

pub mod error;
pub mod record;
pub mod region;
pub mod store;

pub use error::StoreError;
pub use record::{decode, Record, Slot, RECORD_CAPACITY, RECORD_SIZE};
pub use region::{FlashRegion, DEFAULT_REGION, FLASH_TARGET_OFFSET};
pub use store::FlashStore;
