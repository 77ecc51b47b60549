//! Storage error types

use crate::platform::error::{FlashError, PlatformError};
use core::fmt;

/// Record store error
///
/// Every variant except `Flash` is raised before any hardware access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum StoreError {
    /// `[offset, offset + len)` leaves the reserved window
    OutOfBounds {
        /// Offset relative to the window base
        offset: u32,
        /// Length of the requested range
        len: usize,
    },
    /// Payload longer than the record (or read buffer) capacity
    PayloadTooLarge {
        /// Requested length
        len: usize,
        /// Maximum accepted length
        capacity: usize,
    },
    /// Flash driver reported a failure; the operation was abandoned
    Flash(FlashError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::OutOfBounds { offset, len } => write!(
                f,
                "operation exceeds flash memory limit (offset {}, length {})",
                offset, len
            ),
            StoreError::PayloadTooLarge { len, capacity } => write!(
                f,
                "payload of {} bytes exceeds capacity of {} bytes",
                len, capacity
            ),
            StoreError::Flash(e) => write!(f, "flash {}", e),
        }
    }
}

impl From<FlashError> for StoreError {
    fn from(err: FlashError) -> Self {
        StoreError::Flash(err)
    }
}

impl From<PlatformError> for StoreError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Flash(flash_err) => StoreError::Flash(flash_err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_maps_to_flash() {
        let err: StoreError = PlatformError::Flash(FlashError::EraseFailed).into();
        assert_eq!(err, StoreError::Flash(FlashError::EraseFailed));
    }

    #[test]
    fn test_display_messages() {
        let err = StoreError::OutOfBounds {
            offset: 0x3C0000,
            len: 264,
        };
        assert_eq!(
            format!("{}", err),
            "operation exceeds flash memory limit (offset 3932160, length 264)"
        );

        let err = StoreError::PayloadTooLarge {
            len: 300,
            capacity: 256,
        };
        assert_eq!(
            format!("{}", err),
            "payload of 300 bytes exceeds capacity of 256 bytes"
        );

        let err = StoreError::Flash(FlashError::WriteFailed);
        assert_eq!(format!("{}", err), "flash program failed");
    }
}
