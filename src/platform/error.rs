//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PlatformError {
    /// Flash operation failed
    Flash(FlashError),
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum FlashError {
    /// Erase operation failed
    EraseFailed,
    /// Program operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
    /// Address outside the device or inside the firmware image
    InvalidAddress,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Flash(e) => write!(f, "Flash error: {}", e),
        }
    }
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::EraseFailed => write!(f, "sector erase failed"),
            FlashError::WriteFailed => write!(f, "program failed"),
            FlashError::ReadFailed => write!(f, "read failed"),
            FlashError::InvalidAddress => write!(f, "invalid flash address"),
        }
    }
}

// From implementations for error conversion
impl From<FlashError> for PlatformError {
    fn from(error: FlashError) -> Self {
        PlatformError::Flash(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_error_conversion() {
        let err: PlatformError = FlashError::EraseFailed.into();
        assert_eq!(err, PlatformError::Flash(FlashError::EraseFailed));
    }

    #[test]
    fn test_display_includes_cause() {
        let err = PlatformError::Flash(FlashError::InvalidAddress);
        assert_eq!(format!("{}", err), "Flash error: invalid flash address");
    }
}
