//! On-flash record codec
//!
//! # Record Format
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Write Count: u32 (little-endian)              │  Offset: 0
//! ├───────────────────────────────────────────────┤
//! │ Data Length: u32 (little-endian)              │  Offset: 4
//! ├───────────────────────────────────────────────┤
//! │ Data: [u8; 256] (zero-padded)                 │  Offset: 8
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The record is byte-packed (264 bytes, no padding). An image made entirely
//! of erased bytes (0xFF) is never a record: it marks an empty slot.

use super::StoreError;
use crate::platform::traits::ERASED_BYTE;

/// Payload capacity in bytes
pub const RECORD_CAPACITY: usize = 256;

/// Serialized record size in bytes
pub const RECORD_SIZE: usize = 4 + 4 + RECORD_CAPACITY;

/// Offset of the `data_len` field
const LEN_OFFSET: usize = 4;

/// Offset of the payload buffer
const DATA_OFFSET: usize = 8;

/// Structured record: write counter, payload length and payload buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    write_count: u32,
    data_len: u32,
    data: [u8; RECORD_CAPACITY],
}

/// Contents of a record slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Erased flash: nothing stored here
    Empty,
    /// A record was found
    Occupied(Record),
}

impl Record {
    /// Build the record that follows one with `existing_write_count`
    ///
    /// The write count wraps at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// `PayloadTooLarge` if `payload` exceeds [`RECORD_CAPACITY`].
    pub fn encode(existing_write_count: u32, payload: &[u8]) -> Result<Self, StoreError> {
        if payload.len() > RECORD_CAPACITY {
            return Err(StoreError::PayloadTooLarge {
                len: payload.len(),
                capacity: RECORD_CAPACITY,
            });
        }

        let mut data = [0u8; RECORD_CAPACITY];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            write_count: existing_write_count.wrapping_add(1),
            data_len: payload.len() as u32,
            data,
        })
    }

    /// Number of writes made to this slot since it was last erased
    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    /// Payload length in bytes
    pub fn data_len(&self) -> usize {
        self.data_len as usize
    }

    /// The meaningful payload prefix
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.data_len()]
    }

    /// Payload viewed as a C string: bytes up to the first NUL
    ///
    /// Decoded records always carry a terminator in the last byte, so this is
    /// at most `RECORD_CAPACITY - 1` bytes long.
    pub fn text(&self) -> &[u8] {
        let end = self
            .data
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(RECORD_CAPACITY);
        &self.data[..end]
    }

    /// Serialize to the on-flash layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut raw = [0u8; RECORD_SIZE];
        raw[..LEN_OFFSET].copy_from_slice(&self.write_count.to_le_bytes());
        raw[LEN_OFFSET..DATA_OFFSET].copy_from_slice(&self.data_len.to_le_bytes());
        raw[DATA_OFFSET..].copy_from_slice(&self.data);
        raw
    }
}

/// Interpret a slot image read back from flash
///
/// The erased check comes first and ignores structure. Otherwise the length
/// is clamped to capacity and the last payload byte is forced to NUL.
pub fn decode(raw: &[u8; RECORD_SIZE]) -> Slot {
    if raw.iter().all(|&b| b == ERASED_BYTE) {
        return Slot::Empty;
    }

    let mut word = [0u8; 4];
    word.copy_from_slice(&raw[..LEN_OFFSET]);
    let write_count = u32::from_le_bytes(word);
    word.copy_from_slice(&raw[LEN_OFFSET..DATA_OFFSET]);
    let data_len = u32::from_le_bytes(word).min(RECORD_CAPACITY as u32);

    let mut data = [0u8; RECORD_CAPACITY];
    data.copy_from_slice(&raw[DATA_OFFSET..]);
    data[RECORD_CAPACITY - 1] = 0;

    Slot::Occupied(Record {
        write_count,
        data_len,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(slot: Slot) -> Record {
        match slot {
            Slot::Occupied(record) => record,
            Slot::Empty => panic!("expected a record"),
        }
    }

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, 264);
    }

    #[test]
    fn test_encode_increments_count() {
        let record = Record::encode(0, b"hello").unwrap();
        assert_eq!(record.write_count(), 1);
        assert_eq!(record.data_len(), 5);
        assert_eq!(record.payload(), b"hello");

        let record = Record::encode(41, b"x").unwrap();
        assert_eq!(record.write_count(), 42);
    }

    #[test]
    fn test_encode_wraps_count() {
        let record = Record::encode(u32::MAX, b"x").unwrap();
        assert_eq!(record.write_count(), 0);
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let payload = [b'a'; RECORD_CAPACITY + 1];
        assert_eq!(
            Record::encode(0, &payload),
            Err(StoreError::PayloadTooLarge {
                len: 257,
                capacity: 256
            })
        );
        assert!(Record::encode(0, &payload[..RECORD_CAPACITY]).is_ok());
    }

    #[test]
    fn test_to_bytes_layout() {
        let raw = Record::encode(2, b"ab").unwrap().to_bytes();
        assert_eq!(&raw[0..4], &[3, 0, 0, 0]);
        assert_eq!(&raw[4..8], &[2, 0, 0, 0]);
        assert_eq!(&raw[8..10], b"ab");
        assert!(raw[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_erased_is_empty() {
        assert_eq!(decode(&[0xFF; RECORD_SIZE]), Slot::Empty);
    }

    #[test]
    fn test_decode_single_programmed_byte_is_occupied() {
        let mut raw = [0xFF; RECORD_SIZE];
        raw[100] = 0xFE;
        let record = occupied(decode(&raw));
        assert_eq!(record.write_count(), u32::MAX);
        // 0xFFFFFFFF length clamps to capacity
        assert_eq!(record.data_len(), RECORD_CAPACITY);
    }

    #[test]
    fn test_decode_zero_image_is_zero_length_record() {
        let record = occupied(decode(&[0u8; RECORD_SIZE]));
        assert_eq!(record.write_count(), 0);
        assert_eq!(record.payload(), b"");
    }

    #[test]
    fn test_decode_restores_encoded_record() {
        let original = Record::encode(6, b"persist me").unwrap();
        let record = occupied(decode(&original.to_bytes()));
        assert_eq!(record, original);
        assert_eq!(record.text(), b"persist me");
    }

    #[test]
    fn test_decode_forces_terminator() {
        let full = [b'z'; RECORD_CAPACITY];
        let raw = Record::encode(0, &full).unwrap().to_bytes();
        let record = occupied(decode(&raw));

        assert_eq!(record.text().len(), RECORD_CAPACITY - 1);
        assert_eq!(record.payload()[RECORD_CAPACITY - 1], 0);
    }

    #[test]
    fn test_text_stops_at_first_nul() {
        let record = Record::encode(0, b"ab\0cd").unwrap();
        assert_eq!(record.text(), b"ab");
        assert_eq!(record.payload(), b"ab\0cd");
    }
}
