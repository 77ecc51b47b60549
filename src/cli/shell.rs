//! Command dispatch and operator output
//!
//! The shell turns one input line into one store operation and writes the
//! outcome as text. Bad input and failed operations are reported and never
//! stop the shell.

use super::command::{parse, Command, CommandError, NumberParsing};
use crate::platform::traits::{FlashInterface, InterruptControl};
use crate::storage::{FlashStore, Slot, StoreError, RECORD_CAPACITY};
use core::fmt::{self, Write};

/// Largest raw read the shell will serve in one command
pub const RAW_READ_MAX: usize = RECORD_CAPACITY;

/// Which storage format the shell drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum StoreVariant {
    /// Framed records with a write counter and empty-slot detection
    #[default]
    Structured,
    /// Plain byte ranges; reads need an explicit length
    Raw,
}

/// Shell configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ShellConfig {
    /// Storage format
    pub variant: StoreVariant,
    /// Numeric argument parsing
    pub numbers: NumberParsing,
}

/// Operator-facing result of one command
enum Failure<'a> {
    Command(CommandError<'a>),
    Store(StoreError),
}

impl<'a> From<CommandError<'a>> for Failure<'a> {
    fn from(err: CommandError<'a>) -> Self {
        Failure::Command(err)
    }
}

impl From<StoreError> for Failure<'_> {
    fn from(err: StoreError) -> Self {
        Failure::Store(err)
    }
}

/// Bytes shown as text: up to the first NUL, invalid UTF-8 replaced
struct Text<'a>(&'a [u8]);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        for chunk in self.0[..end].utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

/// Text command shell over a [`FlashStore`]
///
/// # Example
///
/// ```
/// use pico_flash_store::cli::{Shell, ShellConfig};
/// use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
/// use pico_flash_store::storage::FlashStore;
///
/// let store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
/// let mut shell = Shell::new(store, ShellConfig::default());
///
/// let mut out = String::new();
/// shell.execute("FLASH_WRITE 0 \"hello\"", &mut out).unwrap();
/// shell.execute("FLASH_READ 0", &mut out).unwrap();
/// assert!(out.contains("Read Data: hello\nWrite Count: 1\n"));
/// ```
pub struct Shell<F: FlashInterface, I: InterruptControl> {
    store: FlashStore<F, I>,
    config: ShellConfig,
}

impl<F: FlashInterface, I: InterruptControl> Shell<F, I> {
    /// Create a shell driving `store`
    pub fn new(store: FlashStore<F, I>, config: ShellConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration
    pub fn config(&self) -> ShellConfig {
        self.config
    }

    /// Access the underlying store
    pub fn store(&self) -> &FlashStore<F, I> {
        &self.store
    }

    /// Release the underlying store
    pub fn into_store(self) -> FlashStore<F, I> {
        self.store
    }

    /// Run one command line, writing newline-terminated output to `out`
    ///
    /// Only errors from `out` itself are returned; command and storage
    /// failures are written as diagnostics.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> fmt::Result {
        crate::log_trace!("Command: {}", line);

        match self.dispatch(line, out) {
            Ok(result) => result,
            Err(Failure::Command(err)) => {
                crate::log_debug!("Malformed command: {}", err);
                writeln!(out, "{}", err)
            }
            Err(Failure::Store(err)) => writeln!(out, "Error: {}", err),
        }
    }

    /// Parse and run; the inner result is the output sink's
    fn dispatch<'a, W: Write>(
        &mut self,
        line: &'a str,
        out: &mut W,
    ) -> Result<fmt::Result, Failure<'a>> {
        let command = parse(line, self.config.numbers)?;

        let result = match (command, self.config.variant) {
            (Command::Write { offset, payload }, StoreVariant::Structured) => {
                let count = self.store.write_record(offset, payload.as_bytes())?;
                writeln!(
                    out,
                    "Data written successfully to address {} (write count {})",
                    offset, count
                )
            }
            (Command::Write { offset, payload }, StoreVariant::Raw) => {
                self.store.write_raw(offset, payload.as_bytes())?;
                writeln!(out, "Data written successfully to address {}", offset)
            }
            (Command::Read { offset, .. }, StoreVariant::Structured) => {
                match self.store.read_record(offset)? {
                    Slot::Empty => writeln!(out, "Flash sector is empty. No data available."),
                    Slot::Occupied(record) => writeln!(
                        out,
                        "Read Data: {}\nWrite Count: {}",
                        Text(record.text()),
                        record.write_count()
                    ),
                }
            }
            (Command::Read { offset, length }, StoreVariant::Raw) => {
                let token = length.ok_or(CommandError::MissingLength)?;
                let length = self.config.numbers.parse_usize(token)?;
                if length > RAW_READ_MAX {
                    return Err(StoreError::PayloadTooLarge {
                        len: length,
                        capacity: RAW_READ_MAX,
                    }
                    .into());
                }
                let mut buf = [0u8; RAW_READ_MAX];
                self.store.read_raw(offset, &mut buf[..length])?;
                writeln!(out, "Data: {}", Text(&buf[..length]))
            }
            (Command::Erase { offset }, _) => {
                self.store.erase(offset)?;
                writeln!(out, "Flash sector erased successfully at address {}.", offset)
            }
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockFlash, MockInterrupts};

    fn shell(variant: StoreVariant) -> Shell<MockFlash, MockInterrupts> {
        let store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
        Shell::new(
            store,
            ShellConfig {
                variant,
                numbers: NumberParsing::Strict,
            },
        )
    }

    fn run(shell: &mut Shell<MockFlash, MockInterrupts>, line: &str) -> String {
        let mut out = String::new();
        shell.execute(line, &mut out).unwrap();
        out
    }

    #[test]
    fn test_structured_write_and_read() {
        let mut shell = shell(StoreVariant::Structured);
        assert_eq!(
            run(&mut shell, r#"FLASH_WRITE 0 "hello""#),
            "Data written successfully to address 0 (write count 1)\n"
        );
        assert_eq!(
            run(&mut shell, "FLASH_READ 0"),
            "Read Data: hello\nWrite Count: 1\n"
        );
    }

    #[test]
    fn test_structured_read_of_empty_slot() {
        let mut shell = shell(StoreVariant::Structured);
        assert_eq!(
            run(&mut shell, "FLASH_READ 4096"),
            "Flash sector is empty. No data available.\n"
        );
    }

    #[test]
    fn test_erase_message() {
        let mut shell = shell(StoreVariant::Structured);
        assert_eq!(
            run(&mut shell, "FLASH_ERASE 4096"),
            "Flash sector erased successfully at address 4096.\n"
        );
    }

    #[test]
    fn test_command_errors_are_reported() {
        let mut shell = shell(StoreVariant::Structured);
        assert_eq!(run(&mut shell, ""), "Invalid command\n");
        assert_eq!(run(&mut shell, "HELLO"), "Unknown command: HELLO\n");
        assert_eq!(
            run(&mut shell, "FLASH_WRITE 0"),
            "Invalid data format for FLASH_WRITE\n"
        );
        assert_eq!(shell.store().flash().mutation_calls(), 0);
    }

    #[test]
    fn test_read_length_only_checked_by_raw_store() {
        let mut structured = shell(StoreVariant::Structured);
        run(&mut structured, r#"FLASH_WRITE 0 "hello""#);
        assert_eq!(
            run(&mut structured, "FLASH_READ 0 junk"),
            "Read Data: hello\nWrite Count: 1\n"
        );

        let mut raw = shell(StoreVariant::Raw);
        assert_eq!(run(&mut raw, "FLASH_READ 0 junk"), "Invalid number: junk\n");
        assert_eq!(raw.store().flash().read_calls(), 0);
    }

    #[test]
    fn test_store_errors_are_reported() {
        let mut shell = shell(StoreVariant::Structured);
        assert_eq!(
            run(&mut shell, r#"FLASH_WRITE 4000000 "x""#),
            "Error: operation exceeds flash memory limit (offset 4000000, length 264)\n"
        );
    }

    #[test]
    fn test_raw_write_and_read() {
        let mut shell = shell(StoreVariant::Raw);
        assert_eq!(
            run(&mut shell, r#"FLASH_WRITE 32 "raw text""#),
            "Data written successfully to address 32\n"
        );
        assert_eq!(run(&mut shell, "FLASH_READ 32 8"), "Data: raw text\n");
        assert_eq!(run(&mut shell, "FLASH_READ 32 3"), "Data: raw\n");
    }

    #[test]
    fn test_raw_read_requires_length() {
        let mut shell = shell(StoreVariant::Raw);
        assert_eq!(
            run(&mut shell, "FLASH_READ 0"),
            "Invalid length for FLASH_READ\n"
        );
    }

    #[test]
    fn test_raw_read_caps_length() {
        let mut shell = shell(StoreVariant::Raw);
        assert_eq!(
            run(&mut shell, "FLASH_READ 0 1000"),
            "Error: payload of 1000 bytes exceeds capacity of 256 bytes\n"
        );
    }

    #[test]
    fn test_raw_read_of_erased_flash_is_lossy() {
        let mut shell = shell(StoreVariant::Raw);
        assert_eq!(run(&mut shell, "FLASH_READ 0 2"), "Data: \u{FFFD}\u{FFFD}\n");
    }

    #[test]
    fn test_text_stops_at_nul() {
        assert_eq!(format!("{}", Text(b"ab\0cd")), "ab");
        assert_eq!(format!("{}", Text(b"")), "");
    }
}
