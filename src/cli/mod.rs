//! Line-oriented operator interface
//!
//! - [`line_editor`]: turns terminal bytes into edited lines
//! - [`command`]: parses a line into a [`Command`]
//! - [`shell`]: runs commands against a store and formats the replies

pub mod command;
pub mod line_editor;
pub mod shell;

use core::fmt::{self, Write};

pub use command::{parse, Command, CommandError, NumberParsing, Verb};
pub use line_editor::{LineEditor, LineEvent, ERASE_ECHO};
pub use shell::{Shell, ShellConfig, StoreVariant, RAW_READ_MAX};

/// Longest command line accepted from the console
pub const LINE_CAPACITY: usize = 255;

/// Prompt printed before every line
pub const PROMPT: &str = "\nEnter command: ";

/// Print the startup banner with the usage for `variant`
pub fn write_banner<W: Write>(out: &mut W, variant: StoreVariant) -> fmt::Result {
    writeln!(out, "Pico Flash Storage CLI")?;
    writeln!(out, "Available commands:")?;
    writeln!(out, "  FLASH_WRITE <offset> \"data\"")?;
    match variant {
        StoreVariant::Structured => writeln!(out, "  FLASH_READ <offset>")?,
        StoreVariant::Raw => writeln!(out, "  FLASH_READ <offset> <length>")?,
    }
    writeln!(out, "  FLASH_ERASE <offset>")
}
