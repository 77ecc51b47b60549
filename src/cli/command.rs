//! Command line parsing
//!
//! Grammar (one command per line, verbs are case-sensitive):
//!
//! ```text
//! FLASH_WRITE <offset> "<payload>"
//! FLASH_READ <offset> [<length>]
//! FLASH_ERASE <offset>
//! ```
//!
//! The payload runs from the first `"` after the offset to the next `"` (or
//! the end of the line), so embedded spaces survive. Parsed commands borrow
//! from the input line.

use core::fmt;

/// Command verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum Verb {
    /// `FLASH_WRITE`
    Write,
    /// `FLASH_READ`
    Read,
    /// `FLASH_ERASE`
    Erase,
}

impl Verb {
    /// Keyword as typed by the operator
    pub fn keyword(self) -> &'static str {
        match self {
            Verb::Write => "FLASH_WRITE",
            Verb::Read => "FLASH_READ",
            Verb::Erase => "FLASH_ERASE",
        }
    }

    fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "FLASH_WRITE" => Some(Verb::Write),
            "FLASH_READ" => Some(Verb::Read),
            "FLASH_ERASE" => Some(Verb::Erase),
            _ => None,
        }
    }
}

/// Parsed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Store `payload` at `offset`
    Write {
        /// Offset inside the record window
        offset: u32,
        /// Text between the quotes
        payload: &'a str,
    },
    /// Read the record (or `length` raw bytes) at `offset`
    Read {
        /// Offset inside the record window
        offset: u32,
        /// Byte count token; only the raw store parses it
        length: Option<&'a str>,
    },
    /// Erase the sector(s) holding the record at `offset`
    Erase {
        /// Offset inside the record window
        offset: u32,
    },
}

/// How numeric arguments are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum NumberParsing {
    /// Plain decimal; anything else is an error
    Strict,
    /// C `atoi`: optional sign, leading digits, anything unparsable is 0,
    /// negative values wrap
    Lenient,
}

impl Default for NumberParsing {
    fn default() -> Self {
        if cfg!(feature = "lenient-numbers") {
            NumberParsing::Lenient
        } else {
            NumberParsing::Strict
        }
    }
}

impl NumberParsing {
    /// Parse an offset
    pub fn parse_u32<'a>(self, token: &'a str) -> Result<u32, CommandError<'a>> {
        match self {
            NumberParsing::Strict => token
                .parse::<u32>()
                .map_err(|_| CommandError::InvalidNumber(token)),
            NumberParsing::Lenient => Ok(atoi(token)),
        }
    }

    /// Parse a byte count
    pub fn parse_usize<'a>(self, token: &'a str) -> Result<usize, CommandError<'a>> {
        match self {
            NumberParsing::Strict => token
                .parse::<usize>()
                .map_err(|_| CommandError::InvalidNumber(token)),
            NumberParsing::Lenient => Ok(atoi(token) as usize),
        }
    }
}

fn atoi(token: &str) -> u32 {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| {
            acc.wrapping_mul(10).wrapping_add(u32::from(d - b'0'))
        });

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Malformed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum CommandError<'a> {
    /// Blank line
    InvalidCommand,
    /// Verb given without an offset
    MissingOffset(Verb),
    /// `FLASH_WRITE` without a quoted, non-empty payload
    MissingPayload,
    /// Raw `FLASH_READ` without a length
    MissingLength,
    /// Numeric argument rejected by strict parsing
    InvalidNumber(&'a str),
    /// Verb not recognised
    UnknownCommand(&'a str),
}

impl fmt::Display for CommandError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidCommand => write!(f, "Invalid command"),
            CommandError::MissingOffset(Verb::Write) => {
                write!(f, "FLASH_WRITE requires an address and data")
            }
            CommandError::MissingOffset(verb) => write!(f, "{} requires an address", verb.keyword()),
            CommandError::MissingPayload => write!(f, "Invalid data format for FLASH_WRITE"),
            CommandError::MissingLength => write!(f, "Invalid length for FLASH_READ"),
            CommandError::InvalidNumber(token) => write!(f, "Invalid number: {}", token),
            CommandError::UnknownCommand(token) => write!(f, "Unknown command: {}", token),
        }
    }
}

/// Split off the next whitespace-delimited token
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some(input.split_at(end))
}

/// Parse one command line
pub fn parse(line: &str, numbers: NumberParsing) -> Result<Command<'_>, CommandError<'_>> {
    let (verb_token, rest) = next_token(line).ok_or(CommandError::InvalidCommand)?;
    let verb = Verb::from_keyword(verb_token).ok_or(CommandError::UnknownCommand(verb_token))?;

    let (offset_token, rest) = next_token(rest).ok_or(CommandError::MissingOffset(verb))?;
    let offset = numbers.parse_u32(offset_token)?;

    match verb {
        Verb::Write => {
            let open = rest.find('"').ok_or(CommandError::MissingPayload)?;
            let body = &rest[open + 1..];
            let payload = match body.find('"') {
                Some(close) => &body[..close],
                None => body,
            };
            if payload.is_empty() {
                return Err(CommandError::MissingPayload);
            }
            Ok(Command::Write { offset, payload })
        }
        Verb::Read => {
            let length = next_token(rest).map(|(token, _)| token);
            Ok(Command::Read { offset, length })
        }
        Verb::Erase => Ok(Command::Erase { offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: NumberParsing = NumberParsing::Strict;
    const LENIENT: NumberParsing = NumberParsing::Lenient;

    #[test]
    fn test_parse_write() {
        assert_eq!(
            parse(r#"FLASH_WRITE 0 "hello""#, STRICT),
            Ok(Command::Write {
                offset: 0,
                payload: "hello"
            })
        );
    }

    #[test]
    fn test_parse_write_keeps_spaces() {
        assert_eq!(
            parse(r#"FLASH_WRITE 4096 "hello  flash world""#, STRICT),
            Ok(Command::Write {
                offset: 4096,
                payload: "hello  flash world"
            })
        );
    }

    #[test]
    fn test_parse_write_unterminated_quote() {
        assert_eq!(
            parse(r#"FLASH_WRITE 8 "to the end"#, STRICT),
            Ok(Command::Write {
                offset: 8,
                payload: "to the end"
            })
        );
    }

    #[test]
    fn test_parse_write_missing_parts() {
        assert_eq!(
            parse("FLASH_WRITE", STRICT),
            Err(CommandError::MissingOffset(Verb::Write))
        );
        assert_eq!(
            parse("FLASH_WRITE 0", STRICT),
            Err(CommandError::MissingPayload)
        );
        assert_eq!(
            parse("FLASH_WRITE 0 hello", STRICT),
            Err(CommandError::MissingPayload)
        );
        assert_eq!(
            parse(r#"FLASH_WRITE 0 """#, STRICT),
            Err(CommandError::MissingPayload)
        );
    }

    #[test]
    fn test_parse_read() {
        assert_eq!(
            parse("FLASH_READ 0", STRICT),
            Ok(Command::Read {
                offset: 0,
                length: None
            })
        );
        assert_eq!(
            parse("FLASH_READ 16 32", STRICT),
            Ok(Command::Read {
                offset: 16,
                length: Some("32")
            })
        );
        assert_eq!(
            parse("FLASH_READ", STRICT),
            Err(CommandError::MissingOffset(Verb::Read))
        );
    }

    #[test]
    fn test_parse_erase() {
        assert_eq!(
            parse("  FLASH_ERASE   4096  ", STRICT),
            Ok(Command::Erase { offset: 4096 })
        );
        assert_eq!(
            parse("FLASH_ERASE", STRICT),
            Err(CommandError::MissingOffset(Verb::Erase))
        );
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse("", STRICT), Err(CommandError::InvalidCommand));
        assert_eq!(parse("   ", STRICT), Err(CommandError::InvalidCommand));
        assert_eq!(
            parse("flash_read 0", STRICT),
            Err(CommandError::UnknownCommand("flash_read"))
        );
    }

    #[test]
    fn test_strict_rejects_garbage_numbers() {
        assert_eq!(
            parse("FLASH_ERASE abc", STRICT),
            Err(CommandError::InvalidNumber("abc"))
        );
        assert_eq!(
            parse("FLASH_READ -1", STRICT),
            Err(CommandError::InvalidNumber("-1"))
        );
    }

    #[test]
    fn test_read_length_left_unparsed() {
        assert_eq!(
            parse("FLASH_READ 0 ten", STRICT),
            Ok(Command::Read {
                offset: 0,
                length: Some("ten")
            })
        );
    }

    #[test]
    fn test_lenient_follows_atoi() {
        assert_eq!(parse("FLASH_ERASE abc", LENIENT), Ok(Command::Erase { offset: 0 }));
        assert_eq!(parse("FLASH_ERASE 12ab", LENIENT), Ok(Command::Erase { offset: 12 }));
        assert_eq!(
            parse("FLASH_ERASE -1", LENIENT),
            Ok(Command::Erase { offset: u32::MAX })
        );
        assert_eq!(parse("FLASH_ERASE +7", LENIENT), Ok(Command::Erase { offset: 7 }));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            format!("{}", CommandError::MissingOffset(Verb::Write)),
            "FLASH_WRITE requires an address and data"
        );
        assert_eq!(
            format!("{}", CommandError::MissingOffset(Verb::Read)),
            "FLASH_READ requires an address"
        );
        assert_eq!(
            format!("{}", CommandError::UnknownCommand("HELP")),
            "Unknown command: HELP"
        );
    }

    #[test]
    fn test_default_number_parsing() {
        let expected = if cfg!(feature = "lenient-numbers") {
            NumberParsing::Lenient
        } else {
            NumberParsing::Strict
        };
        assert_eq!(NumberParsing::default(), expected);
    }
}
