//! Flash record store console on the host
//!
//! Runs the same shell as the firmware against the in-memory mock flash,
//! reading commands from stdin. Contents are lost on exit.
//!
//! # Usage
//!
//! ```bash
//! cargo run --features mock --example host_shell
//! cargo run --features mock --example host_shell -- --raw --lenient
//! ```

use std::io::{self, BufRead, Write};

use pico_flash_store::cli::{
    write_banner, NumberParsing, Shell, ShellConfig, StoreVariant, PROMPT,
};
use pico_flash_store::platform::mock::{MockFlash, MockInterrupts};
use pico_flash_store::storage::FlashStore;

fn main() -> io::Result<()> {
    let mut config = ShellConfig::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--raw" => config.variant = StoreVariant::Raw,
            "--lenient" => config.numbers = NumberParsing::Lenient,
            "--strict" => config.numbers = NumberParsing::Strict,
            other => {
                eprintln!("unknown option: {}", other);
                eprintln!("usage: host_shell [--raw] [--lenient|--strict]");
                std::process::exit(2);
            }
        }
    }

    let store = FlashStore::new(MockFlash::new(), MockInterrupts::new());
    let mut shell = Shell::new(store, config);

    let mut reply = String::new();
    write_banner(&mut reply, config.variant).map_err(io::Error::other)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(reply.as_bytes())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        out.write_all(PROMPT.as_bytes())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        reply.clear();
        shell
            .execute(line.trim_end_matches(['\r', '\n']), &mut reply)
            .map_err(io::Error::other)?;
        out.write_all(b"\n")?;
        out.write_all(reply.as_bytes())?;
    }

    out.write_all(b"\n")
}
