//! Flash record store console over USB-CDC
//!
//! Waits for a terminal to open the USB serial port, prints the banner and
//! then serves one command per line until the port is closed.
//!
//! # Usage
//!
//! ```bash
//! cargo build --release --target thumbv8m.main-none-eabihf \
//!     --features pico2_w --example flash_cli
//! # Flash the UF2 file to Pico 2 W
//! # Connect with: screen /dev/ttyACM0 115200
//! ```
//!
//! # Commands
//!
//! ```text
//! FLASH_WRITE 0 "hello"
//! FLASH_READ 0
//! FLASH_ERASE 0
//! ```

#![no_std]
#![no_main]

use core::fmt::Write;
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_time::{Duration, Timer};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config};
use heapless::{String, Vec};
use {defmt_rtt as _, panic_probe as _};

use pico_flash_store::cli::{
    write_banner, LineEditor, LineEvent, Shell, ShellConfig, ERASE_ECHO, LINE_CAPACITY, PROMPT,
};
use pico_flash_store::platform::rp2350::{CortexInterrupts, Rp2350Flash};
use pico_flash_store::storage::FlashStore;

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// USB full-speed bulk packet size
const MAX_PACKET_SIZE: u16 = 64;

/// Reply buffer; large enough for a raw read of invalid UTF-8
const REPLY_SIZE: usize = 1024;

type Console = CdcAcmClass<'static, Driver<'static, USB>>;
type FlashShell = Shell<Rp2350Flash, CortexInterrupts>;

#[embassy_executor::task]
async fn usb_device_task(mut usb: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    usb.run().await;
}

static mut USB_DEVICE_DESCRIPTOR: [u8; 256] = [0; 256];
static mut USB_CONFIG_DESCRIPTOR: [u8; 256] = [0; 256];
static mut USB_BOS_DESCRIPTOR: [u8; 256] = [0; 256];
static mut USB_CONTROL_BUF: [u8; 64] = [0; 64];
static mut USB_STATE: State = State::new();

/// Send `bytes` as-is, split into packets
async fn send_bytes(class: &mut Console, bytes: &[u8]) -> Result<(), EndpointError> {
    for chunk in bytes.chunks(MAX_PACKET_SIZE as usize - 1) {
        class.write_packet(chunk).await?;
    }
    Ok(())
}

/// Send text, translating `\n` to `\r\n`
///
/// Packets stay below the endpoint size so the host never waits for a
/// zero-length packet.
async fn send_text(class: &mut Console, text: &str) -> Result<(), EndpointError> {
    let mut packet: Vec<u8, { MAX_PACKET_SIZE as usize }> = Vec::new();

    for &byte in text.as_bytes() {
        if packet.len() + 2 >= MAX_PACKET_SIZE as usize {
            class.write_packet(&packet).await?;
            packet.clear();
        }
        if byte == b'\n' {
            let _ = packet.push(b'\r');
        }
        let _ = packet.push(byte);
    }

    if !packet.is_empty() {
        class.write_packet(&packet).await?;
    }
    Ok(())
}

/// Serve one connected session until the host closes the port
async fn run_session(class: &mut Console, shell: &mut FlashShell) -> Result<(), EndpointError> {
    let mut reply: String<REPLY_SIZE> = String::new();
    let _ = write_banner(&mut reply, shell.config().variant);
    let _ = reply.push_str(PROMPT);
    send_text(class, &reply).await?;

    let mut editor = LineEditor::<LINE_CAPACITY>::new();
    let mut packet = [0u8; MAX_PACKET_SIZE as usize];

    loop {
        let n = class.read_packet(&mut packet).await?;

        for &byte in &packet[..n] {
            match editor.feed(byte) {
                LineEvent::Echo(c) => send_bytes(class, &[c]).await?,
                LineEvent::Erased => send_bytes(class, ERASE_ECHO).await?,
                LineEvent::Ignored => {}
                LineEvent::Submit => {
                    let line = editor.take_line();
                    reply.clear();
                    let _ = writeln!(reply);
                    if shell.execute(&line, &mut reply).is_err() {
                        warn!("Reply truncated at {} bytes", REPLY_SIZE);
                    }
                    let _ = reply.push_str(PROMPT);
                    send_text(class, &reply).await?;
                }
            }
        }
    }
}

#[embassy_executor::task]
async fn console_task(mut class: Console, mut shell: FlashShell) {
    loop {
        class.wait_connection().await;
        info!("USB connected");
        // Give the host terminal time to open the port before the banner
        Timer::after(Duration::from_millis(100)).await;

        if let Err(e) = run_session(&mut class, &mut shell).await {
            info!("USB session ended: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Initialize platform
    let p = hal::init(Default::default());

    info!("Pico Flash Storage CLI (USB-CDC)");

    // Create USB driver
    let driver = Driver::new(p.USB, Irqs);

    // USB configuration
    let mut config = Config::new(0x2e8a, 0x000a); // Raspberry Pi vendor/product
    config.manufacturer = Some("pico_flash_store");
    config.product = Some("Flash Storage CLI");
    config.serial_number = Some("12345678");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    // USB device and builder setup
    let mut builder = Builder::new(
        driver,
        config,
        unsafe { &mut *core::ptr::addr_of_mut!(USB_DEVICE_DESCRIPTOR) },
        unsafe { &mut *core::ptr::addr_of_mut!(USB_CONFIG_DESCRIPTOR) },
        unsafe { &mut *core::ptr::addr_of_mut!(USB_BOS_DESCRIPTOR) },
        unsafe { &mut *core::ptr::addr_of_mut!(USB_CONTROL_BUF) },
    );

    // Create CDC-ACM class
    let class = CdcAcmClass::new(
        &mut builder,
        unsafe { &mut *core::ptr::addr_of_mut!(USB_STATE) },
        MAX_PACKET_SIZE,
    );

    // Build USB device
    let usb = builder.build();

    // Store owns the flash and the interrupt mask from here on
    let store = FlashStore::new(Rp2350Flash::new(), CortexInterrupts::new());
    let shell = Shell::new(store, ShellConfig::default());

    spawner.spawn(usb_device_task(usb)).ok();
    spawner.spawn(console_task(class, shell)).unwrap();

    info!("USB and console tasks started");
}
