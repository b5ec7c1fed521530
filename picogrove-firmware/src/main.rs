//! Picogrove - GrovePi-style command server
//!
//! Firmware for a Raspberry Pi Pico on the Grove Shield for Pi Pico.
//! The host sends `command(args)` lines over UART0; each line is run
//! against the Grove ports and answered with one reply line.
//!
//! The Pico's USB port only powers the board and flashes it. Connect the
//! host through a USB-UART adapter on GP0 (TX) and GP1 (RX), 8N1 at the
//! `serial_baudrate` from `board.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{
    BufferedInterruptHandler, BufferedUartRx, BufferedUartTx, Config as UartConfig, Uart,
};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use picogrove_core::{DeviceContext, Session};
use picogrove_hal_rp2040::StatusLed;

use crate::board::PicoBoard;
use crate::settings::SETTINGS;

mod board;

mod settings {
    use picogrove_core::config::{BacklightKind, DisplaySettings, Settings};

    include!(concat!(env!("OUT_DIR"), "/settings.rs"));
}

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Pause before serving again after the link fails
const RESTART_DELAY_MS: u64 = 100;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Picogrove firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");
    info!("Settings: {}", SETTINGS);

    let (parts, led, link) = board::split(p, &SETTINGS);

    let ctx = match DeviceContext::new(parts, &SETTINGS) {
        Ok(ctx) => ctx,
        Err(e) => defmt::panic!("Board wiring rejected: {}", e),
    };
    info!("Grove ports registered");

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = SETTINGS.serial_baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(link.uart, link.tx, link.rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", SETTINGS.serial_baudrate);

    unwrap!(spawner.spawn(session_task(ctx, led, rx, tx)));

    info!("Session task spawned, firmware running");
}

/// Serves host commands for the lifetime of the firmware
#[embassy_executor::task]
async fn session_task(
    mut ctx: DeviceContext<PicoBoard>,
    led: StatusLed,
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
) {
    info!("Session task started");

    let mut session = Session::new(led);
    loop {
        let e = session.run(&mut ctx, &mut rx, &mut tx).await;
        warn!("Session ended: {}, restarting", e);
        Timer::after_millis(RESTART_DELAY_MS).await;
    }
}
