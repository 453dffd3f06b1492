#![no_std]
#![no_main]

use avr_device::atmega328p::Peripherals;
use panic_halt as _;

use atmega_twi_link::application::{Exchange, Poller};
use atmega_twi_link::config::{LOG_LEVEL, WAIT_SPINS};
use atmega_twi_link::drivers::ConsoleDisplay;
use atmega_twi_link::hal::{twi_pullups, Delay, Twi0, Usart0};
use atmega_twi_link::logger::Console;
use atmega_twi_link::master::Master;
use atmega_twi_link::twi::{MasterConfig, Twi, WaitPolicy};
use atmega_twi_link::{log_debug, log_info, log_warn, TwiError};

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    let uart = Usart0::new(dp.USART0);
    let mut console = Console::new(&uart, LOG_LEVEL);
    log_info!(console, "boot", "TWI link master");

    twi_pullups(&dp.PORTC);
    let twi = Twi::new(Twi0::new(dp.TWI), WaitPolicy::Spins(WAIT_SPINS));
    let master = Master::new(twi, &MasterConfig::default());
    let rate = master.bit_rate();
    log_info!(
        console,
        "boot",
        "TWBR {} prescaler {:?} SCL {} Hz",
        rate.twbr,
        rate.prescaler,
        rate.scl_hz()
    );

    // The terminal display shares the UART with the console
    let display = ConsoleDisplay::new(&uart);
    let mut poller = Poller::new(master, display, Delay::new(dp.TC0));
    if let Err(never) = poller.splash() {
        match never {}
    }

    loop {
        let report = match poller.cycle() {
            Ok(report) => report,
            Err(never) => match never {},
        };
        for exchange in &report {
            report_exchange(&mut console, exchange);
        }
    }
}

fn report_exchange(console: &mut Console<&Usart0>, exchange: &Exchange<TwiError>) {
    let address = exchange.address.get();
    if let Err(err) = &exchange.command {
        log_warn!(console, "poll", "command to {} failed: {:?}", address, err);
    }
    match &exchange.response {
        Ok(value) => log_debug!(console, "poll", "{} -> {}", address, value),
        Err(err) => log_warn!(console, "poll", "read from {} failed: {:?}", address, err),
    }
}
