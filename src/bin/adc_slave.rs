#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use avr_device::atmega328p::Peripherals;
use core::cell::Cell;
use critical_section::Mutex;
use panic_halt as _;

use atmega_twi_link::application::AdcSlave;
use atmega_twi_link::config::{ADC_SLAVE_ADDR, LOG_LEVEL};
use atmega_twi_link::hal::{twi_pullups, Adc, Twi0, Usart0};
use atmega_twi_link::logger::Console;
use atmega_twi_link::mailbox::{CommandCell, ResponseCell};
use atmega_twi_link::slave::{self, SlaveEvent};
use atmega_twi_link::twi::{Address, SlaveConfig, Twi, WaitPolicy};
use atmega_twi_link::{log_debug, log_info};

const ADDRESS: Address = match Address::new(ADC_SLAVE_ADDR) {
    Some(address) => address,
    None => panic!("ADC slave address out of range"),
};

static COMMAND: CommandCell = CommandCell::new();
static RESPONSE: ResponseCell = ResponseCell::new(0);
// Bus faults seen by the interrupt handler
static FAULTS: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    let uart = Usart0::new(dp.USART0);
    let mut console = Console::new(&uart, LOG_LEVEL);
    let mut sampler = AdcSlave::new(Adc::new(dp.ADC));
    sampler.step(&COMMAND, &RESPONSE);

    twi_pullups(&dp.PORTC);
    Twi::new(Twi0::new(dp.TWI), WaitPolicy::Forever).configure_slave(&SlaveConfig {
        address: ADDRESS,
        general_call: false,
    });
    log_info!(console, "boot", "ADC slave at {}", ADDRESS.get());

    // From here on the TWI belongs to the interrupt handler
    unsafe { avr_device::interrupt::enable() };

    let mut faults = 0;
    loop {
        let tick = sampler.step(&COMMAND, &RESPONSE);
        if tick.command_seen {
            log_debug!(console, "twi", "serving {}", sampler.last());
        }
        let seen = critical_section::with(|cs| FAULTS.borrow(cs).get());
        if seen != faults {
            faults = seen;
            log_debug!(console, "twi", "bus faults: {}", faults);
        }
    }
}

#[avr_device::interrupt(atmega328p)]
fn TWI() {
    let mut twi = Twi::new(unsafe { Twi0::steal() }, WaitPolicy::Forever);
    if let SlaveEvent::Fault(_) = slave::on_event(&mut twi, &COMMAND, &RESPONSE) {
        critical_section::with(|cs| {
            let faults = FAULTS.borrow(cs);
            faults.set(faults.get().wrapping_add(1));
        });
    }
}
