#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use avr_device::atmega328p::Peripherals;
use panic_halt as _;

use atmega_twi_link::application::CounterSlave;
use atmega_twi_link::config::{COUNTER_SLAVE_ADDR, LOG_LEVEL};
use atmega_twi_link::hal::{twi_pullups, Delay, DownButton, NibbleLeds, Twi0, UpButton, Usart0};
use atmega_twi_link::logger::Console;
use atmega_twi_link::mailbox::{CommandCell, ResponseCell};
use atmega_twi_link::slave;
use atmega_twi_link::twi::{Address, SlaveConfig, Twi, WaitPolicy};
use atmega_twi_link::{log_debug, log_info};

const ADDRESS: Address = match Address::new(COUNTER_SLAVE_ADDR) {
    Some(address) => address,
    None => panic!("counter slave address out of range"),
};

static COMMAND: CommandCell = CommandCell::new();
static RESPONSE: ResponseCell = ResponseCell::new(0);

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    let uart = Usart0::new(dp.USART0);
    let mut console = Console::new(&uart, LOG_LEVEL);
    let mut delay = Delay::new(dp.TC0);

    let mut counter = CounterSlave::new(
        UpButton::new(&dp.PORTD),
        DownButton::new(&dp.PORTD),
        NibbleLeds::new(&dp.PORTC),
    );
    counter.start(&RESPONSE);

    twi_pullups(&dp.PORTC);
    Twi::new(Twi0::new(dp.TWI), WaitPolicy::Forever).configure_slave(&SlaveConfig {
        address: ADDRESS,
        general_call: false,
    });
    log_info!(console, "boot", "counter slave at {}", ADDRESS.get());

    // From here on the TWI belongs to the interrupt handler
    unsafe { avr_device::interrupt::enable() };

    loop {
        let tick = match counter.step(&mut delay, &COMMAND, &RESPONSE) {
            Ok(tick) => tick,
            Err(never) => match never {},
        };
        if tick.changed {
            log_debug!(console, "count", "{}", counter.count().value());
        }
        if tick.command_seen {
            log_debug!(console, "twi", "served {}", RESPONSE.get());
        }
    }
}

#[avr_device::interrupt(atmega328p)]
fn TWI() {
    let mut twi = Twi::new(unsafe { Twi0::steal() }, WaitPolicy::Forever);
    slave::on_event(&mut twi, &COMMAND, &RESPONSE);
}
