//! Master, slave handlers and foreground loops talking over a modelled bus

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use atmega_twi_link::application::{AdcSlave, CounterSlave, Poller, Slot};
use atmega_twi_link::config::{ADC_SLAVE_ADDR, COUNTER_COMMAND, COUNTER_SLAVE_ADDR};
use atmega_twi_link::drivers::{AnalogInput, ConsoleDisplay, Indicator, Nibble};
use atmega_twi_link::mailbox::{CommandCell, ResponseCell};
use atmega_twi_link::master::Master;
use atmega_twi_link::slave::{self, SlaveEvent};
use atmega_twi_link::testing::SimTwi;
use atmega_twi_link::twi::{
    Address, MasterConfig, SlaveConfig, Status, Twi, TwiRegisters, WaitPolicy,
};
use atmega_twi_link::TwiError;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};
use embedded_hal::digital::v2::InputPin;
use embedded_hal_mock::delay::MockNoop;
use ufmt::uWrite;

/// One slave's TWI unit and the cells its interrupt handler shares
struct Port {
    twi: Twi<SimTwi>,
    command: CommandCell,
    response: ResponseCell,
    events: Vec<SlaveEvent>,
    online: bool,
}

impl Port {
    fn new(address: u8) -> Self {
        let mut twi = Twi::new(SimTwi::new(), WaitPolicy::Forever);
        twi.configure_slave(&SlaveConfig {
            address: Address::new(address).unwrap(),
            general_call: false,
        });
        twi.regs_mut().clear_log();
        Self {
            twi,
            command: CommandCell::new(),
            response: ResponseCell::new(0),
            events: Vec::new(),
            online: true,
        }
    }

    fn event(&mut self, status: Status) {
        self.twi.regs_mut().raise(status);
        self.dispatch();
    }

    fn event_with(&mut self, status: Status, byte: u8) {
        self.twi.regs_mut().raise_with(status, byte);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let event = slave::on_event(&mut self.twi, &self.command, &self.response);
        self.events.push(event);
    }
}

struct Switch(Rc<Cell<bool>>);

impl InputPin for Switch {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }
}

struct Dark;

impl Indicator for Dark {
    fn show(&mut self, _: Nibble) {}
}

struct Knob(Rc<Cell<u16>>);

impl AnalogInput for Knob {
    fn read(&mut self, _channel: u8) -> u16 {
        self.0.get()
    }
}

struct Board {
    counter_port: Port,
    adc_port: Port,
    counter: CounterSlave<Switch, Switch, Dark>,
    adc: AdcSlave<Knob>,
    up: Rc<Cell<bool>>,
    knob: Rc<Cell<u16>>,
}

impl Board {
    fn new() -> Self {
        let up = Rc::new(Cell::new(false));
        let knob = Rc::new(Cell::new(0));
        let counter_port = Port::new(COUNTER_SLAVE_ADDR);
        let mut counter = CounterSlave::new(
            Switch(up.clone()),
            Switch(Rc::new(Cell::new(false))),
            Dark,
        );
        counter.start(&counter_port.response);
        Self {
            counter_port,
            adc_port: Port::new(ADC_SLAVE_ADDR),
            counter,
            adc: AdcSlave::new(Knob(knob.clone())),
            up,
            knob,
        }
    }

    /// One pass of each slave's main loop
    fn run_foreground(&mut self) {
        let mut idle = MockNoop::new();
        let port = &self.counter_port;
        if let Err(never) = self.counter.step(&mut idle, &port.command, &port.response) {
            match never {}
        }
        self.adc.step(&self.adc_port.command, &self.adc_port.response);
    }

    fn press_up(&mut self) {
        self.up.set(true);
        self.run_foreground();
        self.up.set(false);
        self.run_foreground();
    }

    fn port(&mut self, address: u8) -> Option<&mut Port> {
        let port = match address {
            COUNTER_SLAVE_ADDR => &mut self.counter_port,
            ADC_SLAVE_ADDR => &mut self.adc_port,
            _ => return None,
        };
        port.online.then_some(port)
    }
}

/// Runs the slaves' foreground loops whenever the master waits
struct Clock(Rc<RefCell<Board>>);

impl DelayMs<u16> for Clock {
    fn delay_ms(&mut self, _ms: u16) {
        self.0.borrow_mut().run_foreground();
    }
}

/// The shared bus: slave handlers see their events, then the master's
/// peripheral is scripted with the matching completions.
struct Wire {
    master: Master<SimTwi>,
    board: Rc<RefCell<Board>>,
}

impl Wire {
    fn new(board: Rc<RefCell<Board>>) -> Self {
        let twi = Twi::new(SimTwi::new(), WaitPolicy::Spins(8));
        Self {
            master: Master::new(twi, &MasterConfig::default()),
            board,
        }
    }

    fn master_sim(&self) -> &SimTwi {
        self.master.twi().regs()
    }
}

impl Write for Wire {
    type Error = TwiError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TwiError> {
        {
            let mut board = self.board.borrow_mut();
            let sim = self.master.twi_mut().regs_mut();
            sim.reply(Status::StartTransmitted);
            match board.port(address) {
                None => {
                    sim.reply(Status::AddrWriteNack);
                }
                Some(port) => {
                    sim.reply(Status::AddrWriteAck);
                    port.event(Status::OwnAddrWriteAck);
                    for &byte in bytes {
                        port.event_with(Status::OwnDataAck, byte);
                        sim.reply(Status::DataWriteAck);
                    }
                    port.event(Status::StopOrRepStart);
                }
            }
        }
        self.master.write(address, bytes)
    }
}

impl Read for Wire {
    type Error = TwiError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), TwiError> {
        {
            let mut board = self.board.borrow_mut();
            let sim = self.master.twi_mut().regs_mut();
            sim.reply(Status::StartTransmitted);
            match board.port(address) {
                None => {
                    sim.reply(Status::AddrReadNack);
                }
                Some(port) => {
                    sim.reply(Status::AddrReadAck);
                    port.event(Status::OwnAddrReadAck);
                    for i in 0..buffer.len() {
                        let byte = port.twi.regs().data();
                        if i + 1 == buffer.len() {
                            sim.reply_with(Status::DataReadNack, Some(byte));
                            port.event(Status::SlaveDataNack);
                        } else {
                            sim.reply_with(Status::DataReadAck, Some(byte));
                            port.event(Status::SlaveDataAck);
                        }
                    }
                }
            }
        }
        self.master.read(address, buffer)
    }
}

#[derive(Default)]
struct Terminal(String);

impl uWrite for Terminal {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

#[test]
fn command_then_read_returns_refreshed_value() {
    let board = Rc::new(RefCell::new(Board::new()));
    let mut wire = Wire::new(board.clone());

    board.borrow_mut().press_up();
    board.borrow_mut().press_up();

    wire.write(COUNTER_SLAVE_ADDR, &[COUNTER_COMMAND]).unwrap();
    assert_eq!(
        board.borrow().counter_port.command.peek(),
        Some(COUNTER_COMMAND)
    );
    board.borrow_mut().run_foreground();
    assert_eq!(board.borrow().counter_port.command.peek(), None);

    let mut byte = [0u8; 1];
    wire.read(COUNTER_SLAVE_ADDR, &mut byte).unwrap();
    assert_eq!(byte[0], 2);

    // Nothing changed, so a second read gives the same answer
    wire.read(COUNTER_SLAVE_ADDR, &mut byte).unwrap();
    assert_eq!(byte[0], 2);
}

#[test]
fn every_slave_event_clears_the_flag_once() {
    let board = Rc::new(RefCell::new(Board::new()));
    let mut wire = Wire::new(board.clone());

    let mut byte = [0u8; 1];
    wire.write(ADC_SLAVE_ADDR, b"L").unwrap();
    wire.read(ADC_SLAVE_ADDR, &mut byte).unwrap();

    let board = board.borrow();
    let port = &board.adc_port;
    assert_eq!(
        port.events,
        [
            SlaveEvent::AddressedForWrite,
            SlaveEvent::DataReceived,
            SlaveEvent::Finished,
            SlaveEvent::AddressedForRead,
            SlaveEvent::Finished,
        ]
    );
    assert_eq!(port.twi.regs().flag_clears() as usize, port.events.len());
    // each finished transfer drops the unit back to not-addressed mode
    assert_eq!(port.twi.regs().stops(), 2);
}

#[test]
fn absent_slave_gets_no_payload() {
    let board = Rc::new(RefCell::new(Board::new()));
    let mut wire = Wire::new(board);
    wire.master.twi_mut().regs_mut().clear_log();

    let err = wire.write(0x50, &[COUNTER_COMMAND]).unwrap_err();
    assert_eq!(err, TwiError::NoAcknowledgment(Status::AddrWriteNack));

    let sim = wire.master_sim();
    assert_eq!(sim.stops(), 1);
    assert_eq!(sim.transmitted().collect::<Vec<_>>(), [0xA0]);
    assert_eq!(sim.pending(), 0);
}

#[test]
fn poller_shows_both_slaves() {
    let board = Rc::new(RefCell::new(Board::new()));
    board.borrow_mut().knob.set(0x2A8);
    for _ in 0..3 {
        board.borrow_mut().press_up();
    }

    let display = ConsoleDisplay::new(Terminal::default());
    let mut poller = Poller::new(
        Wire::new(board.clone()),
        display,
        Clock(board.clone()),
    );

    let report = poller.cycle().unwrap();
    assert!(report.iter().all(|exchange| exchange.is_ok()));
    assert_eq!((poller.value(Slot::Counter), poller.value(Slot::Adc)), (3, 0xAA));

    poller.render().unwrap();
    let (_, display, _) = poller.free();
    let screen = display.free().0;
    assert!(screen.ends_with(
        "\x1b[2J\x1b[H\x1b[1;1HCount:\x1b[2;5H3\x1b[1;12HADC:\x1b[2;13H170"
    ));
}

#[test]
fn offline_slave_keeps_its_last_value() {
    let board = Rc::new(RefCell::new(Board::new()));
    board.borrow_mut().press_up();

    let mut poller = Poller::new(
        Wire::new(board.clone()),
        ConsoleDisplay::new(Terminal::default()),
        Clock(board.clone()),
    );
    assert!(poller.exchange(Slot::Counter).is_ok());
    assert_eq!(poller.value(Slot::Counter), 1);

    board.borrow_mut().counter_port.online = false;
    board.borrow_mut().press_up();

    let exchange = poller.exchange(Slot::Counter);
    assert_eq!(
        exchange.command,
        Err(TwiError::NoAcknowledgment(Status::AddrWriteNack))
    );
    assert_eq!(
        exchange.response,
        Err(TwiError::NoAcknowledgment(Status::AddrReadNack))
    );
    assert_eq!(poller.value(Slot::Counter), 1);
}
