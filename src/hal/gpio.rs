use avr_device::atmega328p::{PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::InputPin;

use crate::drivers::{Indicator, Nibble};

const LED_MASK: u8 = 0x0F;
// PC4 = SDA, PC5 = SCL
const TWI_PINS: u8 = (1 << 4) | (1 << 5);

/// Port D input with the internal pull-up enabled
pub struct PdInput<const P: u8> {
    _port: PhantomData<PORTD>,
}

impl<const P: u8> PdInput<P> {
    pub fn new(_port: &PORTD) -> Self {
        unsafe {
            let p = PORTD::ptr();
            (*p).ddrd.modify(|r, w| w.bits(r.bits() & !(1 << P)));
            (*p).portd.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Self { _port: PhantomData }
    }
}

impl<const P: u8> InputPin for PdInput<P> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(unsafe { (*PORTD::ptr()).pind.read().bits() } & (1 << P) != 0)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

pub type UpButton = PdInput<2>;
pub type DownButton = PdInput<3>;

/// Four LEDs on PC0..PC3
pub struct NibbleLeds {
    _port: PhantomData<PORTC>,
}

impl NibbleLeds {
    pub fn new(_port: &PORTC) -> Self {
        unsafe {
            let p = PORTC::ptr();
            (*p).ddrc.modify(|r, w| w.bits(r.bits() | LED_MASK));
            (*p).portc.modify(|r, w| w.bits(r.bits() & !LED_MASK));
        }
        Self { _port: PhantomData }
    }
}

impl Indicator for NibbleLeds {
    fn show(&mut self, value: Nibble) {
        unsafe {
            (*PORTC::ptr())
                .portc
                .modify(|r, w| w.bits((r.bits() & !LED_MASK) | value.value()));
        }
    }
}

/// Weak pull-ups on SDA and SCL
pub fn twi_pullups(_port: &PORTC) {
    unsafe {
        let p = PORTC::ptr();
        (*p).ddrc.modify(|r, w| w.bits(r.bits() & !TWI_PINS));
        (*p).portc.modify(|r, w| w.bits(r.bits() | TWI_PINS));
    }
}
