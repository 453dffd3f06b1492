use avr_device::atmega328p::ADC;

use crate::drivers::AnalogInput;

// AVCC reference
const REFS_AVCC: u8 = 0x40;
const MUX_MASK: u8 = 0x0F;
const ADEN: u8 = 0x80;
const ADSC: u8 = 0x40;
// 125 kHz conversion clock at 16 MHz
const ADPS_DIV128: u8 = 0x07;

pub struct Adc {
    _adc: core::marker::PhantomData<ADC>,
}

impl Adc {
    pub fn new(_adc: ADC) -> Self {
        unsafe {
            let p = ADC::ptr();
            (*p).admux.write(|w| w.bits(REFS_AVCC));
            (*p).adcsra.write(|w| w.bits(ADEN | ADPS_DIV128));
        }
        Self {
            _adc: core::marker::PhantomData,
        }
    }
}

impl AnalogInput for Adc {
    fn read(&mut self, channel: u8) -> u16 {
        unsafe {
            let p = ADC::ptr();
            (*p).admux.write(|w| w.bits(REFS_AVCC | (channel & MUX_MASK)));
            (*p).adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
            while (*p).adcsra.read().bits() & ADSC != 0 {}
            (*p).adc.read().bits()
        }
    }
}
