//! Slave event handler
//!
//! [`on_event`] is called from the TWI interrupt once per raised TWINT. It
//! decides from the status code alone, touches only the two shared cells,
//! and always leaves with exactly one control write that clears TWINT.

use ufmt::derive::uDebug;

use crate::mailbox::{CommandCell, ResponseCell};
use crate::twi::{Status, Twi, TwiRegisters};

/// What a bus event asks the slave to do
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveEvent {
    /// SLA+W or general call matched; data bytes follow
    AddressedForWrite,
    /// A data byte arrived
    DataReceived,
    /// SLA+R matched; the master wants the first byte
    AddressedForRead,
    /// The master ACKed our byte and wants another
    ReadContinuation,
    /// Stop, repeated start, or the master ended the read; the unit goes
    /// back to not-addressed mode through TWSTO
    Finished,
    /// Bus error or an event this slave does not handle
    Fault(Status),
}

impl SlaveEvent {
    pub const fn classify(status: Status) -> Self {
        match status {
            Status::OwnAddrWriteAck
            | Status::GeneralCallAck
            | Status::ArbLostOwnAddrWriteAck
            | Status::ArbLostGeneralCallAck => SlaveEvent::AddressedForWrite,
            Status::OwnDataAck | Status::GeneralDataAck => SlaveEvent::DataReceived,
            Status::OwnAddrReadAck | Status::ArbLostOwnAddrReadAck => SlaveEvent::AddressedForRead,
            Status::SlaveDataAck => SlaveEvent::ReadContinuation,
            Status::StopOrRepStart | Status::SlaveDataNack | Status::SlaveLastDataAck => {
                SlaveEvent::Finished
            }
            other => SlaveEvent::Fault(other),
        }
    }
}

/// React to the pending bus event
pub fn on_event<R: TwiRegisters>(
    twi: &mut Twi<R>,
    command: &CommandCell,
    response: &ResponseCell,
) -> SlaveEvent {
    let event = SlaveEvent::classify(twi.status());
    match event {
        SlaveEvent::AddressedForWrite => twi.release(),
        SlaveEvent::DataReceived => {
            command.post(twi.data());
            twi.release();
        }
        SlaveEvent::AddressedForRead | SlaveEvent::ReadContinuation => {
            twi.load(response.get());
            twi.arm_for_reply();
        }
        SlaveEvent::Finished | SlaveEvent::Fault(_) => twi.recover(),
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimTwi;
    use crate::twi::regs::{TWEA, TWEN, TWIE, TWINT, TWSTO};
    use crate::twi::{Address, SlaveConfig, WaitPolicy};

    fn slave() -> Twi<SimTwi> {
        let mut twi = Twi::new(SimTwi::new(), WaitPolicy::Forever);
        twi.configure_slave(&SlaveConfig {
            address: Address::new(0x30).unwrap(),
            general_call: false,
        });
        twi.regs_mut().clear_log();
        twi
    }

    #[test]
    fn every_status_clears_the_flag_exactly_once() {
        let command = CommandCell::new();
        let response = ResponseCell::new(5);

        for raw in (0u8..=0xF8).step_by(8) {
            let mut twi = slave();
            twi.regs_mut().raise_with(Status::from_register(raw), 0x11);
            on_event(&mut twi, &command, &response);

            let sim = twi.regs();
            assert_eq!(sim.flag_clears(), 1, "status 0x{:02X}", raw);
            assert!(!sim.is_flag_set(), "status 0x{:02X}", raw);
        }
    }

    #[test]
    fn address_match_keeps_listening() {
        let command = CommandCell::new();
        let response = ResponseCell::new(0);
        let mut twi = slave();

        twi.regs_mut().raise(Status::OwnAddrWriteAck);
        assert_eq!(on_event(&mut twi, &command, &response), SlaveEvent::AddressedForWrite);
        assert_eq!(command.peek(), None);
        assert_eq!(twi.regs().control(), TWEA | TWEN | TWIE);
        assert_eq!(twi.regs().stops(), 0);
    }

    #[test]
    fn received_byte_lands_in_the_command_cell() {
        let command = CommandCell::new();
        let response = ResponseCell::new(0);
        let mut twi = slave();

        twi.regs_mut().raise_with(Status::OwnDataAck, b'R');
        assert_eq!(on_event(&mut twi, &command, &response), SlaveEvent::DataReceived);
        assert_eq!(command.peek(), Some(b'R'));

        twi.regs_mut().raise_with(Status::GeneralDataAck, b'L');
        on_event(&mut twi, &command, &response);
        assert_eq!(command.peek(), Some(b'L'));
    }

    #[test]
    fn read_request_transmits_response_and_stays_armed() {
        let command = CommandCell::new();
        let response = ResponseCell::new(42);
        let mut twi = slave();

        twi.regs_mut().raise(Status::OwnAddrReadAck);
        assert_eq!(on_event(&mut twi, &command, &response), SlaveEvent::AddressedForRead);

        let sim = twi.regs();
        assert_eq!(sim.transmitted().collect::<Vec<_>>(), [42]);
        assert_eq!(sim.data(), 42);
        let armed = TWEA | TWEN | TWIE;
        assert_eq!(sim.control() & armed, armed);
        assert_eq!(sim.control() & TWINT, 0);
    }

    #[test]
    fn continuation_sends_current_value() {
        let command = CommandCell::new();
        let response = ResponseCell::new(1);
        let mut twi = slave();

        twi.regs_mut().raise(Status::OwnAddrReadAck);
        on_event(&mut twi, &command, &response);
        response.set(2);
        twi.regs_mut().raise(Status::SlaveDataAck);
        assert_eq!(on_event(&mut twi, &command, &response), SlaveEvent::ReadContinuation);
        assert_eq!(twi.regs().transmitted().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn bus_error_recovers() {
        let command = CommandCell::new();
        let response = ResponseCell::new(0);
        let mut twi = slave();

        twi.regs_mut().raise(Status::BusError);
        assert_eq!(
            on_event(&mut twi, &command, &response),
            SlaveEvent::Fault(Status::BusError)
        );
        let sim = twi.regs();
        assert_eq!(sim.stops(), 1);
        assert_eq!(sim.control() & TWSTO, 0);
        assert_eq!(sim.control() & (TWEA | TWEN | TWIE), TWEA | TWEN | TWIE);
        assert_eq!(command.peek(), None);
    }

    #[test]
    fn nacked_data_is_not_stored() {
        let command = CommandCell::new();
        let response = ResponseCell::new(0);
        let mut twi = slave();

        twi.regs_mut().raise_with(Status::OwnDataNack, b'R');
        assert!(matches!(
            on_event(&mut twi, &command, &response),
            SlaveEvent::Fault(Status::OwnDataNack)
        ));
        assert_eq!(command.peek(), None);
    }

    #[test]
    fn end_of_transfer_recovers_and_keeps_listening() {
        let command = CommandCell::new();
        let response = ResponseCell::new(0);
        for status in [Status::StopOrRepStart, Status::SlaveDataNack, Status::SlaveLastDataAck] {
            let mut twi = slave();
            twi.regs_mut().raise(status);
            assert_eq!(on_event(&mut twi, &command, &response), SlaveEvent::Finished);

            let sim = twi.regs();
            assert_eq!(sim.stops(), 1, "{:?}", status);
            assert_eq!(sim.flag_clears(), 1, "{:?}", status);
            assert_eq!(sim.control() & (TWINT | TWSTO), 0, "{:?}", status);
            assert_eq!(sim.control() & (TWEA | TWEN | TWIE), TWEA | TWEN | TWIE);
            assert_eq!(command.peek(), None);
        }
    }
}
