//! Shared helpers for integration tests

use std::cell::RefCell;
use std::rc::Rc;

use rp2a03::{Apu, Bus, CaptureSink, ClockRates, IrqLine, MemoryMappedDevice};

/// Clock rates used across the integration tests
pub const TEST_RATES: ClockRates = ClockRates {
    sample_rate: 44_100,
    sequencer_rate: 240,
};

/// Device plugged into the PPU-port range that records writes to the
/// OAM data port
#[derive(Debug, Clone, Default)]
pub struct OamPort {
    received: Rc<RefCell<Vec<u8>>>,
}

impl OamPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written to $2004 so far, in order
    pub fn received(&self) -> Vec<u8> {
        self.received.borrow().clone()
    }
}

impl MemoryMappedDevice for OamPort {
    fn read(&mut self, _addr: u16) -> u8 {
        0
    }

    fn write(&mut self, addr: u16, data: u8) {
        if addr == 0x2004 {
            self.received.borrow_mut().push(data);
        }
    }
}

/// Build a bus around an APU wired to a capture sink
pub fn setup() -> (Bus, CaptureSink, IrqLine) {
    let sink = CaptureSink::new();
    let irq = IrqLine::new();
    let apu = Apu::new(TEST_RATES, Box::new(sink.clone()), irq.clone())
        .expect("capture sink always opens");
    (Bus::new(apu), sink, irq)
}
