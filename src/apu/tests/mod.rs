//! APU behavior tests

mod register_tests;

use crate::apu::{Apu, ClockRates};
use crate::audio::CaptureSink;
use crate::interrupt::IrqLine;

/// Build an APU wired to a capture sink and a fresh IRQ line
fn harness() -> (Apu, CaptureSink, IrqLine) {
    let sink = CaptureSink::new();
    let irq = IrqLine::new();
    let apu = Apu::new(
        ClockRates {
            sample_rate: 44_100,
            sequencer_rate: 240,
        },
        Box::new(sink.clone()),
        irq.clone(),
    )
    .expect("capture sink always opens");
    (apu, sink, irq)
}
