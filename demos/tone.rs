// Audio output test - plays a single square tone
//
// Minimal end-to-end check of the audio path: one pulse channel, the cpal
// sink, and both clocks driven by the scheduler.

use std::thread;
use std::time::Duration;

use rp2a03::{Apu, Bus, ClockRates, CpalSink, IrqLine, Scheduler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("rp2a03 tone test");
    println!("================\n");

    let rates = ClockRates {
        sample_rate: 44_100,
        sequencer_rate: 240,
    };

    println!("Initializing audio output...");
    let apu = Apu::new(rates, Box::new(CpalSink::new()), IrqLine::new())?;
    let mut bus = Bus::new(apu);

    // 440 Hz square wave: f = sample_rate / (16 * (period + 1))
    let period: u16 = (rates.sample_rate / (16 * 440) - 1) as u16;

    bus.write(0x4015, 0x01); // enable pulse 1
    bus.write(0x4000, 0xBF); // duty 50%, halt, constant volume 15
    bus.write(0x4002, (period & 0xFF) as u8);
    bus.write(0x4003, ((period >> 8) & 0x07) as u8 | 0x08);
    bus.write(0x4017, 0x40); // 5-step sequence, interrupts inhibited

    let mut scheduler = Scheduler::new();
    let sample_clk = scheduler.add_clock("sample", rates.sample_rate);
    let seq_clk = scheduler.add_clock("sequencer", rates.sequencer_rate);

    println!("Playing 440 Hz tone (A4 note) for 3 seconds...\n");

    let total_samples = rates.sample_rate as u64 * 3;
    while scheduler.charged(sample_clk) < total_samples {
        let id = scheduler.next();
        let cycles = if id == sample_clk {
            bus.apu_mut().sample_tick()
        } else {
            bus.apu_mut().sequencer_tick()
        };
        scheduler.charge(id, cycles);

        if bus.apu_mut().take_sequencer_realign() {
            scheduler.realign(seq_clk);
        }

        if scheduler.charged(sample_clk) % 1024 == 0 {
            while bus.apu().sink_nearly_full() {
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    println!("Done!");
    Ok(())
}
