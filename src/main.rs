// rp2a03 - Demo Entry Point
//
// Programs both pulse channels with a two-note chord through the bus and
// drives the sample and sequencer clocks through the scheduler for a few
// seconds of audio output.

use std::thread;
use std::time::Duration;

use rp2a03::audio::{AudioSink, NullSink};
use rp2a03::config::CONFIG_FILE;
use rp2a03::{Apu, ApuConfig, Bus, IrqLine, Scheduler};

#[cfg(feature = "audio")]
use rp2a03::CpalSink;

/// Timer period producing the given frequency at the given sample rate.
/// The duty sequencer steps at half the sample rate and a full wave is
/// eight steps, so f = sample_rate / (16 * (period + 1)).
fn period_for(sample_rate: u32, freq: u32) -> u16 {
    (sample_rate / (16 * freq)).saturating_sub(1) as u16
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("rp2a03 APU demo v0.1.0");
    println!("======================");
    println!();

    // Load or create host configuration
    let config = ApuConfig::load_or_default(CONFIG_FILE);
    let rates = config.clock_rates();
    println!(
        "Clocks: sample {} Hz, sequencer {} Hz",
        rates.sample_rate, rates.sequencer_rate
    );
    println!();

    #[cfg(feature = "audio")]
    let sink: Box<dyn AudioSink> = if config.audio.enabled {
        Box::new(CpalSink::new().with_buffer_duration(config.audio.buffer_duration_ms))
    } else {
        Box::new(NullSink::new())
    };
    #[cfg(not(feature = "audio"))]
    let sink: Box<dyn AudioSink> = Box::new(NullSink::new());

    let irq = IrqLine::new();
    let mut apu = Apu::new(rates, sink, irq.clone())?;
    apu.set_volume(config.audio.volume);
    let mut bus = Bus::new(apu);

    // Program an A4 + E5 chord: both channels enabled, 50% duty,
    // constant volume, length counters halted so the notes sustain
    let a4 = period_for(rates.sample_rate, 440);
    let e5 = period_for(rates.sample_rate, 659);

    bus.write(0x4015, 0x03); // enable pulse 1 and 2
    bus.write(0x4000, 0xBF); // pulse 1: duty 50%, halt, constant volume 15
    bus.write(0x4002, (a4 & 0xFF) as u8);
    bus.write(0x4003, ((a4 >> 8) & 0x07) as u8 | 0x08);
    bus.write(0x4004, 0xB8); // pulse 2: duty 50%, halt, constant volume 8
    bus.write(0x4006, (e5 & 0xFF) as u8);
    bus.write(0x4007, ((e5 >> 8) & 0x07) as u8 | 0x08);
    bus.write(0x4017, 0x00); // 4-step sequence, interrupts enabled

    let mut scheduler = Scheduler::new();
    let sample_clk = scheduler.add_clock("sample", rates.sample_rate);
    let seq_clk = scheduler.add_clock("sequencer", rates.sequencer_rate);

    println!("Playing A4 + E5 chord for 3 seconds...");
    println!();

    let total_samples = rates.sample_rate as u64 * 3;
    let mut frame_irqs: u64 = 0;

    while scheduler.charged(sample_clk) < total_samples {
        let id = scheduler.next();
        let cycles = if id == sample_clk {
            bus.apu_mut().sample_tick()
        } else {
            let was_raised = irq.is_raised();
            let cycles = bus.apu_mut().sequencer_tick();
            if !was_raised && irq.is_raised() {
                frame_irqs += 1;
                // A real CPU would service the interrupt; the demo just
                // acknowledges it by reading the status register
                bus.read(0x4015);
            }
            cycles
        };
        scheduler.charge(id, cycles);
        scheduler.charge(id, bus.take_stall_cycles());

        if bus.apu_mut().take_sequencer_realign() {
            scheduler.realign(seq_clk);
        }

        // Let the audio hardware drain before producing more
        if scheduler.charged(sample_clk) % 1024 == 0 {
            while bus.apu().sink_nearly_full() {
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    println!("Done.");
    println!("  Samples emitted:  {}", scheduler.charged(sample_clk));
    println!("  Sequencer ticks:  {}", scheduler.charged(seq_clk));
    println!("  Frame interrupts: {}", frame_irqs);

    Ok(())
}
