// APU module - Audio Processing Unit implementation
//
// The APU exposes three register regions to the bus fabric and two clock
// callbacks to the scheduler, and pushes one unsigned 8-bit mono sample
// into its audio sink per sample tick.
//
// # Register Regions
//
// ## Main region (20 bytes, write-only)
// | Offset      | Description                           |
// |-------------|---------------------------------------|
// | $00-$03     | Pulse 1: main, sweep, timer low/high  |
// | $04-$07     | Pulse 2: main, sweep, timer low/high  |
// | $08-$0B     | Triangle slots (stored only)          |
// | $0C-$0F     | Noise slots (stored only)             |
// | $10-$13     | DMC slots (stored only)               |
//
// Every write stores the raw byte first; timer-high writes load the
// length counter (if the channel is enabled) and restart the envelope,
// sweep writes arm the sweep reload flag.
//
// ## Control/status region (1 byte)
// Reading returns the status byte and clears the frame-interrupt flag.
// Writing stores the channel-enable mask; disabling a channel zeroes its
// length counter immediately.
//
// ## Sequencer region (1 byte, write-only)
// Writing stores the configuration, resets the sequencer step and
// divider, and clears the frame-interrupt flag when the inhibit bit is
// set.

pub mod channels;
pub mod components;
pub mod constants;
pub mod registers;

#[cfg(test)]
mod tests;

use crate::audio::{AudioSink, AudioSpec, Mixer};
use crate::bus::MemoryMappedDevice;
use crate::interrupt::IrqLine;
use crate::scheduler::Cycles;

use channels::PulseChannel;
use components::FrameSequencer;
use registers::{
    ApuRegisters, PulseId, PULSE1_SWEEP, PULSE1_TIMER_HIGH, PULSE2_SWEEP, PULSE2_TIMER_HIGH,
};

/// Clock rates injected into the APU at construction
///
/// Neither rate is hardcoded; the sample clock conventionally runs at the
/// audio output rate and the sequencer clock at roughly 240 Hz.
#[derive(Debug, Clone, Copy)]
pub struct ClockRates {
    /// Sample-clock rate in Hz (one output byte per tick)
    pub sample_rate: u32,
    /// Frame-sequencer clock rate in Hz
    pub sequencer_rate: u32,
}

/// The APU controller
///
/// Owns the register file, both pulse channels, and the frame sequencer.
/// All mutation happens inside bus callbacks and clock ticks, which the
/// cooperative scheduler never overlaps.
pub struct Apu {
    regs: ApuRegisters,
    pulse1: PulseChannel,
    pulse2: PulseChannel,
    sequencer: FrameSequencer,
    /// Sample-tick parity; pulse timers advance on every second tick
    cycle: u8,
    rates: ClockRates,
    irq: IrqLine,
    mixer: Mixer,
    sink: Box<dyn AudioSink>,
    /// Set when a sequencer-register write asks the host to re-align the
    /// sequencer clock
    seq_realign: bool,
}

impl Apu {
    /// Initialize the APU: bind its resources and open the audio sink at
    /// the sample-clock rate.
    ///
    /// Opening the sink is the only fallible step; on failure the
    /// partially built instance is dropped and the error reported.
    pub fn new(rates: ClockRates, mut sink: Box<dyn AudioSink>, irq: IrqLine) -> Result<Self, String> {
        sink.open(AudioSpec {
            freq: rates.sample_rate,
            channels: 1,
        })?;

        let mut apu = Self {
            regs: ApuRegisters::new(),
            pulse1: PulseChannel::new(PulseId::Pulse1),
            pulse2: PulseChannel::new(PulseId::Pulse2),
            sequencer: FrameSequencer::new(),
            cycle: 0,
            rates,
            irq,
            mixer: Mixer::new(),
            sink,
            seq_realign: false,
        };
        apu.reset();
        Ok(apu)
    }

    /// Reset all register and channel state and silence both pulses until
    /// they are reprogrammed
    pub fn reset(&mut self) {
        self.regs.reset();
        self.pulse1.reset();
        self.pulse2.reset();
        self.sequencer.reset();
        self.cycle = 0;
        self.seq_realign = false;
        self.irq.set(false);
    }

    /// The clock rates this instance was constructed with
    pub fn rates(&self) -> ClockRates {
        self.rates
    }

    /// Read-only view of the register file
    pub fn registers(&self) -> &ApuRegisters {
        &self.regs
    }

    /// Read-only view of a pulse channel's runtime state
    pub fn pulse(&self, id: PulseId) -> &PulseChannel {
        match id {
            PulseId::Pulse1 => &self.pulse1,
            PulseId::Pulse2 => &self.pulse2,
        }
    }

    /// Set the mixer's master volume
    pub fn set_volume(&mut self, volume: f32) {
        self.mixer.set_volume(volume);
    }

    /// Whether the audio sink is asking the host to slow down
    pub fn sink_nearly_full(&self) -> bool {
        self.sink.is_buffer_nearly_full()
    }

    fn pulse_mut(&mut self, id: PulseId) -> &mut PulseChannel {
        match id {
            PulseId::Pulse1 => &mut self.pulse1,
            PulseId::Pulse2 => &mut self.pulse2,
        }
    }

    // ========================================
    // Main register region
    // ========================================

    /// Write a byte into the main register region (offsets $00-$13).
    ///
    /// The raw byte is stored first, then the write side effects fire.
    pub fn write_register(&mut self, offset: u16, value: u8) {
        self.regs.write_raw(offset, value);

        match offset {
            PULSE1_TIMER_HIGH => self.timer_high_written(PulseId::Pulse1),
            PULSE2_TIMER_HIGH => self.timer_high_written(PulseId::Pulse2),
            PULSE1_SWEEP => self.pulse1.sweep.restart(),
            PULSE2_SWEEP => self.pulse2.sweep.restart(),
            _ => {}
        }
    }

    /// Timer-high side effects: load the length counter if the channel is
    /// enabled, and always restart the envelope
    fn timer_high_written(&mut self, id: PulseId) {
        if self.regs.control().pulse_enabled(id) {
            let index = self.regs.timer_high(id).length_load();
            self.pulse_mut(id).length.load(index);
        }

        self.pulse_mut(id).envelope.restart();
    }

    // ========================================
    // Control/status region
    // ========================================

    /// Read the status register.
    ///
    /// Returns the byte as it was before the read's side effect of
    /// clearing the frame-interrupt flag (which also lowers the IRQ line).
    pub fn read_status(&mut self) -> u8 {
        let status = self.regs.status();

        self.regs.set_frame_interrupt(false);
        self.irq.set(false);

        status
    }

    /// Write the control register. Channels whose enable bit is clear get
    /// their length counters zeroed immediately.
    pub fn write_control(&mut self, value: u8) {
        self.regs.write_control(value);

        for id in PulseId::BOTH {
            if !self.regs.control().pulse_enabled(id) {
                self.pulse_mut(id).length.clear();
            }
        }
    }

    // ========================================
    // Sequencer region
    // ========================================

    /// Write the frame-sequencer configuration register.
    ///
    /// The sequencer step and divider reset; if the interrupt-inhibit bit
    /// is now set, the frame-interrupt flag is cleared.
    pub fn write_sequencer(&mut self, value: u8) {
        self.regs.write_sequencer(value);

        self.sequencer.reset();
        self.seq_realign = true;

        if self.regs.sequencer().int_inhibit() {
            self.regs.set_frame_interrupt(false);
            self.irq.set(false);
        }
    }

    /// Drain the pending request to re-align the sequencer clock lane
    /// (the divider-reset half of a sequencer-register write). Hosts
    /// driving the APU through a scheduler apply it via
    /// `Scheduler::realign`.
    pub fn take_sequencer_realign(&mut self) -> bool {
        std::mem::take(&mut self.seq_realign)
    }

    // ========================================
    // Clock callbacks
    // ========================================

    /// Sample-clock tick: advance the pulse timers on every second tick,
    /// mix the current channel outputs, and emit one sample.
    pub fn sample_tick(&mut self) -> Cycles {
        // Pulse timers are clocked only on every second tick and thus
        // produce only even periods
        self.cycle += 1;
        if self.cycle == 2 {
            self.pulse1.clock_timer(&self.regs);
            self.pulse2.clock_timer(&self.regs);
            self.cycle = 0;
        }

        let sample = self.mixer.mix(
            self.pulse1.duty_out(),
            self.pulse1.volume(),
            self.pulse2.duty_out(),
            self.pulse2.volume(),
        );
        self.sink.enqueue(sample);

        1
    }

    /// Sequencer-clock tick: fan the current step's pulses out to the
    /// interrupt flag, length counters, sweep units, and envelopes.
    pub fn sequencer_tick(&mut self) -> Cycles {
        let seq = self.regs.sequencer();
        let signals = self.sequencer.clock(seq.mode());

        if signals.set_irq && !seq.int_inhibit() {
            self.regs.set_frame_interrupt(true);
        }

        // The frame-interrupt flag is wired to the CPU's IRQ line
        if self.regs.frame_interrupt() {
            self.irq.set(true);
        }

        if signals.half_frame {
            self.clock_length_counters();
            self.clock_sweep_units();
        }

        if signals.quarter_frame {
            let main1 = self.regs.pulse_main(PulseId::Pulse1);
            let main2 = self.regs.pulse_main(PulseId::Pulse2);
            self.pulse1.clock_envelope(main1);
            self.pulse2.clock_envelope(main2);
        }

        1
    }

    fn clock_length_counters(&mut self) {
        let main1 = self.regs.pulse_main(PulseId::Pulse1);
        let main2 = self.regs.pulse_main(PulseId::Pulse2);
        self.pulse1.clock_length(main1);
        self.pulse2.clock_length(main2);

        // Status reflects the counters as of this clock
        self.regs
            .set_pulse_length_status(PulseId::Pulse1, self.pulse1.length.is_active());
        self.regs
            .set_pulse_length_status(PulseId::Pulse2, self.pulse2.length.is_active());
    }

    fn clock_sweep_units(&mut self) {
        if let Some(period) = self.pulse1.clock_sweep(&self.regs) {
            self.regs.set_timer_period(PulseId::Pulse1, period);
        }
        if let Some(period) = self.pulse2.clock_sweep(&self.regs) {
            self.regs.set_timer_period(PulseId::Pulse2, period);
        }
    }
}

impl MemoryMappedDevice for Apu {
    /// Read a byte from the APU's bus window ($4000-$4017).
    ///
    /// Only the control/status register is readable; the main and
    /// sequencer regions return 0.
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x4015 => self.read_status(),
            _ => 0,
        }
    }

    /// Write a byte into the APU's bus window ($4000-$4017)
    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x4000..=0x4013 => self.write_register(addr - 0x4000, data),
            0x4015 => self.write_control(data),
            0x4017 => self.write_sequencer(data),
            _ => {}
        }
    }
}

impl Drop for Apu {
    /// Deinitialize: release the audio frontend
    fn drop(&mut self) {
        self.sink.close();
    }
}
