//! Pulse wave channel implementation

use crate::apu::components::{Envelope, LengthCounter, SweepUnit, Timer};
use crate::apu::constants::{DUTY_PATTERNS, NUM_DUTY_STEPS};
use crate::apu::registers::{ApuRegisters, PulseId, PulseMain};

/// Pulse wave channel runtime state (used for both Pulse 1 and Pulse 2)
///
/// Channel parameters live in the APU register file; this record holds only
/// the counters and gates that evolve between register writes. Each clock
/// method takes the register view it needs so the raw bytes stay the single
/// source of truth.
#[derive(Debug, Clone)]
pub struct PulseChannel {
    /// Which pulse channel this is - selects registers and sweep arithmetic
    id: PulseId,
    /// Timer feeding the duty sequencer
    pub(crate) timer: Timer,
    /// Duty cycle sequence position (0-7)
    pub(crate) duty_step: u8,
    /// Current high/low bit of the duty wave
    duty_out: u8,
    /// Length counter
    pub(crate) length: LengthCounter,
    /// Envelope generator
    pub(crate) envelope: Envelope,
    /// Sweep unit
    pub(crate) sweep: SweepUnit,
}

impl PulseChannel {
    pub fn new(id: PulseId) -> Self {
        Self {
            id,
            timer: Timer::new(),
            duty_step: 0,
            duty_out: 0,
            length: LengthCounter::new(),
            envelope: Envelope::new(),
            sweep: SweepUnit::new(id),
        }
    }

    pub fn id(&self) -> PulseId {
        self.id
    }

    /// Clear all runtime state and gate the output until the channel is
    /// reprogrammed
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
        self.length.silenced = true;
        self.sweep.silenced = true;
    }

    /// Whether either gate is currently holding the channel silent
    pub fn silenced(&self) -> bool {
        self.length.silenced() || self.sweep.silenced()
    }

    /// Advance the timer/duty sequencer. Called on every second sample
    /// tick; the duty output holds its level between timer fires.
    pub fn clock_timer(&mut self, regs: &ApuRegisters) {
        if self.silenced() {
            self.duty_out = 0;
            return;
        }

        if self.timer.clock(regs.timer_period(self.id)) {
            let duty = regs.pulse_main(self.id).duty();
            self.duty_out = DUTY_PATTERNS[duty as usize][self.duty_step as usize];
            self.duty_step = (self.duty_step + 1) % NUM_DUTY_STEPS;
        }
    }

    /// Clock the length counter (frame sequencer length+sweep step)
    pub fn clock_length(&mut self, main: PulseMain) {
        self.length.clock(main.halt());
    }

    /// Clock the envelope (frame sequencer envelope step)
    pub fn clock_envelope(&mut self, main: PulseMain) {
        self.envelope.clock(main);
    }

    /// Clock the sweep unit (frame sequencer length+sweep step).
    /// Returns a period the caller must write back to the register file.
    pub fn clock_sweep(&mut self, regs: &ApuRegisters) -> Option<u16> {
        self.sweep
            .clock(regs.pulse_sweep(self.id), regs.timer_period(self.id))
    }

    /// Current duty output bit (0 or 1)
    pub fn duty_out(&self) -> u8 {
        self.duty_out
    }

    /// Volume latched at the last envelope clock (0-15)
    pub fn volume(&self) -> u8 {
        self.envelope.volume()
    }

    /// Current length counter value
    pub fn length_counter(&self) -> u8 {
        self.length.counter
    }
}
