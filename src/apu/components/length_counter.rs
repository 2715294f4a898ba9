//! Length counter for controlling note duration

use crate::apu::constants::LENGTH_COUNTER_TABLE;

/// Length counter gating a channel's output
///
/// The counter silences the channel when it is clocked while already zero
/// with the halt flag clear; a zero counter alone does not silence.
#[derive(Debug, Clone)]
pub struct LengthCounter {
    /// Counter value
    pub(crate) counter: u8,
    /// Output gate, latched at clock time
    pub(crate) silenced: bool,
}

impl LengthCounter {
    pub fn new() -> Self {
        Self {
            counter: 0,
            silenced: false,
        }
    }

    /// Clock the length counter (called by the frame sequencer).
    /// The halt flag is the shared envelope-loop/length-halt register bit.
    pub fn clock(&mut self, halt: bool) {
        self.silenced = self.counter == 0 && !halt;
        if !halt && self.counter != 0 {
            self.counter -= 1;
        }
    }

    /// Load a new counter value from the length counter table
    pub fn load(&mut self, index: u8) {
        self.counter = LENGTH_COUNTER_TABLE[(index & 0x1F) as usize];
    }

    /// Force the counter to zero (control-register disable)
    pub fn clear(&mut self) {
        self.counter = 0;
    }

    /// Check if the length counter is non-zero
    pub fn is_active(&self) -> bool {
        self.counter > 0
    }

    pub fn silenced(&self) -> bool {
        self.silenced
    }
}
