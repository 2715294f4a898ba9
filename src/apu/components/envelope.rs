//! Envelope generator for controlling volume over time

use crate::apu::registers::PulseMain;

/// Envelope generator for controlling volume over time
///
/// The generator's configuration lives in the channel's main register and
/// is read fresh on every clock; only the runtime counters live here. The
/// output volume is latched at clock time, so the mixer always sees the
/// value from the most recent envelope clock.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Start flag - set when the timer-high register is written
    pub(crate) start: bool,
    /// Divider counter
    divider: u8,
    /// Decay level counter (0-15)
    pub(crate) decay_level: u8,
    /// Latched output volume
    volume: u8,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            start: false,
            divider: 0,
            decay_level: 0,
            volume: 0,
        }
    }

    /// Clock the envelope generator (called by frame sequencer)
    pub fn clock(&mut self, main: PulseMain) {
        if self.start {
            self.start = false;
            self.decay_level = 15;
            self.divider = main.vol_env();
        } else if self.divider > 0 {
            self.divider -= 1;
        } else {
            self.divider = main.vol_env();
            if self.decay_level > 0 {
                self.decay_level -= 1;
            } else if main.halt() {
                self.decay_level = 15;
            }
        }

        // The constant-volume flag only selects the volume source; the
        // divider and decay counter advance either way.
        self.volume = if main.constant_vol() {
            main.vol_env()
        } else {
            self.decay_level
        };
    }

    /// The volume latched at the last envelope clock (0-15)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Restart the envelope on its next clock
    pub fn restart(&mut self) {
        self.start = true;
    }
}
