//! Sweep unit for pitch bending

use crate::apu::registers::{PulseId, PulseSweep};

/// Sweep unit periodically adjusting a pulse channel's timer period
///
/// Pulse 1 hardwires its adder's carry input, so a negative sweep adds the
/// one's complement of the shifted period: its target lands one below
/// pulse 2's two's-complement result. Software can observe the difference.
#[derive(Debug, Clone)]
pub struct SweepUnit {
    /// Reload flag - set when the sweep register is written
    pub(crate) reload: bool,
    /// Divider counter
    divider: u8,
    /// Output gate, latched at clock time
    pub(crate) silenced: bool,
    /// Which channel this unit belongs to - selects the negate arithmetic
    channel: PulseId,
}

impl SweepUnit {
    pub fn new(channel: PulseId) -> Self {
        Self {
            reload: false,
            divider: 0,
            silenced: false,
            channel,
        }
    }

    /// Calculate the target period for the current register settings
    pub fn target_period(&self, sweep: PulseSweep, current_period: u16) -> u16 {
        let shifted = current_period >> sweep.shift();
        if sweep.negate() {
            match self.channel {
                // One's complement: current - shifted - 1
                PulseId::Pulse1 => current_period.wrapping_add(!shifted),
                PulseId::Pulse2 => current_period.wrapping_sub(shifted),
            }
        } else {
            current_period.wrapping_add(shifted)
        }
    }

    /// Clock the sweep unit (called by the frame sequencer on
    /// length+sweep steps).
    ///
    /// Returns `Some(new_period)` when the channel's period registers
    /// should be written back.
    pub fn clock(&mut self, sweep: PulseSweep, current_period: u16) -> Option<u16> {
        let reload = self.reload;
        let counter = self.divider;
        let mut adjust_period = false;

        // A pending reload sets the divider to the register period; if the
        // divider was already zero and the sweep is enabled, the period is
        // also adjusted.
        if reload {
            self.divider = sweep.period();
            if counter == 0 && sweep.enabled() {
                adjust_period = true;
            }
            self.reload = false;
        }

        if !reload && counter != 0 {
            self.divider -= 1;
        }

        // Divider expiry: reload it and request a period adjustment
        if !reload && counter == 0 && sweep.enabled() {
            self.divider = sweep.period();
            adjust_period = true;
        }

        let target = self.target_period(sweep, current_period);

        // Silencing applies whenever the sweep is enabled, independent of
        // the divider state or shift count
        self.silenced = sweep.enabled() && (current_period < 8 || target > 0x7FF);

        if adjust_period && !self.silenced && sweep.enabled() && sweep.shift() != 0 {
            Some(target)
        } else {
            None
        }
    }

    /// Mark the reload flag (sweep register write)
    pub fn restart(&mut self) {
        self.reload = true;
    }

    pub fn silenced(&self) -> bool {
        self.silenced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_period_positive() {
        let sweep = SweepUnit::new(PulseId::Pulse1);
        // shift = 1, no negate
        assert_eq!(sweep.target_period(PulseSweep(0x81), 0x100), 0x180);
    }

    #[test]
    fn test_negate_asymmetry() {
        let sweep1 = SweepUnit::new(PulseId::Pulse1);
        let sweep2 = SweepUnit::new(PulseId::Pulse2);
        let reg = PulseSweep(0x89); // enabled, negate, shift = 1

        // Pulse 2 subtracts the shifted period; pulse 1 lands one below
        assert_eq!(sweep2.target_period(reg, 0x100), 0x80);
        assert_eq!(sweep1.target_period(reg, 0x100), 0x7F);
    }

    #[test]
    fn test_silenced_below_minimum_period() {
        let mut sweep = SweepUnit::new(PulseId::Pulse1);

        // Enabled with period 7: silenced regardless of shift
        sweep.clock(PulseSweep(0x87), 7);
        assert!(sweep.silenced());

        // Disabled: never silenced
        let mut sweep = SweepUnit::new(PulseId::Pulse1);
        sweep.clock(PulseSweep(0x07), 7);
        assert!(!sweep.silenced());
    }

    #[test]
    fn test_silenced_above_maximum_target() {
        let mut sweep = SweepUnit::new(PulseId::Pulse2);

        // period 0x400, shift 0, no negate: target = 0x800 > 0x7FF
        sweep.clock(PulseSweep(0x80), 0x400);
        assert!(sweep.silenced());
    }

    #[test]
    fn test_adjust_requires_nonzero_shift() {
        let mut sweep = SweepUnit::new(PulseId::Pulse2);

        // Enabled, divider period 0, shift 0: divider fires every clock but
        // the period must never be written back
        assert_eq!(sweep.clock(PulseSweep(0x80), 0x100), None);
        assert_eq!(sweep.clock(PulseSweep(0x80), 0x100), None);
    }

    #[test]
    fn test_divider_cadence() {
        let mut sweep = SweepUnit::new(PulseId::Pulse2);
        let reg = PulseSweep(0xA1); // enabled, divider period 2, shift 1

        sweep.restart();
        // Reload clock: divider was zero, so the period adjusts immediately
        assert!(sweep.clock(reg, 0x100).is_some());
        // Two clocks to run the divider down, then the next adjustment
        assert_eq!(sweep.clock(reg, 0x180), None);
        assert_eq!(sweep.clock(reg, 0x180), None);
        assert!(sweep.clock(reg, 0x180).is_some());
    }
}
