//! Frame sequencer for the APU
//!
//! The frame sequencer is a slow state machine that fans periodic clock
//! pulses out to the length counters, sweep units, envelopes, and the
//! frame-interrupt flag. It is driven externally by the sequencer clock
//! (conventionally around 240 Hz) and selects one of two step schedules:
//!
//! ```text
//! mode 0: 4-step        mode 1: 5-step
//! ---------------       ---------------
//!     - - - f               - - - - -   (interrupt flag never set)
//!     - l - l               l - l - -
//!     e e e e               e e e e -
//! ```

/// Frame sequencer step schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerMode {
    /// 4-step sequence with a frame interrupt on the final step
    FourStep,
    /// 5-step sequence, no interrupts
    FiveStep,
}

impl SequencerMode {
    fn num_steps(self) -> u8 {
        match self {
            SequencerMode::FourStep => 4,
            SequencerMode::FiveStep => 5,
        }
    }
}

/// Clock pulses produced by one sequencer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSignals {
    /// Set the frame-interrupt flag (subject to the inhibit bit)
    pub set_irq: bool,
    /// Clock length counters and sweep units
    pub half_frame: bool,
    /// Clock envelopes
    pub quarter_frame: bool,
}

/// Step counter selecting which pulses fire on each sequencer tick
#[derive(Debug, Clone)]
pub struct FrameSequencer {
    step: u8,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Advance the sequencer by one tick.
    ///
    /// Signals are computed from the step the sequencer is on when the
    /// tick arrives; the step advances afterwards.
    pub fn clock(&mut self, mode: SequencerMode) -> FrameSignals {
        let s = self.step;
        let signals = match mode {
            SequencerMode::FourStep => FrameSignals {
                set_irq: s == 3,
                half_frame: s == 1 || s == 3,
                quarter_frame: true,
            },
            SequencerMode::FiveStep => FrameSignals {
                set_irq: false,
                half_frame: s == 0 || s == 2,
                quarter_frame: s <= 3,
            },
        };

        self.step += 1;
        if self.step == mode.num_steps() {
            self.step = 0;
        }

        signals
    }

    /// Reset the step counter (sequencer-register write, controller reset)
    pub fn reset(&mut self) {
        self.step = 0;
    }

    pub fn step(&self) -> u8 {
        self.step
    }
}

impl Default for FrameSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_4_step_schedule() {
        let mut seq = FrameSequencer::new();

        let s0 = seq.clock(SequencerMode::FourStep);
        assert!((!s0.set_irq, !s0.half_frame, s0.quarter_frame) == (true, true, true));

        let s1 = seq.clock(SequencerMode::FourStep);
        assert!(s1.half_frame && s1.quarter_frame && !s1.set_irq);

        let s2 = seq.clock(SequencerMode::FourStep);
        assert!(!s2.half_frame && s2.quarter_frame && !s2.set_irq);

        let s3 = seq.clock(SequencerMode::FourStep);
        assert!(s3.half_frame && s3.quarter_frame && s3.set_irq);

        // Wrapped back to step 0
        assert_eq!(seq.step(), 0);
    }

    #[test]
    fn test_5_step_schedule() {
        let mut seq = FrameSequencer::new();

        let expected = [
            (true, true),   // step 0: l + e
            (false, true),  // step 1: e
            (true, true),   // step 2: l + e
            (false, true),  // step 3: e
            (false, false), // step 4: idle
        ];
        for (half, quarter) in expected {
            let s = seq.clock(SequencerMode::FiveStep);
            assert!(!s.set_irq);
            assert_eq!(s.half_frame, half);
            assert_eq!(s.quarter_frame, quarter);
        }
        assert_eq!(seq.step(), 0);
    }

    #[test]
    fn test_reset_returns_to_step_zero() {
        let mut seq = FrameSequencer::new();
        seq.clock(SequencerMode::FourStep);
        seq.clock(SequencerMode::FourStep);
        assert_eq!(seq.step(), 2);

        seq.reset();
        assert_eq!(seq.step(), 0);
    }
}
