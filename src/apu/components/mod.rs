//! Common APU components used by the pulse channels

pub mod envelope;
pub mod frame_sequencer;
pub mod length_counter;
pub mod sweep;
pub mod timer;

pub use envelope::Envelope;
pub use frame_sequencer::{FrameSequencer, FrameSignals, SequencerMode};
pub use length_counter::LengthCounter;
pub use sweep::SweepUnit;
pub use timer::Timer;
