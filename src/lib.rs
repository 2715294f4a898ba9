// rp2a03 - NES APU and sprite DMA emulation core
//
// Cycle-driven emulation of the second-generation console's audio
// processing unit: two pulse channels behind a raw register file, a frame
// sequencer fanning out length/sweep/envelope/interrupt pulses, a linear
// mixer emitting unsigned 8-bit samples, and the sprite-DMA channel that
// shares the APU's bus timing.

// Public modules
pub mod apu;
pub mod audio;
pub mod bus;
pub mod config;
pub mod dma;
pub mod interrupt;
pub mod scheduler;

// Re-export main types for convenience
pub use apu::{Apu, ClockRates};
#[cfg(feature = "audio")]
pub use audio::CpalSink;
pub use audio::{AudioSink, AudioSpec, CaptureSink, Mixer, NullSink, SampleBuffer};
pub use bus::{Bus, BusAccess, MemoryMappedDevice};
pub use config::ApuConfig;
pub use dma::SpriteDma;
pub use interrupt::IrqLine;
pub use scheduler::{ClockId, Cycles, Scheduler};
