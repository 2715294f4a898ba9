//! APU channel implementations
//!
//! Only the pulse channels generate audio; the triangle, noise, and DMC
//! register slots are stored in the register file but have no channel
//! state behind them.

pub mod pulse;

pub use pulse::PulseChannel;
