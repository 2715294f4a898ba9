// Audio module - APU sample sink and mixing
//
// This module provides:
// - The audio-frontend capability the APU pushes one byte into per sample
//   tick
// - Linear two-channel mixing to unsigned 8-bit samples
// - Cross-platform audio output using cpal (behind the `audio` feature)
// - Buffering between the emulation loop and the stream callback

pub mod buffer;
pub mod mixer;
#[cfg(feature = "audio")]
pub mod output;

pub use buffer::SampleBuffer;
pub use mixer::Mixer;
#[cfg(feature = "audio")]
pub use output::CpalSink;

use std::cell::RefCell;
use std::rc::Rc;

/// Stream parameters the APU opens its sink with
///
/// The sample format is fixed to unsigned 8-bit mono by the sink trait;
/// the rate is the APU's injected sample-clock rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Sample rate in Hz
    pub freq: u32,
    /// Number of channels (the APU emits 1)
    pub channels: u16,
}

/// Audio frontend capability
///
/// Opened once during APU initialization (the only fallible step), fed one
/// sample per sample tick, and closed on teardown. Backpressure is the
/// sink's responsibility; the APU never throttles.
pub trait AudioSink {
    /// Open the sink for the given stream parameters
    fn open(&mut self, spec: AudioSpec) -> Result<(), String>;

    /// Enqueue one unsigned 8-bit mono sample
    fn enqueue(&mut self, sample: u8);

    /// Whether the sink's buffer is close to overrunning. Hosts may use
    /// this for flow control; sinks without backpressure report false.
    fn is_buffer_nearly_full(&self) -> bool {
        false
    }

    /// Close the sink and release the output device
    fn close(&mut self);
}

/// Sink that drops every sample - stands in when audio output is disabled
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl AudioSink for NullSink {
    fn open(&mut self, _spec: AudioSpec) -> Result<(), String> {
        Ok(())
    }

    fn enqueue(&mut self, _sample: u8) {}

    fn close(&mut self) {}
}

/// Sink that records everything pushed into it
///
/// Cloning yields another handle to the same storage, so a host can keep
/// one handle while the APU owns the other. Used by tests and headless
/// hosts.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    samples: Rc<RefCell<Vec<u8>>>,
    spec: Rc<RefCell<Option<AudioSpec>>>,
    open: Rc<RefCell<bool>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all samples captured so far
    pub fn samples(&self) -> Vec<u8> {
        self.samples.borrow().clone()
    }

    /// The most recent sample, if any
    pub fn last(&self) -> Option<u8> {
        self.samples.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.borrow().is_empty()
    }

    /// The spec the sink was opened with, if it has been opened
    pub fn spec(&self) -> Option<AudioSpec> {
        *self.spec.borrow()
    }

    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    pub fn clear(&self) {
        self.samples.borrow_mut().clear();
    }
}

impl AudioSink for CaptureSink {
    fn open(&mut self, spec: AudioSpec) -> Result<(), String> {
        *self.spec.borrow_mut() = Some(spec);
        *self.open.borrow_mut() = true;
        Ok(())
    }

    fn enqueue(&mut self, sample: u8) {
        self.samples.borrow_mut().push(sample);
    }

    fn close(&mut self) {
        *self.open.borrow_mut() = false;
    }
}
