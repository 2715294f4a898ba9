// Audio output - Handles audio playback using cpal
//
// This module provides cross-platform audio output using the cpal library.
// It manages the audio device, stream, and callback for audio playback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use super::buffer::SampleBuffer;
use super::{AudioSink, AudioSpec};

/// Live audio device state, created when the sink is opened
struct StreamState {
    /// Audio device
    _device: Device,

    /// Audio stream
    stream: Stream,

    /// Shared sample buffer
    buffer: Arc<Mutex<SampleBuffer>>,
}

/// cpal-backed audio sink
///
/// Samples are buffered as raw unsigned bytes and converted to `f32` in
/// the stream callback. An underrun plays out as the centerline value; an
/// overrun drops the newest sample - flow control belongs to the host
/// driving the emulation.
pub struct CpalSink {
    /// Buffer size in milliseconds (affects latency)
    buffer_duration_ms: u32,

    state: Option<StreamState>,
}

impl CpalSink {
    /// Create an unopened sink with a 50 ms buffer
    pub fn new() -> Self {
        Self {
            buffer_duration_ms: 50,
            state: None,
        }
    }

    /// Set the buffer duration in milliseconds
    pub fn with_buffer_duration(mut self, duration_ms: u32) -> Self {
        self.buffer_duration_ms = duration_ms;
        self
    }

    /// Get the number of samples currently in the buffer
    pub fn buffer_len(&self) -> usize {
        match &self.state {
            Some(state) => state.buffer.lock().unwrap().len(),
            None => 0,
        }
    }

    /// Check if the buffer is nearly full (> 90% capacity)
    ///
    /// This can be used to implement flow control.
    pub fn is_buffer_nearly_full(&self) -> bool {
        match &self.state {
            Some(state) => {
                let buf = state.buffer.lock().unwrap();
                buf.len() > (buf.capacity() * 9 / 10)
            }
            None => false,
        }
    }

    /// Pause audio playback
    pub fn pause(&self) -> Result<(), String> {
        match &self.state {
            Some(state) => state
                .stream
                .pause()
                .map_err(|e| format!("Failed to pause audio: {}", e)),
            None => Err("Audio sink is not open".to_string()),
        }
    }

    /// Resume audio playback
    pub fn resume(&self) -> Result<(), String> {
        match &self.state {
            Some(state) => state
                .stream
                .play()
                .map_err(|e| format!("Failed to resume audio: {}", e)),
            None => Err("Audio sink is not open".to_string()),
        }
    }
}

impl AudioSink for CpalSink {
    /// Open the default output device at the requested rate
    fn open(&mut self, spec: AudioSpec) -> Result<(), String> {
        // Get default audio host
        let host = cpal::default_host();

        // Get default output device
        let device = host
            .default_output_device()
            .ok_or("No output device available")?;

        println!("Audio device: {}", device.name().unwrap_or_default());

        // Create stream configuration
        let stream_config = StreamConfig {
            channels: spec.channels,
            sample_rate: cpal::SampleRate(spec.freq),
            buffer_size: cpal::BufferSize::Default,
        };

        // Create shared sample buffer
        let buffer = Arc::new(Mutex::new(SampleBuffer::with_duration(
            self.buffer_duration_ms,
            spec.freq,
        )));

        // Clone buffer for the audio callback
        let buffer_clone = Arc::clone(&buffer);

        // Create audio stream with callback
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Fill the output buffer with samples from our buffer,
                    // centering the unsigned bytes around zero
                    let mut buf = buffer_clone.lock().unwrap();

                    for sample in data.iter_mut() {
                        *sample = buf.pop().map_or(0.0, |b| b as f32 / 127.5 - 1.0);
                    }
                },
                move |err| {
                    eprintln!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        // Start the stream
        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        println!(
            "Audio output initialized: {} Hz, {} channel(s)",
            spec.freq, spec.channels
        );

        self.state = Some(StreamState {
            _device: device,
            stream,
            buffer,
        });

        Ok(())
    }

    fn enqueue(&mut self, sample: u8) {
        if let Some(state) = &self.state {
            let mut buf = state.buffer.lock().unwrap();
            buf.push(sample);
        }
    }

    fn is_buffer_nearly_full(&self) -> bool {
        CpalSink::is_buffer_nearly_full(self)
    }

    fn close(&mut self) {
        // Dropping the stream stops playback and releases the device
        self.state = None;
    }
}

impl Default for CpalSink {
    fn default() -> Self {
        Self::new()
    }
}
