// Audio output - Handles audio playback using cpal
//
// This module provides cross-platform audio output using the cpal library.
// It manages the audio device, stream, and callback for audio playback,
// draining samples from the shared `AudioRing` (spec §5's SPSC ring).

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use super::ring::AudioRing;

/// Audio output configuration
#[derive(Clone)]
pub struct AudioConfig {
    /// Sample rate in Hz (44100 or 48000)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Buffer duration in milliseconds (affects latency and ring sizing)
    pub buffer_duration_ms: u32,
}

impl AudioConfig {
    /// Create default audio configuration
    ///
    /// - Sample rate: 44.1 kHz
    /// - Channels: 1 (mono)
    /// - Buffer duration: 50 ms
    pub fn new() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
            buffer_duration_ms: 50,
        }
    }

    /// Set the sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the number of channels (1 = mono, 2 = stereo)
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Set the buffer duration in milliseconds
    pub fn with_buffer_duration(mut self, duration_ms: u32) -> Self {
        self.buffer_duration_ms = duration_ms;
        self
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio output handle
///
/// Manages the audio device and stream for playback.
pub struct AudioOutput {
    /// Audio configuration
    config: AudioConfig,

    /// Audio device
    _device: Device,

    /// Audio stream
    stream: Stream,

    /// Shared audio ring (emulation worker is the producer, the cpal
    /// callback is the consumer)
    ring: Arc<Mutex<AudioRing>>,
}

impl AudioOutput {
    /// Create a new audio output
    ///
    /// # Arguments
    ///
    /// * `config` - Audio configuration
    ///
    /// # Returns
    ///
    /// Result containing the AudioOutput or an error message
    pub fn new(config: AudioConfig) -> Result<Self, String> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or("No output device available")?;

        log::info!("audio device: {}", device.name().unwrap_or_default());

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let ring_capacity =
            ((config.buffer_duration_ms as f64 / 1000.0) * config.sample_rate as f64) as usize;
        let ring = Arc::new(Mutex::new(AudioRing::new(ring_capacity)));
        let ring_clone = Arc::clone(&ring);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    let mut r = ring_clone.lock().unwrap();
                    r.drain(data);
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("failed to start audio stream: {}", e))?;

        log::info!(
            "audio output initialized: {} Hz, {} channel(s), format {:?}",
            config.sample_rate,
            config.channels,
            SampleFormat::I16
        );

        Ok(Self {
            config,
            _device: device,
            stream,
            ring,
        })
    }

    /// Push one i16 sample into the ring (producer side, called from the
    /// emulation worker thread).
    pub fn push_sample(&self, sample: i16) {
        let mut ring = self.ring.lock().unwrap();
        ring.push(sample);
    }

    /// Number of samples currently buffered.
    pub fn buffer_len(&self) -> usize {
        self.ring.lock().unwrap().len()
    }

    /// Ring capacity in samples.
    pub fn buffer_capacity(&self) -> usize {
        self.ring.lock().unwrap().capacity()
    }

    /// Check if the buffer is nearly full (> 90% capacity), useful for
    /// flow control in the emulation worker.
    pub fn is_buffer_nearly_full(&self) -> bool {
        let ring = self.ring.lock().unwrap();
        ring.len() > (ring.capacity() * 9 / 10)
    }

    /// Total underruns observed by the consumer so far.
    pub fn underrun_count(&self) -> u64 {
        self.ring.lock().unwrap().underrun_count()
    }

    /// Clear the audio ring
    pub fn clear_buffer(&self) {
        self.ring.lock().unwrap().clear();
    }

    /// Get the audio configuration
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Pause audio playback
    pub fn pause(&self) -> Result<(), String> {
        self.stream
            .pause()
            .map_err(|e| format!("failed to pause audio: {}", e))
    }

    /// Resume audio playback
    pub fn resume(&self) -> Result<(), String> {
        self.stream
            .play()
            .map_err(|e| format!("failed to resume audio: {}", e))
    }
}

/// Audio output builder for easier configuration
pub struct AudioOutputBuilder {
    config: AudioConfig,
}

impl AudioOutputBuilder {
    /// Create a new audio output builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AudioConfig::new(),
        }
    }

    /// Set the sample rate
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Set the number of channels
    pub fn channels(mut self, channels: u16) -> Self {
        self.config.channels = channels;
        self
    }

    /// Set the buffer duration
    pub fn buffer_duration(mut self, duration_ms: u32) -> Self {
        self.config.buffer_duration_ms = duration_ms;
        self
    }

    /// Build the audio output
    pub fn build(self) -> Result<AudioOutput, String> {
        AudioOutput::new(self.config)
    }
}

impl Default for AudioOutputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_config_creation() {
        let config = AudioConfig::new();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.channels, 1);
        assert_eq!(config.buffer_duration_ms, 50);
    }

    #[test]
    fn test_audio_config_builder() {
        let config = AudioConfig::new()
            .with_sample_rate(48000)
            .with_channels(2)
            .with_buffer_duration(100);

        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.buffer_duration_ms, 100);
    }

    #[test]
    fn test_audio_output_builder() {
        let builder = AudioOutputBuilder::new()
            .sample_rate(48000)
            .channels(2)
            .buffer_duration(100);

        assert_eq!(builder.config.sample_rate, 48000);
        assert_eq!(builder.config.channels, 2);
        assert_eq!(builder.config.buffer_duration_ms, 100);
    }

    // Note: Cannot test actual audio output in unit tests as it requires audio hardware
    // Integration tests should be used for end-to-end audio testing
}
