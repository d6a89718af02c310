//! Frame-synchronous driver (C13): the one stateful object a CPU executor
//! and a video frontend actually hold. Owns the `Apu`, the mixer/resampler
//! pipeline, and the audio ring, and exposes the contract from spec.md §6.

use crate::apu::Apu;
use crate::audio::{AudioRing, Mixer, Resampler};
use crate::config::DriverConfig;
use crate::error::ApuError;

/// NTSC CPU cycles per video frame (spec.md §6's `advance_frame` contract).
pub const CYCLES_PER_FRAME: u64 = 29_780;

/// Addresses in `$4000-$4017` that are not APU registers (PPU OAM DMA,
/// controller ports) — spec.md §6.
fn is_apu_address(addr: u16) -> bool {
    matches!(addr, 0x4000..=0x4017) && !matches!(addr, 0x4009 | 0x400D | 0x4014 | 0x4016)
}

/// Timing/health snapshot returned by [`Driver::timing_stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    /// Nominal NTSC frame rate this driver targets.
    pub fps: f64,
    /// Cumulative audio ring underruns since the last reset.
    pub underruns: u64,
}

/// Drives the APU core across CPU cycles and frames, and feeds its output
/// into the resampled audio ring.
pub struct Driver {
    apu: Apu,
    mixer: Mixer,
    resampler: Resampler,
    ring: AudioRing,
    previous_cycle: u64,
    frame_count: u64,
}

impl Driver {
    /// Build a driver from configuration (sample rate, ring sizing, filter
    /// toggle, volume — see `crate::config::DriverConfig`).
    pub fn new(config: &DriverConfig) -> Self {
        let mut mixer = Mixer::new();
        mixer.set_volume(config.volume);

        Self {
            apu: Apu::new(),
            mixer,
            resampler: Resampler::new(
                crate::audio::sample_rates::NES_CPU_CLOCK,
                config.sample_rate as f64,
                config.filter_enabled,
            ),
            ring: AudioRing::new(config.ring_capacity_samples),
            previous_cycle: 0,
            frame_count: 0,
        }
    }

    /// Reset contract (spec.md §6): LFSR=1, all timers/counters=0, frame
    /// sequencer mode 0 step 0, IRQ cleared, status=0. The resampler and
    /// ring are also cleared; the spec leaves this detail to the
    /// implementer.
    pub fn reset(&mut self) {
        self.apu.reset();
        self.resampler.reset();
        self.ring.clear();
        self.previous_cycle = 0;
        self.frame_count = 0;
    }

    /// Advance the APU by `new_cycle_count - previous` CPU cycles,
    /// clocking every channel and the frame sequencer, mixing and
    /// resampling each cycle's output into the audio ring.
    ///
    /// `new_cycle_count` MUST be >= the value passed to the previous call
    /// (or 0 initially); calling with a lower value is a contract
    /// violation (spec.md §4.13).
    pub fn advance_to(&mut self, new_cycle_count: u64) -> Result<(), ApuError> {
        if new_cycle_count < self.previous_cycle {
            return Err(ApuError::NonMonotonicAdvance {
                previous: self.previous_cycle,
                new: new_cycle_count,
            });
        }

        let delta = new_cycle_count - self.previous_cycle;
        for _ in 0..delta {
            let raw = self.apu.clock_cpu_cycle();
            let mixed = self
                .mixer
                .mix(raw.pulse1, raw.pulse2, raw.triangle, raw.noise, raw.dmc);
            self.resampler.add_input_sample(mixed);
            while let Some(sample) = self.resampler.get_output_sample() {
                let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                self.ring.push(scaled);
            }
        }

        self.previous_cycle = new_cycle_count;
        Ok(())
    }

    /// Advance by exactly one NTSC video-frame's worth of CPU cycles
    /// (spec.md §6).
    pub fn advance_frame(&mut self) -> Result<(), ApuError> {
        let target = self.previous_cycle + CYCLES_PER_FRAME;
        self.advance_to(target)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Read an APU register. Only `$4015` has a meaningful return value;
    /// every other in-range address reads back as open bus (0), matching
    /// `bus::MemoryMappedDevice`'s infallible semantics. Addresses outside
    /// `$4000-$4017` (or the non-APU gaps within it) are a contract
    /// violation.
    pub fn read(&mut self, addr: u16) -> Result<u8, ApuError> {
        if !is_apu_address(addr) {
            return Err(ApuError::InvalidAddress(addr));
        }
        Ok(self.apu.read_register(addr))
    }

    /// Write an APU register. Same address validation as [`Driver::read`].
    pub fn write(&mut self, addr: u16, data: u8) -> Result<(), ApuError> {
        if !is_apu_address(addr) {
            return Err(ApuError::InvalidAddress(addr));
        }
        self.apu.write_register(addr, data);
        Ok(())
    }

    /// Drain up to `max` 16-bit signed samples into `buf` (spec.md §6's
    /// audio sink contract). On underrun the remainder is zero-filled and
    /// the returned count still equals `max`.
    pub fn drain_audio(&mut self, buf: &mut [i16], max: usize) -> usize {
        let n = max.min(buf.len());
        self.ring.drain(&mut buf[..n])
    }

    /// True while the frame IRQ or DMC IRQ line is asserted.
    pub fn irq_line(&self) -> bool {
        self.apu.irq_line()
    }

    /// Timing/health snapshot: nominal NTSC fps and cumulative underruns.
    pub fn timing_stats(&self) -> TimingStats {
        const NTSC_CPU_CLOCK: f64 = crate::audio::sample_rates::NES_CPU_CLOCK;
        TimingStats {
            fps: NTSC_CPU_CLOCK / CYCLES_PER_FRAME as f64,
            underruns: self.ring.underrun_count(),
        }
    }

    /// Total video frames advanced since the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Samples currently buffered in the audio ring, not yet drained.
    /// Exposed for the spec §8 property-6 sample-rate stability check.
    pub fn buffered_sample_count(&self) -> usize {
        self.ring.len()
    }
}
