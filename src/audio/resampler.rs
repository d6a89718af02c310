// Audio resampler - Converts NES APU sample rate to standard audio rates
//
// The NES APU generates one mixed sample per CPU cycle (~1.79 MHz). Modern
// audio hardware expects samples at standard rates like 44.1 kHz or 48 kHz.
// This module decimates with linear interpolation and, ahead of the
// decimation step, runs the anti-aliasing filter chain described in spec
// 4.11: a three-pole cascade (90 Hz HPF, 440 Hz HPF, 14 kHz LPF) that both
// suppresses aliasing and removes the mixer's inherent DC bias.

/// Sample rate constants
pub mod sample_rates {
    /// NES CPU clock rate (NTSC) in Hz
    /// This is the rate at which the APU generates samples
    pub const NES_CPU_CLOCK: f64 = 1_789_773.0;

    /// Standard audio sample rate: 44.1 kHz (CD quality)
    pub const AUDIO_44_1_KHZ: f64 = 44_100.0;

    /// Standard audio sample rate: 48 kHz (common for digital audio)
    pub const AUDIO_48_KHZ: f64 = 48_000.0;
}

/// A single-pole high-pass filter (simple RC highpass, bilinear approx).
#[derive(Debug, Clone, Copy)]
struct HighPassFilter {
    alpha: f32,
    prev_input: f32,
    prev_output: f32,
}

impl HighPassFilter {
    fn new(cutoff_hz: f64, sample_rate: f64) -> Self {
        let rc = 1.0 / (2.0 * std::f64::consts::PI * cutoff_hz);
        let dt = 1.0 / sample_rate;
        let alpha = (rc / (rc + dt)) as f32;
        Self {
            alpha,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.alpha * (self.prev_output + input - self.prev_input);
        self.prev_input = input;
        self.prev_output = output;
        output
    }
}

/// A single-pole low-pass filter (simple RC lowpass, bilinear approx).
#[derive(Debug, Clone, Copy)]
struct LowPassFilter {
    alpha: f32,
    prev_output: f32,
}

impl LowPassFilter {
    fn new(cutoff_hz: f64, sample_rate: f64) -> Self {
        let rc = 1.0 / (2.0 * std::f64::consts::PI * cutoff_hz);
        let dt = 1.0 / sample_rate;
        let alpha = (dt / (rc + dt)) as f32;
        Self {
            alpha,
            prev_output: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        self.prev_output += self.alpha * (input - self.prev_output);
        self.prev_output
    }
}

/// Three-pole anti-aliasing / DC-removal cascade: 14 kHz LPF feeding a
/// 90 Hz HPF feeding a 440 Hz HPF, matching the NES's analog output stage.
#[derive(Debug, Clone, Copy)]
struct FilterChain {
    lpf: LowPassFilter,
    hpf_90: HighPassFilter,
    hpf_440: HighPassFilter,
}

impl FilterChain {
    fn new(sample_rate: f64) -> Self {
        Self {
            lpf: LowPassFilter::new(14_000.0, sample_rate),
            hpf_90: HighPassFilter::new(90.0, sample_rate),
            hpf_440: HighPassFilter::new(440.0, sample_rate),
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let stage = self.lpf.process(input);
        let stage = self.hpf_90.process(stage);
        self.hpf_440.process(stage)
    }
}

/// Audio resampler: per-cycle mixer samples in, decimated output samples
/// out, with an optional anti-aliasing filter chain ahead of decimation.
///
/// Converts from NES APU sample rate (~1.79 MHz) to standard audio rates
/// (44.1 kHz or 48 kHz) using linear interpolation.
pub struct Resampler {
    /// Input sample rate (NES APU rate)
    input_rate: f64,

    /// Output sample rate (audio hardware rate)
    output_rate: f64,

    /// Current time position in the input stream
    time_position: f64,

    /// Previous (filtered) sample for interpolation
    prev_sample: f32,

    /// Current (filtered) sample for interpolation
    current_sample: f32,

    /// Time increment per output sample
    time_increment: f64,

    /// Anti-aliasing / DC-removal filter chain; `None` falls back to the
    /// simple averaging decimator spec.md §4.11 permits as a first cut.
    filter: Option<FilterChain>,
}

impl Resampler {
    /// Create a new resampler.
    ///
    /// # Arguments
    ///
    /// * `input_rate` - Input sample rate (NES APU rate, ~1.79 MHz)
    /// * `output_rate` - Output sample rate (44.1 kHz or 48 kHz)
    /// * `filter_enabled` - Whether to run the anti-aliasing filter chain
    pub fn new(input_rate: f64, output_rate: f64, filter_enabled: bool) -> Self {
        Self {
            input_rate,
            output_rate,
            time_position: 0.0,
            prev_sample: 0.0,
            current_sample: 0.0,
            time_increment: input_rate / output_rate,
            filter: filter_enabled.then(|| FilterChain::new(input_rate)),
        }
    }

    /// Create a filtered resampler for 44.1 kHz output
    pub fn new_44_1_khz() -> Self {
        Self::new(sample_rates::NES_CPU_CLOCK, sample_rates::AUDIO_44_1_KHZ, true)
    }

    /// Create a filtered resampler for 48 kHz output
    pub fn new_48_khz() -> Self {
        Self::new(sample_rates::NES_CPU_CLOCK, sample_rates::AUDIO_48_KHZ, true)
    }

    /// Add an input sample from the APU mixer.
    ///
    /// Call this method every CPU clock cycle with the current mixed
    /// output (spec 4.11's `sample`, range ≈ 0..1).
    pub fn add_input_sample(&mut self, sample: f32) {
        let filtered = match &mut self.filter {
            Some(chain) => chain.process(sample),
            None => sample,
        };
        self.prev_sample = self.current_sample;
        self.current_sample = filtered;
        self.time_position += 1.0;
    }

    /// Get the next output sample.
    ///
    /// Returns `None` if no output sample is ready yet; `Some(sample)`
    /// when the resampling accumulator has crossed an integer boundary.
    pub fn get_output_sample(&mut self) -> Option<f32> {
        if self.time_position >= self.time_increment {
            let frac = (self.time_position % self.time_increment) / self.time_increment;

            let sample = self.prev_sample + (self.current_sample - self.prev_sample) * frac as f32;

            self.time_position -= self.time_increment;

            Some(sample)
        } else {
            None
        }
    }

    /// Reset the resampler state
    pub fn reset(&mut self) {
        self.time_position = 0.0;
        self.prev_sample = 0.0;
        self.current_sample = 0.0;
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> f64 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> f64 {
        self.output_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_creation() {
        let resampler = Resampler::new_44_1_khz();
        assert_eq!(resampler.input_rate(), sample_rates::NES_CPU_CLOCK);
        assert_eq!(resampler.output_rate(), sample_rates::AUDIO_44_1_KHZ);

        let resampler = Resampler::new_48_khz();
        assert_eq!(resampler.output_rate(), sample_rates::AUDIO_48_KHZ);
    }

    #[test]
    fn test_resampler_basic() {
        let mut resampler = Resampler::new(1000.0, 100.0, false); // 10:1 ratio for testing

        for i in 0..10 {
            resampler.add_input_sample(i as f32 / 10.0);
        }

        let sample = resampler.get_output_sample();
        assert!(sample.is_some());
    }

    #[test]
    fn test_resampler_unfiltered_passes_dc() {
        let mut resampler = Resampler::new(1000.0, 100.0, false);
        for _ in 0..20 {
            resampler.add_input_sample(0.5);
        }
        let sample = resampler.get_output_sample().unwrap();
        assert!((sample - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_resampler_filtered_removes_dc() {
        let mut resampler = Resampler::new(
            sample_rates::NES_CPU_CLOCK,
            sample_rates::AUDIO_44_1_KHZ,
            true,
        );
        // Feed a constant (DC) mixer value for a long time; the HPF stages
        // should drive the output toward zero.
        for _ in 0..200_000 {
            resampler.add_input_sample(0.5);
        }
        while let Some(sample) = resampler.get_output_sample() {
            assert!(sample.abs() < 0.5);
        }
    }

    #[test]
    fn test_output_sample_count_matches_ratio() {
        let mut resampler = Resampler::new(40.0, 4.0, false); // 10:1 ratio
        let mut produced = 0;
        for i in 0..400 {
            resampler.add_input_sample((i % 2) as f32);
            while resampler.get_output_sample().is_some() {
                produced += 1;
            }
        }
        assert!((produced as i32 - 40).abs() <= 1);
    }
}
