// NES APU core library
//
// Cycle-accurate NES Audio Processing Unit emulation plus a
// frame-synchronous driver. See `Driver` for the external contract
// (CPU-bus reads/writes, frame advance, audio drain, IRQ line).

// Public modules
pub mod apu;
pub mod audio;
pub mod bus;
pub mod config;
pub mod driver;
pub mod error;

// Re-export main types for convenience
pub use apu::{Apu, RawChannelOutputs};
pub use audio::{AudioRing, Mixer, Resampler};
#[cfg(feature = "audio")]
pub use audio::{AudioConfig, AudioOutput, AudioSystem};
pub use bus::MemoryMappedDevice;
pub use config::DriverConfig;
pub use driver::{Driver, TimingStats, CYCLES_PER_FRAME};
pub use error::ApuError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        let _apu = Apu::new();
        let _driver = Driver::new(&DriverConfig::default());
    }
}
