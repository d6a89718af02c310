// NES APU Core - Demo Entry Point
//
// Drives the Driver with a small synthetic register-write program and
// plays the resulting audio live via cpal. Not part of the specified
// core — a thin harness for exercising it end to end.

use nes_apu_core::{AudioConfig, AudioOutput, Driver, DriverConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    println!("nes-apu-core demo v0.1.0");
    println!("========================");
    println!();

    let config_path = "nes_apu_core.toml";
    let driver_config = DriverConfig::load_or_default();
    println!("driver configuration loaded from '{}'", config_path);

    let mut driver = Driver::new(&driver_config);

    let audio_config = AudioConfig::new()
        .with_sample_rate(driver_config.sample_rate)
        .with_channels(1);
    let output = AudioOutput::new(audio_config).map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    // A small synthetic program: two pulse channels and the triangle,
    // enabled and given distinct periods, running for a few seconds.
    driver.write(0x4015, 0x07)?; // enable pulse1, pulse2, triangle
    driver.write(0x4000, 0x3F)?; // pulse1: constant volume 15, 50% duty
    driver.write(0x4002, 0x54)?; // pulse1 period low
    driver.write(0x4003, 0x02)?; // pulse1 period high + length load

    driver.write(0x4004, 0x3F)?; // pulse2: constant volume 15, 50% duty
    driver.write(0x4006, 0x30)?; // pulse2 period low
    driver.write(0x4007, 0x01)?; // pulse2 period high + length load

    driver.write(0x4008, 0x81)?; // triangle: control flag set, linear load
    driver.write(0x400A, 0x80)?; // triangle period low
    driver.write(0x400B, 0x02)?; // triangle period high + length load

    println!("press Ctrl+C to exit.");
    println!();

    let mut samples = [0i16; 735];
    loop {
        driver.advance_frame()?;
        let n = driver.drain_audio(&mut samples, samples.len());
        for &sample in &samples[..n] {
            output.push_sample(sample);
        }

        if driver.frame_count() % 60 == 0 {
            let stats = driver.timing_stats();
            log::info!(
                "frame {} | fps target {:.2} | underruns {}",
                driver.frame_count(),
                stats.fps,
                stats.underruns
            );
        }
    }
}
