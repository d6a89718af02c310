//! NES Audio Processing Unit core.
//!
//! Composes the five channels (two pulse, triangle, noise, DMC-stub) and the
//! frame sequencer behind the `$4000-$4017` register file, and exposes the
//! per-CPU-cycle clocking kernel the driver (`crate::driver`) advances.

pub mod channels;
pub mod components;
pub mod constants;

use crate::bus::MemoryMappedDevice;
use channels::{DmcChannel, NoiseChannel, PulseChannel, TriangleChannel};
use components::{FrameCounter, FrameEvent};

/// The APU core: register file, five channels, and frame sequencer.
#[derive(Debug, Clone)]
pub struct Apu {
    pulse1: PulseChannel,
    pulse2: PulseChannel,
    triangle: TriangleChannel,
    noise: NoiseChannel,
    dmc: DmcChannel,
    frame_counter: FrameCounter,
    /// Toggles every CPU cycle; pulse/noise timers only tick when this is
    /// true (they run at the APU clock, CPU/2 — spec glossary).
    apu_cycle_edge: bool,
}

impl Apu {
    /// Create a new APU in its power-on state.
    pub fn new() -> Self {
        Self {
            pulse1: PulseChannel::new(1),
            pulse2: PulseChannel::new(2),
            triangle: TriangleChannel::new(),
            noise: NoiseChannel::new(),
            dmc: DmcChannel::new(),
            frame_counter: FrameCounter::new(),
            apu_cycle_edge: false,
        }
    }

    /// Reset to power-on state (spec §6 Reset contract).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance every channel and the frame sequencer by exactly one CPU
    /// cycle, and return the mixer-ready raw channel outputs for this cycle.
    pub fn clock_cpu_cycle(&mut self) -> RawChannelOutputs {
        // Triangle's timer runs at the full CPU clock (spec 4.8).
        self.triangle.clock_timer();

        self.apu_cycle_edge = !self.apu_cycle_edge;
        if self.apu_cycle_edge {
            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
            self.noise.clock_timer();
        }

        for event in self.frame_counter.clock() {
            self.dispatch_frame_event(event);
        }

        RawChannelOutputs {
            pulse1: self.pulse1.output(),
            pulse2: self.pulse2.output(),
            triangle: self.triangle.output(),
            noise: self.noise.output(),
            dmc: self.dmc.output(),
        }
    }

    fn dispatch_frame_event(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::QuarterFrame => {
                self.pulse1.clock_envelope();
                self.pulse2.clock_envelope();
                self.noise.clock_envelope();
                self.triangle.clock_linear_counter();
            }
            FrameEvent::HalfFrame => {
                self.pulse1.clock_length_counter();
                self.pulse1.clock_sweep();
                self.pulse2.clock_length_counter();
                self.pulse2.clock_sweep();
                self.triangle.clock_length_counter();
                self.noise.clock_length_counter();
            }
            FrameEvent::SetIrq => {
                // Frame IRQ state already latched inside FrameCounter.
            }
        }
    }

    /// True while the frame IRQ or DMC IRQ is pending (spec §6).
    pub fn irq_line(&self) -> bool {
        self.frame_counter.irq_pending() || self.dmc.irq_pending()
    }

    /// Decode and apply a bus write at `$4000-$4017` (minus the non-APU
    /// addresses `$4009`, `$400D`, `$4014`, `$4016`).
    pub fn write_register(&mut self, addr: u16, data: u8) {
        match addr {
            0x4000 => self.pulse1.write_register_0(data),
            0x4001 => self.pulse1.write_register_1(data),
            0x4002 => self.pulse1.write_register_2(data),
            0x4003 => self.pulse1.write_register_3(data),
            0x4004 => self.pulse2.write_register_0(data),
            0x4005 => self.pulse2.write_register_1(data),
            0x4006 => self.pulse2.write_register_2(data),
            0x4007 => self.pulse2.write_register_3(data),
            0x4008 => self.triangle.write_register_0(data),
            0x400A => self.triangle.write_register_2(data),
            0x400B => self.triangle.write_register_3(data),
            0x400C => self.noise.write_register_0(data),
            0x400E => self.noise.write_register_2(data),
            0x400F => self.noise.write_register_3(data),
            0x4010 => self.dmc.write_register_0(data),
            0x4011 => self.dmc.write_register_1(data),
            0x4012 => self.dmc.write_register_2(data),
            0x4013 => self.dmc.write_register_3(data),
            0x4015 => self.write_status(data),
            0x4017 => {
                for event in self.frame_counter.write_control(data) {
                    self.dispatch_frame_event(event);
                }
            }
            _ => {}
        }
    }

    /// Decode a bus read. Only `$4015` is meaningfully mapped; every other
    /// APU address is open bus (returns 0, per spec 4.12).
    pub fn read_register(&mut self, addr: u16) -> u8 {
        match addr {
            0x4015 => self.read_status(),
            _ => 0,
        }
    }

    fn write_status(&mut self, data: u8) {
        self.pulse1.set_enabled((data & 0x01) != 0);
        self.pulse2.set_enabled((data & 0x02) != 0);
        self.triangle.set_enabled((data & 0x04) != 0);
        self.noise.set_enabled((data & 0x08) != 0);
        self.dmc.set_enabled((data & 0x10) != 0);
        // Writing $4015 clears the DMC IRQ (spec 4.10); this stub never
        // asserts it, so there is nothing further to clear.
    }

    fn read_status(&mut self) -> u8 {
        let mut status = 0u8;
        status |= self.pulse1.is_active() as u8;
        status |= (self.pulse2.is_active() as u8) << 1;
        status |= (self.triangle.is_active() as u8) << 2;
        status |= (self.noise.is_active() as u8) << 3;
        status |= (self.dmc.is_active() as u8) << 4;
        status |= (self.frame_counter.irq_pending() as u8) << 6;
        status |= (self.dmc.irq_pending() as u8) << 7;

        // Reading $4015 clears the frame IRQ flag (spec 4.10).
        self.frame_counter.clear_irq();

        status
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMappedDevice for Apu {
    fn read(&mut self, addr: u16) -> u8 {
        self.read_register(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.write_register(addr, data);
    }
}

/// Raw per-channel outputs for one CPU cycle, pre-mix (spec 4.11 inputs).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawChannelOutputs {
    pub pulse1: u8,
    pub pulse2: u8,
    pub triangle: u8,
    pub noise: u8,
    pub dmc: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apu_reset_state() {
        let apu = Apu::new();
        assert!(!apu.irq_line());
    }

    #[test]
    fn test_status_read_clears_frame_irq() {
        let mut apu = Apu::new();
        for _ in 0..29_829 {
            apu.clock_cpu_cycle();
        }
        assert!(apu.irq_line());

        let status = apu.read_register(0x4015);
        assert_ne!(status & 0x40, 0);
        assert!(!apu.irq_line());

        let second = apu.read_register(0x4015);
        assert_eq!(second & 0x40, 0);
    }

    #[test]
    fn test_write_status_enables_and_disables_channels() {
        let mut apu = Apu::new();
        apu.write_register(0x4003, 0b0000_1000); // length-load index 1, but disabled
        assert!(!apu.pulse1.is_active());

        apu.write_register(0x4015, 0x01); // enable pulse1
        apu.write_register(0x4003, 0b0000_1000);
        assert!(apu.pulse1.is_active());

        apu.write_register(0x4015, 0x00); // disable all
        assert!(!apu.pulse1.is_active());
    }

    #[test]
    fn test_open_bus_read_returns_zero() {
        let mut apu = Apu::new();
        assert_eq!(apu.read_register(0x4000), 0);
        assert_eq!(apu.read_register(0x4013), 0);
    }

    #[test]
    fn test_triangle_ticks_every_cpu_cycle_pulse_every_other() {
        let mut apu = Apu::new();
        apu.write_register(0x4015, 0x07);
        apu.write_register(0x4000, 0x3F); // constant volume, duty 50%
        apu.write_register(0x4002, 0x00);
        apu.write_register(0x4003, 0x08); // period small, length-load

        // Just exercise the clocking kernel without panicking; duty_step and
        // triangle sequence position advance at their documented rates.
        for _ in 0..100 {
            apu.clock_cpu_cycle();
        }
    }
}
