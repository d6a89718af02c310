//! DMC (Delta Modulation Channel) register storage.
//!
//! Full DMC playback (sample fetch, DMA stalls, shift-register output, IRQ)
//! is out of scope for this core; this channel is present only so that
//! `$4010-$4013` decode correctly and `$4015`'s DMC-enable bit and DMC IRQ
//! bit read back sensibly. Output is always 0, which is a no-op input to
//! the mixer's `tnd_out` formula.

/// DMC channel, register-storage-only. `output()` is always 0.
#[derive(Debug, Clone)]
pub struct DmcChannel {
    /// Enabled flag (from $4015)
    pub(crate) enabled: bool,
    /// IRQ enable flag ($4010 bit 7)
    pub(crate) irq_enabled: bool,
    /// Loop flag ($4010 bit 6)
    pub(crate) loop_flag: bool,
    /// Rate index ($4010 bits 0-3)
    pub(crate) rate_index: u8,
    /// Direct load value ($4011)
    pub(crate) direct_load: u8,
    /// Sample address, $C000 + (value * 64) ($4012)
    pub(crate) sample_address: u16,
    /// Sample length, (value * 16) + 1 bytes ($4013)
    pub(crate) sample_length: u16,
}

impl Default for DmcChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DmcChannel {
    /// Create a new DMC channel
    pub fn new() -> Self {
        Self {
            enabled: false,
            irq_enabled: false,
            loop_flag: false,
            rate_index: 0,
            direct_load: 0,
            sample_address: 0xC000,
            sample_length: 1,
        }
    }

    /// Write to register 0 ($4010)
    pub fn write_register_0(&mut self, data: u8) {
        self.irq_enabled = (data & 0x80) != 0;
        self.loop_flag = (data & 0x40) != 0;
        self.rate_index = data & 0x0F;
    }

    /// Write to register 1 ($4011 - direct load)
    pub fn write_register_1(&mut self, data: u8) {
        self.direct_load = data & 0x7F;
    }

    /// Write to register 2 ($4012 - sample address)
    pub fn write_register_2(&mut self, data: u8) {
        self.sample_address = 0xC000 + ((data as u16) << 6);
    }

    /// Write to register 3 ($4013 - sample length)
    pub fn write_register_3(&mut self, data: u8) {
        self.sample_length = ((data as u16) << 4) + 1;
    }

    /// Set the enabled flag (from $4015)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Status bit for $4015: always reads back as inactive since no sample
    /// playback is driven.
    pub fn is_active(&self) -> bool {
        false
    }

    /// DMC IRQ is never asserted by this stub.
    pub fn irq_pending(&self) -> bool {
        false
    }

    /// Output is always 0 — a valid no-op input to the mixer's `tnd_out`.
    pub fn output(&self) -> u8 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dmc_registers_decode() {
        let mut dmc = DmcChannel::new();
        dmc.write_register_0(0b1100_0101);
        assert!(dmc.irq_enabled);
        assert!(dmc.loop_flag);
        assert_eq!(dmc.rate_index, 5);

        dmc.write_register_1(0x7F);
        assert_eq!(dmc.direct_load, 0x7F);

        dmc.write_register_2(0x01);
        assert_eq!(dmc.sample_address, 0xC040);

        dmc.write_register_3(0x01);
        assert_eq!(dmc.sample_length, 17);
    }

    #[test]
    fn test_dmc_output_always_zero() {
        let mut dmc = DmcChannel::new();
        dmc.set_enabled(true);
        dmc.write_register_1(0x7F);
        assert_eq!(dmc.output(), 0);
        assert!(!dmc.is_active());
        assert!(!dmc.irq_pending());
    }
}
