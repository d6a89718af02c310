//! Frame counter (frame sequencer) for the APU
//!
//! The frame counter is a divider that generates low-frequency clock signals
//! to drive the APU's envelope, sweep, linear counter, and length counter
//! units at roughly 240 Hz (quarter-frame) and 120 Hz (half-frame), and
//! optionally asserts a frame IRQ.
//!
//! It operates in two modes:
//! - 4-step mode: asserts the frame IRQ at the end of its sequence.
//! - 5-step mode: one extra no-op step, never asserts the IRQ.

use crate::apu::constants::{
    FRAME_COUNTER_4_STEP_CYCLES, FRAME_COUNTER_4_STEP_PERIOD, FRAME_COUNTER_5_STEP_CYCLES,
    FRAME_COUNTER_5_STEP_PERIOD,
};

/// Events that the frame counter can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Quarter frame event - clock envelopes and linear counters
    QuarterFrame,
    /// Half frame event - clock length counters and sweep units
    HalfFrame,
    /// Set IRQ flag (only in 4-step mode)
    SetIrq,
}

/// Frame counter sequencer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// 4-step mode (default) - asserts the frame IRQ
    FourStep,
    /// 5-step mode - no IRQ, one extra silent step
    FiveStep,
}

/// Frame counter for clocking APU components
#[derive(Debug, Clone)]
pub struct FrameCounter {
    mode: FrameMode,
    /// Cycle counter within the current sequence, in CPU cycles.
    cycle: u32,
    /// Current step index into the mode's cycle-offset table.
    step: usize,
    /// IRQ inhibit flag (bit 6 of $4017)
    irq_inhibit: bool,
    /// Frame interrupt flag
    irq_pending: bool,
    /// CPU cycles remaining before a pending $4017 write takes effect (3 or 4).
    write_delay: Option<u8>,
}

impl FrameCounter {
    /// Create a new frame counter in 4-step mode
    pub fn new() -> Self {
        Self {
            mode: FrameMode::FourStep,
            cycle: 0,
            step: 0,
            irq_inhibit: false,
            irq_pending: false,
            write_delay: None,
        }
    }

    /// Reset the frame counter to its initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Write to the frame counter control register ($4017)
    ///
    /// Bit 7: Mode (0 = 4-step, 1 = 5-step)
    /// Bit 6: IRQ inhibit flag
    ///
    /// Per spec: the cycle counter clears after a 3- or 4-CPU-cycle delay
    /// (3 if the write lands on an APU-cycle boundary, 4 otherwise). If
    /// `interrupt_inhibit` is set, the frame IRQ clears immediately. If the
    /// new mode is 5-step, quarter- and half-frame units clock immediately,
    /// in addition to (not instead of) the delayed reset.
    ///
    /// # Returns
    ///
    /// Frame events that should fire immediately as a result of this write.
    pub fn write_control(&mut self, value: u8) -> Vec<FrameEvent> {
        self.mode = if (value & 0x80) != 0 {
            FrameMode::FiveStep
        } else {
            FrameMode::FourStep
        };
        self.irq_inhibit = (value & 0x40) != 0;

        if self.irq_inhibit {
            self.irq_pending = false;
        }

        // An APU cycle boundary lands on an even CPU-cycle count.
        self.write_delay = Some(if self.cycle % 2 == 0 { 3 } else { 4 });

        let mut events = Vec::new();
        if self.mode == FrameMode::FiveStep {
            events.push(FrameEvent::QuarterFrame);
            events.push(FrameEvent::HalfFrame);
        }
        events
    }

    /// Clock the frame counter (called every CPU cycle)
    ///
    /// # Returns
    ///
    /// Frame events that fire on this cycle.
    pub fn clock(&mut self) -> Vec<FrameEvent> {
        if let Some(delay) = self.write_delay {
            if delay <= 1 {
                self.write_delay = None;
                self.cycle = 0;
                self.step = 0;
            } else {
                self.write_delay = Some(delay - 1);
            }
            return Vec::new();
        }

        self.cycle += 1;

        let mut events = Vec::new();
        match self.mode {
            FrameMode::FourStep => self.clock_4_step(&mut events),
            FrameMode::FiveStep => self.clock_5_step(&mut events),
        }
        events
    }

    fn clock_4_step(&mut self, events: &mut Vec<FrameEvent>) {
        if self.step < FRAME_COUNTER_4_STEP_CYCLES.len()
            && self.cycle == FRAME_COUNTER_4_STEP_CYCLES[self.step]
        {
            match self.step {
                0 => events.push(FrameEvent::QuarterFrame),
                1 => {
                    events.push(FrameEvent::QuarterFrame);
                    events.push(FrameEvent::HalfFrame);
                }
                2 => events.push(FrameEvent::QuarterFrame),
                3 => {
                    if !self.irq_inhibit {
                        self.irq_pending = true;
                        events.push(FrameEvent::SetIrq);
                    }
                }
                4 => {
                    events.push(FrameEvent::QuarterFrame);
                    events.push(FrameEvent::HalfFrame);
                    if !self.irq_inhibit {
                        self.irq_pending = true;
                        events.push(FrameEvent::SetIrq);
                    }
                }
                _ => {}
            }
            self.step += 1;
        }

        if self.cycle >= FRAME_COUNTER_4_STEP_PERIOD {
            self.cycle = 0;
            self.step = 0;
        }
    }

    fn clock_5_step(&mut self, events: &mut Vec<FrameEvent>) {
        if self.step < FRAME_COUNTER_5_STEP_CYCLES.len()
            && self.cycle == FRAME_COUNTER_5_STEP_CYCLES[self.step]
        {
            match self.step {
                0 => events.push(FrameEvent::QuarterFrame),
                1 => {
                    events.push(FrameEvent::QuarterFrame);
                    events.push(FrameEvent::HalfFrame);
                }
                2 => events.push(FrameEvent::QuarterFrame),
                3 => {
                    // No-op step; present only to mark the schedule offset.
                }
                4 => {
                    events.push(FrameEvent::QuarterFrame);
                    events.push(FrameEvent::HalfFrame);
                }
                _ => {}
            }
            self.step += 1;
        }

        if self.cycle >= FRAME_COUNTER_5_STEP_PERIOD {
            self.cycle = 0;
            self.step = 0;
        }
    }

    /// Check if there's a pending IRQ
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// Clear the IRQ flag (when $4015 is read)
    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    /// Get the current mode
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Get the current cycle count
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Get the current step
    pub fn step(&self) -> usize {
        self.step
    }

    /// Check if IRQ is inhibited
    pub fn irq_inhibited(&self) -> bool {
        self.irq_inhibit
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
