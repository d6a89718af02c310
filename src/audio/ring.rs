//! Bounded single-producer/single-consumer audio ring (spec §5).
//!
//! The emulation worker pushes decimated samples as they're produced by
//! the resampler; a host audio consumer drains them, typically from a
//! `cpal` callback on another thread. An underrun zero-fills the
//! consumer's request and bumps a monotonic counter rather than blocking
//! or erroring — spec.md §7 treats this as an observable event, not a
//! contract violation.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded SPSC ring of 16-bit signed samples, with underrun accounting.
pub struct AudioRing {
    producer: HeapProd<i16>,
    consumer: HeapCons<i16>,
    underruns: AtomicU64,
}

impl AudioRing {
    /// Create a new ring with room for `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = HeapRb::<i16>::new(capacity).split();
        Self {
            producer,
            consumer,
            underruns: AtomicU64::new(0),
        }
    }

    /// Push one sample. Drops it silently if the ring is full — the
    /// producer never blocks (spec §5: "no operation inside the core
    /// blocks").
    pub fn push(&mut self, sample: i16) {
        let _ = self.producer.try_push(sample);
    }

    /// Drain up to `buf.len()` samples into `buf`. If fewer samples are
    /// available, the remainder of `buf` is zero-filled and one underrun
    /// is recorded. Always returns `buf.len()`.
    pub fn drain(&mut self, buf: &mut [i16]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            match self.consumer.try_pop() {
                Some(sample) => {
                    buf[filled] = sample;
                    filled += 1;
                }
                None => break,
            }
        }

        if filled < buf.len() {
            for slot in &mut buf[filled..] {
                *slot = 0;
            }
            self.underruns.fetch_add(1, Ordering::Relaxed);
        }

        buf.len()
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.consumer.occupied_len()
    }

    /// True if no samples are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total ring capacity in samples.
    pub fn capacity(&self) -> usize {
        self.consumer.occupied_len() + self.producer.vacant_len()
    }

    /// Cumulative underrun count since creation (spec §7's
    /// `UnderflowUnderrunThresholdExceeded` diagnostic feeds off this).
    pub fn underrun_count(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Discard all buffered samples.
    pub fn clear(&mut self) {
        while self.consumer.try_pop().is_some() {}
    }
}
