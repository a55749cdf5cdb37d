//! Lock-free frame queue between receiver thread and consumer cycle
//!
//! Decoded [`MarkerFrame`]s cross one thread boundary in this crate:
//! from the datagram receiver to the host frame loop. This module is
//! that boundary - a bounded ring with atomic head/tail indices, one
//! producer pushing, one consumer draining, neither ever blocking.
//!
//! ```text
//! receiver thread ──push──► [ring N] ──pop/latest──► consumer cycle
//! ```
//!
//! A mutex would couple the two loops: a datagram burst could stall
//! rendering, a slow render could stall the socket. The ring holds
//! `N - 1` frames; `N` must be a power of two so index wrap is a mask.
//!
//! The pop side claims slots by CAS, so the ring tolerates a second
//! popper. [`QueuePolicy::Overwrite`] depends on that: the producer
//! clears stale frames before pushing, racing the consumer for them,
//! and the CAS guarantees no frame is handed out twice.
//!
//! ## Orderings
//!
//! Release on index stores publishes the slot contents; Acquire on
//! index loads observes them. Counters are Relaxed - they are
//! diagnostics, never synchronization.

#![allow(unsafe_code)] // ring slots are raw MaybeUninit cells

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::ptr;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::wire::MarkerFrame;

/// Default frame queue depth
///
/// The receiver outruns the cycle by a few frames at most, so a
/// shallow ring is enough.
pub const FRAME_QUEUE_CAPACITY: usize = 16;

const _: () = assert!(
    FRAME_QUEUE_CAPACITY.is_power_of_two(),
    "frame queue depth must be a power of two"
);

/// What the producer does when frames pile up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueuePolicy {
    /// Clear stale frames before pushing; newest frame wins
    #[default]
    Overwrite,
    /// Keep FIFO order; drop the incoming frame when full
    Append,
}

/// Queue health counters
///
/// All Relaxed; read them for diagnostics, not for synchronization.
pub struct QueueStats {
    /// Frames the producer stored
    pub pushed: AtomicU32,
    /// Frames handed out (to either side)
    pub popped: AtomicU32,
    /// Incoming frames refused on a full ring (Append)
    pub dropped: AtomicU32,
    /// Stale frames the producer cleared (Overwrite)
    pub overwritten: AtomicU32,
    /// High-water mark of queued frames
    pub max_depth: AtomicU32,
}

impl QueueStats {
    const fn new() -> Self {
        Self {
            pushed: AtomicU32::new(0),
            popped: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            overwritten: AtomicU32::new(0),
            max_depth: AtomicU32::new(0),
        }
    }
}

/// Bounded lock-free queue of decoded frames
///
/// ## Example
///
/// ```
/// use fidtrack_core::queue::{FrameQueue, QueuePolicy};
/// use fidtrack_core::wire::MarkerFrame;
///
/// static QUEUE: FrameQueue<16> = FrameQueue::new(QueuePolicy::Overwrite);
///
/// // Receiver thread
/// QUEUE.push(MarkerFrame::empty(1));
/// QUEUE.push(MarkerFrame::empty(2));
///
/// // Consumer cycle: stale frame 1 was cleared by the second push
/// assert_eq!(QUEUE.latest().map(|f| f.frame_number), Some(2));
/// ```
pub struct FrameQueue<const N: usize> {
    /// Slot storage; a slot is initialized iff it sits in [tail, head)
    buffer: UnsafeCell<[MaybeUninit<MarkerFrame>; N]>,
    /// Next slot to write (moved only by the producer)
    head: AtomicUsize,
    /// Next slot to read (CAS-claimed by poppers)
    tail: AtomicUsize,
    policy: QueuePolicy,
    stats: QueueStats,
}

impl<const N: usize> FrameQueue<N> {
    /// Create an empty queue with the given policy
    ///
    /// Usable in static context. `N` must be a power of two.
    pub const fn new(policy: QueuePolicy) -> Self {
        assert!(N.is_power_of_two(), "frame queue depth must be a power of two");
        Self {
            buffer: UnsafeCell::new(unsafe { MaybeUninit::uninit().assume_init() }),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            policy,
            stats: QueueStats::new(),
        }
    }

    /// The policy this queue was built with
    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Push a frame (single producer only)
    ///
    /// Under `Overwrite`, stale queued frames are cleared first and
    /// counted in [`QueueStats::overwritten`]. Returns false only if
    /// the frame could not be stored (`Append` when full).
    pub fn push(&self, frame: MarkerFrame) -> bool {
        if self.policy == QueuePolicy::Overwrite {
            while self.pop().is_some() {
                self.stats.overwritten.fetch_add(1, Ordering::Relaxed);
            }
        }

        let head = self.head.load(Ordering::Acquire);
        let next_head = (head + 1) & (N - 1);

        if next_head == self.tail.load(Ordering::Acquire) {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // head moves only from this side; the slot cannot be under a
        // concurrent write
        unsafe {
            let slots = &mut *self.buffer.get();
            slots[head].write(frame);
        }

        // Publish the slot before moving head past it
        self.head.store(next_head, Ordering::Release);

        self.stats.pushed.fetch_add(1, Ordering::Relaxed);
        self.stats.max_depth.fetch_max(self.len() as u32, Ordering::Relaxed);

        true
    }

    /// Pop the oldest queued frame
    ///
    /// Slot claims go through CAS, so the producer (clearing stale
    /// frames) and the consumer may race here without handing the
    /// same frame out twice.
    pub fn pop(&self) -> Option<MarkerFrame> {
        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);

            if tail == head {
                return None;
            }

            let next_tail = (tail + 1) & (N - 1);
            match self.tail.compare_exchange_weak(
                tail,
                next_tail,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    // The CAS made this slot ours alone
                    let frame = unsafe {
                        let slots = &*self.buffer.get();
                        ptr::read(&slots[tail]).assume_init()
                    };

                    self.stats.popped.fetch_add(1, Ordering::Relaxed);
                    return Some(frame);
                }
                Err(_) => {
                    // Lost the claim, retry
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Drain everything and keep only the newest frame
    ///
    /// The consumer cycle's read: older queued frames are stale
    /// snapshots of the same markers and are discarded.
    pub fn latest(&self) -> Option<MarkerFrame> {
        let mut newest = None;
        while let Some(frame) = self.pop() {
            newest = Some(frame);
        }
        newest
    }

    /// Iterator handing out all queued frames oldest-first
    pub fn drain(&self) -> QueueDrain<'_, N> {
        QueueDrain { queue: self }
    }

    /// Frames currently queued
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);

        if head >= tail {
            head - tail
        } else {
            N - tail + head
        }
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// True when the next `Append` push would be refused
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        ((head + 1) & (N - 1)) == tail
    }

    /// Health counters
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

// All slot access is guarded by the atomic indices
unsafe impl<const N: usize> Send for FrameQueue<N> {}
unsafe impl<const N: usize> Sync for FrameQueue<N> {}

/// Iterator returned by [`FrameQueue::drain`]
pub struct QueueDrain<'a, const N: usize> {
    queue: &'a FrameQueue<N>,
}

impl<'a, const N: usize> Iterator for QueueDrain<'a, N> {
    type Item = MarkerFrame;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: i32) -> MarkerFrame {
        MarkerFrame::empty(n)
    }

    #[test]
    fn append_basic() {
        let queue = FrameQueue::<16>::new(QueuePolicy::Append);

        assert!(queue.push(frame(1)));
        assert_eq!(queue.len(), 1);

        let popped = queue.pop().unwrap();
        assert_eq!(popped.frame_number, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn append_drops_when_full() {
        let queue = FrameQueue::<4>::new(QueuePolicy::Append);

        // Ring holds capacity - 1
        for n in 0..3 {
            assert!(queue.push(frame(n)));
        }
        assert!(queue.is_full());

        assert!(!queue.push(frame(99)));
        assert_eq!(queue.stats().dropped.load(Ordering::Relaxed), 1);

        // FIFO order preserved
        assert_eq!(queue.pop().unwrap().frame_number, 0);
    }

    #[test]
    fn overwrite_keeps_newest_only() {
        let queue = FrameQueue::<4>::new(QueuePolicy::Overwrite);

        for n in 0..10 {
            assert!(queue.push(frame(n)));
        }

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().unwrap().frame_number, 9);
        assert_eq!(queue.stats().overwritten.load(Ordering::Relaxed), 9);
        assert_eq!(queue.stats().dropped.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn latest_discards_stale() {
        let queue = FrameQueue::<16>::new(QueuePolicy::Append);
        for n in 0..5 {
            queue.push(frame(n));
        }

        assert_eq!(queue.latest().unwrap().frame_number, 4);
        assert!(queue.is_empty());
        assert!(queue.latest().is_none());
    }

    #[test]
    fn drain_yields_oldest_first() {
        let queue = FrameQueue::<8>::new(QueuePolicy::Append);
        for n in 0..5 {
            queue.push(frame(n));
        }

        let drained: Vec<i32> = queue.drain().map(|f| f.frame_number).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn max_depth_tracks_high_water() {
        let queue = FrameQueue::<8>::new(QueuePolicy::Append);
        for n in 0..4 {
            queue.push(frame(n));
        }
        queue.pop();
        queue.push(frame(9));

        assert_eq!(queue.stats().max_depth.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let queue = Arc::new(FrameQueue::<16>::new(QueuePolicy::Overwrite));
        let producer = Arc::clone(&queue);

        let handle = std::thread::spawn(move || {
            for n in 0..100 {
                producer.push(frame(n));
            }
        });

        handle.join().unwrap();
        assert_eq!(queue.latest().unwrap().frame_number, 99);
    }
}
