//! Time sources and the frame scheduler.
//!
//! Animation code never reads wall-clock time directly. Components receive
//! timestamps from a [`Clock`] (or straight from [`FrameScheduler::tick`]) so the
//! same update logic runs against a display refresh signal or synthetic time.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::foundation::core::Millis;

/// Monotonic millisecond time source.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// Wall-clock time since construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Synthetic clock advanced explicitly; shareable across components.
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self {
            bits: AtomicU64::new(start_ms.to_bits()),
        }
    }

    pub fn set(&self, ms: Millis) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    /// Move time forward and return the new timestamp.
    pub fn advance(&self, delta_ms: Millis) -> Millis {
        let next = self.now_ms() + delta_ms.max(0.0);
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// Handle returned by [`FrameScheduler::on_tick`]; pass it to `cancel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

type TickFn = Box<dyn FnMut(Millis)>;

/// Explicit stand-in for the browser's animation-frame loop.
///
/// Callbacks run in registration order, once per [`tick`](Self::tick). A handle
/// cancelled while a tick is running (through a [`Canceller`]) is skipped for the
/// rest of that tick and dropped afterwards.
#[derive(Default)]
pub struct FrameScheduler {
    next_id: u64,
    entries: Vec<(TickHandle, TickFn)>,
    canceller: Canceller,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self, callback: impl FnMut(Millis) + 'static) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, Box::new(callback)));
        handle
    }

    /// Returns `false` when the handle was unknown or already cancelled.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        before != self.entries.len()
    }

    /// Shared cancellation list for callbacks that cannot borrow the scheduler.
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    pub fn tick(&mut self, now: Millis) {
        self.frames += 1;
        for (handle, cb) in self.entries.iter_mut() {
            if self.canceller.contains(*handle) {
                continue;
            }
            cb(now);
        }
        let cancelled = self.canceller.drain();
        if !cancelled.is_empty() {
            self.entries.retain(|(h, _)| !cancelled.contains(h));
        }
    }

    pub fn active(&self) -> usize {
        self.entries.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("active", &self.entries.len())
            .field("frames", &self.frames)
            .finish()
    }
}

/// Deferred cancellation list shared with tick callbacks.
#[derive(Clone, Debug, Default)]
pub struct Canceller {
    pending: Rc<RefCell<Vec<TickHandle>>>,
}

impl Canceller {
    pub fn cancel(&self, handle: TickHandle) {
        self.pending.borrow_mut().push(handle);
    }

    fn contains(&self, handle: TickHandle) -> bool {
        self.pending.borrow().contains(&handle)
    }

    fn drain(&self) -> Vec<TickHandle> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
