//! Timer-driven event queue.
//!
//! Events are produced by the `esp_timer` callbacks in
//! [`hw_timer`](crate::drivers::hw_timer) and consumed by the main loop of
//! each binary, which turns them into scheduler ticks and status reports.
//!
//! ```text
//! ┌─────────────┐  push  ┌──────────────┐  drain  ┌──────────────┐
//! │ base timer  │───────▶│ TIMER_EVENTS │────────▶│  main loop   │
//! │ status timer│───────▶│  (SPSC ring) │         │  (consumer)  │
//! └─────────────┘        └──────────────┘         └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// Slots in the ring; one is always left empty to tell full from empty.
const RING_SLOTS: usize = 16;

/// What the timers tell the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// One scheduler quantum elapsed.
    BaseTick = 0,
    /// Time to log a status report.
    StatusTick = 1,
}

impl Event {
    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::BaseTick),
            1 => Some(Self::StatusTick),
            _ => None,
        }
    }
}

/// Single-producer single-consumer ring of [`Event`]s.
///
/// The producer writes the slot at `head` and publishes it with a Release
/// store; the consumer reads the slot at `tail` only after an Acquire load
/// of `head`.  Only atomics are touched, so the producer may run in the
/// esp_timer task while the consumer runs in the main task.
pub struct EventRing {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU8; RING_SLOTS],
    dropped: AtomicU32,
}

impl EventRing {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU8::new(0) }; RING_SLOTS],
            dropped: AtomicU32::new(0),
        }
    }

    const fn advance(index: u8) -> u8 {
        (index + 1) % RING_SLOTS as u8
    }

    /// Producer side.  A full ring drops the event and counts it.
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = Self::advance(head);
        if next == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.slots[usize::from(head)].store(event as u8, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Consumer side.  Unknown slot values are skipped.
    pub fn pop(&self) -> Option<Event> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            if tail == self.head.load(Ordering::Acquire) {
                return None;
            }
            let raw = self.slots[usize::from(tail)].load(Ordering::Relaxed);
            self.tail.store(Self::advance(tail), Ordering::Release);
            if let Some(event) = Event::from_raw(raw) {
                return Some(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        let head = usize::from(self.head.load(Ordering::Acquire));
        let tail = usize::from(self.tail.load(Ordering::Relaxed));
        (head + RING_SLOTS - tail) % RING_SLOTS
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events lost to a full ring since boot.  A non-zero count means the
    /// main loop fell behind the base tick.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventRing {
    fn default() -> Self {
        Self::new()
    }
}

/// The ring shared by the hardware timers and the main loop.
pub static TIMER_EVENTS: EventRing = EventRing::new();

/// Queue an event from a timer callback.
pub fn push_event(event: Event) -> bool {
    TIMER_EVENTS.push(event)
}

/// Hand every pending event to `handler`, oldest first.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = TIMER_EVENTS.pop() {
        handler(event);
    }
}
