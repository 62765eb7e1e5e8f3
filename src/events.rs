//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (front button presses)
//! - Timer callbacks (the periodic control tick)
//!
//! Events are consumed by the main tick loop, which processes them one at a
//! time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISRs │────▶│  Event Queue │────▶│  Tick Loop   │
//! │ Tick Timer  │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types carried from ISR context into the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Front button A pressed (debounced in the driver, not here).
    ButtonA = 0,
    /// Front button B pressed.
    ButtonB = 1,
    /// Front button C pressed.
    ButtonC = 2,
    /// Control loop tick (from the periodic hardware timer).
    ControlTick = 10,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs write (produce), the tick loop reads (consume). Uses atomic
// head/tail indices; the buffer lives in a static so ISR callbacks can
// reach it without a handle.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER slots are written only by the producer side
// (push_event, ISR/timer context) at indices the consumer has not yet
// released, and read only by the consumer (pop_event, tick loop). The
// acquire/release pairs on EVENT_HEAD/EVENT_TAIL order those accesses.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; this slot is not visible to the consumer
    // until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the tick loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::ButtonA),
        1 => Some(Event::ButtonB),
        2 => Some(Event::ButtonC),
        10 => Some(Event::ControlTick),
        _ => None,
    }
}
