//! Timer-driven event system.
//!
//! Events are produced by:
//! - esp_timer callbacks (control tick, position report tick)
//! - the cloud stream callback (remote target change)
//!
//! Events are consumed by the main control loop, which drains them in
//! FIFO order.  The timer task and the cloud transport's task push
//! concurrently, so the queue is a lock-free MPSC ring: producers claim
//! a slot with a compare-exchange on the head index and publish the
//! value through the slot itself, the single consumer advances the tail.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer task   │────▶│              │     │              │
//! │ Cloud stream │────▶│  Event Queue │────▶│  Main Loop   │
//! │ callback     │     │  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// Sentinel marking a slot that holds no published event yet.
const SLOT_EMPTY: u8 = 0xFF;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Control loop tick (100 Hz) — poll input, motion and feedback.
    ControlTick = 0,
    /// Position report timer fired — publish to the cloud link.
    ReportTick = 1,
    /// A remote target value arrived on the cloud stream.
    CloudCommand = 2,
}

// ── Lock-free MPSC ring buffer ────────────────────────────────
//
// Producers race on EVENT_HEAD: a successful compare-exchange claims
// exactly one slot, and the subsequent store into that slot publishes
// the value.  The consumer treats a claimed-but-unwritten slot (still
// SLOT_EMPTY) as "not ready yet" and retries on its next pass, so FIFO
// order is preserved even mid-claim.  The buffer lives in statics so
// the esp_timer and cloud callbacks can reach it without a handle.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
static EVENT_BUFFER: [AtomicU8; EVENT_QUEUE_CAP] =
    [const { AtomicU8::new(SLOT_EMPTY) }; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from any task context (lock-free, multi-producer).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    loop {
        let head = EVENT_HEAD.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

        // The tail only moves forward, so a stale read errs on the
        // full side and never lets a producer overrun the consumer.
        if next_head == EVENT_TAIL.load(Ordering::Acquire) {
            return false; // Queue full — drop event.
        }

        // AcqRel threads each claim into the release chain of the ones
        // before it, so writing the slot happens-after the consumer's
        // reset of it on the previous lap.
        if EVENT_HEAD
            .compare_exchange_weak(head, next_head, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            continue; // Lost the claim race; retry with the new head.
        }

        // Slot `head` is exclusively ours; the store publishes it.
        EVENT_BUFFER[head as usize].store(event as u8, Ordering::Release);
        return true;
    }
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty or the head slot is claimed
/// but not yet published.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    if tail == EVENT_HEAD.load(Ordering::Acquire) {
        return None; // Empty.
    }

    // Take the value and reset the slot for the producers' next lap.
    let raw = EVENT_BUFFER[tail as usize].swap(SLOT_EMPTY, Ordering::Acquire);
    if raw == SLOT_EMPTY {
        return None; // Claimed but not yet published; retry later.
    }

    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);
    event_from_u8(raw)
}

/// Drain all pending events into a callback, in FIFO order.
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
        0 => Some(Event::ControlTick),
        1 => Some(Event::ReportTick),
        2 => Some(Event::CloudCommand),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queue is a process-wide static, so exercise it in a single
    // test to avoid cross-test interference under parallel execution.
    #[test]
    fn fifo_order_capacity_and_producer_race() {
        while pop_event().is_some() {}

        assert!(push_event(Event::ControlTick));
        assert!(push_event(Event::ReportTick));
        assert!(push_event(Event::CloudCommand));
        assert_eq!(queue_len(), 3);

        assert_eq!(pop_event(), Some(Event::ControlTick));
        assert_eq!(pop_event(), Some(Event::ReportTick));
        assert_eq!(pop_event(), Some(Event::CloudCommand));
        assert_eq!(pop_event(), None);

        // One slot is sacrificed to distinguish full from empty.
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::ControlTick));
        }
        assert!(!push_event(Event::ControlTick), "full queue must drop");

        while pop_event().is_some() {}

        // Two producers racing a draining consumer: every push that
        // reported success must come out the other side.
        const PER_PRODUCER: usize = 10_000;
        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    for _ in 0..PER_PRODUCER {
                        while !push_event(Event::CloudCommand) {
                            std::thread::yield_now();
                        }
                    }
                });
            }

            let mut received = 0usize;
            let mut idle_spins = 0u32;
            while received < 2 * PER_PRODUCER {
                if pop_event().is_some() {
                    received += 1;
                    idle_spins = 0;
                } else {
                    idle_spins += 1;
                    assert!(idle_spins < 10_000_000, "consumer starved: {received} events");
                    std::thread::yield_now();
                }
            }
            assert_eq!(received, 2 * PER_PRODUCER);
        });
        assert_eq!(pop_event(), None);
    }
}
