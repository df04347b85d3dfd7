//! Debounced button click classifier.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up, level-polled once per
//! control tick. The raw reading is fed in by the caller so the
//! classifier stays a pure state machine, testable without GPIO.
//!
//! ## Classification
//!
//! | Gesture      | Condition                                   | Emission |
//! |--------------|---------------------------------------------|----------|
//! | Single click | One press, window expires with no second    | `1`      |
//! | Double click | Second press inside the 250 ms window       | `2` (immediate) |
//!
//! Single clicks are deliberately delayed by the classification window
//! so they can be told apart from double clicks. Callers that need
//! zero-latency state use [`ClickClassifier::is_pressed_now`] instead.

/// Debounce + click-window state machine.
///
/// All timing is elapsed-time bookkeeping against the caller-supplied
/// monotonic millisecond clock; `poll` never blocks.
pub struct ClickClassifier {
    debounce_ms: u32,
    window_ms: u32,
    /// Latest raw (undebounced) reading — the zero-latency view.
    last_raw: bool,
    /// Timestamp of the last raw transition (debounce mark).
    last_change_ms: u32,
    /// Debounced "currently pressed" latch.
    latched: bool,
    /// Timestamp of the most recent accepted press edge.
    press_edge_ms: u32,
    /// Presses accumulated in the open window. Saturates at 2.
    pending: u8,
    window_open: bool,
}

impl ClickClassifier {
    pub fn new(debounce_ms: u32, window_ms: u32) -> Self {
        Self {
            debounce_ms,
            window_ms,
            last_raw: false,
            last_change_ms: 0,
            latched: false,
            press_edge_ms: 0,
            pending: 0,
            window_open: false,
        }
    }

    /// Call once per control tick with the current raw reading
    /// (`true` = pressed). Returns the classified click count:
    /// 0 (nothing), 1 (single) or 2 (double) — never higher.
    pub fn poll(&mut self, now_ms: u32, raw_pressed: bool) -> u8 {
        // Any raw transition restarts the debounce interval.
        if raw_pressed != self.last_raw {
            self.last_change_ms = now_ms;
        }
        self.last_raw = raw_pressed;

        // Accept the reading only once it has been stable long enough.
        // Presses latch on the edge, so a stuck sensor yields exactly
        // one click, never runaway repeats.
        if now_ms.wrapping_sub(self.last_change_ms) > self.debounce_ms {
            if raw_pressed && !self.latched {
                self.latched = true;
                self.press_edge_ms = now_ms;
                if self.window_open {
                    // Saturate: a third rapid press is absorbed.
                    if self.pending < 2 {
                        self.pending += 1;
                    }
                } else {
                    self.pending = 1;
                    self.window_open = true;
                }
            } else if !raw_pressed {
                self.latched = false;
            }
        }

        // Close the window on expiry, or immediately on a double —
        // no need to wait out the remainder once the count is capped.
        if self.window_open
            && (self.pending >= 2 || now_ms.wrapping_sub(self.press_edge_ms) > self.window_ms)
        {
            let clicks = self.pending;
            self.pending = 0;
            self.window_open = false;
            return clicks;
        }

        0
    }

    /// Instant raw state (no debounce, no lag) — the reading fed to the
    /// most recent `poll`. Use for latency-sensitive reactions.
    pub fn is_pressed_now(&self) -> bool {
        self.last_raw
    }

    /// Debounced pressed latch.
    pub fn is_held(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ClickClassifier {
        ClickClassifier::new(50, 250)
    }

    /// Run the classifier at a 10 ms tick over `[start, end)`, holding the
    /// given raw level; returns the first non-zero emission and its time.
    fn run(c: &mut ClickClassifier, start: u32, end: u32, raw: bool) -> Option<(u32, u8)> {
        let mut t = start;
        while t < end {
            let clicks = c.poll(t, raw);
            if clicks != 0 {
                return Some((t, clicks));
            }
            t += 10;
        }
        None
    }

    #[test]
    fn no_events_without_press() {
        let mut c = classifier();
        assert_eq!(run(&mut c, 0, 1000, false), None);
    }

    #[test]
    fn bounce_shorter_than_debounce_is_ignored() {
        let mut c = classifier();
        // 30 ms of contact chatter, then released again.
        assert_eq!(run(&mut c, 0, 30, true), None);
        assert_eq!(run(&mut c, 30, 1000, false), None);
    }

    #[test]
    fn single_click_emitted_after_window() {
        let mut c = classifier();
        // Press held 100 ms, then released.
        assert_eq!(run(&mut c, 0, 100, true), None);
        let (t, clicks) = run(&mut c, 100, 1000, false).expect("single click");
        assert_eq!(clicks, 1);
        // Edge was accepted at ~60 ms; emission strictly after the 250 ms window.
        assert!(t > 60 + 250, "emitted at {t}, too early");
    }

    #[test]
    fn double_click_emits_single_two() {
        let mut c = classifier();
        // Press, release, second press 150 ms after the first edge.
        assert_eq!(run(&mut c, 0, 80, true), None);
        assert_eq!(run(&mut c, 80, 150, false), None);
        let (_, clicks) = run(&mut c, 150, 400, true).expect("double click");
        assert_eq!(clicks, 2);
        // Releasing afterwards must not produce a trailing single.
        assert_eq!(run(&mut c, 400, 1200, false), None);
    }

    #[test]
    fn instant_accessor_tracks_raw_reading() {
        let mut c = classifier();
        c.poll(0, true);
        assert!(c.is_pressed_now(), "raw view must not wait for debounce");
        assert!(!c.is_held(), "latch must wait for debounce");
        c.poll(10, false);
        assert!(!c.is_pressed_now());
    }

    #[test]
    fn stuck_pressed_sensor_yields_exactly_one_click() {
        let mut c = classifier();
        let first = run(&mut c, 0, 2000, true);
        assert_eq!(first.map(|(_, n)| n), Some(1));
        // Still pressed forever: latched, no further emissions.
        assert_eq!(run(&mut c, 2000, 10_000, true), None);
    }

    #[test]
    fn count_never_exceeds_two() {
        let mut c = classifier();
        // Three rapid presses with clean releases in between.
        let mut emissions = Vec::new();
        let pattern = [
            (0u32, 70u32, true),
            (70, 140, false),
            (140, 210, true),
            (210, 280, false),
            (280, 350, true),
            (350, 1200, false),
        ];
        for (start, end, raw) in pattern {
            let mut t = start;
            while t < end {
                let n = c.poll(t, raw);
                if n != 0 {
                    emissions.push(n);
                }
                t += 10;
            }
        }
        assert!(emissions.iter().all(|&n| n <= 2));
        assert_eq!(emissions.first(), Some(&2));
    }
}
