//! Time-indexed pattern envelope shared by the feedback sequencers.
//!
//! A pattern is a declarative table of [`Phase`]s — fixed durations with
//! a fixed output level each — evaluated purely against elapsed time
//! since trigger. Both the buzzer and the LED effects engine run their
//! envelopes through this one implementation; neither owns hidden
//! timing state, so multiple instances never share phase.

/// One fixed-duration segment of a feedback pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub duration_ms: u32,
    pub level: u8,
}

/// Convenience constructor so pattern tables stay one-line-per-phase.
pub const fn phase(duration_ms: u32, level: u8) -> Phase {
    Phase { duration_ms, level }
}

/// A running (or idle) pattern envelope.
///
/// Triggering while a pattern is in progress unconditionally restarts
/// the envelope from time zero — there is no queuing.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    start_ms: u32,
    table: Option<&'static [Phase]>,
}

impl Envelope {
    pub const fn idle() -> Self {
        Self {
            start_ms: 0,
            table: None,
        }
    }

    /// Start (or restart) the given pattern at `now_ms`.
    pub fn trigger(&mut self, now_ms: u32, table: &'static [Phase]) {
        self.start_ms = now_ms;
        self.table = Some(table);
    }

    /// Abort the running pattern immediately.
    pub fn cancel(&mut self) {
        self.table = None;
    }

    pub fn is_running(&self) -> bool {
        self.table.is_some()
    }

    /// Output level for the current instant, or `None` once the total
    /// pattern duration is exhausted (the envelope goes idle).
    pub fn level_at(&mut self, now_ms: u32) -> Option<u8> {
        let table = self.table?;
        let elapsed = now_ms.wrapping_sub(self.start_ms);

        let mut boundary = 0u32;
        for ph in table {
            boundary += ph.duration_ms;
            if elapsed < boundary {
                return Some(ph.level);
            }
        }

        self.table = None;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static THREE_PHASE: [Phase; 3] = [phase(100, 255), phase(100, 0), phase(100, 255)];

    #[test]
    fn idle_envelope_is_silent() {
        let mut env = Envelope::idle();
        assert!(!env.is_running());
        assert_eq!(env.level_at(123), None);
    }

    #[test]
    fn phases_selected_by_elapsed_time() {
        let mut env = Envelope::idle();
        env.trigger(1000, &THREE_PHASE);
        assert_eq!(env.level_at(1000), Some(255));
        assert_eq!(env.level_at(1099), Some(255));
        assert_eq!(env.level_at(1100), Some(0));
        assert_eq!(env.level_at(1250), Some(255));
    }

    #[test]
    fn envelope_goes_idle_after_total_duration() {
        let mut env = Envelope::idle();
        env.trigger(0, &THREE_PHASE);
        assert_eq!(env.level_at(300), None);
        assert!(!env.is_running());
    }

    #[test]
    fn retrigger_restarts_from_time_zero() {
        let mut env = Envelope::idle();
        env.trigger(0, &THREE_PHASE);
        assert_eq!(env.level_at(150), Some(0)); // mid second phase
        env.trigger(150, &THREE_PHASE);
        assert_eq!(env.level_at(150), Some(255)); // back to first phase
    }

    #[test]
    fn trigger_survives_clock_wraparound() {
        let mut env = Envelope::idle();
        env.trigger(u32::MAX - 50, &THREE_PHASE);
        assert_eq!(env.level_at(49), Some(0)); // 100 ms elapsed across the wrap
    }
}
