//! Buzzer pattern sequencer.
//!
//! Plays short non-blocking audio cues through a single PWM channel.
//! The cue tables are declarative [`Phase`] sequences; `poll()` is the
//! pure "decide" half and returns the level the channel should carry —
//! the hardware adapter applies it.
//!
//! | Cue            | Envelope                       | Meaning          |
//! |----------------|--------------------------------|------------------|
//! | `MoveStart`    | 100 ms on                      | motion started   |
//! | `TargetReached`| on/off/on, 100 ms each         | arrived          |
//! | `Fault`        | on/off/on/off/on, 100 ms each  | rejected action  |
//! | `CloudBlip`    | 50 ms at soft level 40         | remote update    |

use super::sequencer::{Envelope, Phase, phase};

const ON: u8 = 255;
/// Reduced-duty level for the unobtrusive cloud blip.
const SOFT: u8 = 40;

static MOVE_START: [Phase; 1] = [phase(100, ON)];
static TARGET_REACHED: [Phase; 3] = [phase(100, ON), phase(100, 0), phase(100, ON)];
static FAULT: [Phase; 5] = [
    phase(100, ON),
    phase(100, 0),
    phase(100, ON),
    phase(100, 0),
    phase(100, ON),
];
static CLOUD_BLIP: [Phase; 1] = [phase(50, SOFT)];

/// Audible feedback cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCue {
    MoveStart,
    TargetReached,
    Fault,
    CloudBlip,
}

impl BuzzerCue {
    fn table(self) -> &'static [Phase] {
        match self {
            Self::MoveStart => &MOVE_START,
            Self::TargetReached => &TARGET_REACHED,
            Self::Fault => &FAULT,
            Self::CloudBlip => &CLOUD_BLIP,
        }
    }
}

/// Non-blocking buzzer pattern engine. At most one cue runs at a time;
/// triggering restarts the envelope, muting truncates it.
pub struct BuzzerSequencer {
    envelope: Envelope,
    muted: bool,
}

impl BuzzerSequencer {
    pub fn new(muted: bool) -> Self {
        Self {
            envelope: Envelope::idle(),
            muted,
        }
    }

    /// Start a cue from time zero, overriding any cue in progress.
    /// Ignored entirely while muted.
    pub fn trigger(&mut self, now_ms: u32, cue: BuzzerCue) {
        if self.muted {
            return;
        }
        self.envelope.trigger(now_ms, cue.table());
    }

    /// Muting stops the active cue immediately and suppresses future
    /// triggers until unmuted.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.envelope.cancel();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_running(&self) -> bool {
        self.envelope.is_running()
    }

    /// Level the buzzer channel should carry right now (0 = silent).
    pub fn poll(&mut self, now_ms: u32) -> u8 {
        if self.muted {
            return 0;
        }
        self.envelope.level_at(now_ms).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_cue_reproduces_documented_boundaries() {
        let mut bz = BuzzerSequencer::new(false);
        bz.trigger(0, BuzzerCue::Fault);

        // Poll every 50 ms for 600 ms: on/off/on/off/on then stop,
        // switching at the 100/200/300/400/500 ms boundaries.
        let expected = [
            (50, ON),
            (150, 0),
            (250, ON),
            (350, 0),
            (450, ON),
            (550, 0),
        ];
        for (t, level) in expected {
            assert_eq!(bz.poll(t), level, "at t={t}");
        }
        assert!(!bz.is_running(), "cue must stop after 500 ms");
    }

    #[test]
    fn cloud_blip_is_soft_and_short() {
        let mut bz = BuzzerSequencer::new(false);
        bz.trigger(0, BuzzerCue::CloudBlip);
        assert_eq!(bz.poll(25), SOFT);
        assert_eq!(bz.poll(60), 0);
    }

    #[test]
    fn retrigger_overrides_running_cue() {
        let mut bz = BuzzerSequencer::new(false);
        bz.trigger(0, BuzzerCue::Fault);
        assert_eq!(bz.poll(150), 0); // second phase (off)
        bz.trigger(150, BuzzerCue::MoveStart);
        assert_eq!(bz.poll(160), ON); // restarted envelope
        assert_eq!(bz.poll(260), 0);
        assert!(!bz.is_running());
    }

    #[test]
    fn mute_truncates_and_suppresses() {
        let mut bz = BuzzerSequencer::new(false);
        bz.trigger(0, BuzzerCue::TargetReached);
        assert_eq!(bz.poll(50), ON);
        bz.set_muted(true);
        assert_eq!(bz.poll(60), 0);
        assert!(!bz.is_running());
        bz.trigger(70, BuzzerCue::MoveStart);
        assert_eq!(bz.poll(80), 0, "triggers while muted are dropped");
        bz.set_muted(false);
        bz.trigger(100, BuzzerCue::MoveStart);
        assert_eq!(bz.poll(110), ON);
    }
}
