//! Fuzz target: `MotionController` retarget/stop/poll sequences
//!
//! Exercises the ramped position controller with arbitrary interleavings
//! of `set_target`, `stop`, and `poll` and verifies:
//! - No panics under arbitrary inputs
//! - Position never leaves the configured travel bounds
//! - The bridge is released (drive 0) whenever the controller is settled
//!
//! cargo fuzz run fuzz_motion_targets

#![no_main]

use desklift::app::ports::ActuatorPort;
use desklift::config::SystemConfig;
use desklift::control::motion::{Direction, MotionController};
use libfuzzer_sys::fuzz_target;

struct NullHw {
    driven: bool,
}

impl ActuatorPort for NullHw {
    fn set_motor(&mut self, duty: u8, _dir: Direction) {
        self.driven = duty > 0;
    }

    fn stop_motor(&mut self) {
        self.driven = false;
    }

    fn set_move_indicators(&mut self, _up: bool, _down: bool) {}
    fn set_buzzer(&mut self, _level: u8) {}
    fn set_led(&mut self, _level: u8) {}

    fn all_off(&mut self) {
        self.driven = false;
    }
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig::default();
    let mut motion = MotionController::new(&config);
    let mut hw = NullHw { driven: false };
    let mut now: u32 = 0;

    for &byte in data {
        match byte % 4 {
            // Retarget anywhere, including far outside the travel range.
            0 => motion.set_target(i32::from(byte as i8) * 4),
            1 => motion.stop(&mut hw),
            _ => {
                now = now.wrapping_add(u32::from(config.step_interval_ms));
                motion.poll(now, &mut hw);
            }
        }

        assert!(
            motion.position() >= config.min_height && motion.position() <= config.max_height,
            "position {} escaped travel bounds",
            motion.position()
        );
        if !motion.is_moving() {
            assert_eq!(motion.drive_level(), 0, "settled controller holds drive");
            assert!(!hw.driven, "settled controller left the bridge energized");
        }
    }

    // Let the controller run to completion; it must converge and release.
    for _ in 0..(config.max_height - config.min_height + 2) {
        now = now.wrapping_add(u32::from(config.step_interval_ms));
        motion.poll(now, &mut hw);
    }
    assert!(!motion.is_moving(), "controller failed to converge");
    assert!(!hw.driven, "bridge energized after convergence");
});
