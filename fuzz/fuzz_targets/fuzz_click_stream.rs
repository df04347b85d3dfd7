//! Fuzz target: `ClickClassifier::poll`
//!
//! Drives arbitrary contact-bounce streams into the classifier and
//! asserts that it never panics and never reports more than two clicks,
//! including across the u32 millisecond wraparound.
//!
//! cargo fuzz run fuzz_click_stream

#![no_main]

use desklift::drivers::button::ClickClassifier;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut classifier = ClickClassifier::new(50, 250);

    // Start the clock just shy of wraparound so long streams cross it.
    let mut now: u32 = u32::MAX - 500;
    for &byte in data {
        // Low bit selects the raw level, the rest perturbs the tick gap
        // so polls arrive at uneven intervals like a real loop under load.
        let raw_pressed = byte & 1 == 1;
        let gap = 1 + u32::from(byte >> 1);
        now = now.wrapping_add(gap);

        let clicks = classifier.poll(now, raw_pressed);
        assert!(clicks <= 2, "classifier reported {clicks} clicks");
    }

    // Releasing and idling past the window must drain any pending count.
    for _ in 0..40 {
        now = now.wrapping_add(10);
        let clicks = classifier.poll(now, false);
        assert!(clicks <= 2, "drain reported {clicks} clicks");
    }
});
