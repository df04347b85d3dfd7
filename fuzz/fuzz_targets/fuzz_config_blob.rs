//! Fuzz target: configuration blob decode and persistence
//!
//! Feeds arbitrary bytes through the postcard decoder and, when a
//! structurally valid config falls out, pushes it through the store's
//! save/load path. Verifies:
//! - No panics decoding arbitrary blobs
//! - A config the store accepts reloads bit-for-bit identical
//! - A config the store rejects never reaches a later `load`
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use desklift::adapters::nvs::NvsAdapter;
use desklift::app::ports::ConfigPort;
use desklift::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = postcard::from_bytes::<SystemConfig>(data) else {
        return;
    };

    let store = NvsAdapter::new().expect("simulation store init");
    match store.save(&cfg) {
        Ok(()) => {
            let reloaded = store.load().expect("load after accepted save");
            assert_eq!(reloaded, cfg, "accepted config did not survive reload");
        }
        Err(_) => {
            // Rejected blobs must leave the store on defaults.
            let reloaded = store.load().expect("load after rejected save");
            assert_eq!(reloaded, SystemConfig::default());
        }
    }
});
