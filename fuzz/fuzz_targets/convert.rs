#![no_main]

use libfuzzer_sys::fuzz_target;
use taskprof::convert::{self, Options};

fuzz_target!(|data: &[u8]| {
    if let Ok(profile) = convert::from_slice(&Options::default(), data) {
        let markers = &profile.main_thread().unwrap().markers;
        assert_eq!(markers.names().len(), markers.len());
        assert_eq!(markers.start_times().len(), markers.len());
    }
});
