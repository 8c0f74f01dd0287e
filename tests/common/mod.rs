#![allow(dead_code)]

use std::fs::File;
use std::io::BufReader;

use serde_json::Value;
use taskprof::convert::{self, Options};
use taskprof::profile::Profile;

pub fn profile_of(input_file: &str) -> Profile {
    convert::from_file(&Options::default(), Some(input_file))
        .unwrap_or_else(|e| panic!("failed to convert {}: {}", input_file, e))
}

pub fn json_of(profile: &Profile) -> Value {
    let text = serde_json::to_string(profile).unwrap();
    serde_json::from_str(&text).unwrap()
}

pub fn expected(expected_file: &str) -> Value {
    let r = BufReader::new(File::open(expected_file).unwrap());
    serde_json::from_reader(r).unwrap()
}

/// Checks that every column of the marker table has `length` entries.
pub fn assert_markers_in_step(markers: &Value) {
    let length = markers["length"].as_u64().unwrap() as usize;
    for column in &["data", "name", "startTime", "endTime", "phase", "category"] {
        assert_eq!(
            markers[column].as_array().unwrap().len(),
            length,
            "markers.{} has the wrong length",
            column
        );
    }
}
