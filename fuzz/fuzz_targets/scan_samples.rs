#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate stitchplot;

use stitchplot::{lines_from_reader, StitchSamples};

fuzz_target!(|data: &[u8]| {
    if let Ok((reader, _)) = lines_from_reader(data) {
        let _ = StitchSamples::from_reader(reader);
    }
});
