#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate stitchplot;

use stitchplot::{parse_identifier, ErrorPosition};

fuzz_target!(|data: &[u8]| {
    let _ = parse_identifier(data, ErrorPosition::default());
});
