#![no_main]

use libfuzzer_sys::fuzz_target;
use srec::decoder::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(true);
    let _ = decoder.decode(data);
});
