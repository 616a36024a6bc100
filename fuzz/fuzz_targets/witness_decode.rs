#![no_main]

use libfuzzer_sys::fuzz_target;
use commitgate::ser::{decode_map_witness, decode_tree_witness};

fuzz_target!(|data: &[u8]| {
    // Decoders must reject, never panic, on arbitrary input
    let _ = decode_tree_witness(data);
    let _ = decode_map_witness(data);
});
