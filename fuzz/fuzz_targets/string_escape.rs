#![no_main]
//! Strings must be escaped exactly as `serde_json` escapes them and read back
//! unchanged.

use jsoncodec::{JsonWriter, deserialize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: String| {
    let mut writer = JsonWriter::new();
    writer.write_string(&value);
    let expected = serde_json::to_string(&value).expect("strings always serialize");
    assert_eq!(writer.as_bytes(), expected.as_bytes());
    let back: String = deserialize(writer.as_bytes()).expect("written strings read back");
    assert_eq!(back, value);
});
