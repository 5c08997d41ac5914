#![no_main]
//! Checks that every fast path agrees with its generic parser.

use arbitrary::{Arbitrary, Unstructured};
use jsoncodec::fuzzing;
use libfuzzer_sys::fuzz_target;

const NUMBER_BYTES: &[u8] = b"0123456789+-.eE";

/// Number-like token of at most 18 bytes, drawn mostly from the number
/// alphabet so the fast paths get exercised.
#[derive(Debug)]
struct Token(Vec<u8>);

impl<'a> Arbitrary<'a> for Token {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(1..=18)?;
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            let b = if u.ratio(1, 32)? {
                u.arbitrary()?
            } else {
                *u.choose(NUMBER_BYTES)?
            };
            bytes.push(b);
        }
        Ok(Token(bytes))
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    token: Token,
    uuid: [u8; 16],
    dashed: bool,
    millis: u16,
    seconds: u32,
}

fn same<T: PartialEq + core::fmt::Debug>(
    token: &[u8],
    fast: jsoncodec::Result<T>,
    generic: jsoncodec::Result<T>,
) {
    match (&fast, &generic) {
        (Ok(a), Ok(b)) => assert_eq!(a, b, "{token:?}"),
        (Err(_), Err(_)) => {}
        _ => panic!("{:?}: fast {fast:?} generic {generic:?}", token),
    }
}

fn check_numbers(t: &[u8]) {
    same(t, fuzzing::int(t), fuzzing::int_generic(t));
    same(t, fuzzing::long(t), fuzzing::long_generic(t));
    same(
        t,
        fuzzing::double(t).map(f64::to_bits),
        fuzzing::double_generic(t).map(f64::to_bits),
    );
    same(
        t,
        fuzzing::float(t).map(f32::to_bits),
        fuzzing::float_generic(t).map(f32::to_bits),
    );
    same(
        t,
        fuzzing::decimal(t).map(|d| d.as_bigint_and_exponent()),
        fuzzing::decimal_generic(t).map(|d| d.as_bigint_and_exponent()),
    );
}

fn check_uuid(bytes: [u8; 16], dashed: bool) {
    let value = u128::from_be_bytes(bytes);
    let text = if dashed {
        let hex = format!("{value:032x}");
        format!(
            "{}-{}-{}-{}-{}",
            &hex[..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..]
        )
    } else {
        format!("{value:032X}")
    };
    same(
        text.as_bytes(),
        fuzzing::uuid(text.as_bytes()),
        fuzzing::uuid_generic(text.as_bytes()),
    );
}

fn check_date_time(seconds: u32, millis: u16) {
    let days = seconds / 86_400;
    let (h, m, s) = (seconds / 3600 % 24, seconds / 60 % 60, seconds % 60);
    let text = format!(
        "{:04}-{:02}-{:02}T{h:02}:{m:02}:{s:02}.{:03}Z",
        2000 + days % 100,
        1 + days % 12,
        1 + days % 28,
        millis % 1000
    );
    same(
        text.as_bytes(),
        fuzzing::date_time(text.as_bytes()),
        fuzzing::date_time_generic(text.as_bytes()),
    );
}

fuzz_target!(|input: Input| {
    check_numbers(&input.token.0);
    check_uuid(input.uuid, input.dashed);
    check_date_time(input.seconds, input.millis);
});
