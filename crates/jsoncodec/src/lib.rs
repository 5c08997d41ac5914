//! Buffer-oriented JSON codecs for numbers, decimals, UUIDs, dates, base64
//! byte arrays and a few textual types.
//!
//! Values are written into a [`JsonWriter`] and read from a [`JsonReader`].
//! Every codec has a fast path built on precomputed digit tables and falls
//! back to a generic parser whenever the fast path cannot guarantee the exact
//! result.
//!
//! ```rust
//! use jsoncodec::{deserialize, serialize};
//!
//! assert_eq!(serialize(&-1234i32), b"-1234");
//! assert_eq!(deserialize::<f64>(b"\"NaN\"").map(f64::is_nan), Ok(true));
//! ```

#![allow(missing_docs)]
extern crate alloc;

mod binary;
mod codec;
mod digits;
mod error;
mod guid;
mod net;
mod number;
mod options;
mod reader;
mod string;
mod time;
mod writer;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;


pub use bigdecimal::BigDecimal;
pub use binary::{deserialize_binary, serialize_binary, serialize_nullable_binary};
pub use codec::{JsonCodec, deserialize, serialize, serialize_into};
pub use error::{CodecError, ErrorKind, Result};
pub use guid::{UUID_JSON_LEN, deserialize_uuid, serialize_nullable_uuid, serialize_uuid};
pub use net::{Uri, deserialize_ip, deserialize_uri, serialize_ip, serialize_uri};
pub use number::{
    NumberValue, deserialize_decimal, deserialize_double, deserialize_float, deserialize_int,
    deserialize_long, deserialize_number, serialize_decimal, serialize_double, serialize_float,
    serialize_int, serialize_long, serialize_nullable_decimal, serialize_nullable_double,
    serialize_nullable_float, serialize_nullable_int, serialize_nullable_long, serialize_number,
};
pub use options::{MIN_SCRATCH_SIZE, ReaderOptions, WriterOptions};
pub use reader::JsonReader;
pub use string::{
    deserialize_nullable_string, deserialize_string, serialize_nullable_string, serialize_string,
};
pub use time::{
    deserialize_date, deserialize_date_time, deserialize_local_date_time, deserialize_time,
    serialize_date, serialize_date_time, serialize_local_date_time, serialize_time,
};
pub use writer::{JsonWriter, TMP_SIZE};
