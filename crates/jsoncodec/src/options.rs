/// Smallest scratch buffer a reader will use: a signed 64-bit integer plus
/// one byte of lookahead.
pub const MIN_SCRATCH_SIZE: usize = 21;

/// Configuration for a [`JsonReader`](crate::JsonReader).
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{JsonReader, ReaderOptions};
///
/// let options = ReaderOptions {
///     scratch_size: 256,
/// };
/// let reader = JsonReader::with_options(b"123", options);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Initial size in bytes of the scratch buffer that number and simple
    /// string tokens are copied into.
    ///
    /// Tokens longer than the scratch make the reader grow it (by doubling);
    /// the grown buffer is kept for the rest of the session. Values below
    /// [`MIN_SCRATCH_SIZE`] are raised to it.
    ///
    /// # Default
    ///
    /// `64`
    pub scratch_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { scratch_size: 64 }
    }
}

/// Configuration for a [`JsonWriter`](crate::JsonWriter).
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// Capacity reserved for the output buffer up front.
    ///
    /// # Default
    ///
    /// `512`
    pub initial_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 512,
        }
    }
}
