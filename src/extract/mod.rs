//! Streaming HTML link extraction.
//!
//! # Data Flow
//! ```text
//! origin body (lazy byte chunks)
//!     → decoder.rs (stateful UTF-8, carries split sequences)
//!     → tokenizer.rs (incremental open-tag state machine)
//!     → stream.rs (re-emit identical bytes to the client sink)
//! ```
//!
//! One chunk is in flight at a time: the next read waits until the client
//! sink has accepted the previous write. That loop is the only
//! serialization the pipeline needs.

pub mod decoder;
pub mod stream;
pub mod tokenizer;

pub use decoder::{DecodeError, StreamDecoder};
pub use stream::{LinkSink, StreamingLinkExtractor};
pub use tokenizer::{TagSink, Tokenizer};
