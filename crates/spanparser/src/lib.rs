//! Parser for binary-encoded Zipkin spans.
//!
//! This crate decodes a span serialized with the Thrift binary protocol
//! (as emitted by Finagle and other Zipkin v1 tracers) into structured
//! Rust types.
//!
//! # Protocol
//!
//! A struct is a sequence of fields terminated by a `0x00` (STOP) byte.
//! Each field is framed as:
//!
//! | Offset | Size | Field            |
//! |--------|------|------------------|
//! | 0      | 1    | Wire type        |
//! | 1      | 2    | Field ID (BE)    |
//! | 3      | N    | Value            |
//!
//! Integers and doubles are big-endian. Strings and binaries carry a
//! 4-byte big-endian length prefix; lists carry an element type byte and
//! a 4-byte count.
//!
//! # Usage
//!
//! ```no_run
//! use crossstitch_spanparser::{parse_span, ParseError};
//!
//! let data: &[u8] = &[/* span bytes */];
//! match parse_span(data) {
//!     Ok(span) => println!("{} ({} annotations)", span.name, span.annotations.len()),
//!     Err(ParseError::UnexpectedEof) => eprintln!("truncated span"),
//!     Err(e) => eprintln!("parse error: {}", e),
//! }
//! ```

pub mod testutil;
pub mod types;
mod parser;
mod reader;

pub use parser::parse_span;
pub use types::{Annotation, AnnotationType, BinaryAnnotation, Endpoint, ParseError, RawSpan};
