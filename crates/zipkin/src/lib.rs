//! Decodes binary Zipkin spans carried in pipeline events.
//!
//! Each event carries a base64-encoded, Thrift-serialized span (parsed by
//! `crossstitch-spanparser`) in a source field. The filter replaces it with
//! a normalized, index-friendly structure in a target field:
//!
//! - span, parent and trace ids become 11-character URL-safe tokens,
//! - endpoints become `service@ip:port` strings,
//! - binary annotation values are decoded according to their type,
//! - the distinct service names are collected into `service`.
//!
//! Spans that cannot be decoded never abort the stream: the event is tagged
//! (`_decodefailure` by default) and the failure is reported to the
//! filter's [`DiagnosticsSink`].
//!
//! # Usage
//!
//! ```no_run
//! use crossstitch_zipkin::{Event, FilterConfig, FilterOutcome, ZipkinFilter};
//!
//! let filter = ZipkinFilter::with_log_sink(FilterConfig::default());
//! let mut event: Event = serde_json::from_str(r#"{"span": "CgABAAAAAAAAAAEA"}"#).unwrap();
//!
//! match filter.filter(&mut event) {
//!     FilterOutcome::Decoded(span) => println!("decoded {:?}", span.span_id),
//!     FilterOutcome::Failed { cause, .. } => eprintln!("failed: {}", cause),
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod filter;
pub mod id;
pub mod pipeline;
pub mod span;
pub mod value;

pub use config::FilterConfig;
pub use diagnostics::{DiagnosticsSink, LogSink, MemorySink};
pub use endpoint::{resolve_endpoint, resolve_service};
pub use error::DecodeError;
pub use event::{Event, FieldRef};
pub use filter::{FilterOutcome, ZipkinFilter};
pub use id::compact_id;
pub use span::NormalizedSpan;
pub use value::{decode_value, Value};
