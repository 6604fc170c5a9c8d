//! Diagnostic reporting for the filter.
//!
//! The filter never logs directly. It reports to the [`DiagnosticsSink`] it
//! was built with: [`LogSink`] forwards to the `log` facade, [`MemorySink`]
//! keeps reports in memory.

use std::sync::{Mutex, PoisonError};

use crossstitch_spanparser::AnnotationType;

use crate::error::DecodeError;
use crate::event::FieldRef;

/// Details of a failed decode.
#[derive(Debug)]
pub struct DecodeFailure<'a> {
    pub source: &'a FieldRef,
    /// The source field's value, if the event had one.
    pub raw: Option<&'a serde_json::Value>,
    pub cause: &'a DecodeError,
}

/// Receives diagnostics from a [`ZipkinFilter`](crate::ZipkinFilter).
pub trait DiagnosticsSink: Send + Sync {
    fn decoded(&self, source: &FieldRef, target: &FieldRef);

    fn decode_failed(&self, failure: &DecodeFailure<'_>);

    /// A binary annotation carried a type tag outside the known set and
    /// was rendered as hex.
    fn unknown_annotation_type(&self, key: &str, annotation_type: AnnotationType);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn decoded(&self, source: &FieldRef, target: &FieldRef) {
        log::debug!(source = source.as_str(), target = target.as_str(); "decoded span");
    }

    fn decode_failed(&self, failure: &DecodeFailure<'_>) {
        let raw = failure.raw.map(|v| v.to_string()).unwrap_or_default();
        log::warn!(
            source = failure.source.as_str(),
            raw = raw.as_str(),
            kind = failure.cause.kind(),
            error:% = failure.cause;
            "trouble decoding span"
        );
    }

    fn unknown_annotation_type(&self, key: &str, annotation_type: AnnotationType) {
        log::debug!(
            key = key,
            annotation_type = annotation_type.to_i32();
            "unknown binary annotation type, rendering as hex"
        );
    }
}

/// A report recorded by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Decoded {
        source: String,
        target: String,
    },
    Failed {
        source: String,
        raw: Option<serde_json::Value>,
        kind: &'static str,
        cause: String,
    },
    UnknownAnnotationType {
        key: String,
        annotation_type: AnnotationType,
    },
}

/// Records every report in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the reports recorded so far, in order.
    pub fn reports(&self) -> Vec<Report> {
        self.lock().clone()
    }

    /// Remove and return the reports recorded so far.
    pub fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.lock())
    }

    fn record(&self, report: Report) {
        self.lock().push(report);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Report>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticsSink for MemorySink {
    fn decoded(&self, source: &FieldRef, target: &FieldRef) {
        self.record(Report::Decoded {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    fn decode_failed(&self, failure: &DecodeFailure<'_>) {
        self.record(Report::Failed {
            source: failure.source.to_string(),
            raw: failure.raw.cloned(),
            kind: failure.cause.kind(),
            cause: failure.cause.to_string(),
        });
    }

    fn unknown_annotation_type(&self, key: &str, annotation_type: AnnotationType) {
        self.record(Report::UnknownAnnotationType {
            key: key.to_string(),
            annotation_type,
        });
    }
}
