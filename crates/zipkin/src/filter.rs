use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crossstitch_spanparser::{parse_span, AnnotationType};

use crate::config::FilterConfig;
use crate::diagnostics::{DecodeFailure, DiagnosticsSink, LogSink};
use crate::error::DecodeError;
use crate::event::Event;
use crate::span::NormalizedSpan;

/// The result of running the filter over one event.
#[derive(Debug)]
pub enum FilterOutcome {
    /// The span was decoded and written to the target field.
    Decoded(NormalizedSpan),
    /// Decoding failed. The event was tagged with `tags` and its target
    /// field left as it was.
    Failed { tags: Vec<String>, cause: DecodeError },
}

impl FilterOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }
}

/// Decodes base64-wrapped binary Zipkin spans found in pipeline events.
///
/// The filter holds only its configuration and diagnostics sink, so one
/// instance can be shared across threads and used concurrently.
pub struct ZipkinFilter {
    config: FilterConfig,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl ZipkinFilter {
    pub fn new(config: FilterConfig, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    /// A filter reporting to the `log` facade.
    pub fn with_log_sink(config: FilterConfig) -> Self {
        Self::new(config, Arc::new(LogSink))
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Decode and normalize a base64-encoded span.
    pub fn decode(&self, encoded: &str) -> Result<NormalizedSpan, DecodeError> {
        let bytes = STANDARD.decode(encoded)?;
        let raw = parse_span(&bytes)?;

        for a in &raw.binary_annotations {
            if let AnnotationType::Unknown(_) = a.annotation_type {
                self.diagnostics
                    .unknown_annotation_type(&a.key, a.annotation_type);
            }
        }

        NormalizedSpan::from_raw(&raw)
    }

    /// Decode the event's source field into its target field.
    ///
    /// Never fails: a span that cannot be decoded tags the event, leaves
    /// the target field untouched and is reported to the diagnostics sink.
    pub fn filter(&self, event: &mut Event) -> FilterOutcome {
        match self.normalize(event) {
            Ok(span) => {
                for tag in &self.config.add_tag {
                    event.tag(tag);
                }
                for tag in &self.config.remove_tag {
                    event.remove_tag(tag);
                }
                self.diagnostics
                    .decoded(&self.config.source, &self.config.target);
                FilterOutcome::Decoded(span)
            }
            Err(cause) => {
                for tag in &self.config.tag_on_failure {
                    event.tag(tag);
                }
                self.diagnostics.decode_failed(&DecodeFailure {
                    source: &self.config.source,
                    raw: event.get(&self.config.source),
                    cause: &cause,
                });
                FilterOutcome::Failed {
                    tags: self.config.tag_on_failure.clone(),
                    cause,
                }
            }
        }
    }

    fn normalize(&self, event: &mut Event) -> Result<NormalizedSpan, DecodeError> {
        let source = &self.config.source;
        let encoded = match event.get(source) {
            None => return Err(DecodeError::MissingSource(source.to_string())),
            Some(serde_json::Value::String(s)) => s,
            Some(_) => return Err(DecodeError::NotAString(source.to_string())),
        };

        let span = self.decode(encoded)?;
        let value = serde_json::to_value(&span)?;
        event.set(&self.config.target, value);
        Ok(span)
    }
}
