use crossstitch_spanparser::{Annotation, BinaryAnnotation, RawSpan};
use indexmap::IndexSet;
use serde::Serialize;

use crate::endpoint::{resolve_endpoint, resolve_service};
use crate::error::DecodeError;
use crate::id::compact_id;
use crate::value::{decode_value, Value};

/// A span in the shape written to the event's target field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSpan {
    pub span_id: Option<String>,
    pub parent_id: Option<String>,
    pub root_id: Option<String>,
    pub name: String,
    /// Distinct service names across all annotation endpoints, first-seen order.
    pub service: IndexSet<String>,
    pub annotations: Vec<NormalizedAnnotation>,
    pub binary_annotations: Vec<NormalizedBinaryAnnotation>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAnnotation {
    pub timestamp: i64,
    pub value: String,
    pub duration: Option<i64>,
    pub endpoint: Option<String>,
}

/// One binary annotation. Entries sharing a key are all kept, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedBinaryAnnotation {
    pub key: String,
    pub value: Value,
    pub endpoint: Option<String>,
}

impl NormalizedSpan {
    /// Build the normalized form of a raw span. The raw span is only read.
    pub fn from_raw(span: &RawSpan) -> Result<Self, DecodeError> {
        let service = span
            .annotations
            .iter()
            .filter_map(|a| resolve_service(a.host.as_ref()))
            .chain(
                span.binary_annotations
                    .iter()
                    .filter_map(|a| resolve_service(a.host.as_ref())),
            )
            .map(str::to_owned)
            .collect();

        let binary_annotations = span
            .binary_annotations
            .iter()
            .map(NormalizedBinaryAnnotation::from_raw)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            span_id: compact_id(Some(span.id)),
            parent_id: compact_id(span.parent_id),
            root_id: compact_id(Some(span.trace_id)),
            name: span.name.clone(),
            service,
            annotations: span
                .annotations
                .iter()
                .map(NormalizedAnnotation::from_raw)
                .collect(),
            binary_annotations,
            debug: span.debug,
        })
    }
}

impl NormalizedAnnotation {
    fn from_raw(a: &Annotation) -> Self {
        Self {
            timestamp: a.timestamp,
            value: a.value.clone(),
            duration: a.duration,
            endpoint: resolve_endpoint(a.host.as_ref()),
        }
    }
}

impl NormalizedBinaryAnnotation {
    fn from_raw(a: &BinaryAnnotation) -> Result<Self, DecodeError> {
        Ok(Self {
            key: a.key.clone(),
            value: decode_value(a.annotation_type, &a.value)?,
            endpoint: resolve_endpoint(a.host.as_ref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossstitch_spanparser::{AnnotationType, Endpoint};
    use serde_json::json;

    fn endpoint(service_name: &str) -> Endpoint {
        Endpoint {
            ipv4: 0x7F000001,
            port: 80,
            service_name: service_name.to_string(),
        }
    }

    fn raw_span() -> RawSpan {
        RawSpan {
            trace_id: 1,
            name: "get".to_string(),
            id: 1,
            parent_id: None,
            annotations: vec![
                Annotation {
                    timestamp: 1_400_000_000_000_000,
                    value: "cs".to_string(),
                    duration: None,
                    host: Some(endpoint("svc")),
                },
                Annotation {
                    timestamp: 1_400_000_000_000_900,
                    value: "cr".to_string(),
                    duration: Some(900),
                    host: None,
                },
            ],
            binary_annotations: vec![
                BinaryAnnotation {
                    key: "http.status".to_string(),
                    value: 200i32.to_be_bytes().to_vec(),
                    annotation_type: AnnotationType::I32,
                    host: Some(endpoint("db")),
                },
                BinaryAnnotation {
                    key: "http.status".to_string(),
                    value: 503i32.to_be_bytes().to_vec(),
                    annotation_type: AnnotationType::I32,
                    host: Some(endpoint("svc")),
                },
            ],
            debug: false,
        }
    }

    #[test]
    fn test_from_raw() {
        let raw = raw_span();
        let span = NormalizedSpan::from_raw(&raw).unwrap();

        assert_eq!(span.span_id, span.root_id);
        assert_eq!(span.span_id.as_deref(), Some("AAAAAAAAAAE"));
        assert_eq!(span.parent_id, None);
        assert_eq!(span.name, "get");
        assert_eq!(
            span.service.iter().collect::<Vec<_>>(),
            vec!["svc", "db"]
        );
        assert_eq!(
            span.annotations[0].endpoint.as_deref(),
            Some("svc@127.0.0.1:80")
        );
        assert_eq!(span.annotations[1].endpoint, None);
        assert_eq!(span.annotations[1].duration, Some(900));
        // Input is left as it was.
        assert_eq!(raw, raw_span());
    }

    #[test]
    fn test_duplicate_binary_annotation_keys_are_kept() {
        let span = NormalizedSpan::from_raw(&raw_span()).unwrap();
        let values: Vec<_> = span
            .binary_annotations
            .iter()
            .map(|a| (a.key.as_str(), a.value.clone()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("http.status", Value::I32(200)),
                ("http.status", Value::I32(503)),
            ]
        );
    }

    #[test]
    fn test_no_endpoints_gives_empty_service() {
        let mut raw = raw_span();
        raw.annotations.clear();
        raw.binary_annotations.clear();
        let span = NormalizedSpan::from_raw(&raw).unwrap();
        assert!(span.service.is_empty());
        assert_eq!(serde_json::to_value(&span).unwrap()["service"], json!([]));
    }

    #[test]
    fn test_width_error_propagates() {
        let mut raw = raw_span();
        raw.binary_annotations[1].value = vec![0x01];
        assert_matches!(
            NormalizedSpan::from_raw(&raw),
            Err(DecodeError::Width { actual: 1, .. })
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut raw = raw_span();
        raw.parent_id = Some(-1);
        raw.debug = true;
        raw.binary_annotations.truncate(1);
        let span = NormalizedSpan::from_raw(&raw).unwrap();

        assert_eq!(
            serde_json::to_value(&span).unwrap(),
            json!({
                "span_id": "AAAAAAAAAAE",
                "parent_id": "__________8",
                "root_id": "AAAAAAAAAAE",
                "name": "get",
                "service": ["svc", "db"],
                "annotations": [
                    {
                        "timestamp": 1_400_000_000_000_000i64,
                        "value": "cs",
                        "duration": null,
                        "endpoint": "svc@127.0.0.1:80"
                    },
                    {
                        "timestamp": 1_400_000_000_000_900i64,
                        "value": "cr",
                        "duration": 900,
                        "endpoint": null
                    }
                ],
                "binary_annotations": [
                    {
                        "key": "http.status",
                        "value": 200,
                        "endpoint": "db@127.0.0.1:80"
                    }
                ],
                "debug": true
            })
        );
    }
}
