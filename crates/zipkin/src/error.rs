use crossstitch_spanparser::{AnnotationType, ParseError};

/// Reasons a span could not be decoded and normalized.
///
/// None of these escape [`ZipkinFilter::filter`](crate::ZipkinFilter::filter);
/// they are reported through the diagnostics sink and the event is tagged.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("source field {0} is missing")]
    MissingSource(String),

    #[error("source field {0} is not a string")]
    NotAString(String),

    #[error("invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("invalid span encoding: {0}")]
    Protocol(#[from] ParseError),

    #[error("{annotation_type} value needs {expected} bytes, got {actual}")]
    Width {
        annotation_type: AnnotationType,
        expected: usize,
        actual: usize,
    },

    #[error("unable to serialize normalized span: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DecodeError {
    /// A stable label for the error kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSource(_) => "missing_source",
            Self::NotAString(_) => "not_a_string",
            Self::Encoding(_) => "encoding",
            Self::Protocol(_) => "protocol",
            Self::Width { .. } => "width",
            Self::Serialize(_) => "serialize",
        }
    }
}
