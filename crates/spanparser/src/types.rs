// === Error types ===

/// Errors that can occur while parsing a binary span.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of span data")]
    UnexpectedEof,

    #[error("parse error: {0}")]
    InvalidData(String),

    #[error("missing required field {strukt}.{field}")]
    MissingField {
        strukt: &'static str,
        field: &'static str,
    },
}

// === Span types ===

/// The network origin of an annotation.
///
/// Address and port are kept in their signed wire representation;
/// consumers reinterpret them as unsigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub ipv4: i32,
    pub port: i16,
    pub service_name: String,
}

/// A timestamped free-text event attached to a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Microseconds since the Unix epoch.
    pub timestamp: i64,
    pub value: String,
    pub duration: Option<i64>,
    pub host: Option<Endpoint>,
}

/// The declared type of a binary annotation's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationType {
    Bool,
    Bytes,
    I16,
    I32,
    I64,
    Double,
    String,
    /// A tag outside the known set, kept verbatim.
    Unknown(i32),
}

impl AnnotationType {
    /// Stands in for a binary annotation that carried no type tag.
    pub const UNSET: Self = Self::Unknown(-1);

    pub fn from_i32(tag: i32) -> Self {
        match tag {
            0 => Self::Bool,
            1 => Self::Bytes,
            2 => Self::I16,
            3 => Self::I32,
            4 => Self::I64,
            5 => Self::Double,
            6 => Self::String,
            other => Self::Unknown(other),
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            Self::Bool => 0,
            Self::Bytes => 1,
            Self::I16 => 2,
            Self::I32 => 3,
            Self::I64 => 4,
            Self::Double => 5,
            Self::String => 6,
            Self::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => f.write_str("BOOL"),
            Self::Bytes => f.write_str("BYTES"),
            Self::I16 => f.write_str("I16"),
            Self::I32 => f.write_str("I32"),
            Self::I64 => f.write_str("I64"),
            Self::Double => f.write_str("DOUBLE"),
            Self::String => f.write_str("STRING"),
            Self::Unknown(tag) => write!(f, "UNKNOWN({tag})"),
        }
    }
}

/// A typed key/value fact attached to a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAnnotation {
    pub key: String,
    pub value: Vec<u8>,
    pub annotation_type: AnnotationType,
    pub host: Option<Endpoint>,
}

/// A span as decoded from the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpan {
    pub trace_id: i64,
    pub name: String,
    pub id: i64,
    pub parent_id: Option<i64>,
    pub annotations: Vec<Annotation>,
    pub binary_annotations: Vec<BinaryAnnotation>,
    pub debug: bool,
}
