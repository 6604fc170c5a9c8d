use crate::reader::*;
use crate::types::*;

/// Parse a single span from its Thrift binary-protocol encoding.
///
/// Unknown fields are skipped. Bytes following the span's closing STOP
/// marker are ignored.
pub fn parse_span(data: &[u8]) -> Result<RawSpan, ParseError> {
    let mut r = SpanReader::new(data);
    let span = r.span();

    // A read failure explains any missing fields, so report it first.
    if let Some(err) = r.take_error() {
        return Err(err);
    }
    span
}

// === Internal helpers ===

fn required<T>(val: Option<T>, strukt: &'static str, field: &'static str) -> Result<T, ParseError> {
    val.ok_or(ParseError::MissingField { strukt, field })
}

// === Struct-specific parsing methods on SpanReader ===

impl SpanReader<'_> {
    fn span(&mut self) -> Result<RawSpan, ParseError> {
        let mut trace_id = None;
        let mut name = String::new();
        let mut id = None;
        let mut parent_id = None;
        let mut annotations = Vec::new();
        let mut binary_annotations = Vec::new();
        let mut debug = false;

        loop {
            match self.field_header() {
                (T_STOP, _) => break,
                (T_I64, 1) => trace_id = Some(self.int64()),
                (T_STRING, 3) => name = self.string(),
                (T_I64, 4) => id = Some(self.int64()),
                (T_I64, 5) => parent_id = Some(self.int64()),
                (T_LIST, 6) => annotations = self.struct_list(Self::annotation)?,
                (T_LIST, 8) => binary_annotations = self.struct_list(Self::binary_annotation)?,
                (T_BOOL, 9) => debug = self.bool_val(),
                (other, _) => self.skip(other),
            }
        }

        Ok(RawSpan {
            trace_id: required(trace_id, "Span", "trace_id")?,
            name,
            id: required(id, "Span", "id")?,
            parent_id,
            annotations,
            binary_annotations,
            debug,
        })
    }

    fn annotation(&mut self) -> Result<Annotation, ParseError> {
        let mut timestamp = None;
        let mut value = String::new();
        let mut host = None;
        let mut duration = None;

        loop {
            match self.field_header() {
                (T_STOP, _) => break,
                (T_I64, 1) => timestamp = Some(self.int64()),
                (T_STRING, 2) => value = self.string(),
                (T_STRUCT, 3) => host = Some(self.endpoint()),
                (T_I32, 4) => duration = Some(i64::from(self.int32())),
                (T_I64, 4) => duration = Some(self.int64()),
                (other, _) => self.skip(other),
            }
        }

        Ok(Annotation {
            timestamp: required(timestamp, "Annotation", "timestamp")?,
            value,
            duration,
            host,
        })
    }

    fn binary_annotation(&mut self) -> Result<BinaryAnnotation, ParseError> {
        let mut key = None;
        let mut value = None;
        let mut annotation_type = None;
        let mut host = None;

        loop {
            match self.field_header() {
                (T_STOP, _) => break,
                (T_STRING, 1) => key = Some(self.string()),
                (T_STRING, 2) => value = Some(self.binary()),
                (T_I32, 3) => annotation_type = Some(AnnotationType::from_i32(self.int32())),
                (T_STRUCT, 4) => host = Some(self.endpoint()),
                (other, _) => self.skip(other),
            }
        }

        Ok(BinaryAnnotation {
            key: required(key, "BinaryAnnotation", "key")?,
            value: required(value, "BinaryAnnotation", "value")?,
            annotation_type: annotation_type.unwrap_or(AnnotationType::UNSET),
            host,
        })
    }

    fn endpoint(&mut self) -> Endpoint {
        let mut ep = Endpoint::default();
        loop {
            match self.field_header() {
                (T_STOP, _) => break,
                (T_I32, 1) => ep.ipv4 = self.int32(),
                (T_I16, 2) => ep.port = self.int16(),
                (T_STRING, 3) => ep.service_name = self.string(),
                (other, _) => self.skip(other),
            }
        }
        ep
    }

    /// Read a list of structs with `read`. A list declaring any other
    /// element type is skipped and yields no items.
    fn struct_list<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let (elem, count) = self.list_header();
        let mut items = Vec::new();
        for _ in 0..count {
            if self.has_error() {
                break;
            }
            if elem == T_STRUCT {
                items.push(read(self)?);
            } else {
                self.skip(elem);
            }
        }
        Ok(items)
    }
}
