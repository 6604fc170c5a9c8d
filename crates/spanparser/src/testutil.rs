//! A Thrift binary-protocol writer for building span fixtures.

use crate::reader::*;
use crate::types::*;

/// Writes spans, or hand-assembled fragments of them, in the wire format
/// [`parse_span`](crate::parse_span) reads.
#[derive(Default)]
pub struct SpanWriter {
    buf: Vec<u8>,
}

impl SpanWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a complete span.
    pub fn encode(span: &RawSpan) -> Vec<u8> {
        let mut w = Self::new();
        w.span(span);
        w.finish()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub fn i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn bytes(&mut self, b: &[u8]) {
        self.i32(b.len() as i32);
        self.buf.extend_from_slice(b);
    }

    pub fn field_header(&mut self, ttype: u8, id: i16) {
        self.byte(ttype);
        self.i16(id);
    }

    pub fn stop(&mut self) {
        self.byte(T_STOP);
    }

    pub fn field_bool(&mut self, id: i16, v: bool) {
        self.field_header(T_BOOL, id);
        self.byte(v as u8);
    }

    pub fn field_i16(&mut self, id: i16, v: i16) {
        self.field_header(T_I16, id);
        self.i16(v);
    }

    pub fn field_i32(&mut self, id: i16, v: i32) {
        self.field_header(T_I32, id);
        self.i32(v);
    }

    pub fn field_i64(&mut self, id: i16, v: i64) {
        self.field_header(T_I64, id);
        self.i64(v);
    }

    pub fn field_string(&mut self, id: i16, v: &[u8]) {
        self.field_header(T_STRING, id);
        self.bytes(v);
    }

    /// Start a struct-valued field. Close it with [`SpanWriter::stop`].
    pub fn field_struct(&mut self, id: i16) {
        self.field_header(T_STRUCT, id);
    }

    /// Start a `list<struct>` field of `count` elements. Each element is
    /// a field sequence closed with [`SpanWriter::stop`].
    pub fn field_struct_list(&mut self, id: i16, count: usize) {
        self.field_header(T_LIST, id);
        self.byte(T_STRUCT);
        self.i32(count as i32);
    }

    fn span(&mut self, span: &RawSpan) {
        self.field_i64(1, span.trace_id);
        self.field_string(3, span.name.as_bytes());
        self.field_i64(4, span.id);
        if let Some(parent_id) = span.parent_id {
            self.field_i64(5, parent_id);
        }
        self.field_struct_list(6, span.annotations.len());
        for a in &span.annotations {
            self.annotation(a);
        }
        self.field_struct_list(8, span.binary_annotations.len());
        for a in &span.binary_annotations {
            self.binary_annotation(a);
        }
        self.field_bool(9, span.debug);
        self.stop();
    }

    fn annotation(&mut self, a: &Annotation) {
        self.field_i64(1, a.timestamp);
        self.field_string(2, a.value.as_bytes());
        if let Some(host) = &a.host {
            self.field_struct(3);
            self.endpoint(host);
        }
        if let Some(duration) = a.duration {
            match i32::try_from(duration) {
                Ok(d) => self.field_i32(4, d),
                Err(_) => self.field_i64(4, duration),
            }
        }
        self.stop();
    }

    fn binary_annotation(&mut self, a: &BinaryAnnotation) {
        self.field_string(1, a.key.as_bytes());
        self.field_string(2, &a.value);
        self.field_i32(3, a.annotation_type.to_i32());
        if let Some(host) = &a.host {
            self.field_struct(4);
            self.endpoint(host);
        }
        self.stop();
    }

    fn endpoint(&mut self, ep: &Endpoint) {
        self.field_i32(1, ep.ipv4);
        self.field_i16(2, ep.port);
        self.field_string(3, ep.service_name.as_bytes());
        self.stop();
    }
}
