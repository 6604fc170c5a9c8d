use crate::types::ParseError;

// Thrift binary protocol wire types.
pub(crate) const T_STOP: u8 = 0;
pub(crate) const T_BOOL: u8 = 2;
pub(crate) const T_BYTE: u8 = 3;
pub(crate) const T_DOUBLE: u8 = 4;
pub(crate) const T_I16: u8 = 6;
pub(crate) const T_I32: u8 = 8;
pub(crate) const T_I64: u8 = 10;
pub(crate) const T_STRING: u8 = 11;
pub(crate) const T_STRUCT: u8 = 12;
pub(crate) const T_MAP: u8 = 13;
pub(crate) const T_SET: u8 = 14;
pub(crate) const T_LIST: u8 = 15;

/// Maximum container nesting followed when skipping unknown fields.
const MAX_SKIP_DEPTH: usize = 64;

/// A cursor-based reader over a Thrift binary-protocol encoded byte slice.
///
/// Uses "sticky error" semantics: once an error occurs, all subsequent reads
/// return zero/default values. The first error is retrieved after parsing
/// completes with [`SpanReader::take_error`].
pub(crate) struct SpanReader<'a> {
    data: &'a [u8],
    pos: usize,
    err: Option<ParseError>,
}

impl<'a> SpanReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            err: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.err.is_some()
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.err.take()
    }

    #[cfg(test)]
    pub fn bytes_read(&self) -> usize {
        self.pos
    }

    /// Record an error unless one is already pending. Only the first one is kept.
    pub fn fail(&mut self, err: ParseError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn ensure(&mut self, n: usize) -> bool {
        if self.err.is_some() {
            return false;
        }
        if n > self.remaining() {
            self.fail(ParseError::UnexpectedEof);
            return false;
        }
        true
    }

    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        if self.ensure(N) {
            buf.copy_from_slice(&self.data[self.pos..self.pos + N]);
            self.pos += N;
        }
        buf
    }

    fn read_bytes_slice(&mut self, n: usize) -> &'a [u8] {
        if !self.ensure(n) {
            return &[];
        }
        let start = self.pos;
        self.pos += n;
        &self.data[start..self.pos]
    }

    /// Read a single byte.
    pub fn byte(&mut self) -> u8 {
        self.read_array::<1>()[0]
    }

    /// Read a boolean (single byte, 0 = false).
    pub fn bool_val(&mut self) -> bool {
        self.byte() != 0
    }

    /// Read a big-endian i16.
    pub fn int16(&mut self) -> i16 {
        i16::from_be_bytes(self.read_array())
    }

    /// Read a big-endian i32.
    pub fn int32(&mut self) -> i32 {
        i32::from_be_bytes(self.read_array())
    }

    /// Read a big-endian i64.
    pub fn int64(&mut self) -> i64 {
        i64::from_be_bytes(self.read_array())
    }

    /// Read an i32 length or count prefix. Negative values are invalid.
    fn size(&mut self, what: &str) -> usize {
        let n = self.int32();
        if n < 0 {
            self.fail(ParseError::InvalidData(format!("negative {what}: {n}")));
            return 0;
        }
        n as usize
    }

    /// Read a length-prefixed byte string.
    pub fn binary(&mut self) -> Vec<u8> {
        let len = self.size("length");
        self.read_bytes_slice(len).to_vec()
    }

    /// Read a length-prefixed UTF-8 string. Invalid UTF-8 is replaced.
    pub fn string(&mut self) -> String {
        let len = self.size("length");
        let bytes = self.read_bytes_slice(len);
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Read a field header. Returns `(T_STOP, 0)` at the end of a struct,
    /// and also once an error is pending so field loops terminate.
    pub fn field_header(&mut self) -> (u8, i16) {
        let ttype = self.byte();
        if ttype == T_STOP || self.has_error() {
            return (T_STOP, 0);
        }
        (ttype, self.int16())
    }

    /// Read a list or set header: element type and element count.
    pub fn list_header(&mut self) -> (u8, usize) {
        let elem = self.byte();
        let count = self.size("count");
        (elem, count)
    }

    /// Read a map header: key type, value type and entry count.
    pub fn map_header(&mut self) -> (u8, u8, usize) {
        let key = self.byte();
        let value = self.byte();
        let count = self.size("count");
        (key, value, count)
    }

    /// Skip over a value of the given wire type.
    pub fn skip(&mut self, ttype: u8) {
        self.skip_nested(ttype, 0);
    }

    fn skip_nested(&mut self, ttype: u8, depth: usize) {
        if self.has_error() {
            return;
        }
        if depth > MAX_SKIP_DEPTH {
            self.fail(ParseError::InvalidData(format!(
                "nesting deeper than {MAX_SKIP_DEPTH} levels"
            )));
            return;
        }
        match ttype {
            T_BOOL | T_BYTE => {
                self.byte();
            }
            T_I16 => {
                self.int16();
            }
            T_I32 => {
                self.int32();
            }
            T_I64 | T_DOUBLE => {
                self.int64();
            }
            T_STRING => {
                let len = self.size("length");
                self.read_bytes_slice(len);
            }
            T_STRUCT => loop {
                let (field_type, _) = self.field_header();
                if field_type == T_STOP {
                    break;
                }
                self.skip_nested(field_type, depth + 1);
            },
            T_MAP => {
                let (key, value, count) = self.map_header();
                for _ in 0..count {
                    if self.has_error() {
                        break;
                    }
                    self.skip_nested(key, depth + 1);
                    self.skip_nested(value, depth + 1);
                }
            }
            T_SET | T_LIST => {
                let (elem, count) = self.list_header();
                for _ in 0..count {
                    if self.has_error() {
                        break;
                    }
                    self.skip_nested(elem, depth + 1);
                }
            }
            other => {
                self.fail(ParseError::InvalidData(format!(
                    "unknown wire type: 0x{other:02x}"
                )));
            }
        }
    }
}
