//! Host-side value model. A native number (`f64`) and a wide 64-bit integer
//! are kept as distinct variants so validators can branch on which one the
//! caller actually supplied, exactly as two disjoint host representations
//! would in a language with more than one numeric type.

/// A 64-bit integer value distinguishable at runtime from a native number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideInt {
    Signed(i64),
    Unsigned(u64),
}

/// A field→value mapping, in the order fields were inserted. proto3 places
/// no ordering constraint on the wire, but preserving insertion order keeps
/// encoding deterministic for callers who care.
pub type FieldMap = Vec<(String, Value)>;

/// Any value that can appear in a data tree passed to
/// [`crate::schema::Protocol::encode`].
#[derive(Debug, Clone)]
pub enum Value {
    /// The host's default numeric representation (`f64`).
    Number(f64),
    /// A 64-bit integer distinguishable from a native number.
    Wide(WideInt),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    /// Nested message data, keyed by field name.
    Message(FieldMap),
    /// Repeated-field data. Stored as raw key/value pairs, rather than an
    /// already-validated dense array, so malformed input (non-numeric or
    /// non-contiguous keys) survives into the encoder to be diagnosed with
    /// a precise error instead of being rejected at construction time.
    Table(Vec<(Value, Value)>),
    /// The `_unknown_fields` sentinel payload: opaque pre-encoded chunks
    /// concatenated verbatim into the output.
    RawChunks(Vec<Vec<u8>>),
}

impl Value {
    /// A human-readable name for error messages ("gets `U` type value").
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Wide(_) => "cdata",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Message(_) => "table",
            Value::Table(_) => "table",
            Value::RawChunks(_) => "table",
        }
    }

    /// Convenience constructor for a signed wide integer.
    pub fn wide_i64(v: i64) -> Value {
        Value::Wide(WideInt::Signed(v))
    }

    /// Convenience constructor for an unsigned wide integer.
    pub fn wide_u64(v: u64) -> Value {
        Value::Wide(WideInt::Unsigned(v))
    }

    /// Builds a nested message value from `(field_name, value)` pairs.
    pub fn message(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
        Value::Message(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Builds a well-formed dense 1-based repeated-field value from an
    /// ordered list of elements.
    pub fn table(items: impl IntoIterator<Item = Value>) -> Value {
        let pairs = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Value::Number((i + 1) as f64), v))
            .collect();
        Value::Table(pairs)
    }

    /// Builds a (possibly malformed) repeated-field value from raw
    /// key/value pairs, for exercising the shape-validation error paths.
    pub fn raw_table(pairs: impl IntoIterator<Item = (Value, Value)>) -> Value {
        Value::Table(pairs.into_iter().collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}
