//! Error kinds raised while building a [`crate::schema::Protocol`] or while
//! encoding data against one. Every variant's `Display` text is part of the
//! library's contract — callers should match on the variant, not parse the
//! message.

use thiserror::Error;

/// Raised from [`crate::schema::message`], [`crate::schema::r#enum`], and
/// [`crate::schema::protocol`].
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Double definition of name \"{0}\"")]
    DuplicateName(String),

    #[error("Double definition of id {id} in message \"{message}\"")]
    DuplicateFieldId { message: String, id: u32 },

    #[error("Field id {id} in message \"{message}\" is out of the allowed range")]
    FieldIdOutOfRange { message: String, id: u32 },

    #[error("Message \"{0}\" must not have a field of its own type")]
    SelfRecursion(String),

    #[error("Type \"{name}\" referenced by field \"{field}\" of \"{message}\" is not declared")]
    UndeclaredType {
        message: String,
        field: String,
        name: String,
    },

    #[error("Double definition of id {id} in enum \"{enum_name}\"")]
    DuplicateEnumId { enum_name: String, id: i32 },

    #[error("Enum \"{0}\" definition does not contain a field with id = 0")]
    EnumMissingZero(String),
}

/// Raised from [`crate::schema::Protocol::encode`].
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("no message or enum named \"{0}\"")]
    NoSuchDefinition(String),

    #[error("Attempt to encode enum \"{0}\" as a top level message")]
    TopLevelEnum(String),

    #[error("Wrong field name \"{field}\" for message \"{message}\"")]
    WrongFieldName { message: String, field: String },

    #[error("Field \"{field}\" of \"{kind}\" type gets {got} type value. Unsupported or colliding types")]
    TypeMismatch {
        field: String,
        kind: String,
        got: String,
    },

    #[error("Input number value {value:.6} for \"{field}\" is not integer")]
    NotIntegerNumber { field: String, value: f64 },

    #[error("Input cdata value {value} for \"{field}\" field is not integer")]
    NotIntegerWide { field: String, value: String },

    #[error("Input data for \"{field}\" field is {value} and do not fit in \"{kind}\"")]
    OutOfRange {
        field: String,
        value: String,
        kind: String,
    },

    #[error("Input data for \"{field}\" field is {value} and do not fit in uint_64")]
    OutOfRangeUint64 { field: String, value: String },

    #[error("Input data for \"{field}\" field is 'inf' and do not fit in \"{kind}\"")]
    Infinite { field: String, kind: String },

    #[error("For repeated fields table data are needed")]
    RepeatedNeedsTable,

    #[error("Repeated field \"{0}\" contains non-numeric key")]
    NonNumericKey(String),

    #[error("Repeated field \"{0}\" contains a non-integer numeric key")]
    NonIntegerKey(String),

    #[error("Repeated field \"{0}\" minimum index is not 1")]
    MinIndexNotOne(String),

    #[error("Repeated field \"{0}\" contains inconsistent keys")]
    InconsistentKeys(String),

    #[error("Too long string to be encoded")]
    TooLong,

    #[error("‘{value}’ is not defined in ‘{enum_name}’ enum")]
    UnknownEnumMember { enum_name: String, value: String },

    #[error("Nested message for field \"{0}\" exceeds the maximum encoded length")]
    NestedMessageTooLong(String),
}
