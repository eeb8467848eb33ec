//! Turns a user-built message/enum schema and an in-memory data tree into
//! canonical proto3 wire-format bytes.
//!
//! A schema is built by calling [`schema::message`] and [`schema::r#enum`]
//! for each definition, then passing the results to [`schema::protocol`],
//! which resolves forward references and rejects duplicate names, duplicate
//! or reserved field ids, and self-recursive fields. The returned
//! [`schema::Protocol`] is read-only; its only operation is
//! [`schema::Protocol::encode`], which walks a [`value::Value::Message`]
//! tree depth-first and emits the corresponding bytes.
//!
//! What this crate does not do: parse `.proto` text, decode wire bytes back
//! into values, generate source stubs, or carry any RPC/CLI/config surface
//! of its own beyond the demo binary in `src/main.rs`.

pub mod encode;
pub mod error;
pub mod schema;
pub mod scalar;
pub mod value;
pub mod wire;

pub use error::{EncodeError, SchemaError};
pub use schema::{message, protocol, r#enum, Definition, EnumDef, FieldDef, MessageDef, Protocol, TypeSpec};
pub use scalar::Scalar;
pub use value::{FieldMap, Value, WideInt};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_encodes_a_small_protocol() {
        let color = r#enum("Color", [("Red", 0), ("Green", 1), ("Blue", 2)]).unwrap();
        let pixel = schema::message(
            "Pixel",
            [("x", "int32", 1), ("y", "int32", 2), ("shade", "Color", 3)],
        )
        .unwrap();
        let proto = protocol(vec![color.into(), pixel.into()]).unwrap();

        let bytes = proto
            .encode(
                "Pixel",
                &vec![
                    ("x".to_string(), Value::Number(3.0)),
                    ("y".to_string(), Value::Number(4.0)),
                    ("shade".to_string(), Value::from("Green")),
                ],
            )
            .unwrap();

        assert_eq!(bytes, vec![0x08, 0x03, 0x10, 0x04, 0x18, 0x01]);
    }
}
