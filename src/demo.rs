//! Thin JSON-driven front end for the demo binary: turns a JSON schema
//! description and a JSON data document into a [`proto_forge::Protocol`]
//! and a field map, so the library's wire output can be exercised from the
//! command line without writing Rust. This is glue for the binary only —
//! it is not part of the library's public contract.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use proto_forge::{message, protocol, r#enum, Definition, FieldDef, FieldMap, MessageDef, Protocol, Scalar, TypeSpec, Value};

#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub messages: HashMap<String, MessageSpec>,
    #[serde(default)]
    pub enums: HashMap<String, EnumSpec>,
}

#[derive(Debug, Deserialize)]
pub struct MessageSpec {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// A scalar keyword, an enum/message name, or either prefixed with
    /// `"repeated "` — the same convention `schema::message` takes.
    #[serde(rename = "type")]
    pub type_spec: String,
    pub id: u32,
}

#[derive(Debug, Deserialize)]
pub struct EnumSpec {
    pub values: HashMap<String, i32>,
}

/// Schema definitions loaded from JSON live for the rest of the process, so
/// leaking their names to get the `'static` strings `schema::message` and
/// `schema::r#enum` take is a one-time, bounded cost.
fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

pub fn build_protocol(schema: SchemaFile) -> Result<Protocol> {
    let mut defs = Vec::new();

    for (name, spec) in schema.messages {
        let fields: Vec<(&'static str, &'static str, u32)> = spec
            .fields
            .into_iter()
            .map(|f| (leak(f.name), leak(f.type_spec), f.id))
            .collect();
        defs.push(Definition::from(message(name, fields)?));
    }
    for (name, spec) in schema.enums {
        let members: Vec<(&'static str, i32)> = spec
            .values
            .into_iter()
            .map(|(member, id)| (leak(member), id))
            .collect();
        defs.push(Definition::from(r#enum(name, members)?));
    }

    Ok(protocol(defs)?)
}

pub fn build_data(proto: &Protocol, message_name: &str, json: &Json) -> Result<FieldMap> {
    let def = proto
        .definition(message_name)
        .ok_or_else(|| anyhow!("no message or enum named \"{}\"", message_name))?;
    let message = match def {
        Definition::Message(m) => m,
        Definition::Enum(_) => return Err(anyhow!("\"{}\" is an enum, not a message", message_name)),
    };
    let obj = json.as_object().ok_or_else(|| anyhow!("data document must be a JSON object"))?;
    convert_message_body(proto, message, obj)
}

fn convert_message_body(proto: &Protocol, message: &MessageDef, obj: &Map<String, Json>) -> Result<FieldMap> {
    let mut out = Vec::with_capacity(obj.len());
    for (key, json) in obj {
        if key == "_unknown_fields" {
            let chunks = json
                .as_array()
                .ok_or_else(|| anyhow!("_unknown_fields must be an array of hex strings"))?
                .iter()
                .map(|v| {
                    let s = v.as_str().ok_or_else(|| anyhow!("_unknown_fields entries must be hex strings"))?;
                    decode_hex(s)
                })
                .collect::<Result<Vec<_>>>()?;
            out.push((key.clone(), Value::RawChunks(chunks)));
            continue;
        }

        let field = message
            .field_by_name
            .get(key)
            .ok_or_else(|| anyhow!("message \"{}\" has no field \"{}\"", message.name, key))?;
        out.push((key.clone(), convert_field(proto, field, json)?));
    }
    Ok(out)
}

fn convert_field(proto: &Protocol, field: &FieldDef, json: &Json) -> Result<Value> {
    if field.repeated {
        let items = json
            .as_array()
            .ok_or_else(|| anyhow!("field \"{}\" is repeated; expected a JSON array", field.name))?
            .iter()
            .map(|item| convert_single(proto, &field.type_spec, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::table(items))
    } else {
        convert_single(proto, &field.type_spec, json)
    }
}

fn convert_single(proto: &Protocol, type_spec: &TypeSpec, json: &Json) -> Result<Value> {
    match type_spec {
        TypeSpec::Scalar(scalar) => convert_scalar(*scalar, json),
        TypeSpec::Named(name) => match proto.definition(name) {
            Some(Definition::Enum(_)) => match json {
                Json::String(s) => Ok(Value::from(s.as_str())),
                Json::Number(n) => Ok(Value::Number(n.as_f64().unwrap())),
                _ => Err(anyhow!("enum \"{}\" expects a member name or a number", name)),
            },
            Some(Definition::Message(nested)) => {
                let obj = json
                    .as_object()
                    .ok_or_else(|| anyhow!("field of message type \"{}\" expects a JSON object", name))?;
                Ok(Value::Message(convert_message_body(proto, nested, obj)?))
            }
            None => Err(anyhow!("no message or enum named \"{}\"", name)),
        },
    }
}

fn convert_scalar(scalar: Scalar, json: &Json) -> Result<Value> {
    match scalar {
        Scalar::Bool => Ok(Value::Bool(json.as_bool().ok_or_else(|| anyhow!("expected a boolean"))?)),
        Scalar::String => Ok(Value::from(json.as_str().ok_or_else(|| anyhow!("expected a string"))?)),
        Scalar::Bytes => Ok(Value::Bytes(decode_hex(
            json.as_str().ok_or_else(|| anyhow!("expected a hex string"))?,
        )?)),
        Scalar::Int64 | Scalar::Sint64 | Scalar::Sfixed64 => {
            match json.as_i64().or_else(|| json.as_str().and_then(|s| s.parse().ok())) {
                Some(n) => Ok(Value::wide_i64(n)),
                None => Err(anyhow!("expected an integer")),
            }
        }
        Scalar::Uint64 | Scalar::Fixed64 => {
            match json.as_u64().or_else(|| json.as_str().and_then(|s| s.parse().ok())) {
                Some(n) => Ok(Value::wide_u64(n)),
                None => Err(anyhow!("expected an integer")),
            }
        }
        _ => Ok(Value::Number(json.as_f64().ok_or_else(|| anyhow!("expected a number"))?)),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string has odd length"));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> SchemaFile {
        serde_json::from_str(
            r#"{
                "enums": { "Color": { "values": { "Red": 0, "Green": 1, "Blue": 2 } } },
                "messages": {
                    "Pixel": { "fields": [
                        { "name": "x", "type": "int32", "id": 1 },
                        { "name": "shade", "type": "Color", "id": 2 }
                    ] }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_protocol_and_data_from_json() {
        let proto = build_protocol(sample_schema()).unwrap();
        let data_json: Json = serde_json::from_str(r#"{ "x": 3, "shade": "Green" }"#).unwrap();
        let data = build_data(&proto, "Pixel", &data_json).unwrap();
        let bytes = proto.encode("Pixel", &data).unwrap();
        assert_eq!(bytes, vec![0x08, 0x03, 0x10, 0x01]);
    }

    #[test]
    fn rejects_unknown_field_name() {
        let proto = build_protocol(sample_schema()).unwrap();
        let data_json: Json = serde_json::from_str(r#"{ "nope": 1 }"#).unwrap();
        assert!(build_data(&proto, "Pixel", &data_json).is_err());
    }

    #[test]
    fn decodes_hex_bytes_field() {
        assert_eq!(decode_hex("0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert!(decode_hex("abc").is_err());
    }
}
