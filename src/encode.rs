//! The recursive message encoder: given a [`crate::schema::Protocol`], a
//! top-level message name, and a data tree, produces the proto3 wire
//! bytes for that message with no outer tag or length prefix.

use crate::error::EncodeError;
use crate::schema::{Definition, EnumDef, FieldDef, MessageDef, Protocol, TypeSpec};
use crate::scalar;
use crate::value::{FieldMap, Value, WideInt};
use crate::wire;

const UNKNOWN_FIELDS_KEY: &str = "_unknown_fields";
const MAX_NESTED_LEN: u64 = 1u64 << 32;

impl Protocol {
    /// Encodes `data` against the top-level message `message_name`. Fails
    /// if no such definition exists, or if it names an enum rather than a
    /// message.
    pub fn encode(&self, message_name: &str, data: &FieldMap) -> Result<Vec<u8>, EncodeError> {
        log::trace!("encoding top-level message \"{}\"", message_name);
        let def = self
            .definitions
            .get(message_name)
            .ok_or_else(|| EncodeError::NoSuchDefinition(message_name.to_string()))?;
        let message = match def {
            Definition::Message(m) => m,
            Definition::Enum(_) => return Err(EncodeError::TopLevelEnum(message_name.to_string())),
        };
        self.encode_message_body(message, data)
    }

    fn encode_message_body(&self, message: &MessageDef, data: &FieldMap) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        for (key, value) in data {
            if key == UNKNOWN_FIELDS_KEY {
                match value {
                    Value::RawChunks(chunks) => {
                        for chunk in chunks {
                            out.extend_from_slice(chunk);
                        }
                    }
                    other => {
                        return Err(EncodeError::TypeMismatch {
                            field: UNKNOWN_FIELDS_KEY.to_string(),
                            kind: "_unknown_fields".to_string(),
                            got: other.type_name().to_string(),
                        })
                    }
                }
                continue;
            }

            let field = message.field_by_name.get(key).ok_or_else(|| EncodeError::WrongFieldName {
                message: message.name.clone(),
                field: key.clone(),
            })?;
            out.extend(self.encode_field(field, value)?);
        }
        Ok(out)
    }

    fn encode_field(&self, field: &FieldDef, value: &Value) -> Result<Vec<u8>, EncodeError> {
        if field.repeated {
            self.encode_repeated(field, value)
        } else {
            self.encode_single(field, value)
        }
    }

    fn encode_single(&self, field: &FieldDef, value: &Value) -> Result<Vec<u8>, EncodeError> {
        match &field.type_spec {
            TypeSpec::Scalar(scalar) => scalar.encode(field.id, &field.name, value),
            TypeSpec::Named(name) => match self.definitions.get(name) {
                Some(Definition::Enum(enum_def)) => self.encode_enum_value(enum_def, field, value),
                Some(Definition::Message(nested)) => self.encode_message_value(nested, field, value),
                None => unreachable!("protocol() guarantees every named type is declared"),
            },
        }
    }

    fn encode_enum_value(&self, enum_def: &EnumDef, field: &FieldDef, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let numeric = match value {
            Value::Number(_) | Value::Wide(_) => scalar::require_int32(&field.name, value)?,
            Value::Text(name) => *enum_def.id_by_value.get(name).ok_or_else(|| EncodeError::UnknownEnumMember {
                enum_name: enum_def.name.clone(),
                value: name.clone(),
            })?,
            other => {
                return Err(EncodeError::TypeMismatch {
                    field: field.name.clone(),
                    kind: enum_def.name.clone(),
                    got: other.type_name().to_string(),
                })
            }
        };
        Ok(wire::encode_tagged_varint(field.id, numeric as i64 as u64))
    }

    fn encode_message_value(&self, nested: &MessageDef, field: &FieldDef, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let data = match value {
            Value::Message(fields) => fields,
            other => {
                return Err(EncodeError::TypeMismatch {
                    field: field.name.clone(),
                    kind: nested.name.clone(),
                    got: other.type_name().to_string(),
                })
            }
        };
        let body = self.encode_message_body(nested, data)?;
        if body.len() as u64 > MAX_NESTED_LEN {
            return Err(EncodeError::NestedMessageTooLong(field.name.clone()));
        }
        let mut out = wire::encode_tag(field.id, wire::WIRE_LEN);
        out.extend(wire::encode_len(&body));
        Ok(out)
    }

    fn encode_repeated(&self, field: &FieldDef, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let table = match value {
            Value::Table(pairs) => pairs,
            _ => return Err(EncodeError::RepeatedNeedsTable),
        };
        let elements = dense_indices(&field.name, table)?;
        if elements.is_empty() {
            return Ok(Vec::new());
        }

        match &field.type_spec {
            TypeSpec::Scalar(scalar) if scalar.is_packed() => {
                let mut payload = Vec::new();
                for element in &elements {
                    payload.extend(scalar.encode_value(&field.name, element)?);
                }
                let mut out = wire::encode_tag(field.id, wire::WIRE_LEN);
                out.extend(wire::encode_len(&payload));
                Ok(out)
            }
            TypeSpec::Scalar(scalar) => {
                let mut out = Vec::new();
                for element in &elements {
                    out.extend(scalar.encode(field.id, &field.name, element)?);
                }
                Ok(out)
            }
            TypeSpec::Named(name) => match self.definitions.get(name) {
                Some(Definition::Enum(enum_def)) => {
                    let mut out = Vec::new();
                    for element in &elements {
                        out.extend(self.encode_enum_value(enum_def, field, element)?);
                    }
                    Ok(out)
                }
                Some(Definition::Message(nested)) => {
                    let mut out = Vec::new();
                    for element in &elements {
                        out.extend(self.encode_message_value(nested, field, element)?);
                    }
                    Ok(out)
                }
                None => unreachable!("protocol() guarantees every named type is declared"),
            },
        }
    }
}

/// Validates that `table` forms a dense 1-based array (every key numeric
/// and integral, minimum 1, no holes) and returns its elements ordered by
/// index.
fn dense_indices<'v>(field: &str, table: &'v [(Value, Value)]) -> Result<Vec<&'v Value>, EncodeError> {
    let mut indexed = Vec::with_capacity(table.len());
    for (key, element) in table {
        let n = match key {
            Value::Number(n) => *n,
            Value::Wide(WideInt::Signed(i)) => *i as f64,
            Value::Wide(WideInt::Unsigned(u)) => *u as f64,
            _ => return Err(EncodeError::NonNumericKey(field.to_string())),
        };
        if n.ceil() != n {
            return Err(EncodeError::NonIntegerKey(field.to_string()));
        }
        indexed.push((n as i64, element));
    }

    if indexed.is_empty() {
        return Ok(Vec::new());
    }

    indexed.sort_by_key(|(k, _)| *k);
    if indexed[0].0 != 1 {
        return Err(EncodeError::MinIndexNotOne(field.to_string()));
    }
    for (i, (k, _)) in indexed.iter().enumerate() {
        if *k != i as i64 + 1 {
            return Err(EncodeError::InconsistentKeys(field.to_string()));
        }
    }

    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}
