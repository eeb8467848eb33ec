//! Schema model: value constructors for messages and enums, and the
//! `protocol` aggregator that resolves cross-references, rejects
//! duplicates/recursion/undeclared names, and produces the read-only
//! lookup table the encoder walks.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::rc::Rc;

use crate::error::SchemaError;
use crate::scalar::Scalar;

/// Legal field-id range, minus the reserved implementation range.
pub const FIELD_ID_MIN: u32 = 1;
pub const FIELD_ID_MAX: u32 = (1 << 29) - 1;
pub const RESERVED_RANGE: RangeInclusive<u32> = 19000..=19999;

fn field_id_in_range(id: u32) -> bool {
    (FIELD_ID_MIN..=FIELD_ID_MAX).contains(&id) && !RESERVED_RANGE.contains(&id)
}

/// A field's declared type: either a scalar kind, or a name resolved
/// against the enclosing [`Protocol`] at encode time (an enum or a
/// message — forward references are permitted).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Scalar(Scalar),
    Named(String),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub id: u32,
    pub repeated: bool,
    pub type_spec: TypeSpec,
}

#[derive(Debug, Clone)]
pub struct MessageDef {
    pub name: String,
    /// Insertion order, kept so schema-validation errors are deterministic.
    pub fields: Vec<Rc<FieldDef>>,
    pub field_by_name: HashMap<String, Rc<FieldDef>>,
    pub field_by_id: HashMap<u32, Rc<FieldDef>>,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub id_by_value: HashMap<String, i32>,
    pub value_by_id: HashMap<i32, String>,
}

#[derive(Debug, Clone)]
pub enum Definition {
    Message(MessageDef),
    Enum(EnumDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Message(m) => &m.name,
            Definition::Enum(e) => &e.name,
        }
    }
}

impl From<MessageDef> for Definition {
    fn from(m: MessageDef) -> Self {
        Definition::Message(m)
    }
}

impl From<EnumDef> for Definition {
    fn from(e: EnumDef) -> Self {
        Definition::Enum(e)
    }
}

/// Splits an optional leading `repeated ` token off a raw type spec string.
fn parse_type_spec(raw: &str) -> (bool, String) {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("repeated ") {
        Some(rest) => (true, rest.trim().to_string()),
        None => (false, trimmed.to_string()),
    }
}

/// Builds a message definition. `fields` is `(field_name, type_spec, id)`
/// triples, where `type_spec` is a scalar kind name, an enum/message name,
/// or either of those prefixed with `"repeated "`.
pub fn message(
    name: impl Into<String>,
    fields: impl IntoIterator<Item = (&'static str, &'static str, u32)>,
) -> Result<MessageDef, SchemaError> {
    let name = name.into();
    let mut ordered = Vec::new();
    let mut field_by_name = HashMap::new();
    let mut field_by_id = HashMap::new();

    for (field_name, raw_type, id) in fields {
        if !field_id_in_range(id) {
            return Err(SchemaError::FieldIdOutOfRange {
                message: name.clone(),
                id,
            });
        }
        if field_by_id.contains_key(&id) {
            return Err(SchemaError::DuplicateFieldId {
                message: name.clone(),
                id,
            });
        }

        let (repeated, type_name) = parse_type_spec(raw_type);
        if type_name == name {
            return Err(SchemaError::SelfRecursion(name));
        }

        let type_spec = match Scalar::from_name(&type_name) {
            Some(scalar) => TypeSpec::Scalar(scalar),
            None => TypeSpec::Named(type_name),
        };

        let field = Rc::new(FieldDef {
            name: field_name.to_string(),
            id,
            repeated,
            type_spec,
        });
        ordered.push(field.clone());
        field_by_name.insert(field_name.to_string(), field.clone());
        field_by_id.insert(id, field);
    }

    Ok(MessageDef {
        name,
        fields: ordered,
        field_by_name,
        field_by_id,
    })
}

/// Builds an enum definition. `members` is `(symbolic_name, id)` pairs; one
/// member must have `id == 0` (the proto3 default).
pub fn r#enum(
    name: impl Into<String>,
    members: impl IntoIterator<Item = (&'static str, i32)>,
) -> Result<EnumDef, SchemaError> {
    let name = name.into();
    let mut id_by_value = HashMap::new();
    let mut value_by_id = HashMap::new();

    for (member, id) in members {
        if value_by_id.contains_key(&id) {
            return Err(SchemaError::DuplicateEnumId {
                enum_name: name.clone(),
                id,
            });
        }
        id_by_value.insert(member.to_string(), id);
        value_by_id.insert(id, member.to_string());
    }

    if !value_by_id.contains_key(&0) {
        return Err(SchemaError::EnumMissingZero(name));
    }

    Ok(EnumDef {
        name,
        id_by_value,
        value_by_id,
    })
}

/// A validated, read-only schema handle. The sole operation it exposes to
/// callers is [`Protocol::encode`] (see `crate::encode`).
pub struct Protocol {
    pub(crate) definitions: HashMap<String, Definition>,
}

impl Protocol {
    /// Looks up a message or enum definition by name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }
}

/// Builds a [`Protocol`] from a list of message/enum definitions. Names
/// must be globally unique; every type a field references must either be a
/// scalar kind or be defined somewhere in `defs` — declaration order does
/// not matter, so forward references are fine.
pub fn protocol(defs: Vec<Definition>) -> Result<Protocol, SchemaError> {
    let mut definitions: HashMap<String, Definition> = HashMap::with_capacity(defs.len());
    for def in &defs {
        let name = def.name().to_string();
        if definitions.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        definitions.insert(name, def.clone());
    }

    for def in &defs {
        if let Definition::Message(message) = def {
            for field in &message.fields {
                if let TypeSpec::Named(type_name) = &field.type_spec {
                    if !definitions.contains_key(type_name) {
                        return Err(SchemaError::UndeclaredType {
                            message: message.name.clone(),
                            field: field.name.clone(),
                            name: type_name.clone(),
                        });
                    }
                }
            }
        }
    }

    Ok(Protocol { definitions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_rejects_self_recursion() {
        let err = message("Node", [("next", "Node", 1)]).unwrap_err();
        assert_eq!(err, SchemaError::SelfRecursion("Node".to_string()));
    }

    #[test]
    fn message_rejects_duplicate_field_id() {
        let err = message("Test", [("a", "int32", 1), ("b", "int32", 1)]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateFieldId {
                message: "Test".to_string(),
                id: 1
            }
        );
    }

    #[test]
    fn message_rejects_reserved_id_range() {
        let err = message("Test", [("a", "int32", 19000)]).unwrap_err();
        assert!(matches!(err, SchemaError::FieldIdOutOfRange { .. }));
    }

    #[test]
    fn message_parses_repeated_prefix() {
        let m = message("Test", [("vals", "repeated int32", 1)]).unwrap();
        let field = &m.field_by_name["vals"];
        assert!(field.repeated);
        assert_eq!(field.type_spec, TypeSpec::Scalar(Scalar::Int32));
    }

    #[test]
    fn enum_requires_zero_member() {
        let err = r#enum("Color", [("Red", 1), ("Blue", 2)]).unwrap_err();
        assert_eq!(err, SchemaError::EnumMissingZero("Color".to_string()));
    }

    #[test]
    fn enum_rejects_duplicate_id() {
        let err = r#enum("Color", [("Red", 0), ("AlsoRed", 0)]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateEnumId {
                enum_name: "Color".to_string(),
                id: 0
            }
        );
    }

    #[test]
    fn protocol_allows_forward_references() {
        let outer = message("Outer", [("inner", "Inner", 1)]).unwrap();
        let inner = message("Inner", [("val", "int32", 1)]).unwrap();
        // `Outer` is listed (and references `Inner`) before `Inner` is defined.
        let proto = protocol(vec![outer.into(), inner.into()]);
        assert!(proto.is_ok());
    }

    #[test]
    fn protocol_rejects_duplicate_names() {
        let a = message("Test", [("val", "int32", 1)]).unwrap();
        let b = message("Test", [("other", "int32", 1)]).unwrap();
        let err = protocol(vec![a.into(), b.into()]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateName("Test".to_string()));
    }

    #[test]
    fn protocol_rejects_undeclared_type() {
        let outer = message("Outer", [("inner", "Missing", 1)]).unwrap();
        let err = protocol(vec![outer.into()]).unwrap_err();
        assert!(matches!(err, SchemaError::UndeclaredType { .. }));
    }
}
