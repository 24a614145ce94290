//! Declared value shapes and the validation walk over JSON values

use serde_json::Value;
use thiserror::Error;

/// The first mismatch found while validating a value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Dotted location of the offending value, e.g. `args.colorScheme.primary`
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// A named field of an object shape
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub validator: Validator,
    pub optional: bool,
}

/// A declared value shape
#[derive(Debug, Clone)]
pub enum Validator {
    String,
    /// Any JSON number
    Number,
    /// A number with no fractional part
    Integer,
    Boolean,
    /// A document identifier belonging to the named table
    Id(&'static str),
    /// One of a fixed set of string literals
    Enum(&'static [&'static str]),
    Array(Box<Validator>),
    Object(Vec<FieldDef>),
    Any,
}

impl Validator {
    pub fn array(item: Validator) -> Self {
        Validator::Array(Box::new(item))
    }

    pub fn object(fields: Vec<FieldDef>) -> Self {
        Validator::Object(fields)
    }

    /// Validate `value`, reporting mismatches relative to `path`
    pub fn validate(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        match self {
            Validator::Any => Ok(()),
            Validator::String | Validator::Id(_) => match value {
                Value::String(_) => Ok(()),
                other => Err(mismatch(path, self, other)),
            },
            Validator::Number => match value {
                Value::Number(_) => Ok(()),
                other => Err(mismatch(path, self, other)),
            },
            Validator::Integer => match value {
                // Stored as i64: floats and out-of-range u64 are rejected
                Value::Number(n) if n.is_i64() => Ok(()),
                other => Err(mismatch(path, self, other)),
            },
            Validator::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(mismatch(path, self, other)),
            },
            Validator::Enum(allowed) => match value {
                Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
                other => Err(mismatch(path, self, other)),
            },
            Validator::Array(item) => match value {
                Value::Array(items) => {
                    for (i, item_value) in items.iter().enumerate() {
                        item.validate(item_value, &format!("{}[{}]", path, i))?;
                    }
                    Ok(())
                }
                other => Err(mismatch(path, self, other)),
            },
            Validator::Object(fields) => match value {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !fields.iter().any(|f| f.name == key) {
                            return Err(ValidationError::new(
                                &format!("{}.{}", path, key),
                                "unexpected field",
                            ));
                        }
                    }
                    for field in fields {
                        let field_path = format!("{}.{}", path, field.name);
                        match map.get(field.name) {
                            Some(v) => field.validator.validate(v, &field_path)?,
                            None if field.optional => {}
                            None => {
                                return Err(ValidationError::new(
                                    &field_path,
                                    "missing required field",
                                ))
                            }
                        }
                    }
                    Ok(())
                }
                other => Err(mismatch(path, self, other)),
            },
        }
    }

    /// Human readable name of the shape, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Validator::String => "string".to_string(),
            Validator::Number => "number".to_string(),
            Validator::Integer => "integer".to_string(),
            Validator::Boolean => "boolean".to_string(),
            Validator::Id(table) => format!("id of table \"{}\"", table),
            Validator::Enum(allowed) => format!("one of {}", allowed.join("|")),
            Validator::Array(item) => format!("array of {}", item.describe()),
            Validator::Object(_) => "object".to_string(),
            Validator::Any => "any".to_string(),
        }
    }

    /// The same object shape with every field optional; used for patches
    pub fn partial(&self) -> Self {
        match self {
            Validator::Object(fields) => Validator::Object(
                fields
                    .iter()
                    .map(|f| FieldDef {
                        optional: true,
                        ..f.clone()
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn mismatch(path: &str, expected: &Validator, found: &Value) -> ValidationError {
    ValidationError::new(
        path,
        format!("expected {}, got {}", expected.describe(), found),
    )
}

/// Required field
pub fn field(name: &'static str, validator: Validator) -> FieldDef {
    FieldDef {
        name,
        validator,
        optional: false,
    }
}

/// Optional field
pub fn optional(name: &'static str, validator: Validator) -> FieldDef {
    FieldDef {
        name,
        validator,
        optional: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn color_scheme() -> Validator {
        Validator::object(vec![
            field("primary", Validator::String),
            field("secondary", Validator::String),
            field("accent", Validator::String),
        ])
    }

    #[test]
    fn test_accepts_matching_object() {
        let v = Validator::object(vec![
            field("title", Validator::String),
            field("order", Validator::Integer),
            optional("insights", Validator::array(Validator::String)),
            field("colorScheme", color_scheme()),
        ]);
        let value = json!({
            "title": "Arc",
            "order": 2,
            "colorScheme": {"primary": "#f0f", "secondary": "#0ff", "accent": "#ff0"}
        });
        assert!(v.validate(&value, "args").is_ok());
    }

    #[test]
    fn test_reports_nested_path() {
        let v = Validator::object(vec![field("colorScheme", color_scheme())]);
        let value = json!({"colorScheme": {"primary": 1, "secondary": "a", "accent": "b"}});
        let err = v.validate(&value, "args").unwrap_err();
        assert_eq!(err.path, "args.colorScheme.primary");
        assert!(err.message.contains("expected string"));
    }

    #[test]
    fn test_missing_and_unexpected_fields() {
        let v = Validator::object(vec![field("title", Validator::String)]);

        let err = v.validate(&json!({}), "args").unwrap_err();
        assert_eq!(err.path, "args.title");
        assert_eq!(err.message, "missing required field");

        let err = v
            .validate(&json!({"title": "x", "extra": true}), "args")
            .unwrap_err();
        assert_eq!(err.path, "args.extra");
    }

    #[test]
    fn test_enum_membership() {
        let v = Validator::Enum(&["checkerboard", "stripes", "dots", "grid"]);
        assert!(v.validate(&json!("dots"), "args.pattern").is_ok());
        let err = v.validate(&json!("zigzag"), "args.pattern").unwrap_err();
        assert!(err.message.contains("checkerboard|stripes|dots|grid"));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        assert!(Validator::Integer.validate(&json!(3), "x").is_ok());
        assert!(Validator::Integer.validate(&json!(-7), "x").is_ok());
        assert!(Validator::Integer.validate(&json!(3.0), "x").is_err());
        assert!(Validator::Integer.validate(&json!(1e20), "x").is_err());
        assert!(Validator::Integer.validate(&json!(u64::MAX), "x").is_err());
        assert!(Validator::Integer.validate(&json!(3.5), "x").is_err());
        assert!(Validator::Integer.validate(&json!("3"), "x").is_err());
    }

    #[test]
    fn test_array_item_path() {
        let v = Validator::array(Validator::String);
        let err = v.validate(&json!(["a", 2]), "args.tags").unwrap_err();
        assert_eq!(err.path, "args.tags[1]");
    }

    #[test]
    fn test_partial_makes_fields_optional() {
        let v = Validator::object(vec![field("title", Validator::String)]).partial();
        assert!(v.validate(&json!({}), "doc").is_ok());
        assert!(v.validate(&json!({"title": 5}), "doc").is_err());
    }
}
