use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ErrorMessage, ServiceError};

/// A field-level validation failure.
///
/// Serializes as a single-entry object mapping the field name to its
/// human-readable message, e.g. `{ "firstName": "must not be empty" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Serialize for FieldViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.message)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldViolation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = FieldViolation;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-entry map of field name to message")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (field, message): (String, String) = map
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::custom("expected one field entry"))?;
                Ok(FieldViolation { field, message })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// Explicit, per-entity validation.
///
/// Implementations check each field in declaration order and return one
/// violation per offending field; an empty list means the value is valid.
pub trait Validate {
    fn validate(&self) -> Vec<FieldViolation>;
}

/// Run validation, converting a non-empty violation list into a
/// [`ServiceError::Validation`] carrying the shared `ErrorMessage` payload.
pub fn ensure_valid<T: Validate>(value: &T) -> Result<(), ServiceError> {
    let violations = value.validate();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(ErrorMessage::validation(
            violations,
        )))
    }
}

// ── Field check helpers ────────────────────────────────────────────────

/// Non-empty (after trimming) text field.
pub fn require_text(field: &str, value: &str) -> Option<FieldViolation> {
    if value.trim().is_empty() {
        Some(FieldViolation::new(field, "must not be empty"))
    } else {
        None
    }
}

/// Reference field that must carry a positive record id.
pub fn require_id(field: &str, value: u64) -> Option<FieldViolation> {
    if value == 0 {
        Some(FieldViolation::new(field, "must reference a record id"))
    } else {
        None
    }
}

/// Quantity field that must be at least one.
pub fn require_positive(field: &str, value: u32) -> Option<FieldViolation> {
    if value == 0 {
        Some(FieldViolation::new(field, "must be a positive quantity"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        name: String,
        owner_id: u64,
    }

    impl Validate for Probe {
        fn validate(&self) -> Vec<FieldViolation> {
            [
                require_text("name", &self.name),
                require_id("ownerId", self.owner_id),
            ]
            .into_iter()
            .flatten()
            .collect()
        }
    }

    #[test]
    fn violations_preserve_check_order() {
        let probe = Probe {
            name: "  ".into(),
            owner_id: 0,
        };
        let violations = probe.validate();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[1].field, "ownerId");
    }

    #[test]
    fn valid_value_passes_ensure_valid() {
        let probe = Probe {
            name: "ok".into(),
            owner_id: 3,
        };
        assert!(ensure_valid(&probe).is_ok());
    }

    #[test]
    fn field_violation_serializes_as_map_entry() {
        let violation = FieldViolation::new("email", "must not be empty");
        let json = serde_json::to_string(&violation).unwrap();
        assert_eq!(json, r#"{"email":"must not be empty"}"#);
        let back: FieldViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, violation);
    }
}
