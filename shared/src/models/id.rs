//! Customer identifier

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Prefix of ids minted on the client before the backend has confirmed a record
const TEMPORARY_PREFIX: &str = "tmp-";

/// Opaque customer identifier
///
/// Backends hand out either numeric ids or string ids (`_id` style).
/// Both are carried verbatim; the client never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Int(i64),
    Text(String),
}

impl CustomerId {
    /// Placeholder for a row that arrived without any identifier.
    ///
    /// `ordinal` is the 1-based position of the row in its batch, so the
    /// placeholder is only unique within that batch.
    pub fn placeholder(ordinal: usize) -> Self {
        Self::Int(ordinal as i64)
    }

    /// Fresh id for an optimistic record that the backend has not confirmed yet
    pub fn temporary() -> Self {
        Self::Text(format!("{}{}", TEMPORARY_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Text(s) if s.starts_with(TEMPORARY_PREFIX))
    }

    /// Read an id out of an untrusted JSON value.
    ///
    /// Integral numbers become `Int`, non-blank strings become `Text`.
    /// Everything else (null, blank strings, fractions, objects) yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(Self::Int(i));
                }
                // Past i64 range the digits are kept as text so ids stay distinct
                if n.as_u64().is_some() {
                    return Some(Self::Text(n.to_string()));
                }
                let f = n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)?;
                if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(Self::Int(f as i64))
                } else {
                    Some(Self::Text(n.to_string()))
                }
            }
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.trim().to_string())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for CustomerId {
    /// Hand-typed ids are kept verbatim, `"007"` stays `"007"`
    fn from(value: &str) -> Self {
        Self::Text(value.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert_eq!(CustomerId::from_value(&json!(7)), Some(CustomerId::Int(7)));
        assert_eq!(CustomerId::from_value(&json!(7.0)), Some(CustomerId::Int(7)));
        assert_eq!(
            CustomerId::from_value(&json!(" 65f0a1 ")),
            Some(CustomerId::Text("65f0a1".into()))
        );
        assert_eq!(CustomerId::from_value(&json!("")), None);
        assert_eq!(CustomerId::from_value(&json!(null)), None);
        assert_eq!(CustomerId::from_value(&json!(1.5)), None);
    }

    #[test]
    fn test_temporary() {
        let id = CustomerId::temporary();
        assert!(id.is_temporary());
        assert!(!CustomerId::Int(3).is_temporary());
        assert!(!CustomerId::Text("abc".into()).is_temporary());
        assert_ne!(CustomerId::temporary(), CustomerId::temporary());
    }

    #[test]
    fn test_serde_untagged() {
        let ids: Vec<CustomerId> = serde_json::from_str(r#"[1, "a1"]"#).unwrap();
        assert_eq!(ids, vec![CustomerId::Int(1), CustomerId::Text("a1".into())]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"a1"]"#);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(CustomerId::from("42"), CustomerId::Text("42".into()));
        assert_eq!(CustomerId::from(" x-9 "), CustomerId::Text("x-9".into()));
        assert_eq!(CustomerId::from("007").to_string(), "007");
        assert_eq!(CustomerId::from("42").to_string(), CustomerId::Int(42).to_string());
    }

    #[test]
    fn test_from_value_beyond_i64() {
        let big = CustomerId::from_value(&json!(u64::MAX)).unwrap();
        let next = CustomerId::from_value(&json!(u64::MAX - 1)).unwrap();
        assert_eq!(big, CustomerId::Text(u64::MAX.to_string()));
        assert_ne!(big, next);
        assert_ne!(big, CustomerId::Int(i64::MAX));
        assert_eq!(
            CustomerId::from_value(&json!(i64::MAX)),
            Some(CustomerId::Int(i64::MAX))
        );
    }
}
