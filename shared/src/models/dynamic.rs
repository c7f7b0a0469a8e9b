//! Dynamic (schema-less) customer fields

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered column-name → value mapping
///
/// Keeps first-insertion order so exported column order matches the
/// uploaded file. Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicFields {
    entries: Vec<(String, String)>,
}

impl DynamicFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite a value. Overwrites keep the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DynamicFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl Serialize for DynamicFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DynamicFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = DynamicFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of column values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = DynamicFields::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    let value = match value {
                        serde_json::Value::Null => String::new(),
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    fields.insert(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut fields = DynamicFields::new();
        fields.insert("zip", "10001");
        fields.insert("city", "NYC");
        fields.insert("zip", "10002");
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["zip", "city"]);
        assert_eq!(fields.get("zip"), Some("10002"));
    }

    #[test]
    fn test_deserialize_stringifies_values() {
        let fields: DynamicFields =
            serde_json::from_str(r#"{"b": 2, "a": "x", "c": null, "d": true}"#).unwrap();
        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "x"), ("c", ""), ("d", "true")]);
    }

    #[test]
    fn test_serialize_order() {
        let fields: DynamicFields = [("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"b":"1","a":"2"}"#);
    }
}
