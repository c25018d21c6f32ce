//! Header keys a record does not model

use daybook_frontmatter::Value;
use serde::Serialize;
use std::collections::HashMap;

/// Values for unrecognized keys, plus the order every key (known or not)
/// was first seen in. The order is only used to reproduce output layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnknownFields {
    values: HashMap<String, Value>,
    order: Vec<String>,
}

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Store a value. New keys go to the end of the order.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.note_key(&key);
        self.values.insert(key, value);
    }

    /// Drop a value. Its slot in the order is kept, so re-inserting the key
    /// puts it back where it was.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Remember that a key was seen without storing a value for it
    pub fn note_key(&mut self, key: &str) {
        if !self.order.iter().any(|k| k == key) {
            self.order.push(key.to_string());
        }
    }

    /// Every key in first-seen order, known keys included
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Stored values in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_order() {
        let mut fields = UnknownFields::new();
        fields.note_key("tags");
        fields.insert("mood_color", Value::from("blue"));
        fields.insert("tags_extra", Value::Int(1));
        fields.insert("mood_color", Value::from("red"));

        assert_eq!(fields.order(), &["tags", "mood_color", "tags_extra"]);
        assert_eq!(fields.get("mood_color"), Some(&Value::from("red")));
        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["mood_color", "tags_extra"]
        );
    }

    #[test]
    fn test_remove_keeps_slot() {
        let mut fields = UnknownFields::new();
        fields.insert("a", Value::Int(1));
        fields.insert("b", Value::Int(2));
        fields.remove("a");
        assert!(!fields.contains("a"));
        fields.insert("a", Value::Int(3));
        assert_eq!(fields.order(), &["a", "b"]);
    }
}
