//! Shape checks for template input records.
//!
//! [`Record`] wraps a JSON object together with its dotted path so every
//! rejection names the exact field, including positions inside lists
//! (`providers[3].name`).

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A JSON object being checked against a field contract.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a, 'p> {
    map: &'a Map<String, Value>,
    path: &'p str,
}

/// Owned path prefix for nested records.
#[derive(Debug, Clone)]
pub struct Scoped<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Scoped<'a> {
    /// Dotted path of this record, e.g. `providers[3]`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn record(&self) -> Record<'a, '_> {
        Record {
            map: self.map,
            path: &self.path,
        }
    }
}

/// An entry of a list that accepts both bare strings and records.
#[derive(Debug, Clone)]
pub enum Item<'a> {
    Text(&'a str),
    Record(Scoped<'a>),
}

/// Checks that the top-level input is an object.
pub fn root(input: &Value) -> Result<Record<'_, 'static>, ValidationError> {
    match input {
        Value::Object(map) => Ok(Record { map, path: "" }),
        Value::Null => Err(ValidationError::missing("input")),
        _ => Err(ValidationError::wrong_type("input", "an object")),
    }
}

impl<'a> Record<'a, '_> {
    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    /// A required, non-blank string.
    pub fn str(&self, key: &str) -> Result<&'a str, ValidationError> {
        match self.present(key) {
            None => Err(ValidationError::missing(self.field_path(key))),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(ValidationError::empty(self.field_path(key)))
            }
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(ValidationError::wrong_type(self.field_path(key), "a string")),
        }
    }

    /// An optional string; blank strings read as absent.
    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ValidationError::wrong_type(self.field_path(key), "a string")),
        }
    }

    /// A required finite number.
    pub fn number(&self, key: &str) -> Result<f64, ValidationError> {
        match self.opt_number(key)? {
            Some(n) => Ok(n),
            None => Err(ValidationError::missing(self.field_path(key))),
        }
    }

    pub fn opt_number(&self, key: &str) -> Result<Option<f64>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if f.is_finite() => Ok(Some(f)),
                _ => Err(ValidationError::out_of_range(self.field_path(key))),
            },
            Some(_) => Err(ValidationError::wrong_type(self.field_path(key), "a number")),
        }
    }

    /// A required number that must not be negative.
    pub fn non_negative(&self, key: &str) -> Result<f64, ValidationError> {
        let n = self.number(key)?;
        if n < 0.0 {
            return Err(ValidationError::out_of_range(self.field_path(key)));
        }
        Ok(n)
    }

    /// A required nested object.
    pub fn record(&self, key: &str) -> Result<Scoped<'a>, ValidationError> {
        match self.present(key) {
            None => Err(ValidationError::missing(self.field_path(key))),
            Some(Value::Object(map)) => Ok(Scoped {
                map,
                path: self.field_path(key),
            }),
            Some(_) => Err(ValidationError::wrong_type(self.field_path(key), "an object")),
        }
    }

    /// A required list. Empty lists are allowed unless `non_empty` is set.
    pub fn list(&self, key: &str, non_empty: bool) -> Result<&'a [Value], ValidationError> {
        match self.present(key) {
            None => Err(ValidationError::missing(self.field_path(key))),
            Some(Value::Array(items)) if non_empty && items.is_empty() => {
                Err(ValidationError::empty(self.field_path(key)))
            }
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(ValidationError::wrong_type(self.field_path(key), "a list")),
        }
    }

    /// An optional list; absent reads as empty.
    pub fn opt_list(&self, key: &str) -> Result<&'a [Value], ValidationError> {
        match self.present(key) {
            None => Ok(&[]),
            Some(_) => self.list(key, false),
        }
    }

    /// Checks each list entry is an object and returns them with indexed paths.
    pub fn records(&self, key: &str, items: &'a [Value]) -> Result<Vec<Scoped<'a>>, ValidationError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{}]", self.field_path(key), i);
                match item {
                    Value::Object(map) => Ok(Scoped { map, path }),
                    _ => Err(ValidationError::wrong_type(path, "an object")),
                }
            })
            .collect()
    }

    /// Checks each list entry is a non-blank string or an object.
    pub fn items(&self, key: &str, items: &'a [Value]) -> Result<Vec<Item<'a>>, ValidationError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{}]", self.field_path(key), i);
                match item {
                    Value::String(s) if s.trim().is_empty() => Err(ValidationError::empty(path)),
                    Value::String(s) => Ok(Item::Text(s.as_str())),
                    Value::Object(map) => Ok(Item::Record(Scoped { map, path })),
                    _ => Err(ValidationError::wrong_type(path, "a string or an object")),
                }
            })
            .collect()
    }

    /// Checks each list entry is a non-blank string.
    pub fn strings(&self, key: &str, items: &'a [Value]) -> Result<Vec<&'a str>, ValidationError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{}]", self.field_path(key), i);
                match item {
                    Value::String(s) if s.trim().is_empty() => Err(ValidationError::empty(path)),
                    Value::String(s) => Ok(s.as_str()),
                    _ => Err(ValidationError::wrong_type(path, "a string")),
                }
            })
            .collect()
    }
}
