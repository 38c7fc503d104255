use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single cell, numeric-coerced at parse time
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Coerce a trimmed, unquoted field.
    ///
    /// Anything that reads fully as a decimal number (sign, fraction and
    /// exponent allowed) becomes a number. The empty string stays text.
    pub fn coerce(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Text(String::new());
        }

        let (negative, unsigned) = match raw.as_bytes()[0] {
            b'-' => (true, &raw[1..]),
            b'+' => (false, &raw[1..]),
            _ => (false, raw),
        };

        if unsigned == "Infinity" {
            return Value::Number(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
        }

        // f64::from_str also takes "inf"/"nan" spellings; those stay text
        if unsigned
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
        {
            return Value::Text(raw.to_string());
        }

        match raw.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Numeric view of the cell; text (including empty) is absent
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Format a number the way it reads in a report: `45`, `1.5`, `Infinity`
pub fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if n == 0.0 {
        // drop the sign of negative zero
        return "0".to_string();
    }
    format!("{}", n)
}

/// One patient record: column name -> value, in header order.
///
/// Names are unique within a row. Inserting an existing name overwrites
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Numeric value of a column, if present and numeric
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every stored value is the empty string
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The loaded table: rows, header columns and source file name
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Dataset {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
    pub filename: String,
}

impl Dataset {
    pub fn new(rows: Vec<Row>, columns: Vec<String>, filename: impl Into<String>) -> Self {
        Self {
            rows,
            columns,
            filename: filename.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
