use std::fmt;
use serde::{Deserialize, Serialize};


/// Runtime data bound to a variable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    Sequence(Vec<Value>),
}

impl Value {
    /// Truthiness used by every conditional.
    ///
    /// Text is falsy only when it is exactly `"false"` or `"0"`; the empty
    /// string is truthy. A sequence is truthy when it has elements.
    pub fn coerce_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Text(text) => !matches!(text.as_str(), "false" | "0"),
            Value::Sequence(items) => !items.is_empty()
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Text(text) => out.push_str(text),
            Value::Sequence(items) => {
                for item in items {
                    item.write_to(out);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_to(&mut text);
        f.write_str(&text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().map(Into::into).collect())
    }
}
