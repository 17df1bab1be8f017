use crate::{Value, ValueError};
pub use serde_json::Value as JsonValue;


impl TryFrom<&JsonValue> for Value {
    type Error = ValueError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            JsonValue::Number(n) => Ok(Value::Text(n.to_string())),
            JsonValue::Null => Ok(Value::Text(String::new())),
            JsonValue::Array(seq) =>
                seq.iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Sequence),
            JsonValue::Object(_) => Err(ValueError::Unsupported("object"))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(Value::try_from(&json!(true)), Ok(Value::Bool(true)));
        assert_eq!(Value::try_from(&json!("hi")), Ok(Value::from("hi")));
        assert_eq!(Value::try_from(&json!(42)), Ok(Value::from("42")));
        assert_eq!(Value::try_from(&json!(null)), Ok(Value::from("")));
    }

    #[test]
    fn nested_arrays() {
        assert_eq!(
            Value::try_from(&json!([1, [true, "x"]])),
            Ok(Value::from(vec![
                Value::from("1"),
                Value::from(vec![Value::from(true), Value::from("x")]),
            ]))
        );
    }

    #[test]
    fn objects_are_rejected() {
        assert_eq!(
            Value::try_from(&json!([{"a": 1}])),
            Err(ValueError::Unsupported("object"))
        );
    }
}
