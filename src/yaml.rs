use crate::{Value, ValueError};
pub use serde_yaml::Value as YamlValue;


impl TryFrom<&YamlValue> for Value {
    type Error = ValueError;

    fn try_from(value: &YamlValue) -> Result<Self, Self::Error> {
        match value {
            YamlValue::Bool(b) => Ok(Value::Bool(*b)),
            YamlValue::String(s) => Ok(Value::Text(s.clone())),
            YamlValue::Number(n) => Ok(Value::Text(n.to_string())),
            YamlValue::Null => Ok(Value::Text(String::new())),
            YamlValue::Sequence(seq) =>
                seq.iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Sequence),
            YamlValue::Tagged(tagged) => Value::try_from(&tagged.value),
            YamlValue::Mapping(_) => Err(ValueError::Unsupported("mapping"))
        }
    }
}
