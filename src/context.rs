use std::collections::HashMap;
use std::collections::hash_map::Iter;
use crate::{JsonValue, Syntax, Value, ValueError, YamlValue};


/// Variable bindings supplied by the caller for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: HashMap<String, Value>
}

impl Context {
    pub fn new() -> Self {
        Context {
            values: HashMap::new()
        }
    }

    /// Binds `name`, returning the value it replaces.
    pub fn insert(
        &mut self, name: impl Into<String>, value: impl Into<Value>
    ) -> Result<Option<Value>, ValueError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValueError::EmptyName);
        }
        Ok(self.values.insert(name, value.into()))
    }

    pub fn with(
        mut self, name: impl Into<String>, value: impl Into<Value>
    ) -> Result<Self, ValueError> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Builds a context from the members of a JSON object.
    pub fn from_json(data: &JsonValue) -> Result<Self, ValueError> {
        match data {
            JsonValue::Object(members) => {
                let mut context = Context::new();
                for (name, value) in members {
                    context.insert(name.as_str(), Value::try_from(value)?)?;
                }
                Ok(context)
            },
            _ => Err(ValueError::NotAnObject)
        }
    }

    /// Builds a context from a YAML mapping with string keys.
    pub fn from_yaml(data: &YamlValue) -> Result<Self, ValueError> {
        match data {
            YamlValue::Mapping(members) => {
                let mut context = Context::new();
                for (name, value) in members {
                    let name = name.as_str().ok_or(ValueError::NotAnObject)?;
                    context.insert(name, Value::try_from(value)?)?;
                }
                Ok(context)
            },
            YamlValue::Null => Ok(Context::new()),
            _ => Err(ValueError::NotAnObject)
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}


/// Read-only view of a [Context] extended with loop bindings.
///
/// Each loop iteration renders its body against a child scope holding
/// one extra binding; the binding disappears with the child.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    context: &'a Context,
    frame: Option<(&'a str, &'a Value)>,
    parent: Option<&'a Scope<'a>>
}

impl<'a> Scope<'a> {
    pub fn new(context: &'a Context) -> Self {
        Scope {
            context,
            frame: None,
            parent: None
        }
    }

    pub(crate) fn bind<'b>(&'b self, name: &'b str, value: &'b Value) -> Scope<'b> {
        Scope {
            context: self.context,
            frame: Some((name, value)),
            parent: Some(self)
        }
    }

    /// Innermost binding of `name`, falling back to the caller's context.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some((bound, value)) = current.frame {
                if bound == name {
                    return Some(value);
                }
            }
            scope = current.parent;
        }
        self.context.get(name)
    }

    /// Interprets `node` as a condition.
    ///
    /// A missing variable is falsy here, unlike in output position.
    /// Returns `None` for node kinds that have no boolean reading.
    pub fn coerce_bool(&self, node: &Syntax) -> Option<bool> {
        match node {
            Syntax::Variable { name } =>
                Some(self.get(name).is_some_and(Value::coerce_bool)),
            Syntax::Constant { value } => Some(value.coerce_bool()),
            _ => None
        }
    }
}
