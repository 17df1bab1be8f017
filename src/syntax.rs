use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::Value;


/// One node of a parsed template tree.
///
/// Trees are immutable input to rendering and may be shared by any number
/// of concurrent render calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Syntax {
    /// Literal text emitted verbatim.
    Raw { text: String },

    /// Lookup of a name in the context.
    Variable { name: String },

    /// A literal value embedded in the tree.
    Constant { value: Value },

    /// Invocation of a built-in directive. Parameters are evaluated by the
    /// directive itself.
    Tag {
        name: String,
        #[serde(default)]
        params: Vec<Syntax>
    },

    /// Head of an if / else-if / else chain.
    Conditional(Conditional),

    /// Renders `body` once per element of the sequence `source`, with the
    /// element bound to `variable`.
    Loop {
        variable: String,
        source: Box<Syntax>,
        #[serde(default)]
        body: Vec<Syntax>
    },

    /// Inherit from the template stored under `key`, overriding its blocks.
    Extend {
        key: String,
        #[serde(default)]
        exports: BTreeMap<String, Vec<Syntax>>
    },

    /// A named overridable block with its default content.
    Export {
        key: String,
        #[serde(default)]
        body: Vec<Syntax>
    },

    /// Placeholder for the block exported under `key`.
    Import { key: String },
}

impl Syntax {
    pub fn raw(text: impl Into<String>) -> Self {
        Syntax::Raw { text: text.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Syntax::Variable { name: name.into() }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Syntax::Constant { value: value.into() }
    }

    pub fn tag(name: impl Into<String>, params: Vec<Syntax>) -> Self {
        Syntax::Tag { name: name.into(), params }
    }

    pub fn loop_over(variable: impl Into<String>, source: Syntax, body: Vec<Syntax>) -> Self {
        Syntax::Loop {
            variable: variable.into(),
            source: Box::new(source),
            body
        }
    }

    pub fn extend<K, I>(key: impl Into<String>, exports: I) -> Self
    where K: Into<String>, I: IntoIterator<Item = (K, Vec<Syntax>)> {
        Syntax::Extend {
            key: key.into(),
            exports: exports.into_iter()
                .map(|(name, body)| (name.into(), body))
                .collect()
        }
    }

    pub fn export(key: impl Into<String>, body: Vec<Syntax>) -> Self {
        Syntax::Export { key: key.into(), body }
    }

    pub fn import(key: impl Into<String>) -> Self {
        Syntax::Import { key: key.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Syntax::Raw { .. } => "raw",
            Syntax::Variable { .. } => "variable",
            Syntax::Constant { .. } => "constant",
            Syntax::Tag { .. } => "tag",
            Syntax::Conditional(_) => "conditional",
            Syntax::Loop { .. } => "loop",
            Syntax::Extend { .. } => "extend",
            Syntax::Export { .. } => "export",
            Syntax::Import { .. } => "import"
        }
    }
}

impl From<Conditional> for Syntax {
    fn from(conditional: Conditional) -> Self {
        Syntax::Conditional(conditional)
    }
}


/// One arm of a conditional chain. At most one arm of a chain renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditional {
    pub condition: Box<Syntax>,
    #[serde(default)]
    pub body: Vec<Syntax>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Conditional>>
}

impl Conditional {
    pub fn new(condition: Syntax, body: Vec<Syntax>) -> Self {
        Conditional {
            condition: Box::new(condition),
            body,
            next: None
        }
    }

    /// Appends an arm at the end of the chain.
    pub fn else_if(mut self, condition: Syntax, body: Vec<Syntax>) -> Self {
        let next = match self.next.take() {
            Some(next) => (*next).else_if(condition, body),
            None => Conditional::new(condition, body)
        };
        self.next = Some(Box::new(next));
        self
    }

    /// Appends an unconditional final arm.
    pub fn otherwise(self, body: Vec<Syntax>) -> Self {
        self.else_if(Syntax::constant(true), body)
    }

    /// Iterates the arms of the chain starting with this one.
    pub fn arms(&self) -> impl Iterator<Item = &Conditional> {
        std::iter::successors(Some(self), |arm| arm.next.as_deref())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_builder_appends_arms() {
        let chain = Conditional::new(Syntax::variable("a"), vec![Syntax::raw("A")])
            .else_if(Syntax::variable("b"), vec![Syntax::raw("B")])
            .otherwise(vec![Syntax::raw("C")]);
        let conditions = chain.arms()
            .map(|arm| arm.condition.as_ref().clone())
            .collect::<Vec<_>>();
        assert_eq!(conditions, vec![
            Syntax::variable("a"),
            Syntax::variable("b"),
            Syntax::constant(true),
        ]);
    }

    #[test]
    fn deserializes_tagged_nodes() {
        let nodes = serde_json::from_str::<Vec<Syntax>>(r#"[
            {"node": "raw", "text": "hi "},
            {"node": "variable", "name": "who"},
            {"node": "import", "key": "footer"}
        ]"#).unwrap();
        assert_eq!(nodes, vec![
            Syntax::raw("hi "),
            Syntax::variable("who"),
            Syntax::import("footer"),
        ]);
    }
}
