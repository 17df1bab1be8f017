use std::collections::HashMap;
use std::fmt;
use crate::{Renderer, RenderError, Scope, Syntax};


/// A built-in directive invoked by a [Syntax::Tag] node.
pub trait Tag: Send + Sync {
    fn render(&self, call: &TagCall<'_, '_>, out: &mut String) -> Result<(), RenderError>;
}

impl<F> Tag for F
where F: Fn(&TagCall<'_, '_>, &mut String) -> Result<(), RenderError> + Send + Sync {
    fn render(&self, call: &TagCall<'_, '_>, out: &mut String) -> Result<(), RenderError> {
        self(call, out)
    }
}


/// What a [Tag] sees of the node invoking it.
pub struct TagCall<'r, 'a> {
    pub(crate) name: &'a str,
    pub(crate) params: &'a [Syntax],
    pub(crate) renderer: &'r Renderer,
    pub(crate) scope: &'r Scope<'a>
}

impl<'r, 'a> TagCall<'r, 'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn params(&self) -> &'a [Syntax] {
        self.params
    }

    pub fn scope(&self) -> &Scope<'a> {
        self.scope
    }

    /// Parameters, provided there are exactly `count` of them.
    pub fn expect_params(&self, count: usize) -> Result<&'a [Syntax], RenderError> {
        if self.params.len() == count {
            Ok(self.params)
        } else {
            Err(RenderError::InvalidTagArity {
                name: self.name.to_owned(),
                got: self.params.len()
            })
        }
    }

    /// Renders `node` as if it appeared at the position of the tag.
    pub fn render(&self, node: &'a Syntax, out: &mut String) -> Result<(), RenderError> {
        self.renderer.render_node(node, self.scope, out)
    }

    pub fn coerce_bool(&self, node: &Syntax) -> Result<bool, RenderError> {
        self.scope.coerce_bool(node)
            .ok_or(RenderError::UndecidableCondition(node.kind()))
    }
}


/// Handlers for [Syntax::Tag] nodes, by tag name.
pub struct TagRegistry {
    tags: HashMap<String, Box<dyn Tag>>
}

impl TagRegistry {
    /// A registry with no tags at all.
    pub fn new() -> Self {
        TagRegistry {
            tags: HashMap::new()
        }
    }

    /// A registry holding the built-in `get` tag.
    pub fn builtin() -> Self {
        let mut registry = TagRegistry::new();
        registry.register("get", get);
        registry
    }

    /// Adds a handler, returning the one previously registered under `name`.
    pub fn register(
        &mut self, name: impl Into<String>, tag: impl Tag + 'static
    ) -> Option<Box<dyn Tag>> {
        self.tags.insert(name.into(), Box::new(tag))
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Tag>> {
        self.tags.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tag> {
        self.tags.get(name).map(|tag| tag.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        TagRegistry::builtin()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names().collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}


/// `get(x)`: renders its single parameter in place.
fn get(call: &TagCall<'_, '_>, out: &mut String) -> Result<(), RenderError> {
    let params = call.expect_params(1)?;
    call.render(&params[0], out)
}
