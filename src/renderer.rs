use crate::compose::compose;
use crate::tags::{Tag, TagCall, TagRegistry};
use crate::{Context, RenderError, Scope, Syntax, Template, TemplateStore, Value};


/// Evaluates templates against a context.
///
/// A renderer only holds configuration and can be shared between threads;
/// every render call owns its output buffer.
#[derive(Debug, Default)]
pub struct Renderer {
    tags: TagRegistry
}

impl Renderer {
    /// A renderer with the built-in tags.
    pub fn new() -> Self {
        Renderer {
            tags: TagRegistry::builtin()
        }
    }

    pub fn with_tags(tags: TagRegistry) -> Self {
        Renderer { tags }
    }

    pub fn with_tag(mut self, name: impl Into<String>, tag: impl Tag + 'static) -> Self {
        self.tags.register(name, tag);
        self
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    /// Renders a template that does not extend any other.
    pub fn render(&self, template: &Template, context: &Context) -> Result<String, RenderError> {
        self.render_composed(template, context, None, Vec::new())
    }

    pub fn render_with_store(
        &self, template: &Template, context: &Context, store: &dyn TemplateStore
    ) -> Result<String, RenderError> {
        self.render_composed(template, context, Some(store), Vec::new())
    }

    /// Renders the template stored under `key`.
    pub fn render_named(
        &self, key: &str, context: &Context, store: &dyn TemplateStore
    ) -> Result<String, RenderError> {
        let template = store.get(key)
            .ok_or_else(|| RenderError::TemplateNotFound(key.to_owned()))?;
        self.render_composed(template, context, Some(store), vec![key.to_owned()])
    }

    #[tracing::instrument(level = "debug", skip_all, fields(nodes = template.nodes().len()))]
    fn render_composed(
        &self,
        template: &Template,
        context: &Context,
        store: Option<&dyn TemplateStore>,
        mut chain: Vec<String>
    ) -> Result<String, RenderError> {
        let nodes = compose(template.nodes(), store, &mut chain)?;
        let mut out = String::new();
        self.render_nodes(&nodes, &Scope::new(context), &mut out)?;
        Ok(out)
    }

    pub(crate) fn render_nodes<'s>(
        &self, nodes: &'s [Syntax], scope: &Scope<'s>, out: &mut String
    ) -> Result<(), RenderError> {
        for node in nodes {
            self.render_node(node, scope, out)?;
        }
        Ok(())
    }

    pub(crate) fn render_node<'s>(
        &self, node: &'s Syntax, scope: &Scope<'s>, out: &mut String
    ) -> Result<(), RenderError> {
        match node {
            Syntax::Raw { text } => {
                out.push_str(text);
                Ok(())
            },
            Syntax::Constant { value } => {
                value.write_to(out);
                Ok(())
            },
            Syntax::Variable { name } => {
                let value = scope.get(name)
                    .ok_or_else(|| RenderError::UndefinedVariable(name.clone()))?;
                value.write_to(out);
                Ok(())
            },
            Syntax::Tag { name, params } => {
                let tag = self.tags.get(name)
                    .ok_or_else(|| RenderError::UnknownTag(name.clone()))?;
                tracing::trace!(tag = %name, params = params.len(), "rendering tag");
                let call = TagCall {
                    name,
                    params,
                    renderer: self,
                    scope
                };
                tag.render(&call, out)
            },
            Syntax::Conditional(chain) => {
                for arm in chain.arms() {
                    let taken = scope.coerce_bool(&arm.condition)
                        .ok_or(RenderError::UndecidableCondition(arm.condition.kind()))?;
                    if taken {
                        return self.render_nodes(&arm.body, scope, out);
                    }
                }
                Ok(())
            },
            Syntax::Loop { variable, source, body } => {
                let items = match source.as_ref() {
                    Syntax::Variable { name } => scope.get(name)
                        .ok_or_else(|| RenderError::UndefinedVariable(name.clone()))?,
                    Syntax::Constant { value } => value,
                    other => return Err(RenderError::NotASequence(other.kind().to_owned()))
                };
                let Value::Sequence(items) = items else {
                    return Err(RenderError::NotASequence(format!("{} `{}`", source.kind(), items)));
                };
                tracing::trace!(variable = %variable, items = items.len(), "rendering loop");
                for item in items {
                    self.render_nodes(body, &scope.bind(variable, item), out)?;
                }
                Ok(())
            },
            Syntax::Extend { .. } | Syntax::Export { .. } | Syntax::Import { .. } =>
                Err(RenderError::UnresolvedCompositionNode(node.kind()))
        }
    }
}
