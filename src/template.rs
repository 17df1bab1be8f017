use std::collections::HashMap;
use std::sync::OnceLock;
use serde::{Deserialize, Serialize};
use crate::{Context, LoadError, Renderer, RenderError, Syntax};


/// A parsed template tree, ready to be rendered any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    nodes: Vec<Syntax>
}

impl Template {
    pub fn new(nodes: Vec<Syntax>) -> Self {
        Template { nodes }
    }

    /// Loads a tree serialized as a JSON array of nodes.
    pub fn from_json(input: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Loads a tree serialized as a YAML sequence of nodes.
    pub fn from_yaml(input: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn nodes(&self) -> &[Syntax] {
        &self.nodes
    }

    /// Renders with the built-in tags and no template store.
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        builtin().render(self, context)
    }

    /// Renders with the built-in tags, fetching bases from `store`.
    pub fn render_with_store(
        &self, context: &Context, store: &dyn TemplateStore
    ) -> Result<String, RenderError> {
        builtin().render_with_store(self, context, store)
    }
}

impl From<Vec<Syntax>> for Template {
    fn from(nodes: Vec<Syntax>) -> Self {
        Template { nodes }
    }
}

impl FromIterator<Syntax> for Template {
    fn from_iter<I: IntoIterator<Item = Syntax>>(iter: I) -> Self {
        Template { nodes: iter.into_iter().collect() }
    }
}

fn builtin() -> &'static Renderer {
    static BUILTIN: OnceLock<Renderer> = OnceLock::new();
    BUILTIN.get_or_init(Renderer::new)
}


/// Source of base templates for extend nodes.
pub trait TemplateStore {
    fn get(&self, key: &str) -> Option<&Template>;
}


#[derive(Debug, Default)]
pub struct TemplateMap {
    templates: HashMap<String, Template>
}

impl TemplateMap {
    pub fn new() -> Self {
        TemplateMap { templates: HashMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<Template>) -> Option<Template> {
        self.templates.insert(key.into(), template.into())
    }

    pub fn load_json(&mut self, key: &str, input: &str) -> Result<(), LoadError> {
        let template = Template::from_json(input)?;
        self.templates.insert(key.to_owned(), template);
        Ok(())
    }

    pub fn load_yaml(&mut self, key: &str, input: &str) -> Result<(), LoadError> {
        let template = Template::from_yaml(input)?;
        self.templates.insert(key.to_owned(), template);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for TemplateMap {
    fn get(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }
}

impl TemplateStore for HashMap<String, Template> {
    fn get(&self, key: &str) -> Option<&Template> {
        HashMap::get(self, key)
    }
}
