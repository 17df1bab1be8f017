//! Composition pass: resolves extend / export / import before evaluation.
//!
//! Export blocks are kept as markers while a chain of bases is resolved, so
//! that every extending level can still override them. Once the whole chain
//! is resolved the markers are flattened into their bodies.
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use crate::{RenderError, Syntax, TemplateStore};
use crate::syntax::Conditional;


/// Resolves composition for `nodes`; trees without composition nodes are
/// returned borrowed.
///
/// `chain` holds the keys of the templates being resolved, outermost first.
pub(crate) fn compose<'t>(
    nodes: &'t [Syntax], store: Option<&dyn TemplateStore>, chain: &mut Vec<String>
) -> Result<Cow<'t, [Syntax]>, RenderError> {
    let nodes = match extend(nodes, store, chain)? {
        Some(merged) => Cow::Owned(merged),
        None => Cow::Borrowed(nodes)
    };
    if !contains_blocks(&nodes) {
        return Ok(nodes);
    }
    let mut flatten = Flatten {
        exports: collect_exports(&nodes),
        active: Vec::new()
    };
    let flat = flatten.nodes(&nodes)?;
    Ok(Cow::Owned(flat))
}


/// Merges `nodes` into its base when it has a top-level extend node.
fn extend(
    nodes: &[Syntax], store: Option<&dyn TemplateStore>, chain: &mut Vec<String>
) -> Result<Option<Vec<Syntax>>, RenderError> {
    let mut extends = nodes.iter().filter_map(|node| match node {
        Syntax::Extend { key, exports } => Some((key, exports)),
        _ => None
    });
    let Some((key, exports)) = extends.next() else {
        return Ok(None);
    };
    for (ignored, _) in extends {
        tracing::warn!(base = %key, ignored = %ignored, "ignoring additional extend node");
    }

    let overrides = overrides(nodes, exports);
    let base = base(key, store, chain)?;
    let mut substitute = Substitute {
        overrides,
        exports: collect_exports(&base),
        active: Vec::new()
    };
    substitute.nodes(&base).map(Some)
}

/// Fetches the base stored under `key` with its own composition resolved.
fn base(
    key: &str, store: Option<&dyn TemplateStore>, chain: &mut Vec<String>
) -> Result<Vec<Syntax>, RenderError> {
    if chain.iter().any(|active| active == key) {
        return Err(RenderError::CompositionCycle(key.to_owned()));
    }
    let template = store
        .and_then(|store| store.get(key))
        .ok_or_else(|| RenderError::TemplateNotFound(key.to_owned()))?;
    tracing::debug!(base = %key, depth = chain.len(), "resolving base template");

    chain.push(key.to_owned());
    let resolved = extend(template.nodes(), store, chain);
    chain.pop();
    Ok(resolved?.unwrap_or_else(|| template.nodes().to_vec()))
}

/// Block bodies supplied by an extending tree: the extend node's own map,
/// then top-level export siblings for keys the map does not name.
fn overrides<'t>(
    nodes: &'t [Syntax], exports: &'t BTreeMap<String, Vec<Syntax>>
) -> HashMap<&'t str, &'t [Syntax]> {
    let mut overrides = exports.iter()
        .map(|(key, body)| (key.as_str(), body.as_slice()))
        .collect::<HashMap<_, _>>();
    for node in nodes {
        match node {
            Syntax::Export { key, body } => {
                overrides.entry(key.as_str()).or_insert(body.as_slice());
            },
            Syntax::Extend { .. } => {},
            other => {
                tracing::debug!(kind = other.kind(), "discarding content beside extend node");
            }
        }
    }
    overrides
}

/// First export block of each key, in document order, at any depth.
fn collect_exports(nodes: &[Syntax]) -> HashMap<&str, &[Syntax]> {
    let mut found = HashMap::new();
    collect_exports_into(nodes, &mut found);
    found
}

fn collect_exports_into<'t>(nodes: &'t [Syntax], found: &mut HashMap<&'t str, &'t [Syntax]>) {
    for node in nodes {
        match node {
            Syntax::Export { key, body } => {
                found.entry(key.as_str()).or_insert(body.as_slice());
                collect_exports_into(body, found);
            },
            Syntax::Tag { params, .. } => collect_exports_into(params, found),
            Syntax::Loop { body, .. } => collect_exports_into(body, found),
            Syntax::Conditional(chain) => {
                for arm in chain.arms() {
                    collect_exports_into(&arm.body, found);
                }
            },
            _ => {}
        }
    }
}

fn contains_blocks(nodes: &[Syntax]) -> bool {
    nodes.iter().any(|node| match node {
        Syntax::Export { .. } | Syntax::Import { .. } => true,
        Syntax::Tag { params, .. } => contains_blocks(params),
        Syntax::Loop { body, .. } => contains_blocks(body),
        Syntax::Conditional(chain) => chain.arms().any(|arm| contains_blocks(&arm.body)),
        _ => false
    })
}


/// Copy of a tree with its export and import nodes rewritten.
trait Rewrite {
    /// Handles an export or import node, appending its replacement.
    fn block(&mut self, node: &Syntax, out: &mut Vec<Syntax>) -> Result<(), RenderError>;

    /// Keys of the blocks whose bodies are being rewritten.
    fn active(&mut self) -> &mut Vec<String>;

    /// Rewrites the body standing for block `key`, failing if the body
    /// refers back to a block already being resolved.
    fn resolve(&mut self, key: &str, body: &[Syntax]) -> Result<Vec<Syntax>, RenderError> {
        let active = self.active();
        if active.iter().any(|it| it == key) {
            return Err(RenderError::CompositionCycle(key.to_owned()));
        }
        active.push(key.to_owned());
        let body = self.nodes(body);
        self.active().pop();
        body
    }

    fn nodes(&mut self, nodes: &[Syntax]) -> Result<Vec<Syntax>, RenderError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.node(node, &mut out)?;
        }
        Ok(out)
    }

    fn node(&mut self, node: &Syntax, out: &mut Vec<Syntax>) -> Result<(), RenderError> {
        let copy = match node {
            Syntax::Export { .. } | Syntax::Import { .. } => return self.block(node, out),
            Syntax::Tag { name, params } => Syntax::Tag {
                name: name.clone(),
                params: self.nodes(params)?
            },
            Syntax::Loop { variable, source, body } => Syntax::Loop {
                variable: variable.clone(),
                source: source.clone(),
                body: self.nodes(body)?
            },
            Syntax::Conditional(arm) => Syntax::Conditional(self.arm(arm)?),
            other => other.clone()
        };
        out.push(copy);
        Ok(())
    }

    fn arm(&mut self, arm: &Conditional) -> Result<Conditional, RenderError> {
        let next = match &arm.next {
            Some(next) => Some(Box::new(self.arm(next)?)),
            None => None
        };
        Ok(Conditional {
            condition: arm.condition.clone(),
            body: self.nodes(&arm.body)?,
            next
        })
    }
}

/// Applies an extending tree's overrides to its resolved base.
///
/// Imports become export markers carrying the override, the base's own
/// export of that key, or nothing. Override bodies are rewritten too, so
/// they may import the extending tree's other blocks.
struct Substitute<'t> {
    overrides: HashMap<&'t str, &'t [Syntax]>,
    exports: HashMap<&'t str, &'t [Syntax]>,
    active: Vec<String>
}

impl<'t> Rewrite for Substitute<'t> {
    fn block(&mut self, node: &Syntax, out: &mut Vec<Syntax>) -> Result<(), RenderError> {
        let (key, body) = match node {
            Syntax::Export { key, body } => match self.overrides.get(key.as_str()).copied() {
                Some(overridden) => (key, self.resolve(key, overridden)?),
                None => (key, self.nodes(body)?)
            },
            Syntax::Import { key } => {
                let source = self.overrides.get(key.as_str())
                    .or_else(|| self.exports.get(key.as_str()))
                    .copied();
                match source {
                    Some(body) => (key, self.resolve(key, body)?),
                    None => (key, Vec::new())
                }
            },
            other => return Err(RenderError::UnresolvedCompositionNode(other.kind()))
        };
        out.push(Syntax::export(key.as_str(), body));
        Ok(())
    }

    fn active(&mut self) -> &mut Vec<String> {
        &mut self.active
    }
}


/// Splices export bodies in place and resolves imports against the
/// exports of the same tree.
struct Flatten<'t> {
    exports: HashMap<&'t str, &'t [Syntax]>,
    active: Vec<String>
}

impl<'t> Rewrite for Flatten<'t> {
    fn block(&mut self, node: &Syntax, out: &mut Vec<Syntax>) -> Result<(), RenderError> {
        let body = match node {
            Syntax::Export { body, .. } => self.nodes(body)?,
            Syntax::Import { key } => match self.exports.get(key.as_str()).copied() {
                Some(body) => self.resolve(key, body)?,
                None => Vec::new()
            },
            other => return Err(RenderError::UnresolvedCompositionNode(other.kind()))
        };
        out.extend(body);
        Ok(())
    }

    fn active(&mut self) -> &mut Vec<String> {
        &mut self.active
    }
}
