use std::collections::HashMap;
use pretty_assertions::assert_eq;
use stencil::{Conditional, Context, RenderError, Renderer, Syntax, Template, TemplateMap};


fn no_exports() -> Vec<(String, Vec<Syntax>)> {
    Vec::new()
}

fn layouts() -> TemplateMap {
    let mut store = TemplateMap::new();
    store.insert("base", vec![
        Syntax::raw("<title>"),
        Syntax::export("title", vec![Syntax::raw("Default")]),
        Syntax::raw("</title>"),
    ]);
    store.insert("page", vec![
        Syntax::raw("<html>"),
        Syntax::import("head"),
        Syntax::export("body", vec![Syntax::raw("empty")]),
        Syntax::raw("<footer>"),
        Syntax::export("footer", vec![Syntax::raw("(c)")]),
        Syntax::raw("</footer></html>"),
    ]);
    store.insert("article", vec![
        Syntax::extend("page", [
            ("head", vec![Syntax::raw("<h1>"), Syntax::import("title"), Syntax::raw("</h1>")]),
            ("body", vec![Syntax::export("content", vec![Syntax::raw("no content")])]),
        ]),
        Syntax::export("title", vec![Syntax::raw("Article")]),
    ]);
    store
}

#[test]
fn override_replaces_default() {
    let page = Template::new(vec![
        Syntax::extend("base", [("title", vec![Syntax::raw("Custom")])]),
    ]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(result.unwrap(), "<title>Custom</title>");
}

#[test]
fn default_without_override() {
    let page = Template::new(vec![Syntax::extend("base", no_exports())]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(result.unwrap(), "<title>Default</title>");
}

#[test]
fn base_renders_defaults_on_its_own() {
    let store = layouts();
    let result = Renderer::new().render_named("base", &Context::new(), &store);
    assert_eq!(result.unwrap(), "<title>Default</title>");
}

#[test]
fn overrides_see_the_context() {
    let page = Template::new(vec![
        Syntax::extend("base", [("title", vec![Syntax::raw("Hi "), Syntax::variable("user")])]),
    ]);
    let context = Context::new().with("user", "ann").unwrap();
    let result = page.render_with_store(&context, &layouts());
    assert_eq!(result.unwrap(), "<title>Hi ann</title>");
}

#[test]
fn most_derived_override_wins() {
    let page = Template::new(vec![
        Syntax::extend("article", [("content", vec![Syntax::raw("Lorem")])]),
        Syntax::export("footer", vec![Syntax::raw("bye")]),
    ]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(
        result.unwrap(),
        "<html><h1>Article</h1>Lorem<footer>bye</footer></html>"
    );
}

#[test]
fn intermediate_defaults_survive() {
    let page = Template::new(vec![Syntax::extend("article", no_exports())]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(
        result.unwrap(),
        "<html><h1>Article</h1>no content<footer>(c)</footer></html>"
    );
}

#[test]
fn explicit_exports_win_over_sibling_exports() {
    let page = Template::new(vec![
        Syntax::extend("base", [("title", vec![Syntax::raw("map")])]),
        Syntax::export("title", vec![Syntax::raw("sibling")]),
    ]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(result.unwrap(), "<title>map</title>");
}

#[test]
fn sibling_content_is_discarded() {
    let page = Template::new(vec![
        Syntax::raw("lost"),
        Syntax::extend("base", no_exports()),
        Syntax::variable("undefined"),
    ]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(result.unwrap(), "<title>Default</title>");
}

#[test]
fn first_extend_wins() {
    let page = Template::new(vec![
        Syntax::extend("base", no_exports()),
        Syntax::extend("missing", no_exports()),
    ]);
    let result = page.render_with_store(&Context::new(), &layouts());
    assert_eq!(result.unwrap(), "<title>Default</title>");
}

#[test]
fn imports_inside_control_flow() {
    let mut store = TemplateMap::new();
    store.insert("list", vec![
        Syntax::loop_over("i", Syntax::variable("items"), vec![
            Conditional::new(Syntax::variable("i"), vec![Syntax::import("item")])
                .otherwise(vec![Syntax::raw("-")])
                .into(),
        ]),
    ]);
    let page = Template::new(vec![
        Syntax::extend("list", [("item", vec![Syntax::raw("<"), Syntax::variable("i"), Syntax::raw(">")])]),
    ]);
    let context = Context::new().with("items", vec!["a", "0", "b"]).unwrap();
    let result = page.render_with_store(&context, &store);
    assert_eq!(result.unwrap(), "<a>-<b>");
}

#[test]
fn imports_without_extend_use_local_exports() {
    let template = Template::new(vec![
        Syntax::import("name"),
        Syntax::raw(" / "),
        Syntax::export("name", vec![Syntax::raw("local")]),
        Syntax::import("other"),
    ]);
    assert_eq!(template.render(&Context::new()).unwrap(), "local / local");
}

#[test]
fn missing_base_fails() {
    let page = Template::new(vec![Syntax::extend("nowhere", no_exports())]);
    assert_eq!(
        page.render_with_store(&Context::new(), &layouts()),
        Err(RenderError::TemplateNotFound("nowhere".to_owned()))
    );
    assert_eq!(
        page.render(&Context::new()),
        Err(RenderError::TemplateNotFound("nowhere".to_owned()))
    );
}

#[test]
fn mutual_extension_is_a_cycle() {
    let mut store = HashMap::new();
    store.insert("a".to_owned(), Template::new(vec![Syntax::extend("b", no_exports())]));
    store.insert("b".to_owned(), Template::new(vec![Syntax::extend("a", no_exports())]));
    let result = Renderer::new().render_named("a", &Context::new(), &store);
    assert_eq!(result, Err(RenderError::CompositionCycle("a".to_owned())));
}

#[test]
fn self_extension_is_a_cycle() {
    let mut store = TemplateMap::new();
    store.insert("me", vec![Syntax::extend("me", no_exports())]);
    let page = Template::new(vec![Syntax::extend("me", no_exports())]);
    assert_eq!(
        page.render_with_store(&Context::new(), &store),
        Err(RenderError::CompositionCycle("me".to_owned()))
    );
}

#[test]
fn self_import_is_a_cycle() {
    let template = Template::new(vec![
        Syntax::export("loop", vec![Syntax::raw("x"), Syntax::import("loop")]),
        Syntax::import("loop"),
    ]);
    assert_eq!(
        template.render(&Context::new()),
        Err(RenderError::CompositionCycle("loop".to_owned()))
    );
}

#[test]
fn composition_leaves_the_tree_untouched() {
    let store = layouts();
    let page = Template::new(vec![
        Syntax::extend("base", [("title", vec![Syntax::raw("Custom")])]),
    ]);
    let before = page.clone();
    let first = page.render_with_store(&Context::new(), &store);
    let second = page.render_with_store(&Context::new(), &store);
    assert_eq!(first, second);
    assert_eq!(page, before);
}

#[test]
fn loads_store_from_yaml() {
    let mut store = TemplateMap::new();
    store.load_yaml("base", r#"
        - node: raw
          text: "["
        - node: export
          key: inner
          body:
            - node: raw
              text: default
        - node: raw
          text: "]"
    "#).unwrap();
    let page = Template::from_yaml(r#"
        - node: extend
          key: base
          exports:
            inner:
              - node: variable
                name: x
    "#).unwrap();
    let context = Context::new().with("x", "yaml").unwrap();
    assert_eq!(page.render_with_store(&context, &store).unwrap(), "[yaml]");
}
