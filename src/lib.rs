//! A renderer for parsed template trees.
//!
//! A [Template] is a sequence of [Syntax] nodes produced by a parser. It is
//! rendered against a [Context] of named [Value]s; templates that extend
//! another one fetch their base from a [TemplateStore].
//!
//! Rendering never panics on bad input: undefined variables, unknown tags,
//! conditions that cannot be read as booleans and broken composition all
//! come back as a [RenderError].
//!
//! # Samples
//!
//! ## Hello world
//!
//! ```
//! use stencil::{Context, Syntax, Template};
//!
//! let template = Template::new(vec![
//!     Syntax::raw("hello, "),
//!     Syntax::variable("you"),
//!     Syntax::raw("!"),
//! ]);
//! let context = Context::new().with("you", "world").unwrap();
//!
//! assert_eq!(template.render(&context).unwrap(), "hello, world!");
//! ```
//!
//! ## Conditions and loops
//!
//! Text is falsy only when it reads `"false"` or `"0"`, and a missing
//! variable is falsy in a condition.
//!
//! ```
//! use stencil::{Conditional, Context, Syntax, Template};
//!
//! let template = Template::new(vec![
//!     Syntax::loop_over("name", Syntax::variable("team"), vec![
//!         Conditional::new(Syntax::variable("loud"), vec![Syntax::raw("HEY ")])
//!             .otherwise(vec![Syntax::raw("hi ")])
//!             .into(),
//!         Syntax::variable("name"),
//!         Syntax::raw("; "),
//!     ]),
//! ]);
//! let context = Context::new()
//!     .with("team", vec!["john", "jane"]).unwrap()
//!     .with("loud", "0").unwrap();
//!
//! assert_eq!(template.render(&context).unwrap(), "hi john; hi jane; ");
//! ```
//!
//! ## Inheritance
//!
//! ```
//! use stencil::{Context, Syntax, Template, TemplateMap};
//!
//! let mut store = TemplateMap::new();
//! store.insert("base", vec![
//!     Syntax::raw("<h1>"),
//!     Syntax::export("title", vec![Syntax::raw("Default")]),
//!     Syntax::raw("</h1>"),
//! ]);
//! let page = Template::new(vec![
//!     Syntax::extend("base", [("title", vec![Syntax::raw("Custom")])]),
//! ]);
//!
//! let result = page.render_with_store(&Context::new(), &store).unwrap();
//! assert_eq!(result, "<h1>Custom</h1>");
//! ```
mod compose;
mod context;
mod error;
mod json;
mod renderer;
mod syntax;
mod tags;
mod template;
mod value;
mod yaml;

pub use self::context::{Context, Scope};
pub use self::error::{LoadError, RenderError, ValueError};
pub use self::json::JsonValue;
pub use self::renderer::Renderer;
pub use self::syntax::{Conditional, Syntax};
pub use self::tags::{Tag, TagCall, TagRegistry};
pub use self::template::{Template, TemplateMap, TemplateStore};
pub use self::value::Value;
pub use self::yaml::YamlValue;
