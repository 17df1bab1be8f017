use thiserror::Error;


/// Failure of a single render call. The first error aborts the call and
/// the partially rendered output is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("invalid number of parameters for tag `{name}`: got {got}")]
    InvalidTagArity { name: String, got: usize },

    #[error("template `{0}` not found")]
    TemplateNotFound(String),

    #[error("composition cycle through `{0}`")]
    CompositionCycle(String),

    /// An extend, export or import node survived the composition pass.
    #[error("unresolved {0} node")]
    UnresolvedCompositionNode(&'static str),

    /// Only variables and constants can be coerced to a boolean.
    #[error("{0} node cannot be used as a condition")]
    UndecidableCondition(&'static str),

    #[error("loop source is not a sequence: {0}")]
    NotASequence(String),
}


/// Failure converting caller data into a [Context](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("variable name cannot be empty")]
    EmptyName,

    #[error("context data must be an object")]
    NotAnObject,

    #[error("unsupported {0} value")]
    Unsupported(&'static str),
}


/// Failure loading a serialized syntax tree.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
