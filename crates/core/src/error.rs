//! Error types for the cmdtree domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Declaration-time and assembly-time failures roll up into [`DslError`];
//! match-time failures are [`ArgumentError`] and [`CommandError`].

use thiserror::Error;

/// The top-level error type for declaring and assembling command trees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DslError {
    // --- Declaration ordering ---
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    // --- Assembly ---
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    // --- Configuration ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using [`DslError`].
pub type Result<T> = std::result::Result<T, DslError>;

// --- Bounded context errors ---

/// The caller broke one of the declaration ordering rules.
///
/// `node` is the slash-separated path of the node being declared on,
/// starting at the root literal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    #[error("cannot add child '{child}' to '{node}' after an optional argument chain was started")]
    ChildAfterOptionalChain { node: String, child: String },

    #[error("cannot start a second optional argument chain on '{node}' with '{argument}'")]
    SecondOptionalChain { node: String, argument: String },

    #[error("optional argument '{argument}' must be declared before the handler on '{node}'")]
    OptionalAfterHandler { node: String, argument: String },

    #[error("'{node}' already has a handler set directly; inline arguments cannot attach another")]
    HandlerAfterDirectHandler { node: String },

    #[error("subcommands must be declared before any child of '{node}'")]
    SubcommandAfterChild { node: String },

    #[error("subcommands cannot be declared on '{node}' after an optional argument chain")]
    SubcommandAfterOptionalChain { node: String },

    #[error("'{node}' already has a child named '{child}' of the same kind")]
    DuplicateChild { node: String, child: String },

    #[error("'{node}' already has a handler (strict handlers enabled)")]
    HandlerOverride { node: String },
}

/// An assembled tree would be malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("'{path}' has neither a handler nor any children")]
    EmptyNode { path: String },

    #[error("'{path}' declares optional arguments but no handler")]
    OptionalChainWithoutHandler { path: String },

    #[error("'{path}' exceeds the maximum tree depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

/// A value could not be read from (or parsed into) a match context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("No such argument '{0}' exists on this command")]
    Missing(String),

    #[error("Argument '{name}' is not a {expected}")]
    WrongType { name: String, expected: &'static str },

    #[error("Expected {expected}, found '{found}'")]
    Malformed { expected: &'static str, found: String },

    #[error("{type_name} must be between {min} and {max}, found {found}")]
    OutOfRange {
        type_name: &'static str,
        min: String,
        max: String,
        found: String,
    },
}

/// What a command handler may fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Command failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_names_the_rule_and_node() {
        let err = DslError::Usage(UsageError::ChildAfterOptionalChain {
            node: "tp/x".into(),
            child: "here".into(),
        });
        let text = err.to_string();
        assert!(text.contains("optional argument chain"));
        assert!(text.contains("tp/x"));
        assert!(text.contains("here"));
    }

    #[test]
    fn argument_error_converts_into_command_error() {
        let err: CommandError = ArgumentError::Missing("x".into()).into();
        assert!(matches!(err, CommandError::Argument(ArgumentError::Missing(_))));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn out_of_range_displays_bounds() {
        let err = ArgumentError::OutOfRange {
            type_name: "Integer",
            min: "0".into(),
            max: "10".into(),
            found: "11".into(),
        };
        assert_eq!(err.to_string(), "Integer must be between 0 and 10, found 11");
    }
}
