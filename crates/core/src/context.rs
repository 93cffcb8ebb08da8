//! Match context: the engine's record of one dispatch.
//!
//! A [`CommandContext`] is produced by the matching engine after it has
//! walked the input against an assembled tree. Handlers read argument
//! values out of it by name.

use std::collections::HashMap;
use std::fmt;

use crate::error::ArgumentError;

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl ArgumentValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgumentValue::Bool(_) => "bool",
            ArgumentValue::Int(_) => "integer",
            ArgumentValue::Long(_) => "long",
            ArgumentValue::Float(_) => "float",
            ArgumentValue::Double(_) => "double",
            ArgumentValue::String(_) => "string",
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Bool(v) => write!(f, "{v}"),
            ArgumentValue::Int(v) => write!(f, "{v}"),
            ArgumentValue::Long(v) => write!(f, "{v}"),
            ArgumentValue::Float(v) => write!(f, "{v}"),
            ArgumentValue::Double(v) => write!(f, "{v}"),
            ArgumentValue::String(v) => f.write_str(v),
        }
    }
}

/// Conversion out of an [`ArgumentValue`].
///
/// Returns `None` when the value holds a different variant.
pub trait FromArgument: Sized {
    /// Name of the expected variant, for error messages.
    const EXPECTED: &'static str;

    fn from_argument(value: &ArgumentValue) -> Option<Self>;
}

macro_rules! from_argument {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromArgument for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_argument(value: &ArgumentValue) -> Option<Self> {
                match value {
                    ArgumentValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_argument!(bool, Bool, "bool");
from_argument!(i32, Int, "integer");
from_argument!(i64, Long, "long");
from_argument!(f32, Float, "float");
from_argument!(f64, Double, "double");
from_argument!(String, String, "string");

/// The result of matching one line of input against a command tree.
#[derive(Debug, Clone)]
pub struct CommandContext<S> {
    source: S,
    input: String,
    /// Labels of the matched nodes, root first.
    nodes: Vec<String>,
    arguments: HashMap<String, ArgumentValue>,
}

impl<S> CommandContext<S> {
    pub fn new(source: S, input: impl Into<String>) -> Self {
        Self {
            source,
            input: input.into(),
            nodes: Vec::new(),
            arguments: HashMap::new(),
        }
    }

    /// Builder-style helper for engines and tests.
    pub fn with_argument(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Record a parsed value.
    pub fn insert_argument(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.arguments.insert(name.into(), value);
    }

    /// Record that a node matched.
    pub fn push_node(&mut self, label: impl Into<String>) {
        self.nodes.push(label.into());
    }

    /// The invocation's originating source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The raw input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Look up a parsed value by argument name.
    pub fn get_argument<T: FromArgument>(&self, name: &str) -> Result<T, ArgumentError> {
        let value = self
            .arguments
            .get(name)
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))?;
        T::from_argument(value).ok_or_else(|| ArgumentError::WrongType {
            name: name.to_string(),
            expected: T::EXPECTED,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_argument_returns_typed_value() {
        let ctx = CommandContext::new((), "tp 5").with_argument("x", ArgumentValue::Int(5));
        assert_eq!(ctx.get_argument::<i32>("x").unwrap(), 5);
        assert!(ctx.has_argument("x"));
    }

    #[test]
    fn get_argument_missing_fails() {
        let ctx = CommandContext::new((), "tp");
        let err = ctx.get_argument::<i32>("x").unwrap_err();
        assert_eq!(err, ArgumentError::Missing("x".into()));
    }

    #[test]
    fn get_argument_wrong_type_fails() {
        let ctx = CommandContext::new((), "say hi")
            .with_argument("msg", ArgumentValue::String("hi".into()));
        let err = ctx.get_argument::<i64>("msg").unwrap_err();
        assert!(matches!(err, ArgumentError::WrongType { expected: "long", .. }));
    }

    #[test]
    fn nodes_are_recorded_in_order() {
        let mut ctx = CommandContext::new("console", "feature on");
        ctx.push_node("feature");
        ctx.push_node("on");
        assert_eq!(ctx.nodes(), ["feature", "on"]);
        assert_eq!(*ctx.source(), "console");
        assert_eq!(ctx.input(), "feature on");
    }

    #[test]
    fn value_display_is_plain() {
        assert_eq!(ArgumentValue::String("a b".into()).to_string(), "a b");
        assert_eq!(ArgumentValue::Long(-3).to_string(), "-3");
        assert_eq!(ArgumentValue::Bool(true).kind(), "bool");
    }
}
