//! Argument descriptors.
//!
//! A descriptor names one typed argument position, knows how to build the
//! native argument node for it, and knows how to pull its value back out
//! of a match context. The presence policy decides what happens when the
//! value is not there:
//!
//! - [`RequiredArgument`] propagates the extraction failure.
//! - [`OptionalArgument`] turns it into `None`.
//! - [`DefaultArgument`] turns it into a configured default.
//!
//! Only a [`RequiredArgument`] can be wrapped, so optionality is always a
//! single level deep.

use std::sync::Arc;

use cmdtree_core::{
    ArgumentError, ArgumentType, BoolArgumentType, CommandContext, DoubleArgumentType,
    FloatArgumentType, FromArgument, IntegerArgumentType, LongArgumentType, NodeBuilder,
    StringArgumentType,
};

use crate::tree::NodeHook;

/// Whether an argument is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    OptionalNullable,
    OptionalWithDefault,
}

impl Presence {
    pub fn is_optional(self) -> bool {
        !matches!(self, Presence::Required)
    }
}

/// Reads the raw value bound to `name` out of a context.
pub type Extractor<S, T> = fn(&CommandContext<S>, &str) -> Result<T, ArgumentError>;

/// The type-erased half of a descriptor: what assembly needs.
pub trait NativeArgument<S>: Send + Sync {
    fn name(&self) -> &str;

    fn presence(&self) -> Presence;

    /// Build the native argument node, with any hooks applied.
    fn build_argument(&self) -> NodeBuilder<S>;
}

/// A descriptor that also knows the Rust type of its value.
pub trait CommandArgument<S>: NativeArgument<S> {
    type Value;

    fn value(&self, context: &CommandContext<S>) -> Result<Self::Value, ArgumentError>;
}

/// A mandatory argument.
pub struct RequiredArgument<S, T> {
    name: String,
    parser: Arc<dyn ArgumentType>,
    extractor: Extractor<S, T>,
    hook: Option<NodeHook<S>>,
}

impl<S, T> RequiredArgument<S, T> {
    pub fn new(name: impl Into<String>, parser: Arc<dyn ArgumentType>, extractor: Extractor<S, T>) -> Self {
        Self {
            name: name.into(),
            parser,
            extractor,
            hook: None,
        }
    }

    /// Post-process the native argument node when it is built.
    pub fn apply(mut self, hook: impl Fn(&mut NodeBuilder<S>) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn parser(&self) -> &Arc<dyn ArgumentType> {
        &self.parser
    }

    /// Treat a missing value as `None`.
    pub fn optional(self) -> OptionalArgument<S, T> {
        OptionalArgument { argument: self }
    }

    /// Treat a missing value as `value`.
    pub fn default(self, value: T) -> DefaultArgument<S, T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.default_with(move |_| value.clone())
    }

    /// Treat a missing value as whatever `getter` computes from the
    /// invocation source.
    pub fn default_with(self, getter: impl Fn(&S) -> T + Send + Sync + 'static) -> DefaultArgument<S, T> {
        DefaultArgument {
            argument: self,
            default: Arc::new(getter),
        }
    }
}

impl<S, T> Clone for RequiredArgument<S, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parser: Arc::clone(&self.parser),
            extractor: self.extractor,
            hook: self.hook.clone(),
        }
    }
}

impl<S, T> NativeArgument<S> for RequiredArgument<S, T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn presence(&self) -> Presence {
        Presence::Required
    }

    fn build_argument(&self) -> NodeBuilder<S> {
        let mut node = NodeBuilder::argument(self.name.clone(), Arc::clone(&self.parser));
        if let Some(hook) = &self.hook {
            hook(&mut node);
        }
        node
    }
}

impl<S, T> CommandArgument<S> for RequiredArgument<S, T> {
    type Value = T;

    fn value(&self, context: &CommandContext<S>) -> Result<T, ArgumentError> {
        (self.extractor)(context, &self.name)
    }
}

/// An argument whose absence reads as `None`.
pub struct OptionalArgument<S, T> {
    argument: RequiredArgument<S, T>,
}

impl<S, T> OptionalArgument<S, T> {
    pub fn apply(self, hook: impl Fn(&mut NodeBuilder<S>) + Send + Sync + 'static) -> Self {
        Self {
            argument: self.argument.apply(hook),
        }
    }
}

impl<S, T> Clone for OptionalArgument<S, T> {
    fn clone(&self) -> Self {
        Self {
            argument: self.argument.clone(),
        }
    }
}

impl<S, T> NativeArgument<S> for OptionalArgument<S, T> {
    fn name(&self) -> &str {
        self.argument.name()
    }

    fn presence(&self) -> Presence {
        Presence::OptionalNullable
    }

    fn build_argument(&self) -> NodeBuilder<S> {
        self.argument.build_argument()
    }
}

impl<S, T> CommandArgument<S> for OptionalArgument<S, T> {
    type Value = Option<T>;

    fn value(&self, context: &CommandContext<S>) -> Result<Option<T>, ArgumentError> {
        Ok(self.argument.value(context).ok())
    }
}

/// An argument whose absence reads as a default value.
pub struct DefaultArgument<S, T> {
    argument: RequiredArgument<S, T>,
    default: Arc<dyn Fn(&S) -> T + Send + Sync>,
}

impl<S, T> DefaultArgument<S, T> {
    pub fn apply(self, hook: impl Fn(&mut NodeBuilder<S>) + Send + Sync + 'static) -> Self {
        Self {
            argument: self.argument.apply(hook),
            default: self.default,
        }
    }
}

impl<S, T> Clone for DefaultArgument<S, T> {
    fn clone(&self) -> Self {
        Self {
            argument: self.argument.clone(),
            default: Arc::clone(&self.default),
        }
    }
}

impl<S, T> NativeArgument<S> for DefaultArgument<S, T> {
    fn name(&self) -> &str {
        self.argument.name()
    }

    fn presence(&self) -> Presence {
        Presence::OptionalWithDefault
    }

    fn build_argument(&self) -> NodeBuilder<S> {
        self.argument.build_argument()
    }
}

impl<S, T> CommandArgument<S> for DefaultArgument<S, T> {
    type Value = T;

    fn value(&self, context: &CommandContext<S>) -> Result<T, ArgumentError> {
        match self.argument.value(context) {
            Ok(value) => Ok(value),
            Err(_) => Ok((self.default)(context.source())),
        }
    }
}

// ── Constructors ───────────────────────────────────────────────────────

fn arg<S, T: FromArgument>(name: &str, parser: impl ArgumentType + 'static) -> RequiredArgument<S, T> {
    RequiredArgument::new(name, Arc::new(parser), CommandContext::get_argument::<T>)
}

pub fn boolean<S>(name: &str) -> RequiredArgument<S, bool> {
    arg(name, BoolArgumentType)
}

pub fn int<S>(name: &str) -> RequiredArgument<S, i32> {
    arg(name, IntegerArgumentType::default())
}

pub fn int_range<S>(name: &str, min: i32, max: i32) -> RequiredArgument<S, i32> {
    arg(name, IntegerArgumentType::new(min, max))
}

pub fn long<S>(name: &str) -> RequiredArgument<S, i64> {
    arg(name, LongArgumentType::default())
}

pub fn long_range<S>(name: &str, min: i64, max: i64) -> RequiredArgument<S, i64> {
    arg(name, LongArgumentType::new(min, max))
}

pub fn float<S>(name: &str) -> RequiredArgument<S, f32> {
    arg(name, FloatArgumentType::default())
}

pub fn float_range<S>(name: &str, min: f32, max: f32) -> RequiredArgument<S, f32> {
    arg(name, FloatArgumentType::new(min, max))
}

pub fn double<S>(name: &str) -> RequiredArgument<S, f64> {
    arg(name, DoubleArgumentType::default())
}

pub fn double_range<S>(name: &str, min: f64, max: f64) -> RequiredArgument<S, f64> {
    arg(name, DoubleArgumentType::new(min, max))
}

/// A single space-free word.
pub fn word<S>(name: &str) -> RequiredArgument<S, String> {
    arg(name, StringArgumentType::Word)
}

/// A word or a quoted phrase.
pub fn string<S>(name: &str) -> RequiredArgument<S, String> {
    arg(name, StringArgumentType::Quoted)
}

/// Everything left on the line.
pub fn greedy_string<S>(name: &str) -> RequiredArgument<S, String> {
    arg(name, StringArgumentType::Greedy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::{ArgumentValue, NodeKind};

    fn ctx() -> CommandContext<&'static str> {
        CommandContext::new("console", "")
    }

    #[test]
    fn required_propagates_missing() {
        let x = int::<&str>("x");
        assert_eq!(x.value(&ctx()).unwrap_err(), ArgumentError::Missing("x".into()));
        assert_eq!(x.presence(), Presence::Required);
    }

    #[test]
    fn optional_absorbs_missing() {
        let y = int::<&str>("y").optional();
        assert_eq!(y.value(&ctx()).unwrap(), None);
        let present = ctx().with_argument("y", ArgumentValue::Int(9));
        assert_eq!(y.value(&present).unwrap(), Some(9));
    }

    #[test]
    fn default_returns_value_when_missing_and_actual_when_present() {
        let y = int::<&str>("y").default(0);
        assert_eq!(y.value(&ctx()).unwrap(), 0);
        let present = ctx().with_argument("y", ArgumentValue::Int(7));
        assert_eq!(y.value(&present).unwrap(), 7);
        assert_eq!(y.presence(), Presence::OptionalWithDefault);
    }

    #[test]
    fn default_absorbs_wrong_type() {
        let y = int::<&str>("y").default(3);
        let wrong = ctx().with_argument("y", ArgumentValue::String("nine".into()));
        assert_eq!(y.value(&wrong).unwrap(), 3);
    }

    #[test]
    fn default_with_reads_source() {
        let who = word::<&str>("player").default_with(|source| source.to_string());
        assert_eq!(who.value(&ctx()).unwrap(), "console");
    }

    #[test]
    fn wrapping_leaves_the_required_descriptor_usable() {
        let x = int::<&str>("x");
        let _optional = x.clone().optional();
        assert_eq!(x.presence(), Presence::Required);
        assert!(x.value(&ctx()).is_err());
    }

    #[test]
    fn build_argument_applies_hook() {
        let x = int::<u8>("x").apply(|node| {
            node.requires(Arc::new(|level: &u8| *level > 0));
        });
        let node = x.build_argument().build();
        assert!(matches!(node.kind(), NodeKind::Argument { name, .. } if name == "x"));
        assert!(!node.can_use(&0));
        assert!(node.can_use(&1));
    }

    #[test]
    fn bounded_constructors_carry_bounds() {
        let x = int_range::<()>("x", 1, 5);
        assert!(x.parser().parse("6").is_err());
        assert!(x.parser().parse("5").is_ok());
        assert_eq!(greedy_string::<()>("msg").parser().type_name(), "greedy string");
    }
}
