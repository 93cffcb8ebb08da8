//! The declaration façade.
//!
//! A [`CommandBuilder`] is a cursor over one node of a [`CommandTree`].
//! Nested scopes (`literal`, `literals`, `argument`) hand a fresh builder
//! bound to the new child to a closure, so declarations nest lexically.
//!
//! Inline arguments do not open a scope. A required inline argument
//! becomes a child of the cursor and the cursor moves onto it; an optional
//! one joins the cursor's optional chain. Ordering rules are checked as
//! each declaration is made:
//!
//! 1. No literal or required argument after an optional chain was started.
//! 2. No second optional chain once one has been closed by a handler.
//! 3. No handler through the inline path when the scope already has a
//!    directly attached handler.
//! 4. Subcommands before any child, and never after an optional chain.
//! 5. Sibling labels are unique per kind. Literals and subcommands share
//!    one namespace, arguments and optional chain links another.

use std::sync::Arc;

use cmdtree_core::{
    ArgumentError, Command, CommandContext, CommandError, NodeBuilder, Result,
    SINGLE_SUCCESS, Subcommand, UsageError,
};
use tracing::warn;

use crate::argument::{CommandArgument, NativeArgument, RequiredArgument};
use crate::cell::ContextCell;
use crate::tree::{CommandTree, HandlerOrigin, NodeId, TreeNodeKind};

/// Reads one argument's value, either from an explicit context or from
/// the tree's context cell.
pub struct ArgumentHandle<S, V> {
    argument: Arc<dyn CommandArgument<S, Value = V>>,
    cell: ContextCell<S>,
}

impl<S, V> ArgumentHandle<S, V> {
    pub fn name(&self) -> &str {
        self.argument.name()
    }

    /// The value bound in `context`.
    pub fn get(&self, context: &CommandContext<S>) -> std::result::Result<V, ArgumentError> {
        self.argument.value(context)
    }

    /// The value bound in the context of the dispatch currently running.
    ///
    /// # Panics
    ///
    /// Panics when called before any handler of this tree has fired.
    pub fn value(&self) -> std::result::Result<V, ArgumentError> {
        let context = self.cell.get();
        self.argument.value(&context)
    }
}

impl<S, V> Clone for ArgumentHandle<S, V> {
    fn clone(&self) -> Self {
        Self {
            argument: Arc::clone(&self.argument),
            cell: self.cell.clone(),
        }
    }
}

/// Incremental construction surface for one node.
pub struct CommandBuilder<'t, S> {
    tree: &'t mut CommandTree<S>,
    /// The node this scope was opened on.
    scope: NodeId,
    /// Where the next declaration attaches; moves with required inline
    /// arguments.
    cursor: NodeId,
}

impl<'t, S> CommandBuilder<'t, S> {
    pub(crate) fn new(tree: &'t mut CommandTree<S>, scope: NodeId) -> Self {
        Self {
            tree,
            scope,
            cursor: scope,
        }
    }

    /// Path of the node the next declaration attaches to.
    pub fn path(&self) -> String {
        self.tree.path(self.cursor)
    }

    fn inline_used(&self) -> bool {
        self.cursor != self.scope || !self.tree.node(self.cursor).optionals.is_empty()
    }

    fn check_child(&self, child: &str, literal: bool) -> Result<()> {
        if !self.tree.node(self.cursor).optionals.is_empty() {
            return Err(UsageError::ChildAfterOptionalChain {
                node: self.path(),
                child: child.to_string(),
            }
            .into());
        }
        self.check_unique(child, literal)
    }

    /// Sibling labels are unique per kind: literals among literals and
    /// subcommands, arguments among arguments and chain links.
    fn check_unique(&self, label: &str, literal: bool) -> Result<()> {
        let node = self.tree.node(self.cursor);
        let among_children = node.children().iter().any(|&id| {
            let kind = &self.tree.node(id).kind;
            kind.label() == label && matches!(kind, TreeNodeKind::Literal(_)) == literal
        });
        let among_extras = if literal {
            node.subcommands.iter().any(|c| c.literal() == label)
        } else {
            node.optionals.iter().any(|a| a.name() == label)
        };
        if among_children || among_extras {
            return Err(UsageError::DuplicateChild {
                node: self.path(),
                child: label.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Attach `command` to the current node.
    pub fn executes(
        &mut self,
        command: impl Fn(&CommandContext<S>) -> std::result::Result<i32, CommandError> + Send + Sync + 'static,
    ) -> Result<()> {
        let inline = self.inline_used();
        if inline
            && matches!(
                self.tree.node(self.scope).handler,
                Some((_, HandlerOrigin::Direct))
            )
        {
            return Err(UsageError::HandlerAfterDirectHandler {
                node: self.tree.path(self.scope),
            }
            .into());
        }

        if self.tree.node(self.cursor).has_handler() {
            if self.tree.config().strict_handlers {
                return Err(UsageError::HandlerOverride { node: self.path() }.into());
            }
            warn!(node = %self.path(), "Replacing existing handler");
        }

        let origin = if inline {
            HandlerOrigin::Inline
        } else {
            HandlerOrigin::Direct
        };
        let command: Command<S> = Arc::new(command);
        self.tree.node_mut(self.cursor).handler = Some((command, origin));
        Ok(())
    }

    /// Attach a handler that only needs the invocation source.
    pub fn runs(&mut self, command: impl Fn(&S) + Send + Sync + 'static) -> Result<()> {
        self.executes(move |context| {
            command(context.source());
            Ok(SINGLE_SUCCESS)
        })
    }

    /// Customize the current node's native builder when it is assembled.
    pub fn apply(&mut self, hook: impl Fn(&mut NodeBuilder<S>) + Send + Sync + 'static) {
        self.tree.node_mut(self.cursor).hooks.push(Arc::new(hook));
    }

    /// Declare a literal child and its contents.
    pub fn literal(
        &mut self,
        token: &str,
        block: impl FnOnce(&mut CommandBuilder<'_, S>) -> Result<()>,
    ) -> Result<()> {
        self.check_child(token, true)?;
        let child = self
            .tree
            .add_child(self.cursor, TreeNodeKind::Literal(token.to_string()));
        block(&mut CommandBuilder::new(&mut *self.tree, child))
    }

    /// Declare a chain of nested literals; `block` runs on the innermost.
    pub fn literals(
        &mut self,
        tokens: &[&str],
        block: impl FnOnce(&mut CommandBuilder<'_, S>) -> Result<()>,
    ) -> Result<()> {
        let Some(first) = tokens.first() else {
            return block(self);
        };
        self.check_child(first, true)?;
        let innermost = tokens.iter().fold(self.cursor, |parent, token| {
            self.tree
                .add_child(parent, TreeNodeKind::Literal((*token).to_string()))
        });
        block(&mut CommandBuilder::new(&mut *self.tree, innermost))
    }

    /// Declare a required argument child; `block` receives the child's
    /// builder and a handle for reading the argument's value.
    pub fn argument<T: 'static>(
        &mut self,
        argument: RequiredArgument<S, T>,
        block: impl FnOnce(&mut CommandBuilder<'_, S>, ArgumentHandle<S, T>) -> Result<()>,
    ) -> Result<()>
    where
        S: 'static,
    {
        self.check_child(argument.name(), false)?;
        let argument = Arc::new(argument);
        let child = self
            .tree
            .add_child(self.cursor, TreeNodeKind::Argument(argument.clone()));
        let handle = ArgumentHandle {
            argument,
            cell: self.tree.cell().clone(),
        };
        block(&mut CommandBuilder::new(&mut *self.tree, child), handle)
    }

    /// Declare an argument in place.
    ///
    /// Required arguments extend the scope: later declarations attach
    /// below them. Optional and defaulted arguments join the current
    /// node's optional chain and must come after every required one.
    pub fn inline<A>(&mut self, argument: A) -> Result<ArgumentHandle<S, A::Value>>
    where
        A: CommandArgument<S> + 'static,
        S: 'static,
    {
        let argument = Arc::new(argument);
        let name = argument.name().to_string();

        if argument.presence().is_optional() {
            let cursor = self.tree.node(self.cursor);
            if cursor.has_handler() {
                let err = if cursor.optionals.is_empty() {
                    UsageError::OptionalAfterHandler {
                        node: self.path(),
                        argument: name,
                    }
                } else {
                    UsageError::SecondOptionalChain {
                        node: self.path(),
                        argument: name,
                    }
                };
                return Err(err.into());
            }
            self.check_unique(&name, false)?;
            self.tree.node_mut(self.cursor).optionals.push(argument.clone());
        } else {
            self.check_child(&name, false)?;
            self.cursor = self
                .tree
                .add_child(self.cursor, TreeNodeKind::Argument(argument.clone()));
        }

        Ok(ArgumentHandle {
            argument,
            cell: self.tree.cell().clone(),
        })
    }

    /// Attach pre-built command groups as children of the current node.
    pub fn subcommands<C>(&mut self, commands: impl IntoIterator<Item = C>) -> Result<()>
    where
        C: Subcommand<S> + 'static,
    {
        let cursor = self.tree.node(self.cursor);
        if !cursor.children().is_empty() {
            return Err(UsageError::SubcommandAfterChild { node: self.path() }.into());
        }
        if cursor.optional_chain_len() > 0 {
            return Err(UsageError::SubcommandAfterOptionalChain { node: self.path() }.into());
        }
        for command in commands {
            self.check_unique(command.literal(), true)?;
            self.tree.node_mut(self.cursor).subcommands.push(Arc::new(command));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{int, word};
    use crate::command::command;
    use crate::config::BuilderConfig;
    use cmdtree_core::{ArgumentValue, DslError};

    fn tree() -> CommandTree<()> {
        CommandTree::new("tp", BuilderConfig::default())
    }

    fn usage(result: Result<impl Sized>) -> UsageError {
        match result {
            Err(DslError::Usage(err)) => err,
            Err(other) => panic!("expected usage error, got {other}"),
            Ok(_) => panic!("expected usage error, got success"),
        }
    }

    #[test]
    fn literal_after_optional_chain_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("y").optional()).unwrap();
        let err = usage(b.literal("here", |b| b.runs(|_| {})));
        assert_eq!(
            err,
            UsageError::ChildAfterOptionalChain {
                node: "tp".into(),
                child: "here".into()
            }
        );
    }

    #[test]
    fn required_inline_after_optional_chain_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("y").default(0)).unwrap();
        let err = usage(b.inline(int("z")));
        assert!(matches!(err, UsageError::ChildAfterOptionalChain { child, .. } if child == "z"));
    }

    #[test]
    fn scoped_argument_after_optional_chain_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("y").optional()).unwrap();
        let err = usage(b.argument(int("z"), |b, _| b.runs(|_| {})));
        assert!(matches!(err, UsageError::ChildAfterOptionalChain { .. }));
    }

    #[test]
    fn optional_after_handler_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.runs(|_| {}).unwrap();
        let err = usage(b.inline(int("y").optional()));
        assert!(matches!(err, UsageError::OptionalAfterHandler { .. }));
    }

    #[test]
    fn second_optional_chain_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("a").optional()).unwrap();
        b.runs(|_| {}).unwrap();
        let err = usage(b.inline(int("b").optional()));
        assert_eq!(
            err,
            UsageError::SecondOptionalChain {
                node: "tp".into(),
                argument: "b".into()
            }
        );
    }

    #[test]
    fn inline_handler_after_direct_handler_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.runs(|_| {}).unwrap();
        b.inline(int("x")).unwrap();
        let err = usage(b.runs(|_| {}));
        assert_eq!(err, UsageError::HandlerAfterDirectHandler { node: "tp".into() });
    }

    #[test]
    fn direct_handler_may_be_replaced_when_lenient() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.executes(|_| Ok(1)).unwrap();
        b.executes(|_| Ok(2)).unwrap();
        let node = tree.assemble().unwrap().build();
        let ctx = CommandContext::new((), "tp");
        assert_eq!(node.command().unwrap()(&ctx).unwrap(), 2);
    }

    #[test]
    fn subcommands_after_child_are_rejected() {
        let on = command::<(), _>("on", |b| b.runs(|_| {}));
        let mut tree = CommandTree::new("feature", BuilderConfig::default());
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.argument(word("name"), |b, _| b.runs(|_| {})).unwrap();
        let err = usage(b.subcommands([on]));
        assert_eq!(err, UsageError::SubcommandAfterChild { node: "feature".into() });
    }

    #[test]
    fn subcommands_after_optional_chain_are_rejected() {
        let on = command::<(), _>("on", |b| b.runs(|_| {}));
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("y").optional()).unwrap();
        let err = usage(b.subcommands([on]));
        assert!(matches!(err, UsageError::SubcommandAfterOptionalChain { .. }));
    }

    #[test]
    fn optional_named_like_an_argument_child_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.argument(int("y"), |b, _| b.executes(|_| Ok(5))).unwrap();
        let err = usage(b.inline(int("y").optional()));
        assert_eq!(
            err,
            UsageError::DuplicateChild {
                node: "tp".into(),
                child: "y".into()
            }
        );
    }

    #[test]
    fn second_link_with_the_same_name_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("y").optional()).unwrap();
        let err = usage(b.inline(word("y").default("a".to_string())));
        assert!(matches!(err, UsageError::DuplicateChild { child, .. } if child == "y"));
    }

    #[test]
    fn duplicate_literal_is_rejected() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.literal("here", |b| b.runs(|_| {})).unwrap();
        let err = usage(b.literals(&["here", "now"], |b| b.runs(|_| {})));
        assert!(matches!(err, UsageError::DuplicateChild { .. }));
    }

    #[test]
    fn literal_named_like_a_subcommand_is_rejected() {
        let on = command::<(), _>("on", |b| b.runs(|_| {}));
        let mut tree = CommandTree::new("feature", BuilderConfig::default());
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.subcommands([on]).unwrap();
        let err = usage(b.literal("on", |b| b.runs(|_| {})));
        assert!(matches!(err, UsageError::DuplicateChild { child, .. } if child == "on"));
    }

    #[test]
    fn literal_and_argument_may_share_a_label() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.literal("x", |b| b.runs(|_| {})).unwrap();
        assert!(b.argument(int("x"), |b, _| b.runs(|_| {})).is_ok());
    }

    #[test]
    fn required_inline_moves_the_cursor() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.inline(int("x")).unwrap();
        b.inline(int("y")).unwrap();
        assert_eq!(b.path(), "tp/x/y");
        b.literal("now", |b| b.runs(|_| {})).unwrap();
        let node = tree.assemble().unwrap().build();
        assert!(node.child("x").and_then(|x| x.child("y")).and_then(|y| y.child("now")).is_some());
    }

    #[test]
    fn literals_nest_in_order() {
        let mut tree = CommandTree::<()>::new("gamerule", BuilderConfig::default());
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        b.literals(&["keep", "inventory"], |b| {
            assert_eq!(b.path(), "gamerule/keep/inventory");
            b.runs(|_| {})
        })
        .unwrap();
        let node = tree.assemble().unwrap().build();
        assert!(node.child("keep").unwrap().child("inventory").unwrap().command().is_some());
    }

    #[test]
    fn handles_read_explicit_and_deferred_contexts() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        let x = b.inline(int("x")).unwrap();
        let deferred = x.clone();
        b.executes(move |_| Ok(deferred.value()?)).unwrap();
        assert_eq!(x.name(), "x");

        let node = tree.assemble().unwrap().build();
        let ctx = CommandContext::new((), "tp 7").with_argument("x", ArgumentValue::Int(7));
        assert_eq!(x.get(&ctx).unwrap(), 7);
        let x_node = node.child("x").unwrap();
        assert_eq!(x_node.command().unwrap()(&ctx).unwrap(), 7);
    }

    #[test]
    #[should_panic(expected = "read before any dispatch")]
    fn deferred_read_outside_a_handler_panics() {
        let mut tree = tree();
        let mut b = CommandBuilder::new(&mut tree, NodeId::ROOT);
        let x = b.inline(int("x")).unwrap();
        let _ = x.value();
    }
}
