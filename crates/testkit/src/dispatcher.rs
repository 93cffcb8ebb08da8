//! Reference dispatcher.
//!
//! Input is split at single spaces. Children are tried depth-first,
//! literals before arguments and each group in insertion order,
//! backtracking on failure; the first path that consumes the whole line
//! and ends on an executable node wins.

use std::sync::Arc;

use cmdtree_core::{
    Command, CommandContext, CommandError, CommandNode, DslError, NodeKind, Subcommand,
};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Permission denied for command: {0}")]
    Permission(String),

    #[error("Incorrect argument for command: {input}")]
    NoMatch { input: String },

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// A successful match, ready to run.
pub struct ParseResult<S> {
    pub context: CommandContext<S>,
    command: Command<S>,
}

impl<S> ParseResult<S> {
    pub fn execute(&self) -> Result<i32, CommandError> {
        (self.command)(&self.context)
    }
}

/// Holds registered root literals and matches input against them.
pub struct Dispatcher<S> {
    roots: Vec<CommandNode<S>>,
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Register a root node, replacing any root with the same label.
    pub fn register(&mut self, node: CommandNode<S>) {
        debug!(command = %node.label(), "Registered command");
        self.roots.retain(|r| r.label() != node.label());
        self.roots.push(node);
    }

    /// Assemble `command` and register the result.
    pub fn register_command(&mut self, command: &dyn Subcommand<S>) -> Result<(), DslError> {
        let node = command.build_literal()?.build();
        self.register(node);
        Ok(())
    }

    pub fn root(&self, label: &str) -> Option<&CommandNode<S>> {
        self.roots.iter().find(|r| r.label() == label)
    }

    pub fn roots(&self) -> &[CommandNode<S>] {
        &self.roots
    }
}

impl<S: Clone> Dispatcher<S> {
    /// Match `input` without running anything.
    pub fn parse(&self, input: &str, source: S) -> Result<ParseResult<S>, DispatchError> {
        let head = input.split(' ').next().unwrap_or_default();
        let root = self
            .root(head)
            .ok_or_else(|| DispatchError::UnknownCommand(head.to_string()))?;
        if !root.can_use(&source) {
            return Err(DispatchError::Permission(head.to_string()));
        }

        let mut context = CommandContext::new(source, input);
        context.push_node(root.label());
        let (context, command) = walk(root, &input[head.len()..], context).ok_or_else(|| {
            DispatchError::NoMatch {
                input: input.to_string(),
            }
        })?;
        Ok(ParseResult { context, command })
    }

    /// Match `input` and run the handler it reaches.
    pub fn execute(&self, input: &str, source: S) -> Result<i32, DispatchError> {
        let parsed = self.parse(input, source)?;
        debug!(input, nodes = ?parsed.context.nodes(), "Dispatching");
        Ok(parsed.execute()?)
    }
}

fn walk<S: Clone>(
    node: &CommandNode<S>,
    rest: &str,
    context: CommandContext<S>,
) -> Option<(CommandContext<S>, Command<S>)> {
    if rest.is_empty() {
        return node.command().map(|command| (context, Arc::clone(command)));
    }
    let rest = rest.strip_prefix(' ')?;

    let is_literal = |child: &&CommandNode<S>| matches!(child.kind(), NodeKind::Literal(_));
    let literals = node.children().iter().filter(is_literal);
    let arguments = node.children().iter().filter(|child| !is_literal(child));

    for child in literals.chain(arguments) {
        if !child.can_use(context.source()) {
            continue;
        }
        let mut next = context.clone();
        let remaining = match child.kind() {
            NodeKind::Literal(token) => match rest.strip_prefix(token.as_str()) {
                Some(remaining) if at_boundary(remaining) => remaining,
                _ => continue,
            },
            NodeKind::Argument { name, parser } => match parser.parse(rest) {
                Ok((value, consumed)) if at_boundary(&rest[consumed..]) => {
                    next.insert_argument(name.clone(), value);
                    &rest[consumed..]
                }
                Ok(_) => continue,
                Err(e) => {
                    trace!(argument = %name, error = %e, "Argument did not parse");
                    continue;
                }
            },
        };
        next.push_node(child.label());
        if let Some(found) = walk(child, remaining, next) {
            return Some(found);
        }
    }
    None
}

fn at_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with(' ')
}
