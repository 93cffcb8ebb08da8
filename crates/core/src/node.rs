//! Native command nodes.
//!
//! [`NodeBuilder`] is the mutable form used while wiring a tree together;
//! [`CommandNode`] is the immutable result a matching engine walks.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::arguments::ArgumentType;
use crate::context::CommandContext;
use crate::error::CommandError;

/// Status code returned by handlers that just succeed.
pub const SINGLE_SUCCESS: i32 = 1;

/// An executable handler attached to a node.
pub type Command<S> = Arc<dyn Fn(&CommandContext<S>) -> Result<i32, CommandError> + Send + Sync>;

/// A permission predicate evaluated against the invocation source.
pub type Requirement<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// What a node matches.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A fixed token.
    Literal(String),
    /// A typed value bound to `name`.
    Argument {
        name: String,
        parser: Arc<dyn ArgumentType>,
    },
}

impl NodeKind {
    pub fn label(&self) -> &str {
        match self {
            NodeKind::Literal(token) => token,
            NodeKind::Argument { name, .. } => name,
        }
    }
}

/// Structural summary of a built node, comparable with `==`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShape {
    pub label: String,
    /// `None` for literals, the parser's type name for arguments.
    pub argument_type: Option<&'static str>,
    pub executable: bool,
    pub children: Vec<NodeShape>,
}

/// Mutable node under construction.
pub struct NodeBuilder<S> {
    kind: NodeKind,
    command: Option<Command<S>>,
    requirement: Option<Requirement<S>>,
    children: Vec<NodeBuilder<S>>,
}

impl<S> NodeBuilder<S> {
    pub fn literal(token: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Literal(token.into()))
    }

    pub fn argument(name: impl Into<String>, parser: Arc<dyn ArgumentType>) -> Self {
        Self::from_kind(NodeKind::Argument {
            name: name.into(),
            parser,
        })
    }

    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            command: None,
            requirement: None,
            children: Vec::new(),
        }
    }

    /// Attach (or replace) the handler.
    pub fn executes(&mut self, command: Command<S>) -> &mut Self {
        self.command = Some(command);
        self
    }

    /// Restrict the node to sources accepted by `predicate`.
    pub fn requires(&mut self, predicate: Requirement<S>) -> &mut Self {
        self.requirement = Some(predicate);
        self
    }

    /// Attach a child.
    ///
    /// A child whose label matches an existing child of the same kind is
    /// merged into it: its handler wins if set, and its children are
    /// attached to the existing node in turn.
    pub fn then(&mut self, child: NodeBuilder<S>) -> &mut Self {
        let existing = self
            .children
            .iter_mut()
            .find(|c| same_slot(&c.kind, &child.kind));
        match existing {
            Some(existing) => {
                trace!(parent = %self.kind.label(), child = %child.kind.label(), "Merging child into existing node");
                if child.command.is_some() {
                    existing.command = child.command;
                }
                if child.requirement.is_some() {
                    existing.requirement = child.requirement;
                }
                for grandchild in child.children {
                    existing.then(grandchild);
                }
            }
            None => self.children.push(child),
        }
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn has_command(&self) -> bool {
        self.command.is_some()
    }

    pub fn build(self) -> CommandNode<S> {
        CommandNode {
            kind: self.kind,
            command: self.command,
            requirement: self.requirement,
            children: self.children.into_iter().map(NodeBuilder::build).collect(),
        }
    }
}

fn same_slot(a: &NodeKind, b: &NodeKind) -> bool {
    match (a, b) {
        (NodeKind::Literal(x), NodeKind::Literal(y)) => x == y,
        (NodeKind::Argument { name: x, .. }, NodeKind::Argument { name: y, .. }) => x == y,
        _ => false,
    }
}

impl<S> Clone for NodeBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            command: self.command.clone(),
            requirement: self.requirement.clone(),
            children: self.children.clone(),
        }
    }
}

impl<S> fmt::Debug for NodeBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("kind", &self.kind)
            .field("executable", &self.command.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// An immutable node in an assembled command tree.
pub struct CommandNode<S> {
    kind: NodeKind,
    command: Option<Command<S>>,
    requirement: Option<Requirement<S>>,
    children: Vec<CommandNode<S>>,
}

impl<S> CommandNode<S> {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }

    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    pub fn children(&self) -> &[CommandNode<S>] {
        &self.children
    }

    /// First child with the given label.
    pub fn child(&self, label: &str) -> Option<&CommandNode<S>> {
        self.children.iter().find(|c| c.label() == label)
    }

    /// Whether `source` passes this node's requirement.
    pub fn can_use(&self, source: &S) -> bool {
        self.requirement.as_ref().is_none_or(|req| req(source))
    }

    pub fn shape(&self) -> NodeShape {
        NodeShape {
            label: self.label().to_string(),
            argument_type: match &self.kind {
                NodeKind::Literal(_) => None,
                NodeKind::Argument { parser, .. } => Some(parser.type_name()),
            },
            executable: self.command.is_some(),
            children: self.children.iter().map(CommandNode::shape).collect(),
        }
    }
}

impl<S> Clone for CommandNode<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            command: self.command.clone(),
            requirement: self.requirement.clone(),
            children: self.children.clone(),
        }
    }
}

impl<S> fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("kind", &self.kind)
            .field("executable", &self.command.is_some())
            .field("children", &self.children)
            .finish()
    }
}
