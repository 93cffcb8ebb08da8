//! Declared command trees and their assembly into native nodes.
//!
//! Nodes live in an arena owned by [`CommandTree`] and refer to each other
//! by [`NodeId`]. The builder façade mutates the arena during declaration;
//! [`CommandTree::assemble`] then walks it once and produces the native
//! [`NodeBuilder`] graph for the root literal.

use std::sync::Arc;

use cmdtree_core::{
    Command, CommandContext, DslError, NodeBuilder, StructureError, Subcommand,
};
use tracing::{debug, info};

use crate::argument::NativeArgument;
use crate::cell::ContextCell;
use crate::config::BuilderConfig;

/// Post-processing applied to a native node when it is built.
pub type NodeHook<S> = Arc<dyn Fn(&mut NodeBuilder<S>) + Send + Sync>;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// What a declared node matches.
pub enum TreeNodeKind<S> {
    Literal(String),
    Argument(Arc<dyn NativeArgument<S>>),
}

impl<S> TreeNodeKind<S> {
    pub fn label(&self) -> &str {
        match self {
            TreeNodeKind::Literal(token) => token,
            TreeNodeKind::Argument(argument) => argument.name(),
        }
    }
}

/// How the current handler got onto a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOrigin {
    /// `executes` on the node's own scope, before any inline argument.
    Direct,
    /// `executes` after inline arguments moved the scope's cursor.
    Inline,
}

pub struct TreeNode<S> {
    pub(crate) kind: TreeNodeKind<S>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) hooks: Vec<NodeHook<S>>,
    pub(crate) handler: Option<(Command<S>, HandlerOrigin)>,
    pub(crate) children: Vec<NodeId>,
    /// Linear chain of trailing optional arguments, in declaration order.
    pub(crate) optionals: Vec<Arc<dyn NativeArgument<S>>>,
    pub(crate) subcommands: Vec<Arc<dyn Subcommand<S>>>,
}

impl<S> TreeNode<S> {
    fn new(kind: TreeNodeKind<S>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            hooks: Vec::new(),
            handler: None,
            children: Vec::new(),
            optionals: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn optional_chain_len(&self) -> usize {
        self.optionals.len()
    }

    fn is_empty(&self) -> bool {
        self.handler.is_none()
            && self.children.is_empty()
            && self.optionals.is_empty()
            && self.subcommands.is_empty()
    }
}

/// One declared command: the arena, its shared context cell, and the
/// settings it was declared under.
pub struct CommandTree<S> {
    nodes: Vec<TreeNode<S>>,
    cell: ContextCell<S>,
    config: BuilderConfig,
}

impl<S> CommandTree<S> {
    pub fn new(literal: &str, config: BuilderConfig) -> Self {
        Self {
            nodes: vec![TreeNode::new(TreeNodeKind::Literal(literal.to_string()), None)],
            cell: ContextCell::new(literal),
            config,
        }
    }

    pub fn cell(&self) -> &ContextCell<S> {
        &self.cell
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<S> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<S> {
        &mut self.nodes[id.0]
    }

    /// Append a child to `parent` and return its id.
    pub(crate) fn add_child(&mut self, parent: NodeId, kind: TreeNodeKind<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Slash-separated labels from the root to `id`.
    pub fn path(&self, id: NodeId) -> String {
        let mut labels = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            labels.push(node.label());
            current = node.parent;
        }
        labels.reverse();
        labels.join("/")
    }
}

impl<S: Clone + Send + Sync + 'static> CommandTree<S> {
    /// Assemble the declared tree into the root literal's native node.
    pub fn assemble(&self) -> Result<NodeBuilder<S>, DslError> {
        let root = self.assemble_node(NodeId::ROOT, 0)?;
        info!(
            command = %self.node(NodeId::ROOT).label(),
            nodes = self.nodes.len(),
            "Assembled command tree"
        );
        Ok(root)
    }

    fn assemble_node(&self, id: NodeId, depth: usize) -> Result<NodeBuilder<S>, DslError> {
        let node = self.node(id);

        if depth + node.optionals.len() > self.config.max_depth {
            return Err(StructureError::TooDeep {
                path: self.path(id),
                max_depth: self.config.max_depth,
            }
            .into());
        }
        if node.is_empty() {
            return Err(StructureError::EmptyNode { path: self.path(id) }.into());
        }

        let mut native = self.native_node(node);

        let handler = node.handler.as_ref().map(|(command, _)| command);
        if let Some(command) = handler {
            native.executes(self.wrap(command));
        }

        for subcommand in &node.subcommands {
            native.then(subcommand.build_literal()?);
        }

        for &child in &node.children {
            native.then(self.assemble_node(child, depth + 1)?);
        }

        // Right fold: the last optional is the innermost link, and every
        // link carries the handler so each arity dispatches. The chain is
        // always declared last, so it goes after every other child.
        if !node.optionals.is_empty() {
            let command = handler.ok_or_else(|| StructureError::OptionalChainWithoutHandler {
                path: self.path(id),
            })?;
            let mut chain: Option<NodeBuilder<S>> = None;
            for argument in node.optionals.iter().rev() {
                let mut link = argument.build_argument();
                link.executes(self.wrap(command));
                if let Some(inner) = chain.take() {
                    link.then(inner);
                }
                chain = Some(link);
            }
            if let Some(chain) = chain {
                native.then(chain);
            }
        }

        debug!(
            path = %self.path(id),
            children = node.children.len(),
            optional_chain = node.optionals.len(),
            subcommands = node.subcommands.len(),
            executable = handler.is_some(),
            "Assembled node"
        );
        Ok(native)
    }

    fn native_node(&self, node: &TreeNode<S>) -> NodeBuilder<S> {
        let mut native = match &node.kind {
            TreeNodeKind::Literal(token) => NodeBuilder::literal(token.clone()),
            TreeNodeKind::Argument(argument) => argument.build_argument(),
        };
        for hook in &node.hooks {
            hook(&mut native);
        }
        native
    }

    /// Publish the context to the cell, then run the caller's handler.
    fn wrap(&self, command: &Command<S>) -> Command<S> {
        let cell = self.cell.clone();
        let command = Arc::clone(command);
        Arc::new(move |context: &CommandContext<S>| {
            cell.set(context.clone());
            command(context)
        })
    }
}
