//! Declared commands: the entry point of the DSL.
//!
//! ```
//! use cmdtree_dsl::{command, int};
//!
//! let tp = command::<(), _>("tp", |b| {
//!     let x = b.inline(int("x"))?;
//!     let y = b.inline(int("y").default(0))?;
//!     b.executes(move |ctx| Ok(x.get(ctx)? + y.get(ctx)?))
//! });
//! let root = tp.build().unwrap();
//! assert_eq!(root.label(), "tp");
//! ```

use std::fmt;
use std::sync::Arc;

use cmdtree_core::{CommandNode, NodeBuilder, Result, Subcommand};

use crate::builder::CommandBuilder;
use crate::config::BuilderConfig;
use crate::tree::{CommandTree, NodeHook, NodeId};

type Declaration<S> = Arc<dyn Fn(&mut CommandBuilder<'_, S>) -> Result<()> + Send + Sync>;

/// A root literal plus the declarations below it.
///
/// Every call to [`build_literal`](Subcommand::build_literal) replays the
/// declarations against a fresh tree with its own context cell, so one
/// `DslCommand` can be registered in several dispatchers.
pub struct DslCommand<S> {
    literal: String,
    hook: Option<NodeHook<S>>,
    config: BuilderConfig,
    declaration: Declaration<S>,
}

impl<S> DslCommand<S> {
    pub fn new(
        literal: impl Into<String>,
        declaration: impl Fn(&mut CommandBuilder<'_, S>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            literal: literal.into(),
            hook: None,
            config: BuilderConfig::default(),
            declaration: Arc::new(declaration),
        }
    }

    /// Customize the root literal's native builder.
    pub fn apply(mut self, hook: impl Fn(&mut NodeBuilder<S>) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the declarations into a fresh tree without assembling it.
    pub fn declare(&self) -> Result<CommandTree<S>> {
        let mut tree = CommandTree::new(&self.literal, self.config.clone());
        if let Some(hook) = &self.hook {
            tree.node_mut(NodeId::ROOT).hooks.push(Arc::clone(hook));
        }
        (self.declaration)(&mut CommandBuilder::new(&mut tree, NodeId::ROOT))?;
        Ok(tree)
    }
}

impl<S: Clone + Send + Sync + 'static> DslCommand<S> {
    /// Declare, assemble and build the root node in one step.
    pub fn build(&self) -> Result<CommandNode<S>> {
        Ok(self.build_literal()?.build())
    }
}

impl<S: Clone + Send + Sync + 'static> Subcommand<S> for DslCommand<S> {
    fn literal(&self) -> &str {
        &self.literal
    }

    fn build_literal(&self) -> Result<NodeBuilder<S>> {
        self.declare()?.assemble()
    }
}

impl<S> fmt::Debug for DslCommand<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DslCommand")
            .field("literal", &self.literal)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Declare a command rooted at `literal`.
pub fn command<S, F>(literal: &str, declaration: F) -> DslCommand<S>
where
    F: Fn(&mut CommandBuilder<'_, S>) -> Result<()> + Send + Sync + 'static,
{
    DslCommand::new(literal, declaration)
}
