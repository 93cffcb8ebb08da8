//! # cmdtree DSL
//!
//! Declarative construction of command-dispatch trees. A command is
//! described top-down as nested literals and typed arguments with handlers
//! attached; the declaration is then assembled once into the native
//! [`NodeBuilder`](cmdtree_core::NodeBuilder) graph a matching engine
//! registers.
//!
//! ```text
//!  command("tp", |b| ..)        declaration closure
//!        │
//!        ▼
//!  CommandBuilder ──▶ CommandTree (arena of TreeNode)
//!                          │ assemble()
//!                          ▼
//!                    NodeBuilder<S> ──▶ external engine
//! ```
//!
//! Handlers read argument values through [`ArgumentHandle`]s handed out at
//! declaration time, either from the context they are called with or from
//! the tree's [`ContextCell`].

pub mod argument;
pub mod builder;
pub mod cell;
pub mod command;
pub mod config;
pub mod tree;

pub use argument::{
    CommandArgument, DefaultArgument, NativeArgument, OptionalArgument, Presence,
    RequiredArgument, boolean, double, double_range, float, float_range, greedy_string, int,
    int_range, long, long_range, string, word,
};
pub use builder::{ArgumentHandle, CommandBuilder};
pub use cell::ContextCell;
pub use command::{DslCommand, command};
pub use config::BuilderConfig;
pub use tree::{CommandTree, NodeHook, NodeId};
