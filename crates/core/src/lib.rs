//! # cmdtree Core
//!
//! The native command-tree model that declaration builders assemble into
//! and that matching engines walk: match contexts, argument values,
//! primitive argument parsers, node builders and built nodes.
//!
//! ## Design Philosophy
//!
//! Nothing here knows how trees are declared. The `cmdtree-dsl` crate
//! produces [`NodeBuilder`] trees; a matching engine consumes the
//! [`CommandNode`] they build into. Both depend inward on this crate.

pub mod arguments;
pub mod context;
pub mod error;
pub mod node;
pub mod subcommand;

// Re-export key types at crate root for ergonomics
pub use arguments::{
    ArgumentType, BoolArgumentType, DoubleArgumentType, FloatArgumentType, IntegerArgumentType,
    LongArgumentType, StringArgumentType,
};
pub use context::{ArgumentValue, CommandContext, FromArgument};
pub use error::{ArgumentError, CommandError, DslError, Result, StructureError, UsageError};
pub use node::{Command, CommandNode, NodeBuilder, NodeKind, NodeShape, Requirement, SINGLE_SUCCESS};
pub use subcommand::Subcommand;
