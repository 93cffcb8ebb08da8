//! Test kit for cmdtree.
//!
//! Provides [`Dispatcher`], a small matching engine that walks assembled
//! command trees against a line of input. It stands in for a host's real
//! engine in tests and demos.

mod dispatcher;

pub use dispatcher::{DispatchError, Dispatcher, ParseResult};
