//! Subcommand trait: anything that can contribute a whole literal subtree.

use std::sync::Arc;

use crate::error::DslError;
use crate::node::NodeBuilder;

/// A pre-built command group.
///
/// Implementors produce one root literal node on demand. The result is
/// attached as a child wherever the group is registered, so each call
/// must return a fresh builder.
pub trait Subcommand<S>: Send + Sync {
    /// The literal this group is rooted at.
    fn literal(&self) -> &str;

    /// Build the group's root literal node.
    fn build_literal(&self) -> Result<NodeBuilder<S>, DslError>;
}

impl<S, T: Subcommand<S> + ?Sized> Subcommand<S> for Arc<T> {
    fn literal(&self) -> &str {
        (**self).literal()
    }

    fn build_literal(&self) -> Result<NodeBuilder<S>, DslError> {
        (**self).build_literal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CommandContext;
    use crate::node::SINGLE_SUCCESS;

    struct Version;

    impl Subcommand<()> for Version {
        fn literal(&self) -> &str {
            "version"
        }

        fn build_literal(&self) -> Result<NodeBuilder<()>, DslError> {
            let mut node = NodeBuilder::literal(self.literal());
            node.executes(Arc::new(|_: &CommandContext<()>| Ok(SINGLE_SUCCESS)));
            Ok(node)
        }
    }

    #[test]
    fn trait_object_builds_fresh_literal() {
        let group: Box<dyn Subcommand<()>> = Box::new(Version);
        let first = group.build_literal().unwrap().build();
        let second = group.build_literal().unwrap().build();
        assert_eq!(first.shape(), second.shape());
        assert_eq!(first.label(), "version");
    }

    #[test]
    fn shared_groups_are_subcommands_too() {
        let group: Arc<dyn Subcommand<()>> = Arc::new(Version);
        assert_eq!(group.literal(), "version");
        assert!(group.build_literal().unwrap().has_command());
    }
}
