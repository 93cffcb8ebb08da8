//! Context cell: the binding site for deferred argument reads.
//!
//! Every node of one declared tree shares a single cell. The handler
//! wrapper installed at assembly writes the fresh match context into it
//! right before the caller's handler runs, so [`ArgumentHandle::value`]
//! closures captured at declaration time observe the current dispatch.
//!
//! The cell holds one context at a time. Trees that are dispatched from
//! several threads at once should each be assembled separately.
//!
//! [`ArgumentHandle::value`]: crate::ArgumentHandle::value

use std::sync::{Arc, Mutex, PoisonError};

use cmdtree_core::CommandContext;

pub struct ContextCell<S> {
    slot: Arc<Mutex<Option<Arc<CommandContext<S>>>>>,
    /// Root literal, for the panic message.
    root: Arc<str>,
}

impl<S> ContextCell<S> {
    pub fn new(root: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            root: Arc::from(root),
        }
    }

    /// Replace the held context.
    pub fn set(&self, context: CommandContext<S>) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(context));
    }

    /// The context of the dispatch currently running, if any has run.
    pub fn try_get(&self) -> Option<Arc<CommandContext<S>>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The context of the dispatch currently running.
    ///
    /// # Panics
    ///
    /// Panics if no handler of this tree has been dispatched yet. Reading
    /// argument values outside a handler is a programming error.
    pub fn get(&self) -> Arc<CommandContext<S>> {
        match self.try_get() {
            Some(context) => context,
            None => panic!(
                "context of command '{}' read before any dispatch; argument values are only available inside handlers",
                self.root
            ),
        }
    }

    /// Whether both cells are the same binding site.
    pub fn same_cell(&self, other: &ContextCell<S>) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<S> Clone for ContextCell<S> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            root: Arc::clone(&self.root),
        }
    }
}

impl<S> std::fmt::Debug for ContextCell<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextCell")
            .field("root", &self.root)
            .field("set", &self.try_get().is_some())
            .finish()
    }
}
