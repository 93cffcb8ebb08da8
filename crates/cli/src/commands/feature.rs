use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cmdtree_core::SINGLE_SUCCESS;
use cmdtree_dsl::DslCommand;

/// Shared on/off state of the demo feature.
#[derive(Debug, Clone, Default)]
pub struct Toggle(Arc<AtomicBool>);

impl Toggle {
    pub fn is_on(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, on: bool) {
        self.0.store(on, Ordering::SeqCst);
    }
}

fn switch(literal: &'static str, on: bool, toggle: Toggle) -> DslCommand<String> {
    cmdtree_dsl::command(literal, move |b| {
        let toggle = toggle.clone();
        b.runs(move |source| {
            toggle.set(on);
            println!("Feature turned {literal} by {source}");
        })
    })
}

/// `feature [on|off]`; the bare form reports the current state.
pub fn command(toggle: Toggle) -> DslCommand<String> {
    let on = Arc::new(switch("on", true, toggle.clone()));
    let off = Arc::new(switch("off", false, toggle.clone()));
    cmdtree_dsl::command("feature", move |b| {
        b.subcommands([Arc::clone(&on), Arc::clone(&off)])?;
        let toggle = toggle.clone();
        b.executes(move |_| {
            println!("Feature is {}", if toggle.is_on() { "on" } else { "off" });
            Ok(if toggle.is_on() { SINGLE_SUCCESS } else { 0 })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_testkit::Dispatcher;

    #[test]
    fn subcommands_flip_the_shared_state() {
        let toggle = Toggle::default();
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_command(&command(toggle.clone())).unwrap();

        assert_eq!(dispatcher.execute("feature", "console".into()).unwrap(), 0);
        dispatcher.execute("feature on", "console".into()).unwrap();
        assert!(toggle.is_on());
        assert_eq!(dispatcher.execute("feature", "console".into()).unwrap(), SINGLE_SUCCESS);
        dispatcher.execute("feature off", "console".into()).unwrap();
        assert!(!toggle.is_on());
    }
}
