//! Sample commands.

use cmdtree_core::DslError;
use cmdtree_dsl::BuilderConfig;
use cmdtree_testkit::Dispatcher;

pub mod echo;
pub mod feature;
pub mod tp;

/// Assemble every sample command with `config` and register it.
pub fn register(dispatcher: &mut Dispatcher<String>, config: &BuilderConfig) -> Result<(), DslError> {
    dispatcher.register_command(&tp::command().with_config(config.clone()))?;
    dispatcher.register_command(&feature::command(feature::Toggle::default()).with_config(config.clone()))?;
    dispatcher.register_command(&echo::command().with_config(config.clone()))?;
    Ok(())
}
