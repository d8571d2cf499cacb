use crate::GeneratedFile;
use crate::context::RunContext;
use crate::error::PluginError;
use crate::ir::{DefinitionsIr, OperationsIr};
use crate::parse::spec::RawDocument;

/// Files a plugin produced from the two IRs. Paths are relative to the run's
/// output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    pub definition: Vec<GeneratedFile>,
    pub action: Vec<GeneratedFile>,
}

impl TransformOutput {
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.definition.iter().chain(&self.action)
    }

    pub fn len(&self) -> usize {
        self.definition.len() + self.action.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A code generation plugin.
///
/// Hooks run in order: `setup`, `on_load`, `on_definition`, `on_action`,
/// `on_transform`, then the output is written, then `on_end`. Only `setup` is
/// mandatory.
pub trait Plugin {
    /// Identifier the run selects the plugin by.
    fn id(&self) -> &str;

    fn setup(&mut self, ctx: &RunContext) -> Result<(), PluginError>;

    fn on_load(&mut self, _document: &RawDocument) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_definition(&mut self, _definitions: &DefinitionsIr) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_action(&mut self, _operations: &OperationsIr) -> Result<(), PluginError> {
        Ok(())
    }

    fn on_transform(
        &mut self,
        _definitions: &DefinitionsIr,
        _operations: &OperationsIr,
    ) -> Result<TransformOutput, PluginError> {
        Ok(TransformOutput::default())
    }

    fn on_end(&mut self) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Registered plugins, in registration order.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. A plugin with the same id replaces the earlier one
    /// in its position.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        match self.plugins.iter().position(|p| p.id() == plugin.id()) {
            Some(index) => {
                log::warn!("plugin `{}` registered twice, replacing", plugin.id());
                self.plugins[index] = plugin;
            }
            None => {
                log::debug!("registered plugin `{}`", plugin.id());
                self.plugins.push(plugin);
            }
        }
    }

    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.register(Box::new(plugin));
        self
    }

    pub fn ids(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.id().to_string()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Plugin + 'static)> {
        self.plugins
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|p| p.as_mut())
    }

    /// Run `setup` on every plugin, one at a time, stopping at the first failure.
    pub fn setup_all(&mut self, ctx: &RunContext) -> Result<(), PluginError> {
        for plugin in &mut self.plugins {
            log::debug!("setting up plugin `{}`", plugin.id());
            plugin.setup(ctx)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
