use std::collections::HashSet;

use minijinja::Environment;
use swg_core::error::PluginError;
use swg_core::ir::{DefinitionsIr, OperationsIr};
use swg_core::parse::spec::RawDocument;
use swg_core::transform::name_normalizer::base_name;
use swg_core::{GeneratedFile, Plugin, RunContext, TransformOutput};

use crate::emitters;

pub const PLUGIN_ID: &str = "typescript";

/// Renders a typed TypeScript client: `definitions.ts`, `client.ts`, one
/// module per tag and an `index.ts` barrel.
#[derive(Default)]
pub struct TypeScriptPlugin {
    env: Option<Environment<'static>>,
    base_url: String,
    title: String,
}

impl TypeScriptPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_error(err: minijinja::Error) -> PluginError {
        PluginError::Render {
            plugin: PLUGIN_ID.to_string(),
            message: err.to_string(),
        }
    }
}

impl Plugin for TypeScriptPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn setup(&mut self, ctx: &RunContext) -> Result<(), PluginError> {
        let env = emitters::environment().map_err(|err| PluginError::Setup {
            plugin: PLUGIN_ID.to_string(),
            message: err.to_string(),
        })?;
        self.env = Some(env);
        self.base_url = ctx.base_url.clone().unwrap_or_default();
        Ok(())
    }

    fn on_load(&mut self, document: &RawDocument) -> Result<(), PluginError> {
        self.title = document.info.title.clone();
        log::info!(
            "generating TypeScript client for {} {}",
            document.info.title,
            document.info.version
        );
        Ok(())
    }

    fn on_transform(
        &mut self,
        definitions: &DefinitionsIr,
        operations: &OperationsIr,
    ) -> Result<TransformOutput, PluginError> {
        let env = self.env.as_ref().ok_or_else(|| PluginError::NotReady {
            plugin: PLUGIN_ID.to_string(),
        })?;

        let definition_file = GeneratedFile {
            path: "definitions.ts".to_string(),
            content: emitters::definitions::emit_definitions(env, &self.title, definitions)
                .map_err(Self::render_error)?,
        };

        let exported: HashSet<String> = definitions
            .names()
            .map(|name| base_name(name).to_string())
            .collect();
        let modules = emitters::actions::emit_actions(env, &exported, operations)
            .map_err(Self::render_error)?;
        let module_names: Vec<String> = modules.iter().map(|m| m.module.clone()).collect();

        let mut action = Vec::with_capacity(modules.len() + 2);
        action.push(GeneratedFile {
            path: "client.ts".to_string(),
            content: emitters::client::emit_client(env, &self.base_url)
                .map_err(Self::render_error)?,
        });
        action.extend(modules.into_iter().map(|m| GeneratedFile {
            path: format!("{}.ts", m.module),
            content: m.content,
        }));
        action.push(GeneratedFile {
            path: "index.ts".to_string(),
            content: emitters::client::emit_index(env, &module_names)
                .map_err(Self::render_error)?,
        });

        Ok(TransformOutput {
            definition: vec![definition_file],
            action,
        })
    }

    fn on_end(&mut self) -> Result<(), PluginError> {
        log::debug!("TypeScript client rendered");
        Ok(())
    }
}
