use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::GeneratedFile;
use crate::context::RunContext;
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, PipelineError};
use crate::ir::{DefinitionsIr, OperationsIr};
use crate::parse::spec::RawDocument;
use crate::plugin::PluginManager;
use crate::source;
use crate::transform::{PathOptions, PathResolver, resolve_definitions};

/// Both IRs of one document and everything the resolvers had to skip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Normalized {
    pub definitions: DefinitionsIr,
    pub operations: OperationsIr,
    pub diagnostics: Diagnostics,
}

/// Resolve definitions, then paths. Each resolver runs exactly once.
pub fn normalize(document: &RawDocument, options: &PathOptions) -> Result<Normalized, ConfigError> {
    let paths = PathResolver::new(options)?;

    let definitions = resolve_definitions(&document.definitions);
    let operations = paths.resolve(&document.paths);

    let mut diagnostics = document.diagnostics.clone();
    diagnostics.extend(definitions.diagnostics);
    diagnostics.extend(operations.diagnostics);
    Ok(Normalized {
        definitions: definitions.value,
        operations: operations.value,
        diagnostics,
    })
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub normalized: Normalized,
    /// Files written, in plugin output order.
    pub written: Vec<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Load the document named by the context and run the selected plugin on it.
    pub fn run(ctx: &RunContext, plugins: &mut PluginManager) -> Result<RunReport, PipelineError> {
        if !plugins.contains(&ctx.plugin) {
            return Err(unknown_plugin(ctx, plugins));
        }
        let document = source::load(&ctx.input, ctx.timeout)?;
        Self::run_document(ctx, plugins, &document)
    }

    /// Run the selected plugin on an already parsed document.
    ///
    /// Nothing is written unless every hook up to `on_transform` succeeds.
    pub fn run_document(
        ctx: &RunContext,
        plugins: &mut PluginManager,
        document: &RawDocument,
    ) -> Result<RunReport, PipelineError> {
        if !plugins.contains(&ctx.plugin) {
            return Err(unknown_plugin(ctx, plugins));
        }

        let normalized = normalize(document, &ctx.paths)?;
        log::info!(
            "normalized {} definitions and {} operations ({} diagnostics)",
            normalized.definitions.len(),
            normalized.operations.len(),
            normalized.diagnostics.len()
        );

        plugins.setup_all(ctx)?;
        let registered = plugins.ids();
        let plugin = plugins
            .get_mut(&ctx.plugin)
            .ok_or_else(|| PipelineError::UnknownPlugin {
                requested: ctx.plugin.clone(),
                registered,
            })?;
        plugin.on_load(document)?;
        plugin.on_definition(&normalized.definitions)?;
        plugin.on_action(&normalized.operations)?;
        let output = plugin.on_transform(&normalized.definitions, &normalized.operations)?;

        let written = write_files(&ctx.output, output.files())?;
        plugin.on_end()?;

        log::info!("wrote {} files to {}", written.len(), ctx.output.display());
        Ok(RunReport {
            normalized,
            written,
        })
    }
}

fn unknown_plugin(ctx: &RunContext, plugins: &PluginManager) -> PipelineError {
    PipelineError::UnknownPlugin {
        requested: ctx.plugin.clone(),
        registered: plugins.ids(),
    }
}

/// Write generated files under `base`, creating directories as needed.
///
/// Every file is first written to a temporary sibling; the temporaries are
/// renamed into place only once all of them were written, so a failed write
/// leaves no generated file behind.
pub fn write_files<'a>(
    base: &Path,
    files: impl IntoIterator<Item = &'a GeneratedFile>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut staged = Vec::new();
    for file in files {
        let path = base.join(&file.path);
        let parent = path.parent().unwrap_or(base);
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
        let write_err = |source| PipelineError::Write {
            path: path.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
        temp.write_all(file.content.as_bytes()).map_err(write_err)?;
        staged.push((temp, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (temp, path) in staged {
        temp.persist(&path).map_err(|err| PipelineError::Write {
            path: path.clone(),
            source: err.error,
        })?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_write_files_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = [file("a.ts", "a"), file("nested/b.ts", "b")];

        let written = write_files(dir.path(), &files).unwrap();

        assert_eq!(written, [dir.path().join("a.ts"), dir.path().join("nested/b.ts")]);
        assert_eq!(fs::read_to_string(dir.path().join("nested/b.ts")).unwrap(), "b");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 2, "no temporaries remain");
    }

    #[test]
    fn test_failed_write_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed makes the second write fail.
        fs::write(dir.path().join("blocked"), "").unwrap();
        let files = [file("first.ts", "first"), file("blocked/second.ts", "second")];

        let err = write_files(dir.path(), &files).unwrap_err();

        assert!(matches!(err, PipelineError::Write { .. }));
        assert!(!dir.path().join("first.ts").exists());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["blocked"]);
    }
}
