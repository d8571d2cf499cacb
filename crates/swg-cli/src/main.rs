use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swg_core::config::{self, CONFIG_FILE_NAME, SwgConfig};
use swg_core::pipeline::normalize;
use swg_core::{Pipeline, PluginManager, RunContext, Severity, source};
use swg_typescript::TypeScriptPlugin;

#[derive(Parser)]
#[command(name = "swg", about = "Swagger / OpenAPI client generator", version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client from a Swagger 2.0 or OpenAPI 3.x document
    Generate(GenerateArgs),

    /// Normalize a document and report what would be skipped
    Validate {
        /// File path or URL of the document (defaults to the configured input)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Print the normalized definitions and operations
    Inspect {
        /// File path or URL of the document (defaults to the configured input)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .swg.yaml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// File path or URL of the document
    #[arg(short, long)]
    input: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plugin that renders the output
    #[arg(long)]
    plugin: Option<String>,

    /// Only keep paths matching every glob (repeatable)
    #[arg(long = "filter")]
    filter: Vec<String>,

    /// Tag operations with this path segment instead of their declared tags
    #[arg(long)]
    tag_index: Option<usize>,

    /// Word joining path variables in derived operation names
    #[arg(long)]
    conjunction: Option<String>,

    /// Base URL baked into the generated client
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds to wait for a remote document
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load `.swg.yaml` from the current directory, falling back to defaults.
fn load_config() -> Result<SwgConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)?;
    if config.is_none() {
        log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
    }
    Ok(config.unwrap_or_default())
}

/// Command-line flags win over the config file.
fn apply_overrides(mut cfg: SwgConfig, args: GenerateArgs) -> SwgConfig {
    if let Some(input) = args.input {
        cfg.input = input;
    }
    if let Some(output) = args.output {
        cfg.output = output.display().to_string();
    }
    if let Some(plugin) = args.plugin {
        cfg.plugin = plugin;
    }
    if !args.filter.is_empty() {
        cfg.filter = args.filter;
    }
    if args.tag_index.is_some() {
        cfg.tag_index = args.tag_index;
    }
    if let Some(conjunction) = args.conjunction {
        cfg.conjunction = conjunction;
    }
    if args.base_url.is_some() {
        cfg.base_url = args.base_url;
    }
    if let Some(timeout) = args.timeout {
        cfg.timeout_secs = timeout;
    }
    cfg
}

fn plugins() -> PluginManager {
    PluginManager::new().with(TypeScriptPlugin::new())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = apply_overrides(load_config()?, args);
    let ctx = RunContext::from_config(&cfg);

    eprintln!("Generating {} → {} ({})", ctx.input, ctx.output.display(), ctx.plugin);
    let mut plugins = plugins();
    let report = Pipeline::run(&ctx, &mut plugins)
        .with_context(|| format!("failed to generate from {}", ctx.input))?;

    for path in &report.written {
        eprintln!("  wrote {}", path.display());
    }
    let diagnostics = &report.normalized.diagnostics;
    eprintln!(
        "Generated {} files ({} definitions, {} operations, {} diagnostics)",
        report.written.len(),
        report.normalized.definitions.len(),
        report.normalized.operations.len(),
        diagnostics.len()
    );
    Ok(())
}

fn load_normalized(input: Option<String>) -> Result<swg_core::Normalized> {
    let cfg = load_config()?;
    let input = input.unwrap_or_else(|| cfg.input.clone());
    let ctx = RunContext::from_config(&cfg);
    let document = source::load(&input, ctx.timeout)
        .with_context(|| format!("failed to load {input}"))?;
    Ok(normalize(&document, &ctx.paths)?)
}

fn cmd_validate(input: Option<String>) -> Result<()> {
    let normalized = load_normalized(input)?;

    eprintln!("  Definitions: {}", normalized.definitions.len());
    eprintln!("  Operations: {}", normalized.operations.len());
    for diagnostic in normalized.diagnostics.iter() {
        let label = match diagnostic.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        eprintln!("  {label}: {diagnostic}");
    }

    let errors = normalized.diagnostics.with_severity(Severity::Error).count();
    if errors > 0 {
        eprintln!("{errors} entries will be skipped.");
    } else {
        eprintln!("Validation successful.");
    }
    Ok(())
}

fn cmd_inspect(input: Option<String>, format: InspectFormat) -> Result<()> {
    let normalized = load_normalized(input)?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&normalized)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&normalized)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
