// bparam - inspect and check binding parameter manifests

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bindparam_cli::{listing, logging};
use bindparam_config::RegistrySettings;
use bindparam_engine::{BindingManifest, ManifestError, Registry, RegistryError};

use exit_codes::{
    EXIT_DUPLICATE, EXIT_ERROR, EXIT_MANIFEST, EXIT_SUCCESS, EXIT_UNKNOWN_BINDING, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "bparam")]
#[command(about = "Inspect the parameters bindings declare")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Print registry diagnostics on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file (default: ~/.config/bindparam/settings.json)
    #[arg(long, global = true, env = "BINDPARAM_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bindings a manifest declares
    #[command(after_help = "\
Examples:
  bparam list manifests/hmm_train.toml
  bparam list manifests/*.toml --json")]
    List {
        /// Manifest file(s)
        #[arg(required = true)]
        manifests: Vec<PathBuf>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show every option of one binding
    #[command(after_help = "\
Examples:
  bparam show manifests/perceptron.toml Perceptron
  bparam show manifests/hmm_train.toml HMMTrain --json")]
    Show {
        /// Manifest file
        manifest: PathBuf,

        /// Binding name
        binding: String,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Declare every binding and report problems (duplicates, bad entries)
    Check {
        /// Manifest file(s)
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
    },

    /// Print the effective registry settings
    Settings {
        /// Print only the settings file path
        #[arg(long)]
        path: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("BPARAM_BUILD"),
        "\ntarget:  ", env!("BPARAM_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = match &cli.settings {
        Some(path) => RegistrySettings::load_from(path),
        None => RegistrySettings::load(),
    };

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: bparam <command> [options]");
            eprintln!("       bparam --help for more information");
            Ok(())
        }
        Some(Commands::List { manifests, json }) => cmd_list(&manifests, json, settings),
        Some(Commands::Show { manifest, binding, json }) => cmd_show(&manifest, &binding, json, settings),
        Some(Commands::Check { manifests }) => cmd_check(&manifests, settings),
        Some(Commands::Settings { path }) => cmd_settings(path, cli.settings, settings),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn new(code: u8, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        let code = match &e {
            RegistryError::DuplicateIdentifier { .. } | RegistryError::DuplicateAlias { .. } => EXIT_DUPLICATE,
            RegistryError::UnknownBinding(_) => EXIT_UNKNOWN_BINDING,
            RegistryError::InvalidIdentifier { .. } | RegistryError::InvalidAlias { .. } => EXIT_MANIFEST,
            _ => EXIT_ERROR,
        };
        CliError::new(code, e.to_string())
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        match e {
            ManifestError::Registry(inner) => inner.into(),
            ManifestError::Io(msg) => CliError::new(EXIT_USAGE, msg),
            other => CliError::new(EXIT_MANIFEST, other.to_string()),
        }
    }
}

/// Load and declare every manifest into one registry
fn load_registry(
    paths: &[PathBuf],
    settings: RegistrySettings,
) -> Result<(Vec<BindingManifest>, Registry), CliError> {
    let mut registry = Registry::with_settings(settings);
    let mut manifests = Vec::with_capacity(paths.len());
    for path in paths {
        let manifest = BindingManifest::load(path)?;
        manifest.declare_into(&mut registry).map_err(|e| {
            let err: CliError = e.into();
            CliError::new(err.code, format!("{}: {}", path.display(), err.message))
        })?;
        manifests.push(manifest);
    }
    Ok((manifests, registry))
}

fn cmd_list(paths: &[PathBuf], json: bool, settings: RegistrySettings) -> Result<(), CliError> {
    let (manifests, registry) = load_registry(paths, settings)?;

    let mut summaries = Vec::new();
    for manifest in &manifests {
        for summary in listing::summarize(manifest, &registry) {
            if manifest.binding(&summary.name).is_some()
                && !summaries.iter().any(|s: &listing::BindingSummary| s.name == summary.name)
            {
                summaries.push(summary);
            }
        }
    }
    summaries.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        let out = serde_json::to_string_pretty(&summaries)
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    for s in &summaries {
        println!("{:<20} {:>3} params ({} in, {} out)  {}", s.name, s.params, s.inputs, s.outputs, s.description);
    }
    Ok(())
}

fn cmd_show(path: &Path, binding: &str, json: bool, settings: RegistrySettings) -> Result<(), CliError> {
    let (_, registry) = load_registry(&[path.to_path_buf()], settings)?;

    let rows = listing::param_rows(&registry, binding).map_err(|e| {
        let known = registry.bindings().join(", ");
        CliError::from(e).with_hint(format!("bindings in {}: {}", path.display(), known))
    })?;

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        println!("{}", out);
    } else {
        print!("{}", listing::render_rows(&rows));
    }
    Ok(())
}

fn cmd_check(paths: &[PathBuf], settings: RegistrySettings) -> Result<(), CliError> {
    let (_, registry) = load_registry(paths, settings)?;
    let total: usize = registry
        .bindings()
        .iter()
        .filter_map(|b| registry.snapshot(b))
        .map(|s| s.len())
        .sum();
    println!(
        "ok: {} binding(s), {} parameter(s), {} type(s)",
        registry.bindings().len(),
        total,
        registry.types().len()
    );
    Ok(())
}

fn cmd_settings(path_only: bool, path: Option<PathBuf>, settings: RegistrySettings) -> Result<(), CliError> {
    let path = path
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(RegistrySettings::config_path_display);
    if path_only {
        println!("{}", path);
        return Ok(());
    }
    let out = serde_json::to_string_pretty(&settings)
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    println!("{}", out);
    Ok(())
}
