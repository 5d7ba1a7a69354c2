//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use unidoc_core::pipeline::{self, AssemblyReporter, ManualStatus, RunSummary};
use unidoc_shared::{AppConfig, AssemblyConfig, CONFIG_FILE_NAME, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// unidoc — assemble documentation manuals from reusable components.
#[derive(Parser)]
#[command(
    name = "unidoc",
    version,
    about = "Assemble Markdown manuals from YAML-declared component lists.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./unidoc.toml, then ~/.unidoc/unidoc.toml).
    #[arg(long, global = true, env = "UNIDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Documentation root holding manuals/ and content/components/.
    #[arg(long, global = true)]
    pub docs_dir: Option<PathBuf>,

    /// Output directory for assembled manuals.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `assemble`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Assemble every manual and write it to the output and docs directories.
    Assemble,

    /// Validate manuals and their components without writing anything.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List manual definitions.
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default unidoc.toml.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "unidoc=info",
        1 => "unidoc=debug",
        _ => "unidoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    let app_config = resolve_config(&cli)?;

    match cli.command.unwrap_or(Command::Assemble) {
        Command::Assemble => cmd_assemble(&app_config).await,
        Command::Check { json } => cmd_check(&app_config, json).await,
        Command::List { json } => cmd_list(&app_config, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(cli.config.as_deref()),
            ConfigAction::Show => cmd_config_show(&app_config),
        },
    }
}

/// Load the config file and apply path overrides from flags.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.command {
        // `config init` must work before any config file exists.
        Some(Command::Config {
            action: ConfigAction::Init,
        }) => AppConfig::default(),
        _ => load_config(cli.config.as_deref())?,
    };

    if let Some(dir) = &cli.docs_dir {
        config.paths.docs_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cli.output_dir {
        config.paths.output_dir = dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Run blocking pipeline work; Ctrl-C aborts the process immediately.
async fn interruptible<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);

    tokio::select! {
        joined = handle => joined.map_err(|e| eyre!("assembly task failed: {e}")),
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("assembly interrupted by user");
            std::process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_assemble(config: &AppConfig) -> Result<ExitCode> {
    let assembly = AssemblyConfig::from(config);
    info!(
        docs = %assembly.docs_dir.display(),
        output = %assembly.output_dir.display(),
        "assembling manuals"
    );

    let summary = interruptible(move || {
        let reporter = CliProgress::new();
        pipeline::run(&assembly, &reporter)
    })
    .await??;

    print_summary(config, &summary);

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(config: &AppConfig, summary: &RunSummary) {
    println!();
    if summary.discovered == 0 {
        println!("  No manual definition files found.");
        println!();
        return;
    }

    println!("  Assembly complete!");
    println!("  Successful: {} manuals", summary.succeeded.len());
    for outcome in &summary.succeeded {
        println!(
            "    ✓ {:<20} {:>8} bytes  sha256:{}",
            outcome.identity,
            outcome.size_bytes,
            &outcome.sha256[..12]
        );
    }

    if !summary.failed.is_empty() {
        println!("  Failed:     {} manuals", summary.failed.len());
        for failure in &summary.failed {
            println!("    ✗ {}: {}", failure.identity, failure.reason);
        }
        println!();
        return;
    }

    println!("  Output: {}/", config.paths.output_dir);
    println!("  Site:   {}/", config.paths.docs_dir);
    println!();
    println!("  Next steps:");
    println!("    Build website: {}", config.next_steps.site);
    println!("    Generate PDFs: {}", config.next_steps.pdf);
    println!();
}

async fn cmd_check(config: &AppConfig, json: bool) -> Result<ExitCode> {
    let assembly = AssemblyConfig::from(config);
    let statuses = interruptible(move || {
        let reporter = CliProgress::new();
        let result = pipeline::check(&assembly, &reporter);
        reporter.spinner.finish_and_clear();
        result
    })
    .await??;

    print_statuses(&statuses, json)?;

    let ok = !statuses.is_empty() && statuses.iter().all(ManualStatus::is_valid);
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn cmd_list(config: &AppConfig, json: bool) -> Result<ExitCode> {
    let assembly = AssemblyConfig::from(config);
    let statuses = interruptible(move || pipeline::list(&assembly)).await??;

    print_statuses(&statuses, json)?;
    Ok(ExitCode::SUCCESS)
}

fn print_statuses(statuses: &[ManualStatus], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No manual definitions found.");
        return Ok(());
    }

    for status in statuses {
        match (&status.title, &status.error) {
            (_, Some(err)) => println!("  ✗ {:<20} {err}", status.identity),
            (Some(title), None) => println!(
                "  ✓ {:<20} {title} ({} chapters)",
                status.identity, status.chapters
            ),
            (None, None) => println!("  ✓ {}", status.identity),
        }
    }
    Ok(())
}

fn cmd_config_init(explicit: Option<&Path>) -> Result<ExitCode> {
    let path = explicit.unwrap_or(Path::new(CONFIG_FILE_NAME));
    init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(config: &AppConfig) -> Result<ExitCode> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl AssemblyReporter for CliProgress {
    fn discovered(&self, count: usize) {
        self.spinner.set_message(format!("Found {count} manual definition(s)"));
    }

    fn manual_started(&self, identity: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Assembling [{current}/{total}] {identity}"));
    }

    fn chapter_loading(&self, identity: &str, path_spec: &str) {
        self.spinner.set_message(format!("{identity}: {path_spec}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
