//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use copyscan_annotate::AnnotateClient;
use copyscan_core::compare::compare_documents;
use copyscan_core::pipeline::{CheckOrchestrator, ProgressReporter};
use copyscan_extract::extract_text;
use copyscan_fetch::Fetcher;
use copyscan_search::SearchClient;
use copyscan_shared::{
    AggregateReport, AnnotateConfig, AppConfig, FetchConfig, PipelineConfig, SearchConfig,
    init_config, load_config, resolve_api_key,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// copyscan — sentence-level web plagiarism detection.
#[derive(Parser)]
#[command(
    name = "copyscan",
    version,
    about = "Check documents for plagiarism against web sources.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
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
    /// Check a document for plagiarism against web sources.
    Check {
        /// Document to check (.txt, .pdf, or .docx).
        file: Option<PathBuf>,

        /// Inline text to check instead of a file.
        #[arg(long)]
        text: Option<String>,

        /// Print the raw JSON report instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Compare two documents for whole-text similarity.
    Compare {
        /// First document.
        file1: PathBuf,

        /// Second document.
        file2: PathBuf,

        /// Print the raw JSON result instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Extract SEO keywords from a document via the annotation API.
    Keywords {
        /// Document to annotate (.txt, .pdf, or .docx).
        file: Option<PathBuf>,

        /// Inline text to annotate instead of a file.
        #[arg(long)]
        text: Option<String>,

        /// Print the raw JSON keyword list.
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
    /// Initialize config file with defaults.
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
        0 => "copyscan=info",
        1 => "copyscan=debug",
        _ => "copyscan=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check { file, text, json } => {
            cmd_check(file.as_deref(), text.as_deref(), json).await
        }
        Command::Compare { file1, file2, json } => cmd_compare(&file1, &file2, json).await,
        Command::Keywords { file, text, json } => {
            cmd_keywords(file.as_deref(), text.as_deref(), json).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Input resolution
// ---------------------------------------------------------------------------

/// Resolve the document text from a file path or inline text.
/// A file path wins when both are given.
fn resolve_input(file: Option<&Path>, text: Option<&str>) -> Result<String> {
    match (file, text) {
        (Some(path), _) => Ok(read_document(path)?.1),
        (None, Some(text)) => Ok(text.to_string()),
        (None, None) => Err(eyre!("provide a file path or --text")),
    }
}

/// Read a document from disk and extract its text.
fn read_document(path: &Path) -> Result<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre!("path '{}' has no file name", path.display()))?;

    let bytes =
        std::fs::read(path).map_err(|e| eyre!("cannot read '{}': {e}", path.display()))?;

    let text = extract_text(name, &bytes)?;
    Ok((name.to_string(), text))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_check(file: Option<&Path>, text: Option<&str>, json: bool) -> Result<()> {
    let config = load_config()?;
    let text = resolve_input(file, text)?;

    let search = SearchClient::new(&SearchConfig::from(&config))?;
    let fetcher = Fetcher::new(&FetchConfig::from(&config))?;
    let orchestrator = CheckOrchestrator::new(PipelineConfig::from(&config), search, fetcher);

    info!(chars = text.len(), "checking document");

    let reporter = CliProgress::new();
    let report = orchestrator.run(&text, &reporter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    if let Some(message) = &report.message {
        println!("  {message}");
    } else {
        println!("  Plagiarism check complete!");
    }
    println!(
        "  Overall similarity: {:.1}%",
        report.overall_similarity * 100.0
    );
    println!(
        "  Matched sentences:  {} of {}",
        report.matched_sentences, report.total_sentences
    );
    if !report.results.is_empty() {
        println!();
        for result in &report.results {
            println!("  {:>5.1}%  {}", result.similarity * 100.0, result.url);
        }
    }
    println!();

    Ok(())
}

async fn cmd_compare(file1: &Path, file2: &Path, json: bool) -> Result<()> {
    let (name1, text1) = read_document(file1)?;
    let (name2, text2) = read_document(file2)?;

    info!(file1 = %name1, file2 = %name2, "comparing documents");

    let comparison = compare_documents(&name1, &text1, &name2, &text2);

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!();
    println!("  {} vs {}", comparison.file1_name, comparison.file2_name);
    println!("  Similarity: {:.1}%", comparison.similarity * 100.0);
    println!();

    Ok(())
}

async fn cmd_keywords(file: Option<&Path>, text: Option<&str>, json: bool) -> Result<()> {
    // Validate the API key before reading anything
    let config = load_config()?;
    let api_key = resolve_api_key(&config)?;

    let text = resolve_input(file, text)?;
    let client = AnnotateClient::new(&AnnotateConfig::from(&config), api_key)?;

    info!(chars = text.len(), "extracting keywords");

    let keywords = client.extract_keywords(&text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&keywords)?);
        return Ok(());
    }

    println!();
    if keywords.is_empty() {
        println!("  No keywords found.");
    } else {
        for keyword in &keywords {
            println!("  {keyword}");
        }
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn sentences(&self, total: usize) {
        self.spinner.set_message(format!("Checking {total} sentences"));
    }

    fn done(&self, _report: &AggregateReport) {
        self.spinner.finish_and_clear();
    }
}
