//! CLI binary for label-pdf.
//!
//! A thin shim over the library crate: reads a JSON export of the label
//! table, applies the same selection rules a web layer would, and writes
//! the PDF.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use label_pdf::{
    find_label, select_labels, sort_by_name, CurrencyFormat, Label, LabelQuery, LabelRenderer,
    ProgressCallback, RenderConfig, RenderProgressCallback, RenderedDocument,
};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status when a batch selection is empty.
const EXIT_NOTHING_TO_EXPORT: u8 = 2;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Progress bar over the labels of a batch, with one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} labels",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Laying out");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RenderProgressCallback for CliProgressCallback {
    fn on_render_start(&self, total_labels: usize) {
        self.bar.set_length(total_labels as u64);
    }

    fn on_label_placed(&self, _index: usize, _page_num: usize) {
        self.bar.inc(1);
    }

    fn on_page_break(&self, page_num: usize) {
        self.bar.println(format!("  {} page {}", dim("↳"), page_num));
    }

    fn on_render_complete(&self, total_labels: usize, page_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} labels on {} page(s)",
            green("✔"),
            bold(&total_labels.to_string()),
            page_count
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every active label, sorted by name, into ./all_labels.pdf
  labelpdf labels.json

  # One label by id, checking it belongs to user 7
  labelpdf labels.json --id 42 --owner 7 -o out/

  # One label by product code
  labelpdf labels.json --code W-001

  # Search, euro prices with a comma
  labelpdf labels.json --search tools --currency "€ {amount}" --decimal-separator ,

INPUT:
  A JSON array of labels, or an object with a "labels" array. Each label has
  id, name, code and optionally category, price, size (small|medium|large),
  description, owner_id, active, created_at.

EXIT STATUS:
  0  document written
  1  error
  2  selection was empty, nothing exported

ENVIRONMENT VARIABLES:
  LABELPDF_OUTPUT    Default for --output
  LABELPDF_CONFIG    Default for --config
  LABELPDF_CURRENCY  Default for --currency
  LABELPDF_VERBOSE   Same as -v
  LABELPDF_QUIET     Same as -q
  RUST_LOG           Overrides the log filter
"#;

/// Render product labels to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "labelpdf",
    version,
    about = "Render product labels from a JSON export to PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON file holding the labels.
    input: PathBuf,

    /// Render the single label with this id (with QR code).
    #[arg(long, conflicts_with_all = ["code", "all"])]
    id: Option<u64>,

    /// Render the single label with this product code (with QR code).
    #[arg(long, conflicts_with = "all")]
    code: Option<String>,

    /// Render every selected label as a batch sheet (the default).
    #[arg(long)]
    all: bool,

    /// Only consider labels owned by this user.
    #[arg(long)]
    owner: Option<u64>,

    /// Case-insensitive filter on name, code and category (batch only).
    #[arg(long)]
    search: Option<String>,

    /// Also consider soft-deleted labels.
    #[arg(long)]
    include_inactive: bool,

    /// Output file or directory. Directories get the suggested filename.
    #[arg(short, long, env = "LABELPDF_OUTPUT", default_value = ".")]
    output: PathBuf,

    /// JSON render config; missing fields take their defaults.
    #[arg(long, env = "LABELPDF_CONFIG")]
    config: Option<PathBuf>,

    /// Price template with an {amount} placeholder, e.g. "R$ {amount}".
    #[arg(long, env = "LABELPDF_CURRENCY")]
    currency: Option<String>,

    /// Decimal separator for prices.
    #[arg(long)]
    decimal_separator: Option<char>,

    /// Do not outline batch bands.
    #[arg(long)]
    no_band_border: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LABELPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LABELPDF_QUIET")]
    quiet: bool,
}

impl Cli {
    fn is_single(&self) -> bool {
        self.id.is_some() || self.code.is_some()
    }
}

/// Accepted input shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelsFile {
    List(Vec<Label>),
    Wrapped { labels: Vec<Label> },
}

impl LabelsFile {
    fn into_labels(self) -> Vec<Label> {
        match self {
            LabelsFile::List(labels) | LabelsFile::Wrapped { labels } => labels,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs for batch runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.is_single();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load input ───────────────────────────────────────────────────────
    let labels = load_labels(&cli.input).await?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn RenderProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;
    let renderer = LabelRenderer::new(config);

    let query = LabelQuery {
        owner_id: cli.owner,
        term: None,
        include_inactive: cli.include_inactive,
    };

    // ── Render ───────────────────────────────────────────────────────────
    let doc = if cli.is_single() {
        let pool = select_labels(&labels, &query);
        let label = pick_single(&cli, &pool)?.clone();
        renderer
            .render_one_async(label)
            .await
            .context("Label render failed")?
    } else {
        let query = LabelQuery {
            term: cli.search.clone(),
            ..query
        };
        let mut selected = select_labels(&labels, &query);
        if selected.is_empty() {
            eprintln!("nothing to export");
            return Ok(ExitCode::from(EXIT_NOTHING_TO_EXPORT));
        }
        sort_by_name(&mut selected);
        renderer
            .render_many_async(selected)
            .await
            .context("Batch render failed")?
    };

    let path = renderer
        .render_to_file(&doc, &cli.output)
        .context("Failed to write PDF")?;

    if !cli.quiet {
        print_summary(&doc, &path);
    }
    Ok(ExitCode::SUCCESS)
}

async fn load_labels(path: &Path) -> Result<Vec<Label>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read labels from {:?}", path))?;
    let file: LabelsFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse labels in {:?}", path))?;
    Ok(file.into_labels())
}

/// Map CLI args to `RenderConfig`. Flags override the config file.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenderConfig> {
    let mut config = match cli.config {
        Some(ref path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => RenderConfig::default(),
    };

    if let Some(ref template) = cli.currency {
        config.currency = CurrencyFormat::new(template.clone(), config.currency.decimal_separator);
    }
    if let Some(sep) = cli.decimal_separator {
        config.currency.decimal_separator = sep;
    }
    if cli.no_band_border {
        config.batch.border_width = None;
    }
    config.progress_callback = progress;

    config.validate().context("Invalid render configuration")?;
    Ok(config)
}

fn pick_single<'a>(cli: &Cli, pool: &'a [Label]) -> Result<&'a Label> {
    if let Some(id) = cli.id {
        return Ok(find_label(pool, id, cli.owner)?);
    }
    let code = cli.code.as_deref().unwrap_or_default();
    pool.iter()
        .find(|l| l.code == code)
        .ok_or_else(|| anyhow!("No label with code {:?}", code))
}

fn print_summary(doc: &RenderedDocument, path: &Path) {
    eprintln!(
        "{}  {} label(s)  {} page(s)  {}  →  {}",
        cyan("◆"),
        doc.label_count,
        doc.page_count,
        dim(&format!("{} bytes", doc.len())),
        bold(&path.display().to_string()),
    );
}
