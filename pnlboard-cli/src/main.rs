//! PnLBoard CLI: generate, dashboard, export, and config commands.
//!
//! Commands:
//! - `generate`: generate one month of daily PnL for a label, year and target
//! - `dashboard`: print the headline, month table, leaderboard and one month's history
//! - `export`: write `dashboard.json` plus per-month history CSV/JSON
//! - `config init` / `config show`: write or print the TOML config
//!
//! Logging goes to stderr, filtered by `PNLBOARD_LOG` (default `warn`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pnlboard_core::{GeneratedMonth, MonthKey, RngSource, SeedHierarchy};
use pnlboard_runner::export::export_history_csv;
use pnlboard_runner::report::{
    render_grid, render_headline, render_leaderboard, render_list, render_markdown,
    render_month_header, render_month_table,
};
use pnlboard_runner::{save_artifacts, Dashboard, DashboardConfig, MonthStats, Seeding};

const DEFAULT_CONFIG_PATH: &str = "pnlboard.toml";

#[derive(Parser)]
#[command(name = "pnlboard", about = "PnLBoard: trading dashboard with synthetic daily PnL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate daily PnL records for one month.
    Generate {
        /// Month label, e.g. "Month 02".
        label: String,

        #[arg(long)]
        year: i32,

        /// Target monthly return in percent.
        #[arg(long, allow_hyphen_values = true)]
        target: f64,

        /// TOML config supplying generator parameters and month policies.
        /// Defaults to the built-in policies.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// As-of date (YYYY-MM-DD) for months without an explicit cutoff.
        #[arg(long)]
        as_of: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Grid)]
        format: OutputFormat,

        /// Days per grid row.
        #[arg(long, default_value_t = 7)]
        columns: usize,
    },
    /// Print the dashboard.
    Dashboard {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// Month id whose daily history is shown. Defaults to the first month.
        #[arg(long)]
        month: Option<String>,

        #[arg(long, value_enum, default_value_t = HistoryView::Grid)]
        view: HistoryView,

        #[arg(long, default_value_t = 7)]
        columns: usize,

        /// Print a Markdown report instead of the text views.
        #[arg(long, default_value_t = false)]
        markdown: bool,
    },
    /// Write dashboard.json and per-month history artifacts.
    Export {
        #[arg(long)]
        output_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// Config file commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config.
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the effective config as TOML.
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Grid,
    List,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum HistoryView {
    Grid,
    List,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            label,
            year,
            target,
            config,
            seed,
            as_of,
            format,
            columns,
        } => run_generate(
            &label,
            year,
            target,
            config.as_deref(),
            seed,
            as_of,
            format,
            columns,
        ),
        Commands::Dashboard {
            config,
            seed,
            month,
            view,
            columns,
            markdown,
        } => run_dashboard(config.as_deref(), seed, month, view, columns, markdown),
        Commands::Export {
            output_dir,
            config,
            seed,
        } => run_export(&output_dir, config.as_deref(), seed),
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => run_config_init(&path, force),
            ConfigAction::Show { config } => run_config_show(config.as_deref()),
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PNLBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    debug!(path = ?path, "loading config");
    match path {
        Some(p) => DashboardConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(DashboardConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    label: &str,
    year: i32,
    target: f64,
    config_path: Option<&Path>,
    seed: Option<u64>,
    as_of: Option<NaiveDate>,
    format: OutputFormat,
    columns: usize,
) -> Result<()> {
    if !target.is_finite() {
        bail!("--target must be a finite number");
    }

    let mut config = load_config(config_path)?;
    if as_of.is_some() {
        config.as_of = as_of;
    }
    let policies = config.policy_table()?;
    let key = MonthKey::from_label(label, year)?;
    let policy = policies.resolve(key);
    let generator = config.generator();

    let month = match seed {
        Some(s) => generator.generate(key, target, &policy, &mut SeedHierarchy::new(s).source_for(key)),
        None => generator.generate(key, target, &policy, &mut RngSource::thread()),
    };

    match format {
        OutputFormat::Grid => {
            print_month_summary(&month);
            print!("{}", render_grid(&month.records, columns));
        }
        OutputFormat::List => {
            print_month_summary(&month);
            print!("{}", render_list(&month.records));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&month)?),
        OutputFormat::Csv => print!("{}", export_history_csv(&month.records)?),
    }
    Ok(())
}

fn run_dashboard(
    config_path: Option<&Path>,
    seed: Option<u64>,
    month: Option<String>,
    view: HistoryView,
    columns: usize,
    markdown: bool,
) -> Result<()> {
    let dashboard = Dashboard::new(load_config(config_path)?)?;
    let selected = month.or_else(|| dashboard.config().months.first().map(|m| m.id.clone()));
    let snapshot = dashboard.snapshot(selected.as_deref(), Seeding::from_seed(seed))?;

    if markdown {
        print!("{}", render_markdown(&snapshot));
        return Ok(());
    }

    println!("=== Dashboard ===");
    print!("{}", render_headline(&snapshot));
    println!();
    println!("--- Monthly Results ---");
    print!("{}", render_month_table(&snapshot));
    if !snapshot.masters.is_empty() {
        println!();
        println!("--- Copy Trading ---");
        print!("{}", render_leaderboard(&snapshot.masters));
    }
    if let Some(history) = &snapshot.selected {
        println!();
        println!("--- Daily History ---");
        print!("{}", render_month_header(history));
        match view {
            HistoryView::Grid => print!("{}", render_grid(&history.records, columns)),
            HistoryView::List => print!("{}", render_list(&history.records)),
        }
    }
    Ok(())
}

fn run_export(output_dir: &Path, config_path: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let dashboard = Dashboard::new(load_config(config_path)?)?;
    let histories = dashboard.histories(Seeding::from_seed(seed))?;
    let selected = histories.first().map(|h| h.id.clone());
    let snapshot = dashboard.snapshot_from(&histories, selected.as_deref())?;

    let paths = save_artifacts(&snapshot, &histories, output_dir)?;
    println!("Artifacts saved to: {}", output_dir.display());
    for path in &paths {
        println!("  {}", path.display());
    }
    Ok(())
}

fn run_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let toml = DashboardConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run_config_show(config_path: Option<&Path>) -> Result<()> {
    print!("{}", load_config(config_path)?.to_toml()?);
    Ok(())
}

fn print_month_summary(month: &GeneratedMonth) {
    let stats = MonthStats::compute(&month.records);
    let plan = &month.plan;
    println!("=== {} ===", month.key);
    println!("Target:         {:+.2}%", month.target);
    println!("Realized:       {:+.2}%", month.realized_total());
    println!("Trading days:   {}", stats.trading_days);
    println!("Win rate:       {:.2}%", stats.win_rate);
    println!(
        "Cutoff:         day {} of {} (horizon {})",
        plan.cutoff, plan.days_in_month, plan.horizon
    );
    println!(
        "Simulated:      {} ({} loss / {} profit)",
        plan.simulable_days, plan.loss_count, plan.profit_count
    );
    if plan.dropped_excess != 0.0 {
        println!("Dropped excess: {:+.2}%", plan.dropped_excess);
    }
    println!();
}
