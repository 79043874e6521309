//! CLI command definitions, routing, and tracing setup.

use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use docboard_dataset::{build_dataset, filter_overdue};
use docboard_fetch::Fetcher;
use docboard_shared::{AppConfig, Dataset, JobDoc, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docboard — freshness dashboard for job-description documents.
#[derive(Parser)]
#[command(
    name = "docboard",
    version,
    about = "Fetch the published job-description sheet and report freshness.",
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
    /// Fetch the sheet once and print the dataset.
    Show {
        /// Show only overdue records in the table.
        #[arg(long)]
        overdue_only: bool,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Published spreadsheet id (overrides the config file).
        #[arg(long)]
        sheet_id: Option<String>,

        /// Sheet (tab) name (overrides the config file).
        #[arg(long)]
        sheet_name: Option<String>,

        /// Fetch this CSV URL instead of the configured sheet.
        #[arg(long)]
        url: Option<String>,
    },

    /// Launch the interactive dashboard.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Output format for `show`.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
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
        0 => "docboard=info",
        1 => "docboard=debug",
        _ => "docboard=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

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
        Command::Show {
            overdue_only,
            format,
            sheet_id,
            sheet_name,
            url,
        } => {
            cmd_show(
                overdue_only,
                format,
                sheet_id.as_deref(),
                sheet_name.as_deref(),
                url.as_deref(),
            )
            .await
        }
        Command::Tui => cmd_tui(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

async fn cmd_show(
    overdue_only: bool,
    format: OutputFormat,
    sheet_id: Option<&str>,
    sheet_name: Option<&str>,
    url_override: Option<&str>,
) -> Result<()> {
    // CLI flags override config file values.
    let mut config = load_config()?;
    if let Some(id) = sheet_id {
        config.source.sheet_id = id.to_string();
    }
    if let Some(name) = sheet_name {
        config.source.sheet_name = name.to_string();
    }

    let (csv_url, edit_url) = match url_override {
        Some(u) => (u.to_string(), u.to_string()),
        None => {
            config.source.validate()?;
            (config.source.csv_url(), config.source.edit_url())
        }
    };

    let parsed_url = Url::parse(&csv_url).map_err(|e| eyre!("invalid URL '{csv_url}': {e}"))?;

    info!(url = %parsed_url, "fetching dataset");

    let spinner = fetch_spinner();
    let fetcher = Fetcher::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let text = match fetcher.fetch_csv(&parsed_url).await {
        Ok(text) => {
            spinner.finish_and_clear();
            text
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let evaluated_at = Local::now().naive_local();
    let dataset = build_dataset(&text, &edit_url, evaluated_at)?;

    match format {
        OutputFormat::Json => print_json(&dataset, overdue_only)?,
        OutputFormat::Text => print_table(&dataset, overdue_only),
    }

    Ok(())
}

/// Spinner shown while the single fetch attempt is in flight.
fn fetch_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Загрузка данных…");
    spinner
}

/// JSON view: summary stays global, the record list honors the filter —
/// same semantics as the dashboard's checkbox.
fn print_json(dataset: &Dataset, overdue_only: bool) -> Result<()> {
    let view = if overdue_only {
        let mut filtered = dataset.clone();
        filtered.docs = filter_overdue(&dataset.docs);
        filtered
    } else {
        dataset.clone()
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn print_table(dataset: &Dataset, overdue_only: bool) {
    let docs: Vec<JobDoc> = if overdue_only {
        filter_overdue(&dataset.docs)
    } else {
        dataset.docs.clone()
    };

    println!();
    println!("  Всего инструкций:    {}", dataset.summary.total);
    println!("  Требуют обновления:  {}", dataset.summary.expired);
    println!("  Нет PDF:             {}", dataset.summary.missing_pdf);
    println!();

    println!(
        "  {:<28} {:<20} {:<12} {:<12} {:<5} {}",
        "Должность", "Отдел", "Обновлено", "Актуально до", "PDF", "Просрочено"
    );
    for doc in &docs {
        println!(
            "  {:<28} {:<20} {:<12} {:<12} {:<5} {}",
            doc.position,
            doc.department,
            fmt_date(doc.updated_at),
            fmt_datetime(doc.valid_until),
            if doc.has_pdf { "да" } else { "—" },
            if doc.overdue { "ДА" } else { "" },
        );
    }

    println!();
    println!("  Редактировать данные: {}", dataset.source_url);
    println!();
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn fmt_datetime(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

// ---------------------------------------------------------------------------
// tui
// ---------------------------------------------------------------------------

/// Launch the `docboard-tui` binary sitting next to the current executable.
fn cmd_tui() -> Result<()> {
    info!("launching dashboard");
    let mut path = std::env::current_exe()?;
    path.set_file_name("docboard-tui");
    let status = std::process::Command::new(&path)
        .status()
        .map_err(|e| eyre!("failed to launch {}: {e}", path.display()))?;
    if !status.success() {
        return Err(eyre!("docboard-tui exited with {status}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

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
