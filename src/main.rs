use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use skilltrends::analysis::{Dashboard, FilterOptions, Selection};
use skilltrends::render::{self, OutputFormat};
use skilltrends::source::{load_table, source_for, Cleaning};
use skilltrends::{Config, DashboardConfig, Storage};

#[derive(Parser, Debug)]
#[command(name = "skilltrends")]
#[command(version = "0.1.0")]
#[command(about = "Top in-demand skills for data roles, by location and company")]
struct Args {
    /// CSV path or URL of the exploded skill data
    #[arg(short, long)]
    source: Option<String>,

    /// Location to filter on ("All" for every location)
    #[arg(short, long, default_value = "All")]
    location: String,

    /// Company to filter on ("All" for every company)
    #[arg(short, long, default_value = "All")]
    company: String,

    /// Number of skills to show (5-50)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    top_n: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Also write the skill counts as CSV into this directory
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Show the raw skill count table under the chart
    #[arg(long)]
    show_table: bool,

    /// List the available filter values instead of ranking
    #[arg(long, value_enum)]
    list: Option<ListKind>,

    /// Database path for the table snapshot
    #[arg(long)]
    cache: Option<String>,

    /// Reuse the table snapshot if the source has not changed
    #[arg(long)]
    cached: bool,

    /// Reload the source and replace the snapshot (implies --cached)
    #[arg(long)]
    refresh: bool,

    /// Remove the snapshot for the source and exit
    #[arg(long)]
    clear_cache: bool,

    /// Disable filtering by company
    #[arg(long)]
    no_company_filter: bool,

    /// Leave missing company names empty instead of "Unknown"
    #[arg(long)]
    keep_missing_company: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListKind {
    Locations,
    Companies,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("skilltrends=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, CLI flags win over the environment
    let config = apply_overrides(Config::from_env()?, &args);

    let source = source_for(&config.source)?;

    if args.clear_cache {
        let storage = Storage::new(&config.cache_path)?;
        let key = source
            .cache_key()
            .await
            .unwrap_or_else(|_| source.describe().to_string());
        let removed = storage.delete_table(&key)?;
        if removed {
            tracing::info!("Removed snapshot for {}", source.describe());
        } else {
            tracing::info!("No snapshot stored for {}", source.describe());
        }
        return Ok(());
    }

    // Initialize storage only when the snapshot is wanted
    let storage = if args.cached || args.refresh {
        Some(Storage::new(&config.cache_path)?)
    } else {
        None
    };

    let dashboard_config = DashboardConfig::from(&config);
    let cleaning = Cleaning {
        fill_missing_company: dashboard_config.fill_missing_company,
    };

    // Load the table once for this run
    let table = load_table(source.as_ref(), storage.as_ref(), args.refresh, cleaning).await?;
    let dashboard = Dashboard::new(Arc::new(table), dashboard_config);

    if let Some(kind) = args.list {
        let options = dashboard.filter_options();
        write_output(&format_options(&options, kind), &args)?;
        return Ok(());
    }

    // Rank skills for the selected filters
    let selection = Selection::new(args.location.as_str(), args.company.as_str(), config.top_n);
    let report = dashboard.run(&selection)?;

    if report.is_empty() {
        tracing::warn!("No skills match the selected filters");
    }

    // Output results
    write_output(&render::render(&report, args.format, args.show_table)?, &args)?;

    if let Some(ref dir) = args.download_dir {
        let path = render::write_download(&report, dir)?;
        tracing::info!("Skill counts written to: {}", path.display());
    }

    Ok(())
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(ref source) = args.source {
        config.source = source.clone();
    }
    if let Some(ref cache) = args.cache {
        config.cache_path = cache.clone();
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if args.no_company_filter {
        config.company_filter = false;
    }
    if args.keep_missing_company {
        config.fill_missing_company = false;
    }
    config
}

fn format_options(options: &FilterOptions, kind: ListKind) -> String {
    let values = match kind {
        ListKind::Locations => &options.locations,
        ListKind::Companies => &options.companies,
    };
    values.join("\n")
}

fn write_output(output: &str, args: &Args) -> anyhow::Result<()> {
    if let Some(ref path) = args.output {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}
