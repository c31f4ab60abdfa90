use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use repositum_harvest::{HarvestConfig, HarvestError, Harvester, extract_degree, pdf, storage};

/// Exit code for usage errors such as an out-of-range id.
const EXIT_INVALID_ARGS: i32 = 3;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "repositum",
    about = "Harvest thesis metadata from the TU Wien repositum",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting REPOSITUM_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of ~/.config/repositum/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect thesis links from every search results page.
    Links {
        /// First search page (defaults to the configured search URL).
        #[arg(long)]
        start: Option<String>,
        /// Link list file (one link per line).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Stop after this many result pages.
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Show the interesting fields of a thesis' full item record.
    Thesis {
        /// Item path such as /handle/20.500.12708/1234.
        #[arg(required_unless_present = "links", conflicts_with = "links")]
        link: Option<String>,
        /// Read the item paths from a link file written by `links`.
        #[arg(long)]
        links: Option<PathBuf>,
        /// Also download the PDF and extract the degree name.
        #[arg(long)]
        degree: bool,
    },

    /// Show all metadata of a publication by numeric id.
    Publication {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Scrape an id range into one JSON file per id.
    Collect {
        #[arg(long, allow_negative_numbers = true)]
        from: i64,
        /// Exclusive upper bound.
        #[arg(long, allow_negative_numbers = true)]
        to: i64,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Extract the degree name from a local thesis PDF.
    Degree { pdf: PathBuf },

    /// Print the effective configuration.
    Config,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Err(err) if is_usage_error(&err) => {
            eprintln!("{err}");
            std::process::exit(EXIT_INVALID_ARGS);
        }
        other => other,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let json_output = cli.json || std::env::var("REPOSITUM_JSON").as_deref() == Ok("1");

    let mut config = match &cli.config {
        Some(path) => HarvestConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HarvestConfig::load()?,
    };

    match cli.command {
        Commands::Links {
            start: start_url,
            out,
            max_pages,
        } => {
            if max_pages.is_some() {
                config.max_pages = max_pages;
            }
            let start_url = start_url.unwrap_or_else(|| config.search_url.clone());
            let out = out.unwrap_or_else(|| PathBuf::from(&config.output.links_file));

            let harvester = Harvester::new(config)?;
            let links = harvester.collect_links(&start_url).await?;
            storage::save_links(&out, &links)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "links": links.len(), "file": out },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("Saved {} thesis links to {}", links.len(), out.display());
            }
        }

        Commands::Thesis {
            link,
            links,
            degree,
        } => {
            let links = match (link, links) {
                (Some(link), _) => vec![link],
                (None, Some(path)) => storage::load_links(&path)
                    .with_context(|| format!("failed to read links from {}", path.display()))?,
                (None, None) => Vec::new(),
            };
            let harvester = Harvester::new(config)?;

            let mut results = Vec::with_capacity(links.len());
            for link in &links {
                match thesis_entry(&harvester, link, degree).await {
                    Ok(entry) => results.push(entry),
                    // A single bad link aborts only when it was the only one.
                    Err(err) if links.len() > 1 => {
                        warn!(%link, error = %err, "thesis failed, continuing");
                        results.push(serde_json::json!({ "link": link, "error": err.to_string() }));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            info!(theses = results.len(), "thesis scrape finished");
            let dur = start.elapsed().as_millis();

            if json_output {
                let data = match results.as_slice() {
                    [single] => single.clone(),
                    _ => serde_json::Value::Array(results),
                };
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": data,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                for entry in &results {
                    if results.len() > 1 {
                        println!("── {}", entry["link"].as_str().unwrap_or_default());
                    }
                    if let Some(error) = entry.get("error") {
                        println!("Error: {}", error.as_str().unwrap_or_default());
                        continue;
                    }
                    println!("{}", serde_json::to_string_pretty(&entry["metadata"])?);
                    if let Some(degree) = entry["degree"].as_str() {
                        println!("Degree: {degree}");
                    }
                }
            }
        }

        Commands::Publication { id } => {
            let harvester = Harvester::new(config)?;
            let outcome = harvester.publication(id).await?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": outcome,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }

        Commands::Collect { from, to, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.output.metadata_dir));
            let harvester = Harvester::new(config)?;
            let summary = harvester
                .collect_metadata(from..to, |id, outcome| {
                    storage::write_outcome(&out_dir, id, outcome).map(|_| ())
                })
                .await?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": summary,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!(
                    "Wrote {} record(s) and {} sentinel(s) to {}.",
                    summary.records,
                    summary.sentinels,
                    out_dir.display()
                );
                for failed in &summary.failed {
                    println!("  failed {}: {}", failed.id, failed.error);
                }
            }
        }

        Commands::Degree { pdf: path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let text = pdf::first_page_text(&bytes)?;
            let degree = extract_degree(&text);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "degree": degree },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                match degree {
                    Some(degree) => println!("{degree}"),
                    None => println!("No degree found."),
                }
            }
        }

        Commands::Config => {
            if json_output {
                print_json(&serde_json::json!({ "status": "ok", "data": config }))?;
            } else {
                print!("{}", config.to_toml()?);
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("repositum=info,repositum_harvest=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn thesis_entry(
    harvester: &Harvester,
    link: &str,
    with_degree: bool,
) -> repositum_harvest::Result<serde_json::Value> {
    let outcome = harvester.thesis(link).await?;
    let degree = if with_degree {
        harvester.thesis_degree(link).await?
    } else {
        None
    };
    debug!(link, degree = degree.as_deref().unwrap_or("-"), "thesis scraped");
    Ok(serde_json::json!({ "link": link, "metadata": outcome, "degree": degree }))
}

fn is_usage_error(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<HarvestError>(),
        Some(HarvestError::InvalidArgument(_))
    )
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
