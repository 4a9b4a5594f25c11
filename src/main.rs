//! Keyscope CLI - search-grounded SEO keyword analysis
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and rendering results.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use keyscope::metrics::{AnalysisResult, Competition};
use keyscope::volume::normalize_volume;
use keyscope::{analyzer, export, Config, History};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyscope")]
#[command(version, about = "CLI for search-grounded SEO keyword analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of keywords for a location
    Analyze {
        /// Keywords, separated by commas and/or newlines
        keywords: String,
        /// Target location (e.g. "New York, NY")
        #[arg(short, long)]
        location: String,
        /// Website to audit against the keywords
        #[arg(short, long)]
        website: Option<String>,
        /// Write the metrics table to a CSV file (dated filename when omitted)
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent searches
    History,
    /// Clear the search history
    Clear,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            keywords,
            location,
            website,
            csv,
            json,
        } => {
            let config = Config::load()?;

            // Remember the query up front; a history failure must not block
            // the analysis itself.
            match History::open(config.storage.path.join("history")) {
                Ok(history) => {
                    if let Err(e) = history.record(&keywords, &location, website.as_deref()) {
                        eprintln!("Warning: failed to record search history: {}", e);
                    }
                }
                Err(e) => eprintln!("Warning: failed to open search history: {}", e),
            }

            println!("Analyzing keywords for {}...", location);
            let result =
                analyzer::analyze_with_config(&config, &keywords, &location, website.as_deref())
                    .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render_result(&result);
            }

            if let Some(target) = csv {
                let path = target.unwrap_or_else(|| {
                    PathBuf::from(export::default_csv_filename(
                        chrono::Utc::now().date_naive(),
                    ))
                });
                std::fs::write(&path, export::metrics_to_csv(&result.metrics))?;
                println!("\nSaved CSV to {}", path.display());
            }
        }
        Commands::History => {
            let config = Config::load()?;
            let history = History::open(config.storage.path.join("history"))?;
            let items = history.recent()?;

            if items.is_empty() {
                println!("No recent searches.");
            } else {
                println!("Recent searches ({}):\n", items.len());
                for item in items {
                    println!(
                        "🔎 {} ({})",
                        item.keywords,
                        item.timestamp.format("%Y-%m-%d %H:%M")
                    );
                    println!("   Location: {}", item.location);
                    if let Some(site) = &item.website {
                        println!("   Website: {}", site);
                    }
                    println!();
                }
            }
        }
        Commands::Clear => {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt("Clear all search history?")
                .default(false)
                .interact()?;
            if confirmed {
                let config = Config::load()?;
                let history = History::open(config.storage.path.join("history"))?;
                history.clear()?;
                println!("Search history cleared.");
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "keyscope", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn render_result(result: &AnalysisResult) {
    println!("\n=== Market Insights ===\n");
    println!("{}\n", result.summary);

    if result.metrics.is_empty() {
        println!(
            "{}",
            "No structured metrics were returned for this query.".yellow()
        );
    }

    let volumes: Vec<f64> = result
        .metrics
        .iter()
        .map(|m| normalize_volume(&m.search_volume))
        .collect();
    let max_volume = volumes.iter().cloned().fold(0.0, f64::max);

    for (metric, volume) in result.metrics.iter().zip(&volumes) {
        let quick_win = if metric.is_quick_win {
            format!(" {}", "⭐ quick win".green())
        } else {
            String::new()
        };
        println!("🔑 {}{}", metric.keyword.bold(), quick_win);
        println!(
            "   Volume: {} | Competition: {} | Difficulty: {} | {}",
            metric.search_volume,
            competition_label(&metric.competition),
            metric.difficulty,
            metric.keyword_type
        );
        if let Some(bar) = volume_bar(*volume, max_volume, 30) {
            println!("   {}", bar.cyan());
        }
        if let Some(audit) = &metric.site_audit {
            println!("   Site audit: {}", audit);
        }
        println!("   Recommendation: {}", metric.recommendation);
        if !metric.rationale.is_empty() {
            println!("   Rationale: {}", metric.rationale.dimmed());
        }
        if !metric.related_keywords.is_empty() {
            println!("   Alternatives:");
            for alt in &metric.related_keywords {
                let why = alt
                    .why_better
                    .as_deref()
                    .map(|w| format!(": {}", w))
                    .unwrap_or_default();
                println!(
                    "     • {} [{} | {}]{}",
                    alt.keyword, alt.search_volume, alt.competition, why
                );
            }
        }
        if !metric.serp_results.is_empty() {
            println!("   Top results:");
            for serp in metric.serp_results.iter().take(5) {
                println!("     {}. {} ({})", serp.position, serp.title, serp.url);
            }
        }
        println!();
    }

    if !result.grounding_chunks.is_empty() {
        println!("Sources:");
        for chunk in &result.grounding_chunks {
            if let Some(web) = &chunk.web {
                println!(
                    "  • {} ({})",
                    web.title.as_deref().unwrap_or("untitled"),
                    web.uri.as_deref().unwrap_or("")
                );
            }
        }
    }
}

/// Relative volume bar for quick visual comparison across the batch
fn volume_bar(volume: f64, max: f64, width: usize) -> Option<String> {
    if volume <= 0.0 || max <= 0.0 {
        return None;
    }
    let len = ((volume / max) * width as f64).round().max(1.0) as usize;
    Some("█".repeat(len.min(width)))
}

fn competition_label(competition: &Competition) -> String {
    let label = competition.to_string();
    match competition {
        Competition::High => label.red().to_string(),
        Competition::Medium => label.yellow().to_string(),
        Competition::Low => label.green().to_string(),
        _ => label,
    }
}
