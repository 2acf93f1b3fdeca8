//! h2h-score CLI
//!
//! CSV score records → head-to-head scoreboard JSON
//! JSON match → match report, JSON head-to-head → CSV score records

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use h2h_core::models::{MatchFormat, MatchRules};
#[cfg(feature = "cli")]
use h2h_core::records::HeadToHeadHeader;
#[cfg(feature = "cli")]
use std::fs::File;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "cli")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "h2h-score")]
#[command(about = "Score head-to-head archery matches", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Assemble flat score records and print the head-to-head report
    Records {
        /// Score records CSV
        #[arg(long)]
        scores: PathBuf,

        /// Match headers CSV (heat, opponent, bye)
        #[arg(long)]
        matches: Option<PathBuf>,

        /// Archers per side
        #[arg(long, default_value_t = 1)]
        team_size: u32,

        /// set-points | total-points
        #[arg(long)]
        format: MatchFormat,

        /// Rules YAML; defaults to $H2H_RULES_PATH, then the standard rules
        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long)]
        qualification_rank: Option<u32>,

        #[arg(long)]
        total_archers: Option<u32>,

        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Score a single JSON match request
    Match {
        /// Input JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the flat score records of a JSON head-to-head request
    Flatten {
        /// Input JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Shoot the records belong to
        #[arg(long)]
        shoot_id: i64,

        /// Score records CSV (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Match headers CSV
        #[arg(long)]
        matches_out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Records {
            scores,
            matches,
            team_size,
            format,
            rules,
            qualification_rank,
            total_archers,
            out,
        } => {
            let rules = match rules {
                Some(path) => MatchRules::from_path(&path)
                    .with_context(|| format!("Failed to load rules: {}", path.display()))?,
                None => MatchRules::from_env_or_default(team_size),
            };
            let header = HeadToHeadHeader {
                qualification_rank,
                total_archers,
                team_size,
                format,
                rules: Some(rules),
            };

            let report = h2h_cli::score_record_files(&header, &scores, matches.as_deref())?;
            let json = serde_json::to_string_pretty(&report)?;
            h2h_cli::write_output(out.as_deref(), &json)?;
        }

        Commands::Match { r#in, out } => {
            let report = h2h_cli::score_match_file(&r#in)?;
            h2h_cli::write_output(out.as_deref(), &report)?;
        }

        Commands::Flatten { r#in, shoot_id, out, matches_out } => {
            let (headers, records) = h2h_cli::flatten_file(&r#in, shoot_id)?;
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    h2h_cli::write_score_records(file, &records)?;
                }
                None => h2h_cli::write_score_records(std::io::stdout().lock(), &records)?,
            }
            if let Some(path) = matches_out {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                h2h_cli::write_match_headers(file, &headers)?;
            }
            log::info!("Flattened {} matches into {} records", headers.len(), records.len());
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("h2h-score CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
