//! Hashed Module IDs CLI
//!
//! Reads a graph manifest, assigns hashed IDs to every module, and prints
//! the result.
//!
//! ## Configuration
//!
//! Options come from an optional JSON file (`--options`), then individual
//! flags override single keys. Logging is controlled by:
//! - `RUST_LOG`: Log level filter (default: warn)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli --bin hashed-module-ids -- graph.json --hash-digest hex --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hashed_module_ids::{
    AssignmentStats, AssignedModule, HashedModuleIdAssigner, HashedModuleIdsOptions,
    InMemoryModuleGraph,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "hashed-module-ids", version, about = "Assign content-hashed module ids to a build graph")]
struct Cli {
    /// Graph manifest (JSON: {"context": ..., "modules": [...]})
    graph: PathBuf,
    /// Options file (JSON, camelCase keys)
    #[arg(long)]
    options: Option<PathBuf>,
    /// Context directory identities are made relative to
    #[arg(long)]
    context: Option<String>,
    /// xxhash64, md4, xxh3, sha256 or sha512
    #[arg(long)]
    hash_function: Option<String>,
    /// hex, base64 or base64url
    #[arg(long)]
    hash_digest: Option<String>,
    /// Initial id length in characters
    #[arg(long, allow_hyphen_values = true)]
    hash_digest_length: Option<i64>,
    /// Never hand out ids already present in the graph
    #[arg(long, default_value_t = false)]
    reserve_existing_ids: bool,
    /// text (default) or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    params_hash: &'a str,
    fingerprint: String,
    stats: AssignmentStats,
    modules: &'a [AssignedModule],
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn load_options(cli: &Cli) -> Result<HashedModuleIdsOptions, Box<dyn std::error::Error>> {
    let mut options = match &cli.options {
        Some(path) => HashedModuleIdsOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => HashedModuleIdsOptions::default(),
    };

    if let Some(context) = &cli.context {
        options = options.with_context(context.clone());
    }
    if let Some(name) = &cli.hash_function {
        options = options.with_hash_function(name.clone());
    }
    if let Some(name) = &cli.hash_digest {
        options = options.with_hash_digest(name.clone());
    }
    if let Some(length) = cli.hash_digest_length {
        options = options.with_hash_digest_length(length);
    }
    if cli.reserve_existing_ids {
        options = options.with_reserve_existing_ids(true);
    }

    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let options = load_options(&cli)?;
    let assigner = HashedModuleIdAssigner::new(&options)?;
    debug!(assigner = ?assigner, "assigner configured");

    let mut graph = InMemoryModuleGraph::from_json(&std::fs::read_to_string(&cli.graph)?)?;
    info!(
        modules = graph.len(),
        graph = %cli.graph.display(),
        "graph manifest loaded"
    );

    let keys = graph.keys();
    let assignment = assigner.assign(&mut graph, &keys)?;

    match cli.format {
        OutputFormat::Json => {
            let report = Report {
                params_hash: assigner.params_hash(),
                fingerprint: assignment.fingerprint(),
                stats: assignment.stats,
                modules: &assignment.entries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for entry in &assignment.entries {
                println!("{}\t{}", entry.id, entry.identifier);
            }
            let stats = assignment.stats;
            println!(
                "# assigned {} of {} modules ({} extended; skipped: {} no chunks, {} existing id, {} no identity)",
                stats.assigned,
                stats.candidates,
                stats.extended,
                stats.skipped_no_chunks,
                stats.skipped_existing_id,
                stats.skipped_no_identity,
            );
            println!("# params {} fingerprint {}", assigner.params_hash(), assignment.fingerprint());
        }
    }

    Ok(())
}
