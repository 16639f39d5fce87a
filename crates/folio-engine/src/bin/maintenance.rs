//! # Folio Maintenance
//!
//! Removes pricing matrices for book sizes that are no longer configured.
//! Meant to be run by cron or a systemd timer; every run is idempotent.
//!
//! ## Usage
//! ```bash
//! # Use folio.toml from the platform config dir (or defaults)
//! folio-maintenance
//!
//! # Explicit config file
//! folio-maintenance --config /etc/folio/folio.toml
//!
//! # Report availability without deleting anything
//! folio-maintenance --dry-run
//!
//! # Sweep even though no book size is configured (deletes every matrix)
//! folio-maintenance --force
//! ```
//!
//! Missing print settings read as "no book sizes", which would make every
//! stored matrix an orphan. The sweep refuses to run in that state unless
//! `--force` is given.

use folio_db::Database;
use folio_engine::{telemetry, EngineConfig, PricingEngine};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

struct Args {
    config: Option<PathBuf>,
    dry_run: bool,
    force: bool,
}

/// What the run does after reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Run,
    DryRun,
    /// No book size is configured and `--force` was not given.
    Refused,
}

fn plan_sweep(configured_sizes: usize, dry_run: bool, force: bool) -> Sweep {
    if dry_run {
        Sweep::DryRun
    } else if configured_sizes == 0 && !force {
        Sweep::Refused
    } else {
        Sweep::Run
    }
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config: None,
        dry_run: false,
        force: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--dry-run" | "-n" => parsed.dry_run = true,
            "--force" => parsed.force = true,
            "--help" | "-h" => {
                println!("Folio Maintenance");
                println!();
                println!("Usage: folio-maintenance [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -n, --dry-run        Report book sizes, delete nothing");
                println!("      --force          Sweep even when no book size is configured");
                println!("  -h, --help           Show this help message");
                return None;
            }
            _ => {}
        }
        i += 1;
    }

    Some(parsed)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load(args.config)?;
    let db = Database::new(config.db_config()).await?;
    let engine = PricingEngine::new(&db, config.cache_ttl());

    let (embedded, applied) = db.migration_status().await?;
    println!("Schema: {}/{} migrations applied", applied, embedded);

    let sizes = engine.available_book_sizes().await?;
    for size in &sizes {
        let state = if size.enabled { "enabled" } else { "disabled" };
        println!(
            "  • {} ({}: {} papers, {} bindings)",
            size.size, state, size.paper_type_count, size.binding_type_count
        );
    }

    match plan_sweep(sizes.len(), args.dry_run, args.force) {
        Sweep::DryRun => info!("Dry run, orphan sweep skipped"),
        Sweep::Refused => {
            warn!("No book sizes configured, orphan sweep refused");
            println!("✗ No book sizes configured; pass --force to delete every matrix");
        }
        Sweep::Run => {
            let removed = engine.cleanup_orphans().await?;
            println!("✓ Removed {} orphaned matrices", removed);
        }
    }

    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Maintenance run failed");
            ExitCode::FAILURE
        }
    }
}
