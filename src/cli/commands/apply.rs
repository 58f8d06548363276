//! Apply command: backfill month snapshots from the master

use super::shared::resolve_data_paths;
use crate::Result;
use crate::app::services::master_store::MasterStore;
use crate::app::services::reconciler::{ApplyStats, apply_master_to_snapshot};
use crate::app::services::snapshot_store::SnapshotStore;
use crate::cli::args::{ApplyArgs, Args, ward_filter};
use colored::*;
use tracing::{info, warn};

pub async fn run_apply(args: &Args, apply: &ApplyArgs) -> Result<()> {
    let paths = resolve_data_paths(args)?;
    let master = MasterStore::load(&paths.master).await?;
    if master.is_empty() {
        warn!("Master table {} is empty, nothing to apply", paths.master.display());
    }

    let store = SnapshotStore::from_paths(&paths);
    let ward = ward_filter(&apply.ward);
    let mut snapshots = store.load_all().await?;

    let mut changed_months = Vec::new();
    let mut total = ApplyStats::default();

    // Only months with a filled field are rewritten
    for snapshot in snapshots.iter_mut() {
        let stats = apply_master_to_snapshot(snapshot, &master, &ward);
        total.facilities_seen += stats.facilities_seen;
        total.facilities_updated += stats.facilities_updated;
        total.fields_filled += stats.fields_filled;
        total.missing_in_master += stats.missing_in_master;

        if !stats.changed() {
            continue;
        }
        info!(
            "{}: {} fields filled on {} facilities",
            snapshot.month, stats.fields_filled, stats.facilities_updated
        );
        if !apply.dry_run {
            store.save(snapshot)?;
        }
        changed_months.push(snapshot.month.clone());
    }

    if !args.quiet {
        println!("\n{}", "Apply Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Months scanned:".bright_cyan(),
            snapshots.len().to_string().bright_white()
        );
        println!(
            "  {} {}{}",
            "Months changed:".bright_cyan(),
            changed_months.len().to_string().bright_white().bold(),
            if apply.dry_run { " (dry run, nothing written)" } else { "" }
        );
        println!(
            "  {} {}",
            "Fields filled:".bright_cyan(),
            total.fields_filled.to_string().bright_white()
        );
        if total.missing_in_master > 0 {
            println!(
                "  {} {}",
                "Entries without master row:".bright_yellow(),
                total.missing_in_master.to_string().bright_yellow()
            );
        }
    }
    Ok(())
}
