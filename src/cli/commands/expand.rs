//! Expand command: seed master rows from snapshot facilities

use super::shared::resolve_data_paths;
use crate::Result;
use crate::app::services::master_store::MasterStore;
use crate::app::services::snapshot_store::SnapshotStore;
use crate::cli::args::{Args, ExpandArgs, ward_filter};
use colored::*;
use tracing::info;

pub async fn run_expand(args: &Args, expand: &ExpandArgs) -> Result<()> {
    let paths = resolve_data_paths(args)?;
    let store = SnapshotStore::from_paths(&paths);

    let snapshots = store.load_all().await?;
    let mut master = MasterStore::load(&paths.master).await?;
    let before = master.len();

    let stats = master.expand_from_snapshots(&snapshots, &ward_filter(&expand.ward));
    if stats.changed() && !expand.dry_run {
        master.save()?;
    } else if !stats.changed() {
        info!("Master already covers every snapshot facility");
    }

    if !args.quiet {
        println!("\n{}", "Expand Summary".bright_green().bold());
        println!(
            "  {} {} -> {}",
            "Master rows:".bright_cyan(),
            before,
            master.len().to_string().bright_white().bold()
        );
        println!(
            "  {} {} added, {} filled{}",
            "Changes:".bright_cyan(),
            stats.added.to_string().bright_white(),
            stats.filled.to_string().bright_white(),
            if expand.dry_run { " (dry run, nothing written)" } else { "" }
        );
    }
    Ok(())
}
