//! Merge command: export display records for one month

use super::shared::resolve_data_paths;
use crate::app::adapters::filesystem::write_json_atomic;
use crate::app::services::master_store::MasterStore;
use crate::app::services::reconciler::merge_snapshot;
use crate::app::services::snapshot_store::SnapshotStore;
use crate::cli::args::{Args, MergeArgs};
use crate::{Error, Result};
use tracing::info;

pub async fn run_merge(args: &Args, merge: &MergeArgs) -> Result<()> {
    merge.validate()?;
    let paths = resolve_data_paths(args)?;
    let store = SnapshotStore::from_paths(&paths);

    let month = match &merge.month {
        Some(month) => month.clone(),
        None => store
            .discover_months()
            .await?
            .loadable()
            .pop()
            .ok_or_else(|| {
                Error::file_not_found(format!(
                    "no snapshot documents in {}",
                    paths.data_dir.display()
                ))
            })?,
    };

    let snapshot = store.load(&month).await?;
    let master = MasterStore::load(&paths.master).await?;
    let merged = merge_snapshot(&snapshot, &master);
    info!("Merged {} facilities for {}", merged.len(), month);

    match &merge.output {
        Some(path) => {
            write_json_atomic(path, &merged)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&merged)
                .map_err(|e| Error::json_parsing("merged output", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}
