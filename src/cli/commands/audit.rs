//! Audit command: snapshot/master consistency report

use super::shared::resolve_data_paths;
use crate::app::services::audit::AuditReport;
use crate::app::services::master_store::MasterStore;
use crate::app::services::snapshot_store::SnapshotStore;
use crate::cli::args::{Args, AuditArgs, OutputFormat, ward_filter};
use crate::{Error, Result};
use colored::*;

pub async fn run_audit(args: &Args, audit: &AuditArgs) -> Result<()> {
    audit.validate()?;
    let paths = resolve_data_paths(args)?.with_recent_months(audit.recent_months);
    let store = SnapshotStore::from_paths(&paths);

    let index = store.discover_months().await?;
    let snapshots = store.load_all().await?;
    let master = MasterStore::load(&paths.master).await?;

    let report = AuditReport::build(
        &snapshots,
        &index,
        &master,
        paths.recent_months,
        &ward_filter(&audit.ward),
    );

    match audit.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::json_parsing("audit report", e))?;
            println!("{}", json);
        }
        OutputFormat::Human => print!("{}", render_human(&report, &master)),
    }
    Ok(())
}

/// Human-readable report text
pub fn render_human(report: &AuditReport, master: &MasterStore) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "Facility Audit".bright_green().bold()));

    match &report.audited_month {
        Some(month) => out.push_str(&format!(
            "  {} {}\n",
            "Latest month:".bright_cyan(),
            month.bright_white()
        )),
        None => {
            out.push_str(&format!("  {}\n", "No snapshot documents found".bright_yellow()));
        }
    }
    out.push_str(&format!(
        "  {} {}\n",
        "Recent window:".bright_cyan(),
        report.recent_months.join(", ")
    ));

    out.push_str(&format!("\n{}\n", "Months".bright_green().bold()));
    for summary in &report.months {
        let wards: Vec<String> = summary
            .top_wards
            .iter()
            .map(|(ward, count)| format!("{} {}", ward, count))
            .collect();
        out.push_str(&format!(
            "  {}  {:>4} facilities in {:>2} wards  {}\n",
            summary.month.bright_white(),
            summary.facility_count,
            summary.ward_count,
            wards.join(" / ").dimmed()
        ));
    }
    for month in &report.missing_month_files {
        out.push_str(&format!(
            "  {}  {}\n",
            month.bright_red(),
            "listed in months.json but no document".bright_red()
        ));
    }

    out.push_str(&format!(
        "\n{} {}\n",
        "New facilities (not in master):".bright_cyan(),
        report.new_facilities.len().to_string().bright_white().bold()
    ));
    for id in &report.new_facilities {
        out.push_str(&format!("  + {}\n", id));
    }

    out.push_str(&format!(
        "{} {}\n",
        "Retired facilities (absent from recent months):".bright_cyan(),
        report.retired_facilities.len().to_string().bright_white().bold()
    ));
    for id in &report.retired_facilities {
        let name = master.get(id).map(|r| r.name.as_str()).unwrap_or("");
        out.push_str(&format!("  - {} {}\n", id, name));
    }

    if report.is_consistent() {
        out.push_str(&format!("\n{}\n", "Master and snapshots are consistent".green()));
    }
    out
}
