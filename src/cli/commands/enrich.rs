//! Enrich command: fill master gaps from Google Places

use super::shared::{load_enrichment_config, resolve_data_paths};
use crate::Result;
use crate::app::services::enrichment::{EnrichmentOutcome, EnrichmentPass};
use crate::app::services::lookup_cache::LookupCache;
use crate::app::services::master_store::MasterStore;
use crate::app::services::places::GooglePlacesClient;
use crate::cli::args::{Args, EnrichArgs};
use colored::*;
use std::time::Instant;
use tracing::info;

pub async fn run_enrich(args: &Args, enrich: &EnrichArgs) -> Result<()> {
    let start_time = Instant::now();
    let paths = resolve_data_paths(args)?;
    let config = load_enrichment_config(args, enrich)?;

    let mut master = MasterStore::load(&paths.master).await?;
    let mut cache = LookupCache::load(&paths.lookup_cache).await?;
    info!(
        "Loaded {} master rows and {} cached lookups",
        master.len(),
        cache.len()
    );

    let client = GooglePlacesClient::new(
        enrich.require_api_key()?,
        config.request_delay(),
        config.lookup_timeout(),
        config.nearby_radius_m,
    )?;

    let misses_path = enrich
        .misses_report
        .clone()
        .unwrap_or_else(|| paths.misses.clone());
    let pass = EnrichmentPass::new(&client, config).with_misses_report(misses_path);
    let outcome = pass.run(&mut master, &mut cache).await?;

    if !args.quiet {
        print_summary(&outcome, start_time.elapsed().as_millis());
    }
    Ok(())
}

fn print_summary(outcome: &EnrichmentOutcome, elapsed_ms: u128) {
    let stats = &outcome.stats;

    println!("\n{}", "Enrichment Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        elapsed_ms.to_string().bright_white()
    );
    println!(
        "  {} {} of {}",
        "Rows examined:".bright_cyan(),
        stats.examined.to_string().bright_white(),
        stats.candidates
    );
    println!(
        "  {} {} ({} fields)",
        "Rows updated:".bright_cyan(),
        stats.rows_updated.to_string().bright_white().bold(),
        stats.fields_written
    );
    println!(
        "  {} {} cached, {} external",
        "Lookups:".bright_cyan(),
        stats.cache_hits.to_string().bright_white(),
        stats.external_calls.to_string().bright_white()
    );
    if stats.misses() > 0 {
        println!(
            "  {} {} ({} failed, {} rejected)",
            "Misses:".bright_red(),
            stats.misses().to_string().bright_red().bold(),
            stats.lookup_failures,
            stats.rejected
        );
    }
    if outcome.budget_exhausted() {
        println!(
            "  {} {} rows left for the next run",
            "Budget reached:".bright_yellow(),
            outcome.remaining().to_string().bright_yellow().bold()
        );
    }
}
