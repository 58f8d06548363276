//! Command implementations for the facility reconciler CLI
//!
//! Each subcommand lives in its own module and shares logging, data
//! directory resolution and configuration layering through `shared`.

pub mod apply;
pub mod audit;
pub mod enrich;
pub mod expand;
pub mod merge;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the subcommand handler. Logging must already be set up.
pub async fn run(args: Args) -> Result<()> {
    let Some(command) = args.command.clone() else {
        return Err(Error::configuration("no subcommand given"));
    };

    match &command {
        Commands::Enrich(enrich) => enrich::run_enrich(&args, enrich).await,
        Commands::Apply(apply) => apply::run_apply(&args, apply).await,
        Commands::Merge(merge) => merge::run_merge(&args, merge).await,
        Commands::Audit(audit) => audit::run_audit(&args, audit).await,
        Commands::Expand(expand) => expand::run_expand(&args, expand).await,
    }
}
