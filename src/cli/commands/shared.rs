//! Shared components for CLI commands
//!
//! Logging setup, data directory resolution and configuration layering used
//! by every subcommand.

use crate::cli::args::{Args, EnrichArgs};
use crate::cli::discovery::{describe_data_directory, find_data_directory};
use crate::config::{DataPaths, EnrichmentConfig};
use crate::{Error, Result};
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("facility_reconciler={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Resolve and validate the data layout for this invocation
pub fn resolve_data_paths(args: &Args) -> Result<DataPaths> {
    let data_dir = find_data_directory(args.data_dir.as_deref())
        .map_err(|e| Error::configuration(format!("{:#}", e)))?;

    let paths = DataPaths::new(data_dir);
    paths.validate()?;

    info!("Using data directory {}", describe_data_directory(&paths.data_dir));
    Ok(paths)
}

/// Load configuration using a layered approach (defaults -> file -> env/args)
pub fn load_enrichment_config(args: &Args, enrich: &EnrichArgs) -> Result<EnrichmentConfig> {
    let base = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            EnrichmentConfig::from_file(path)?
        }
        None => {
            debug!("No config file given, using defaults and environment variables");
            EnrichmentConfig::default()
        }
    };

    let mut config = enrich.apply_to(base);
    if !args.show_progress() {
        config = config.without_progress();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Commands;
    use clap::Parser;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn enrich_args(extra: &[&str]) -> (Args, EnrichArgs) {
        let mut argv = vec!["facility-reconciler"];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();
        let Some(Commands::Enrich(enrich)) = args.command.clone() else {
            panic!("expected enrich");
        };
        (args, enrich)
    }

    #[test]
    fn test_config_file_is_layered_under_flags() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_updates": 10, "city": "川崎市", "show_progress": true}}"#).unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        let (args, enrich) = enrich_args(&[
            "-q",
            "--config",
            config_path.as_str(),
            "enrich",
            "--max-updates",
            "3",
        ]);
        let config = load_enrichment_config(&args, &enrich).unwrap();

        assert_eq!(config.max_updates, 3);
        assert_eq!(config.city, "川崎市");
        assert!(!config.show_progress);
    }

    #[test]
    fn test_invalid_layered_config_is_rejected() {
        let (args, enrich) = enrich_args(&["enrich", "--radius", "0"]);
        assert!(matches!(
            load_enrichment_config(&args, &enrich),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_resolve_data_paths_uses_explicit_dir() {
        let dir = TempDir::new().unwrap();
        let dir_arg = dir.path().to_str().unwrap().to_string();
        let args = Args::try_parse_from(["facility-reconciler", "--data-dir", dir_arg.as_str(), "audit"])
            .unwrap();

        let paths = resolve_data_paths(&args).unwrap();
        assert_eq!(paths.master, dir.path().join("master_facilities.csv"));
    }

    #[test]
    fn test_resolve_data_paths_missing_dir_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        let missing_arg = missing.to_str().unwrap().to_string();
        let args =
            Args::try_parse_from(["facility-reconciler", "--data-dir", missing_arg.as_str(), "audit"])
                .unwrap();

        assert!(matches!(
            resolve_data_paths(&args),
            Err(Error::Configuration { .. })
        ));
    }
}
