//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::PublisherBlueprint;
use tracing::{error, info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    apply_overrides(&mut blueprint, args);
    config_loader::ConfigLoader::validate(&blueprint)
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    info!(
        data_dir = %blueprint.source.data_dir.display(),
        family = %blueprint.publisher.family,
        interval_ms = blueprint.publisher.interval_ms,
        utm_zone = blueprint.publisher.utm_zone,
        codec = ?blueprint.codec.kind,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        blueprint,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    });

    info!("Starting publication...");
    let stats = pipeline
        .run(shutdown_signal())
        .await
        .context("Publication failed")?;

    info!(
        sent = stats.report.sent,
        failures = stats.report.failures,
        duration_secs = stats.duration.as_secs_f64(),
        "Publication finished"
    );
    stats.print_summary();

    Ok(())
}

/// Apply CLI flags on top of file values
fn apply_overrides(blueprint: &mut PublisherBlueprint, args: &RunArgs) {
    if let Some(ref dir) = args.data_dir {
        info!(data_dir = %dir.display(), "Overriding data directory from CLI");
        blueprint.source.data_dir = dir.clone();
    }
    if let Some(family) = args.family {
        blueprint.publisher.family = family.into();
    }
    if let Some(interval_ms) = args.interval_ms {
        blueprint.publisher.interval_ms = interval_ms;
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Received shutdown signal, stopping dispatcher...");
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &PublisherBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Source:");
    println!("  Data dir: {}", blueprint.source.data_dir.display());
    println!("  Parallel join: {}", blueprint.join.parallel);
    println!("\nPublisher:");
    println!(
        "  Family: {} (messageId {})",
        blueprint.publisher.family,
        blueprint.publisher.family.message_id()
    );
    println!("  Interval: {} ms", blueprint.publisher.interval_ms);
    println!("  UTM zone: {}", blueprint.publisher.utm_zone);
    println!("  Initial msgCnt: {}", blueprint.publisher.initial_msg_count);
    println!("\nCodec: {:?}", blueprint.codec.kind);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FamilyArg;
    use contracts::MessageFamily;
    use std::path::PathBuf;

    fn blueprint() -> PublisherBlueprint {
        config_loader::ConfigLoader::load_from_str(
            "[source]\ndata_dir = \"./data\"\n",
            config_loader::ConfigFormat::Toml,
        )
        .unwrap()
    }

    fn args() -> RunArgs {
        RunArgs {
            config: PathBuf::from("publisher.toml"),
            data_dir: None,
            family: None,
            interval_ms: None,
            metrics_port: 0,
            dry_run: false,
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut bp = blueprint();
        let args = RunArgs {
            data_dir: Some(PathBuf::from("/tmp/scene")),
            family: Some(FamilyArg::Advisory),
            interval_ms: Some(200),
            ..args()
        };

        apply_overrides(&mut bp, &args);
        assert_eq!(bp.source.data_dir, PathBuf::from("/tmp/scene"));
        assert_eq!(bp.publisher.family, MessageFamily::Advisory);
        assert_eq!(bp.publisher.interval_ms, 200);
    }

    #[test]
    fn test_zero_interval_override_fails_validation() {
        let mut bp = blueprint();
        let args = RunArgs {
            interval_ms: Some(0),
            ..args()
        };

        apply_overrides(&mut bp, &args);
        let err = config_loader::ConfigLoader::validate(&bp).unwrap_err();
        assert!(err.to_string().contains("interval_ms"), "got: {err}");
    }
}
