//! `info` command implementation.

use anyhow::{Context, Result};
use assembler::{build_messages, AssemblyContext};
use contracts::{MessageFamily, PublisherBlueprint};
use entity_store::LoadStats;
use geo_convert::StandardConverter;
use join_engine::JoinStats;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;
use crate::pipeline::{prepare, Prepared};

/// Dataset report for JSON output
#[derive(Serialize)]
struct DatasetInfo {
    data_dir: String,
    entities: LoadStats,
    join: JoinStats,
    linkage_gaps: u64,
    families: Vec<FamilyInfo>,
}

#[derive(Serialize)]
struct FamilyInfo {
    family: MessageFamily,
    message_id: u16,
    messages: usize,
    dropped: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading dataset info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let prepared = prepare(&blueprint).with_context(|| {
        format!(
            "Failed to load entities from {}",
            blueprint.source.data_dir.display()
        )
    })?;
    let report = build_info(&blueprint, &prepared);

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize dataset info")?;
        println!("{}", json);
    } else {
        print_info(&report);
    }

    Ok(())
}

fn build_info(blueprint: &PublisherBlueprint, prepared: &Prepared) -> DatasetInfo {
    let converter = StandardConverter::new();
    let ctx = AssemblyContext::new(&converter, blueprint.publisher.utm_zone);

    let families = [MessageFamily::Alert, MessageFamily::Advisory]
        .into_iter()
        .map(|family| {
            let batch = build_messages(
                family,
                &prepared.join.facts,
                &ctx,
                blueprint.publisher.initial_msg_count,
            );
            FamilyInfo {
                family,
                message_id: family.message_id(),
                messages: batch.messages.len(),
                dropped: batch.dropped,
            }
        })
        .collect();

    DatasetInfo {
        data_dir: blueprint.source.data_dir.display().to_string(),
        entities: prepared.load,
        join: prepared.join.stats,
        linkage_gaps: prepared.join.stats.linkage_gaps(),
        families,
    }
}

fn print_info(report: &DatasetInfo) {
    println!("\n=== Dataset Info ===\n");
    println!("Data dir: {}", report.data_dir);
    println!("\nEntities ({} total):", report.entities.total());
    println!("  {}", report.entities);

    let join = &report.join;
    println!("\nJoin:");
    println!("  FrameData: {} seen, {} skipped", join.frame_data_seen, join.frame_data_skipped);
    println!(
        "  Annotations: {} seen, {} skipped",
        join.annotations_seen, join.annotations_skipped
    );
    println!("  Field failures: {}", join.field_failures);
    println!("  Duplicate ids: {}", join.duplicate_ids);
    println!("  Scene facts: {}", join.facts_emitted);

    println!("\nMessages:");
    for family in &report.families {
        println!(
            "  {} (messageId {}): {} ({} dropped)",
            family.family, family.message_id, family.messages, family.dropped
        );
    }
    println!();
}
