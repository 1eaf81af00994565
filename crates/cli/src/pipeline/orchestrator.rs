//! Pipeline orchestrator - load, join, assemble, dispatch.

use std::future::Future;
use std::time::Instant;

use anyhow::{Context, Result};
use assembler::{build_messages, AssemblyContext};
use contracts::{ContractError, PublisherBlueprint, WireCodec};
use dispatcher::{codec_for, DispatchState, Dispatcher, DispatcherConfig};
use entity_store::{JsonDirectoryLoader, LoadStats};
use geo_convert::StandardConverter;
use join_engine::{JoinEngine, JoinOutput};
use observability::RunMetricsAggregator;
use tracing::{info, warn};

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated run configuration, CLI overrides applied
    pub blueprint: PublisherBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Loaded store statistics and joined facts
#[derive(Debug)]
pub struct Prepared {
    pub load: LoadStats,
    pub join: JoinOutput,
}

/// Load the entity directory and join it into scene facts
pub fn prepare(blueprint: &PublisherBlueprint) -> Result<Prepared, ContractError> {
    let (store, load) = JsonDirectoryLoader::load(&blueprint.source.data_dir)?;
    let join = JoinEngine::new(blueprint.join).join(&store);
    Ok(Prepared { load, join })
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until every message is dispatched or `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<PipelineStats>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let converter = StandardConverter::new();
        let mut aggregator = RunMetricsAggregator::new();
        let codec = codec_for(blueprint.codec.kind);
        info!(codec = codec.name(), family = %blueprint.publisher.family, "Preparing dispatcher");

        let mut dispatcher = Dispatcher::new(DispatcherConfig::from(&blueprint.publisher), codec);
        dispatcher
            .start(|| {
                let prepared = prepare(blueprint)?;
                let join_stats = &prepared.join.stats;
                aggregator.record_load(prepared.load.total());
                aggregator.record_join(
                    join_stats.facts_emitted,
                    join_stats.linkage_gaps(),
                    join_stats.field_failures,
                );

                let ctx = AssemblyContext::new(&converter, blueprint.publisher.utm_zone);
                let batch = build_messages(
                    blueprint.publisher.family,
                    &prepared.join.facts,
                    &ctx,
                    blueprint.publisher.initial_msg_count,
                );
                aggregator.record_build(batch.messages.len(), batch.dropped);
                Ok(batch.messages)
            })
            .with_context(|| {
                format!(
                    "Failed to build messages from {}",
                    blueprint.source.data_dir.display()
                )
            })?;

        let report = dispatcher
            .run_until(shutdown)
            .await
            .map_err(|e| CliError::dispatch(e.to_string()))?;

        if report.state != DispatchState::Drained {
            warn!(
                cursor = report.cursor,
                total = report.total,
                "Stopped with messages remaining"
            );
        }

        aggregator.record_dispatch(report.sent, report.failures, report.codec_latency_ms.clone());

        Ok(PipelineStats {
            duration: start_time.elapsed(),
            report,
            summary: aggregator.summary(),
        })
    }
}
