//! Publication pipeline metrics
//!
//! Thin wrappers over the `metrics` facade so every crate records under the
//! same names and labels, plus an in-memory aggregator for the end-of-run
//! summary.

use std::fmt;

use metrics::{counter, gauge, histogram};
use serde::Serialize;

/// Entities loaded for one collection
pub fn record_entities_loaded(entity: &'static str, count: usize) {
    gauge!("its_publisher_entities_loaded", "entity" => entity).set(count as f64);
}

/// Outcome of one join pass
pub fn record_join(facts: u64, linkage_gaps: u64, field_failures: u64) {
    counter!("its_publisher_scene_facts_total").increment(facts);
    counter!("its_publisher_linkage_gaps_total").increment(linkage_gaps);
    counter!("its_publisher_field_failures_total", "stage" => "join").increment(field_failures);
}

/// Outcome of one batch build
pub fn record_messages_assembled(family: &'static str, assembled: usize, dropped: usize) {
    counter!("its_publisher_messages_assembled_total", "family" => family)
        .increment(assembled as u64);
    counter!("its_publisher_field_failures_total", "stage" => "assemble")
        .increment(dropped as u64);
}

/// One dispatcher tick
pub fn record_message_dispatched(family: &'static str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "its_publisher_messages_dispatched_total",
        "family" => family,
        "status" => status
    )
    .increment(1);
}

/// Codec encode + decode wall time
pub fn record_codec_latency_ms(codec: &str, latency_ms: f64) {
    histogram!("its_publisher_codec_latency_ms", "codec" => codec.to_string()).record(latency_ms);
}

/// Dispatcher cursor position
pub fn record_dispatch_cursor(family: &'static str, cursor: usize, total: usize) {
    gauge!("its_publisher_dispatch_cursor", "family" => family).set(cursor as f64);
    gauge!("its_publisher_dispatch_total", "family" => family).set(total as f64);
}

/// In-memory run aggregator
///
/// Collects the same quantities as the exported metrics so the CLI can
/// print a summary without scraping the exporter.
#[derive(Debug, Clone, Default)]
pub struct RunMetricsAggregator {
    pub entities_loaded: u64,
    pub scene_facts: u64,
    pub linkage_gaps: u64,
    pub field_failures: u64,
    pub messages_assembled: u64,
    pub messages_dropped: u64,
    pub dispatched: u64,
    pub dispatch_failures: u64,
    pub codec_latency_ms: StatsSummary,
}

impl RunMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load(&mut self, entities: usize) {
        self.entities_loaded += entities as u64;
    }

    pub fn record_join(&mut self, facts: u64, linkage_gaps: u64, field_failures: u64) {
        self.scene_facts += facts;
        self.linkage_gaps += linkage_gaps;
        self.field_failures += field_failures;
    }

    pub fn record_build(&mut self, assembled: usize, dropped: usize) {
        self.messages_assembled += assembled as u64;
        self.messages_dropped += dropped as u64;
        self.field_failures += dropped as u64;
    }

    /// Totals of a finished dispatch run
    pub fn record_dispatch(&mut self, sent: u64, failures: u64, latency_ms: StatsSummary) {
        self.dispatched += sent + failures;
        self.dispatch_failures += failures;
        self.codec_latency_ms = latency_ms;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            entities_loaded: self.entities_loaded,
            scene_facts: self.scene_facts,
            linkage_gaps: self.linkage_gaps,
            field_failures: self.field_failures,
            messages_assembled: self.messages_assembled,
            messages_dropped: self.messages_dropped,
            dispatched: self.dispatched,
            dispatch_failures: self.dispatch_failures,
            failure_rate: if self.dispatched > 0 {
                self.dispatch_failures as f64 / self.dispatched as f64 * 100.0
            } else {
                0.0
            },
            codec_latency_ms: self.codec_latency_ms.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// End-of-run report
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub entities_loaded: u64,
    pub scene_facts: u64,
    pub linkage_gaps: u64,
    pub field_failures: u64,
    pub messages_assembled: u64,
    pub messages_dropped: u64,
    pub dispatched: u64,
    pub dispatch_failures: u64,
    pub failure_rate: f64,
    pub codec_latency_ms: StatsSummary,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Publication Summary ===")?;
        writeln!(f, "Entities loaded: {}", self.entities_loaded)?;
        writeln!(f, "Scene facts: {}", self.scene_facts)?;
        writeln!(f, "Linkage gaps: {}", self.linkage_gaps)?;
        writeln!(f, "Field failures: {}", self.field_failures)?;
        writeln!(
            f,
            "Messages assembled: {} (dropped {})",
            self.messages_assembled, self.messages_dropped
        )?;
        writeln!(
            f,
            "Messages dispatched: {} (failures {}, {:.2}%)",
            self.dispatched, self.dispatch_failures, self.failure_rate
        )?;
        writeln!(f, "Codec latency (ms): {}", self.codec_latency_ms)
    }
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_counts_failures() {
        let mut agg = RunMetricsAggregator::new();
        agg.record_load(8);
        agg.record_join(3, 1, 0);
        agg.record_build(2, 1);
        let mut latency = RunningStats::default();
        latency.push(0.4);
        latency.push(0.6);
        agg.record_dispatch(1, 1, StatsSummary::from(&latency));

        let summary = agg.summary();
        assert_eq!(summary.entities_loaded, 8);
        assert_eq!(summary.field_failures, 1);
        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.dispatch_failures, 1);
        assert!((summary.failure_rate - 50.0).abs() < 1e-10);
        assert_eq!(summary.codec_latency_ms.count, 2);
    }

    #[test]
    fn test_summary_display() {
        let mut agg = RunMetricsAggregator::new();
        agg.record_join(4, 0, 0);
        let output = agg.summary().to_string();
        assert!(output.contains("Scene facts: 4"), "got: {output}");
        assert!(output.contains("Codec latency (ms): N/A"), "got: {output}");
    }

    #[test]
    fn test_recorders_without_installed_recorder() {
        // no global recorder: calls are no-ops
        record_entities_loaded("log", 2);
        record_join(1, 0, 0);
        record_message_dispatched("alert", true);
        record_codec_latency_ms("json", 0.1);
    }
}
