//! Pipeline statistics.

use std::time::Duration;

use dispatcher::DispatchReport;
use observability::RunSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Wall time from start to drain (or stop)
    pub duration: Duration,

    /// Final dispatcher state
    pub report: DispatchReport,

    /// Aggregated counters of the run
    pub summary: RunSummary,
}

impl PipelineStats {
    /// Fraction of the message list that was dispatched, in percent
    pub fn progress(&self) -> f64 {
        if self.report.total == 0 {
            100.0
        } else {
            self.report.cursor as f64 / self.report.total as f64 * 100.0
        }
    }

    pub fn print_summary(&self) {
        println!();
        print!("{}", self.summary);
        println!("Family: {}", self.report.family);
        println!(
            "Dispatcher: {} ({}/{} messages, {:.1}%)",
            self.report.state,
            self.report.cursor,
            self.report.total,
            self.progress()
        );
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!();
    }
}
