//! Strategy counters for extraction calls

use serde::Serialize;
use sift_domain::StrategyTag;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Point-in-time read of the strategy counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    /// Calls resolved by parsing the whole text
    pub direct: u64,

    /// Calls resolved from a code fence
    pub fenced: u64,

    /// Calls resolved from the brace span
    pub brace: u64,

    /// Calls where every strategy missed or the input was empty
    pub failed: u64,

    /// All recorded calls
    pub total: u64,
}

impl TelemetrySnapshot {
    /// Count for a single tag
    pub fn count(&self, tag: StrategyTag) -> u64 {
        match tag {
            StrategyTag::Direct => self.direct,
            StrategyTag::FencedBlock => self.fenced,
            StrategyTag::BraceSpan => self.brace,
            StrategyTag::None => self.failed,
        }
    }

    /// Calls that recovered a record
    pub fn successes(&self) -> u64 {
        StrategyTag::ALL
            .iter()
            .filter(|tag| tag.is_success())
            .map(|tag| self.count(*tag))
            .sum()
    }

    /// Share of calls resolved directly, in percent
    pub fn direct_rate(&self) -> f64 {
        self.direct as f64 / self.total.max(1) as f64 * 100.0
    }

    fn bump(&mut self, tag: StrategyTag) {
        self.total += 1;
        match tag {
            StrategyTag::Direct => self.direct += 1,
            StrategyTag::FencedBlock => self.fenced += 1,
            StrategyTag::BraceSpan => self.brace += 1,
            StrategyTag::None => self.failed += 1,
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Extraction Telemetry Summary".to_string(),
            "============================".to_string(),
            format!("Total calls: {}", self.total),
            format!("Direct success rate: {:.1}%", self.direct_rate()),
            String::new(),
            "Resolved by strategy:".to_string(),
        ];

        for tag in StrategyTag::ALL {
            lines.push(format!("  {}: {}", tag, self.count(tag)));
        }

        lines.join("\n")
    }
}

/// Fallback counters as exposed by the health surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FallbackUsage {
    /// Fenced-block recoveries
    pub markdown: u64,
    /// Brace-span recoveries
    pub bracket: u64,
    /// Total failures
    pub failed: u64,
}

/// Parsing performance block of a health report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsingPerformance {
    /// All recorded calls
    pub total_requests: u64,
    /// Direct share formatted with one decimal, e.g. `"87.5%"`
    pub direct_json_success_rate: String,
    /// Counts for the fallback strategies
    pub fallback_usage: FallbackUsage,
}

impl From<TelemetrySnapshot> for ParsingPerformance {
    fn from(snapshot: TelemetrySnapshot) -> Self {
        Self {
            total_requests: snapshot.total,
            direct_json_success_rate: format!("{:.1}%", snapshot.direct_rate()),
            fallback_usage: FallbackUsage {
                markdown: snapshot.fenced,
                bracket: snapshot.brace,
                failed: snapshot.failed,
            },
        }
    }
}

/// Shared strategy counters
///
/// All counters live behind one mutex, held only for the increment or the
/// copy-out, so a snapshot always satisfies `total == direct + fenced +
/// brace + failed`. The lock is never held across parsing work.
#[derive(Debug, Default)]
pub struct ExtractionTelemetry {
    counters: Mutex<TelemetrySnapshot>,
}

impl ExtractionTelemetry {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one extraction call
    pub fn record(&self, tag: StrategyTag) {
        self.lock().bump(tag);
    }

    /// Consistent read of all counters
    pub fn snapshot(&self) -> TelemetrySnapshot {
        *self.lock()
    }

    /// Health-report view of the counters
    pub fn performance(&self) -> ParsingPerformance {
        self.snapshot().into()
    }

    /// Zero all counters (operator action only)
    pub fn reset(&self) {
        let mut counters = self.lock();
        let previous = *counters;
        *counters = TelemetrySnapshot::default();
        info!("Extraction telemetry reset after {} calls", previous.total);
    }

    // A panicking holder cannot leave the counters half-updated, so a
    // poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, TelemetrySnapshot> {
        self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
