use crate::error::EngineError;
use core_types::CorrelationReport;

/// Where a ready report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    /// Served from the result cache; `cached_at` is the entry's epoch-ms timestamp.
    Cache { cached_at: i64 },
    /// Computed by this cycle.
    Computed,
}

/// The result of one pipeline run.
///
/// Keeps "nothing survived the coverage filter" apart from "the cycle failed",
/// both of which collapse to an empty report via `into_report`.
#[derive(Debug)]
pub enum CorrelationOutcome {
    Ready {
        report: CorrelationReport,
        source: ReportSource,
    },
    /// The cycle completed but no asset had enough history coverage.
    NoSurvivors,
    /// The cycle was aborted; no partial result is exposed.
    Unavailable(EngineError),
}

impl CorrelationOutcome {
    /// The report, or an empty matrix and ranking for any other outcome.
    pub fn into_report(self) -> CorrelationReport {
        match self {
            Self::Ready { report, .. } => report,
            Self::NoSurvivors | Self::Unavailable(_) => CorrelationReport::default(),
        }
    }
}
