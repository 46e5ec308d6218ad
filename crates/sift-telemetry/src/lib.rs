//! Sift Telemetry
//!
//! Process-wide counters recording which recovery strategy resolved each
//! extraction call.
//!
//! # Overview
//!
//! One [`ExtractionTelemetry`] is created at process start and shared by
//! handle (`Arc`) with every pipeline instance. Each pipeline call records
//! exactly one [`StrategyTag`](sift_domain::StrategyTag). Reporting surfaces
//! read a [`TelemetrySnapshot`] at any time.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use sift_domain::StrategyTag;
//! use sift_telemetry::ExtractionTelemetry;
//!
//! let telemetry = Arc::new(ExtractionTelemetry::new());
//! telemetry.record(StrategyTag::Direct);
//! telemetry.record(StrategyTag::BraceSpan);
//!
//! let snapshot = telemetry.snapshot();
//! assert_eq!(snapshot.total, 2);
//! assert_eq!(snapshot.count(StrategyTag::Direct), 1);
//!
//! let performance = telemetry.performance();
//! assert_eq!(performance.direct_json_success_rate, "50.0%");
//! ```

#![warn(missing_docs)]

mod metrics;

pub use metrics::{ExtractionTelemetry, FallbackUsage, ParsingPerformance, TelemetrySnapshot};
