//! Water Safety Module
//!
//! Classifies metal readings, aggregates them into location reports and
//! derives risk alerts.

mod alerts;
mod classifier;
mod thresholds;

pub use alerts::{count_by_severity, latest_critical, AlertFilter};
pub use classifier::{
    aggregate, check_water_safety, classify, classify_ratio, MODERATE_RATIO_CEILING,
    MODERATE_RATIO_FLOOR, WARNING_RATIO_CEILING,
};
pub use thresholds::{ThresholdTable, DEFAULT_LIMITS};
