use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reading::SafetyCategory;

/// Contamination alert for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub id: String,
    pub severity: SafetyCategory,
    pub region: String,
    pub metal: String,
    /// Measured level in mg/L
    pub level: f64,
    /// Regulatory threshold in mg/L
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// Where the measurement came from (sensor network, field team, ...)
    pub source: String,
    /// Estimated affected population
    pub affected: u64,
}
