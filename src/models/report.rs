//! Water safety report produced by aggregating metal readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reading::{MetalReading, SafetyCategory};

/// Per-metal classification shown next to each reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalStatus {
    pub metal_name: String,
    pub ratio: f64,
    pub category: SafetyCategory,
}

/// Result of a safety check for one location.
///
/// Fields are private and it is serialize-only: a report is fixed once the
/// aggregator has built it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSafetyReport {
    location: String,
    readings: Vec<MetalReading>,
    metal_statuses: Vec<MetalStatus>,
    overall_index: f64,
    category: SafetyCategory,
    driving_metal: String,
    confidence: f64,
    generated_at: DateTime<Utc>,
}

impl WaterSafetyReport {
    pub(crate) fn new(
        location: String,
        readings: Vec<MetalReading>,
        metal_statuses: Vec<MetalStatus>,
        driving_index: usize,
        confidence: f64,
    ) -> Self {
        let driver = &metal_statuses[driving_index];
        let (overall_index, category) = (driver.ratio, driver.category);
        let driving_metal = driver.metal_name.clone();
        Self {
            overall_index,
            category,
            driving_metal,
            location,
            readings,
            metal_statuses,
            confidence,
            generated_at: Utc::now(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn readings(&self) -> &[MetalReading] {
        &self.readings
    }

    /// Classification of every reading, in input order
    pub fn metal_statuses(&self) -> &[MetalStatus] {
        &self.metal_statuses
    }

    /// Highest ratio across all readings
    pub fn overall_index(&self) -> f64 {
        self.overall_index
    }

    pub fn category(&self) -> SafetyCategory {
        self.category
    }

    /// Metal whose ratio set the overall index (first one on ties)
    pub fn driving_metal(&self) -> &str {
        &self.driving_metal
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Readings above their regulatory limit
    pub fn exceedances(&self) -> Vec<&MetalStatus> {
        self.metal_statuses
            .iter()
            .filter(|s| s.ratio > 1.0)
            .collect()
    }

    /// One-line summary for logs and the console
    pub fn summary(&self) -> String {
        format!(
            "{}: {} (index {:.2}, driven by {}, confidence {:.0}%)",
            self.location, self.category, self.overall_index, self.driving_metal, self.confidence
        )
    }
}
