//! Regulatory limits per metal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::error::{HmpiError, Result};
use crate::models::reading::MetalReading;

/// Default limits (mg/L) for the metals tracked by the monitoring views
pub const DEFAULT_LIMITS: &[(&str, f64)] = &[
    ("Lead", 1.0),
    ("Mercury", 0.5),
    ("Cadmium", 1.0),
    ("Arsenic", 1.5),
];

/// Mapping from metal name to regulatory limit in mg/L
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ThresholdTable {
    limits: BTreeMap<String, f64>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            limits: DEFAULT_LIMITS
                .iter()
                .map(|(metal, limit)| (metal.to_string(), *limit))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, f64>> for ThresholdTable {
    type Error = HmpiError;

    fn try_from(limits: BTreeMap<String, f64>) -> Result<Self> {
        Self::new(limits)
    }
}

impl From<ThresholdTable> for BTreeMap<String, f64> {
    fn from(table: ThresholdTable) -> Self {
        table.limits
    }
}

impl ThresholdTable {
    /// Build a table from trimmed names, rejecting blank names, names that
    /// differ only by case and non-positive limits
    pub fn new(limits: BTreeMap<String, f64>) -> Result<Self> {
        let mut trimmed: BTreeMap<String, f64> = BTreeMap::new();
        for (metal, limit) in limits {
            let metal = metal.trim();
            if metal.is_empty() {
                return Err(HmpiError::InvalidInput("metal name must not be blank".to_string()));
            }
            if !limit.is_finite() || limit <= 0.0 {
                return Err(HmpiError::InvalidInput(format!(
                    "{}: limit must be a positive number, got {}",
                    metal, limit
                )));
            }
            if trimmed.keys().any(|existing| existing.eq_ignore_ascii_case(metal)) {
                return Err(HmpiError::InvalidInput(format!(
                    "duplicate limit for metal: {}",
                    metal
                )));
            }
            trimmed.insert(metal.to_string(), limit);
        }
        Ok(Self { limits: trimmed })
    }

    /// Case-insensitive limit lookup
    pub fn limit(&self, metal: &str) -> Option<f64> {
        self.entry(metal).map(|(_, limit)| limit)
    }

    /// Metal names sorted by name
    pub fn metals(&self) -> Vec<&str> {
        self.limits.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Pair a measured value with the metal's limit
    pub fn reading(&self, metal: &str, value: f64) -> Result<MetalReading> {
        let (name, limit) = self.entry(metal).ok_or_else(|| {
            HmpiError::InvalidInput(format!("no regulatory limit for metal: {}", metal.trim()))
        })?;
        let reading = MetalReading::new(name, value, limit);
        reading.validate()?;
        Ok(reading)
    }

    /// Build readings for a list of measurements, keeping their order
    pub fn readings<'a, I>(&self, measurements: I) -> Result<Vec<MetalReading>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        measurements
            .into_iter()
            .map(|(metal, value)| self.reading(metal, value))
            .collect()
    }

    fn entry(&self, metal: &str) -> Option<(&str, f64)> {
        let metal = metal.trim();
        self.limits
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(metal))
            .map(|(name, limit)| (name.as_str(), *limit))
    }
}
