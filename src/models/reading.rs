//! Reading Data Models
//!
//! Metal concentration readings and the safety categories derived from them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{HmpiError, Result};

/// A single metal measurement against its regulatory limit (both in mg/L)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalReading {
    pub metal_name: String,
    pub value: f64,
    pub limit: f64,
}

impl MetalReading {
    pub fn new(metal_name: impl Into<String>, value: f64, limit: f64) -> Self {
        Self {
            metal_name: metal_name.into(),
            value,
            limit,
        }
    }

    /// Check the reading invariants: finite values, `value >= 0`, `limit > 0`
    pub fn validate(&self) -> Result<()> {
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(HmpiError::InvalidInput(format!(
                "{}: limit must be a positive number, got {}",
                self.metal_name, self.limit
            )));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(HmpiError::InvalidInput(format!(
                "{}: value must be a non-negative number, got {}",
                self.metal_name, self.value
            )));
        }
        Ok(())
    }

    /// Measured concentration divided by the regulatory limit
    pub fn ratio(&self) -> Result<f64> {
        self.validate()?;
        Ok(self.value / self.limit)
    }
}

/// Safety category of a reading or an overall index, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyCategory {
    /// Well below the regulatory limit
    Safe,
    /// Approaching the limit
    Moderate,
    /// Above the limit
    Warning,
    /// Far above the limit
    Unsafe,
}

impl SafetyCategory {
    /// All categories, least severe first
    pub const ALL: [SafetyCategory; 4] = [
        SafetyCategory::Safe,
        SafetyCategory::Moderate,
        SafetyCategory::Warning,
        SafetyCategory::Unsafe,
    ];

    /// Lowercase label used by the presentation layer
    pub fn label(&self) -> &'static str {
        match self {
            SafetyCategory::Safe => "safe",
            SafetyCategory::Moderate => "moderate",
            SafetyCategory::Warning => "warning",
            SafetyCategory::Unsafe => "unsafe",
        }
    }

    /// Get a description of the category
    pub fn description(&self) -> &'static str {
        match self {
            SafetyCategory::Safe => "Within safe limits",
            SafetyCategory::Moderate => "Approaching regulatory limits",
            SafetyCategory::Warning => "Exceeds regulatory limits",
            SafetyCategory::Unsafe => "Severely exceeds regulatory limits",
        }
    }

    /// Marker colour for maps and charts
    pub fn color_hex(&self) -> &'static str {
        match self {
            SafetyCategory::Safe => "#16a34a",
            SafetyCategory::Moderate => "#eab308",
            SafetyCategory::Warning => "#ea580c",
            SafetyCategory::Unsafe => "#dc2626",
        }
    }

    /// Badge classes for status pills
    pub fn badge_class(&self) -> &'static str {
        match self {
            SafetyCategory::Safe => "bg-green-100 text-green-800 border-green-200",
            SafetyCategory::Moderate => "bg-yellow-100 text-yellow-800 border-yellow-200",
            SafetyCategory::Warning => "bg-orange-100 text-orange-800 border-orange-200",
            SafetyCategory::Unsafe => "bg-red-100 text-red-800 border-red-200",
        }
    }

    /// Check if this category should raise an alert
    pub fn is_actionable(&self) -> bool {
        matches!(self, SafetyCategory::Warning | SafetyCategory::Unsafe)
    }
}

impl std::fmt::Display for SafetyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SafetyCategory {
    type Err = HmpiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "safe" => Ok(SafetyCategory::Safe),
            "moderate" => Ok(SafetyCategory::Moderate),
            "warning" => Ok(SafetyCategory::Warning),
            // "danger" and "critical" are used by the dashboard and alert views
            "unsafe" | "danger" | "critical" => Ok(SafetyCategory::Unsafe),
            other => Err(HmpiError::InvalidInput(format!(
                "unknown safety category: {}",
                other
            ))),
        }
    }
}
