//! Risk alert derivation and filtering for the alerts view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::alert::RiskAlert;
use crate::models::error::Result;
use crate::models::reading::{MetalReading, SafetyCategory};

use super::classifier::classify;

impl RiskAlert {
    /// Build an alert whose severity is derived from `level / threshold`
    #[allow(clippy::too_many_arguments)]
    pub fn from_reading(
        id: impl Into<String>,
        region: impl Into<String>,
        metal: impl Into<String>,
        level: f64,
        threshold: f64,
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
        source: impl Into<String>,
        affected: u64,
    ) -> Result<Self> {
        let metal = metal.into();
        let severity = classify(&MetalReading::new(metal.clone(), level, threshold))?;
        Ok(Self {
            id: id.into(),
            severity,
            region: region.into(),
            metal,
            level,
            threshold,
            timestamp,
            description: description.into(),
            source: source.into(),
            affected,
        })
    }
}

/// Alert list filter; `None` criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertFilter {
    pub severity: Option<SafetyCategory>,
    pub region: Option<String>,
    pub metal: Option<String>,
    /// Free text matched against description, region and metal
    pub search: String,
}

impl AlertFilter {
    pub fn matches(&self, alert: &RiskAlert) -> bool {
        let matches_severity = self.severity.map_or(true, |s| alert.severity == s);
        let matches_region = self
            .region
            .as_deref()
            .map_or(true, |r| alert.region.eq_ignore_ascii_case(r.trim()));
        let matches_metal = self
            .metal
            .as_deref()
            .map_or(true, |m| alert.metal.eq_ignore_ascii_case(m.trim()));

        let search = self.search.trim().to_lowercase();
        let matches_search = search.is_empty()
            || alert.description.to_lowercase().contains(&search)
            || alert.region.to_lowercase().contains(&search)
            || alert.metal.to_lowercase().contains(&search);

        matches_severity && matches_region && matches_metal && matches_search
    }

    /// Matching alerts in input order
    pub fn filter<'a>(&self, alerts: &'a [RiskAlert]) -> Vec<&'a RiskAlert> {
        alerts.iter().filter(|a| self.matches(a)).collect()
    }
}

/// First Unsafe alert in input order, shown as the banner on the alerts view
pub fn latest_critical(alerts: &[RiskAlert]) -> Option<&RiskAlert> {
    alerts.iter().find(|a| a.severity == SafetyCategory::Unsafe)
}

/// Alert counts per category, least severe first
pub fn count_by_severity(alerts: &[RiskAlert]) -> Vec<(SafetyCategory, usize)> {
    SafetyCategory::ALL
        .iter()
        .map(|category| {
            let count = alerts.iter().filter(|a| a.severity == *category).count();
            (*category, count)
        })
        .collect()
}
