//! Contamination Classifier
//!
//! Ratio-based classification of metal readings and worst-metal aggregation.

use crate::models::error::{HmpiError, Result};
use crate::models::reading::{MetalReading, SafetyCategory};
use crate::models::report::{MetalStatus, WaterSafetyReport};

/// Ratios from here up to [`MODERATE_RATIO_CEILING`] are Moderate
pub const MODERATE_RATIO_FLOOR: f64 = 0.8;

/// Highest ratio still classified as Moderate
pub const MODERATE_RATIO_CEILING: f64 = 1.0;

/// Highest ratio still classified as Warning
pub const WARNING_RATIO_CEILING: f64 = 1.5;

/// Classify a ratio (or an overall index) into a safety category.
///
/// Bands: `< 0.8` Safe, `0.8..=1.0` Moderate, `(1.0, 1.5]` Warning, `> 1.5` Unsafe.
/// A ratio that overflowed to `+inf` is Unsafe.
pub fn classify_ratio(ratio: f64) -> Result<SafetyCategory> {
    if ratio.is_nan() || ratio < 0.0 {
        return Err(HmpiError::InvalidInput(format!(
            "ratio must be a non-negative number, got {}",
            ratio
        )));
    }

    let category = if ratio < MODERATE_RATIO_FLOOR {
        SafetyCategory::Safe
    } else if ratio <= MODERATE_RATIO_CEILING {
        SafetyCategory::Moderate
    } else if ratio <= WARNING_RATIO_CEILING {
        SafetyCategory::Warning
    } else {
        SafetyCategory::Unsafe
    };

    Ok(category)
}

/// Classify a single reading by its value/limit ratio
pub fn classify(reading: &MetalReading) -> Result<SafetyCategory> {
    let category = classify_ratio(reading.ratio()?)?;
    tracing::debug!(
        "Classified {} ({} / {} mg/L) as {}",
        reading.metal_name,
        reading.value,
        reading.limit,
        category
    );
    Ok(category)
}

/// Combine readings into one report. The worst metal dominates: the overall
/// index is the highest ratio and the category is that reading's category.
/// On ties the earliest reading in input order drives the result.
pub fn aggregate(
    location: impl Into<String>,
    readings: &[MetalReading],
    confidence: f64,
) -> Result<WaterSafetyReport> {
    if readings.is_empty() {
        return Err(HmpiError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&confidence) {
        return Err(HmpiError::InvalidInput(format!(
            "confidence must be within 0-100, got {}",
            confidence
        )));
    }

    let mut statuses: Vec<MetalStatus> = Vec::with_capacity(readings.len());
    let mut driving_index = 0;
    let mut max_ratio = f64::NEG_INFINITY;

    for (i, reading) in readings.iter().enumerate() {
        let ratio = reading.ratio()?;
        let category = classify_ratio(ratio)?;
        // Strict comparison keeps the first reading on ties
        if ratio > max_ratio {
            max_ratio = ratio;
            driving_index = i;
        }
        statuses.push(MetalStatus {
            metal_name: reading.metal_name.clone(),
            ratio,
            category,
        });
    }

    let report = WaterSafetyReport::new(
        location.into(),
        readings.to_vec(),
        statuses,
        driving_index,
        confidence,
    );
    tracing::debug!("Aggregated {} readings: {}", readings.len(), report.summary());
    Ok(report)
}

/// The "check safety" action: requires a location before aggregating
pub fn check_water_safety(
    location: &str,
    readings: &[MetalReading],
    confidence: f64,
) -> Result<WaterSafetyReport> {
    let location = location.trim();
    if location.is_empty() {
        return Err(HmpiError::InvalidInput("location is required".to_string()));
    }
    aggregate(location, readings, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_readings() -> Vec<MetalReading> {
        vec![
            MetalReading::new("Lead", 0.8, 1.0),
            MetalReading::new("Mercury", 0.3, 0.5),
            MetalReading::new("Cadmium", 1.2, 1.0),
            MetalReading::new("Arsenic", 0.6, 1.5),
        ]
    }

    #[test]
    fn test_band_boundaries() {
        let cases = vec![
            (0.0, SafetyCategory::Safe),
            (0.79, SafetyCategory::Safe),
            (0.8, SafetyCategory::Moderate),
            (1.0, SafetyCategory::Moderate),
            (1.01, SafetyCategory::Warning),
            (1.5, SafetyCategory::Warning),
            (1.51, SafetyCategory::Unsafe),
            (42.0, SafetyCategory::Unsafe),
        ];

        for (ratio, expected) in cases {
            assert_eq!(
                classify_ratio(ratio).unwrap(),
                expected,
                "ratio {} should be {}",
                ratio,
                expected
            );
        }
    }

    #[test]
    fn test_classify_boundary_readings() {
        assert_eq!(
            classify(&MetalReading::new("Lead", 0.8, 1.0)).unwrap(),
            SafetyCategory::Moderate
        );
        assert_eq!(
            classify(&MetalReading::new("Lead", 1.5, 1.0)).unwrap(),
            SafetyCategory::Warning
        );
    }

    #[test]
    fn test_classify_rejects_invalid_readings() {
        let invalid = vec![
            MetalReading::new("Lead", 0.5, 0.0),
            MetalReading::new("Lead", 0.5, -2.0),
            MetalReading::new("Lead", -0.5, 1.0),
        ];

        for reading in invalid {
            assert!(
                matches!(classify(&reading), Err(HmpiError::InvalidInput(_))),
                "{:?} should be rejected",
                reading
            );
        }
    }

    #[test]
    fn test_classify_ratio_rejects_negative_and_nan() {
        assert!(classify_ratio(-0.1).is_err());
        assert!(classify_ratio(f64::NAN).is_err());
        assert!(classify_ratio(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_overflowing_ratio_is_unsafe() {
        assert_eq!(classify_ratio(f64::INFINITY).unwrap(), SafetyCategory::Unsafe);

        let extreme = MetalReading::new("Lead", 1e300, 1e-10);
        assert!(extreme.validate().is_ok());
        assert_eq!(classify(&extreme).unwrap(), SafetyCategory::Unsafe);

        let readings = vec![MetalReading::new("Mercury", 0.3, 0.5), extreme];
        let report = aggregate("Delhi", &readings, 85.0).unwrap();
        assert_eq!(report.category(), SafetyCategory::Unsafe);
        assert_eq!(report.driving_metal(), "Lead");
    }

    #[test]
    fn test_aggregate_worst_metal_dominates() {
        let report = aggregate("New Delhi, India", &sample_readings(), 85.0).unwrap();

        assert_eq!(report.category(), SafetyCategory::Warning);
        assert_eq!(report.driving_metal(), "Cadmium");
        assert!((report.overall_index() - 1.2).abs() < 1e-9);
        assert_eq!(report.confidence(), 85.0);
        assert_eq!(report.location(), "New Delhi, India");
        assert_eq!(report.readings().len(), 4);
    }

    #[test]
    fn test_aggregate_metal_statuses_in_input_order() {
        let report = aggregate("Delhi", &sample_readings(), 85.0).unwrap();
        let categories: Vec<_> = report.metal_statuses().iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                SafetyCategory::Moderate,
                SafetyCategory::Safe,
                SafetyCategory::Warning,
                SafetyCategory::Safe,
            ]
        );

        let exceedances = report.exceedances();
        assert_eq!(exceedances.len(), 1);
        assert_eq!(exceedances[0].metal_name, "Cadmium");
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert_eq!(aggregate("Delhi", &[], 85.0), Err(HmpiError::EmptyInput));
    }

    #[test]
    fn test_aggregate_tie_uses_first_reading() {
        let readings = vec![
            MetalReading::new("Lead", 0.3, 1.0),
            MetalReading::new("Mercury", 1.0, 0.5),
            MetalReading::new("Cadmium", 2.0, 1.0),
        ];
        let report = aggregate("Delhi", &readings, 50.0).unwrap();
        assert_eq!(report.driving_metal(), "Mercury");
        assert_eq!(report.category(), SafetyCategory::Unsafe);

        let reversed: Vec<_> = readings.iter().rev().cloned().collect();
        let report = aggregate("Delhi", &reversed, 50.0).unwrap();
        assert_eq!(report.driving_metal(), "Cadmium");
    }

    #[test]
    fn test_aggregate_rejects_any_invalid_reading() {
        let mut readings = sample_readings();
        readings.push(MetalReading::new("Chromium", 0.1, 0.0));
        assert!(matches!(
            aggregate("Delhi", &readings, 85.0),
            Err(HmpiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_aggregate_rejects_confidence_out_of_range() {
        assert!(aggregate("Delhi", &sample_readings(), 100.5).is_err());
        assert!(aggregate("Delhi", &sample_readings(), -1.0).is_err());
        assert!(aggregate("Delhi", &sample_readings(), 100.0).is_ok());
        assert!(aggregate("Delhi", &sample_readings(), 0.0).is_ok());
    }

    #[test]
    fn test_check_water_safety_requires_location() {
        assert!(matches!(
            check_water_safety("   ", &sample_readings(), 85.0),
            Err(HmpiError::InvalidInput(_))
        ));

        let report = check_water_safety("  Mumbai ", &sample_readings(), 85.0).unwrap();
        assert_eq!(report.location(), "Mumbai");
    }

    #[test]
    fn test_classify_and_aggregate_are_idempotent() {
        let readings = sample_readings();
        for reading in &readings {
            assert_eq!(classify(reading).unwrap(), classify(reading).unwrap());
        }

        let first = aggregate("Delhi", &readings, 85.0).unwrap();
        let second = aggregate("Delhi", &readings, 85.0).unwrap();
        assert_eq!(first.category(), second.category());
        assert_eq!(first.overall_index(), second.overall_index());
        assert_eq!(first.driving_metal(), second.driving_metal());
        assert_eq!(first.metal_statuses(), second.metal_statuses());
    }

    proptest! {
        #[test]
        fn prop_classify_is_monotonic_in_ratio(
            limit in 1e-12f64..100.0,
            a in prop_oneof![0.0f64..500.0, 1e290f64..1e300],
            b in prop_oneof![0.0f64..500.0, 1e290f64..1e300],
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_category = classify(&MetalReading::new("Lead", low, limit)).unwrap();
            let high_category = classify(&MetalReading::new("Lead", high, limit)).unwrap();
            prop_assert!(low_category <= high_category);
        }

        #[test]
        fn prop_overall_category_is_the_worst(
            values in proptest::collection::vec(0.0f64..10.0, 1..8),
        ) {
            let readings: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| MetalReading::new(format!("metal-{}", i), *v, 1.0))
                .collect();
            let report = aggregate("Anywhere", &readings, 50.0).unwrap();
            let worst = report.metal_statuses().iter().map(|s| s.category).max().unwrap();
            prop_assert_eq!(report.category(), worst);
        }
    }
}
