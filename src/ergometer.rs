//! Ergometer pace ↔ power conversion and zone tables
//!
//! Uses the Concept2 relation watts = 2.80 / (seconds per metre)³. Rower and
//! SkiErg splits are per 500 m, BikeErg splits per 1000 m.

use serde::{Deserialize, Serialize};

use crate::config::ErgometerSettings;
use crate::error::EstimatorError;
use crate::format;

/// Supported machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErgometerType {
    Rower,
    SkiErg,
    Bike,
}

impl ErgometerType {
    /// Distance a split refers to (metres)
    pub fn split_meters(&self) -> f64 {
        match self {
            ErgometerType::Rower | ErgometerType::SkiErg => 500.0,
            ErgometerType::Bike => 1000.0,
        }
    }
}

/// One pace/power pair with any plausibility warnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErgConversion {
    pub ergometer: ErgometerType,
    /// Seconds per split distance, rounded to 0.01 s
    pub split_seconds: f64,
    /// Rounded to 0.1 W
    pub watts: f64,
    pub warnings: Vec<String>,
}

/// How the threshold power for a zone table was measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdSource {
    CriticalPower { watts: f64 },
    /// 2000 m time trial finish time
    TwoKmTest { time_seconds: f64 },
    TwentyMinuteTest { average_watts: f64 },
    ThirtyMinuteTest { average_watts: f64 },
    SixtyMinuteTest { average_watts: f64 },
}

/// One training zone with its power and pace band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErgZone {
    pub name: String,
    pub low_pct: f64,
    pub high_pct: f64,
    pub low_watts: f64,
    pub high_watts: f64,
    /// Split at the low end of the zone (the slower one)
    pub slow_split_seconds: f64,
    pub fast_split_seconds: f64,
}

impl ErgZone {
    /// "2:05.3-1:58.1"
    pub fn pace_band(&self) -> String {
        format!(
            "{}-{}",
            format::split(self.slow_split_seconds),
            format::split(self.fast_split_seconds)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErgZoneTable {
    pub ergometer: ErgometerType,
    pub threshold_watts: f64,
    pub zones: Vec<ErgZone>,
    pub warnings: Vec<String>,
}

/// UT2, UT1, AT, TR, AN as fractions of threshold watts
const ZONE_BANDS: [(&str, f64, f64); 5] = [
    ("UT2", 0.55, 0.70),
    ("UT1", 0.70, 0.80),
    ("AT", 0.80, 0.90),
    ("TR", 0.90, 1.05),
    ("AN", 1.05, 1.30),
];

pub struct ErgometerCalculator;

impl ErgometerCalculator {
    /// Split time → watts
    pub fn watts_for_split(
        ergometer: ErgometerType,
        split_seconds: f64,
        settings: &ErgometerSettings,
    ) -> Result<ErgConversion, EstimatorError> {
        if !split_seconds.is_finite() || split_seconds <= 0.0 {
            return Err(EstimatorError::invalid("ergometer power", "split_seconds", split_seconds));
        }

        let seconds_per_meter = split_seconds / ergometer.split_meters();
        let watts = settings.power_constant / seconds_per_meter.powi(3);

        Ok(ErgConversion {
            ergometer,
            split_seconds: round_to(split_seconds, 100.0),
            watts: round_to(watts, 10.0),
            warnings: Self::plausibility(watts, settings),
        })
    }

    /// Watts → split time
    pub fn split_for_watts(
        ergometer: ErgometerType,
        watts: f64,
        settings: &ErgometerSettings,
    ) -> Result<ErgConversion, EstimatorError> {
        if !watts.is_finite() || watts <= 0.0 {
            return Err(EstimatorError::invalid("ergometer pace", "watts", watts));
        }

        let seconds_per_meter = (settings.power_constant / watts).cbrt();
        let split_seconds = seconds_per_meter * ergometer.split_meters();

        Ok(ErgConversion {
            ergometer,
            split_seconds: round_to(split_seconds, 100.0),
            watts: round_to(watts, 10.0),
            warnings: Self::plausibility(watts, settings),
        })
    }

    /// Threshold watts implied by a test result
    pub fn threshold_watts(
        source: ThresholdSource,
        settings: &ErgometerSettings,
    ) -> Result<f64, EstimatorError> {
        let (watts, factor) = match source {
            ThresholdSource::CriticalPower { watts } => (watts, 1.0),
            ThresholdSource::TwoKmTest { time_seconds } => {
                if !time_seconds.is_finite() || time_seconds <= 0.0 {
                    return Err(EstimatorError::invalid("ergometer threshold", "time_seconds", time_seconds));
                }
                let seconds_per_meter = time_seconds / 2000.0;
                (settings.power_constant / seconds_per_meter.powi(3), 0.80)
            }
            ThresholdSource::TwentyMinuteTest { average_watts } => (average_watts, 0.95),
            ThresholdSource::ThirtyMinuteTest { average_watts } => (average_watts, 0.97),
            ThresholdSource::SixtyMinuteTest { average_watts } => (average_watts, 1.00),
        };

        if !watts.is_finite() || watts <= 0.0 {
            return Err(EstimatorError::invalid("ergometer threshold", "watts", watts));
        }
        Ok(watts * factor)
    }

    /// Five-zone table with power and split bands
    pub fn zone_table(
        ergometer: ErgometerType,
        source: ThresholdSource,
        settings: &ErgometerSettings,
    ) -> Result<ErgZoneTable, EstimatorError> {
        let threshold = Self::threshold_watts(source, settings)?;
        let mut warnings = Self::plausibility(threshold, settings);

        let mut zones = Vec::with_capacity(ZONE_BANDS.len());
        for &(name, low, high) in ZONE_BANDS.iter() {
            let low_watts = threshold * low;
            let high_watts = threshold * high;
            let slow = Self::split_for_watts(ergometer, low_watts, settings)?;
            let fast = Self::split_for_watts(ergometer, high_watts, settings)?;
            // Adjacent zones share a boundary and its warning
            for warning in slow.warnings.into_iter().chain(fast.warnings) {
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            }
            zones.push(ErgZone {
                name: name.to_string(),
                low_pct: low * 100.0,
                high_pct: high * 100.0,
                low_watts: round_to(low_watts, 10.0),
                high_watts: round_to(high_watts, 10.0),
                slow_split_seconds: slow.split_seconds,
                fast_split_seconds: fast.split_seconds,
            });
        }

        tracing::debug!(?ergometer, threshold, "Ergometer zones calculated");

        Ok(ErgZoneTable {
            ergometer,
            threshold_watts: round_to(threshold, 10.0),
            zones,
            warnings,
        })
    }

    fn plausibility(watts: f64, settings: &ErgometerSettings) -> Vec<String> {
        if watts < settings.min_plausible_watts || watts > settings.max_plausible_watts {
            vec![format!(
                "{:.1} W is outside the plausible range ({:.0}-{:.0} W)",
                watts, settings.min_plausible_watts, settings.max_plausible_watts
            )]
        } else {
            Vec::new()
        }
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_minute_split_on_rower() {
        let settings = ErgometerSettings::default();
        let conversion =
            ErgometerCalculator::watts_for_split(ErgometerType::Rower, 120.0, &settings).unwrap();
        // 2.80 / 0.24^3
        assert_eq!(conversion.watts, 202.5);
        assert!(conversion.warnings.is_empty());
    }

    #[test]
    fn test_bike_uses_thousand_metre_split() {
        let settings = ErgometerSettings::default();
        let rower = ErgometerCalculator::split_for_watts(ErgometerType::Rower, 200.0, &settings).unwrap();
        let bike = ErgometerCalculator::split_for_watts(ErgometerType::Bike, 200.0, &settings).unwrap();
        assert!((bike.split_seconds - 2.0 * rower.split_seconds).abs() <= 0.02);
    }

    #[test]
    fn test_implausible_power_warns_but_computes() {
        let settings = ErgometerSettings::default();
        let conversion =
            ErgometerCalculator::split_for_watts(ErgometerType::SkiErg, 1500.0, &settings).unwrap();
        assert_eq!(conversion.warnings.len(), 1);
        assert!(conversion.split_seconds > 0.0);

        assert!(ErgometerCalculator::split_for_watts(ErgometerType::SkiErg, 0.0, &settings).is_err());
        assert!(ErgometerCalculator::watts_for_split(ErgometerType::SkiErg, -5.0, &settings).is_err());
    }

    #[test]
    fn test_threshold_sources() {
        let settings = ErgometerSettings::default();
        let t = ErgometerCalculator::threshold_watts(
            ThresholdSource::TwentyMinuteTest { average_watts: 300.0 },
            &settings,
        )
        .unwrap();
        assert!((t - 285.0).abs() < 1e-9);

        // 2k in 8:00 is a 2:00 split, 202.5 W
        let t = ErgometerCalculator::threshold_watts(
            ThresholdSource::TwoKmTest { time_seconds: 480.0 },
            &settings,
        )
        .unwrap();
        assert!((t - 202.546_296 * 0.80).abs() < 0.01);
    }

    #[test]
    fn test_zone_table() {
        let settings = ErgometerSettings::default();
        let table = ErgometerCalculator::zone_table(
            ErgometerType::Rower,
            ThresholdSource::CriticalPower { watts: 250.0 },
            &settings,
        )
        .unwrap();

        assert_eq!(table.zones.len(), 5);
        assert_eq!(table.zones[0].name, "UT2");
        assert_eq!(table.zones[4].name, "AN");
        assert_eq!(table.zones[0].low_watts, 137.5);
        for zone in &table.zones {
            assert!(zone.slow_split_seconds > zone.fast_split_seconds);
            assert!(zone.pace_band().contains('-'));
        }
        for pair in table.zones.windows(2) {
            assert_eq!(pair[0].high_watts, pair[1].low_watts);
        }
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn test_zone_table_carries_zone_warnings() {
        let settings = ErgometerSettings::default();
        // Threshold itself is plausible, the top two zones reach past 1000 W
        let table = ErgometerCalculator::zone_table(
            ErgometerType::Rower,
            ThresholdSource::CriticalPower { watts: 1000.0 },
            &settings,
        )
        .unwrap();

        // TR high and AN low both sit at 1050 W and warn once
        assert_eq!(table.warnings.len(), 2);
        assert!(table.warnings[0].starts_with("1050.0 W"));
        assert!(table.warnings[1].starts_with("1300.0 W"));

        let low = ErgometerCalculator::zone_table(
            ErgometerType::Bike,
            ThresholdSource::CriticalPower { watts: 50.0 },
            &settings,
        )
        .unwrap();
        assert_eq!(low.warnings.len(), 1);
        assert!(low.warnings[0].starts_with("27.5 W"));
    }

    proptest! {
        #[test]
        fn prop_power_pace_round_trip(watts in 30.0f64..1000.0, idx in 0usize..3) {
            let settings = ErgometerSettings::default();
            let erg = [ErgometerType::Rower, ErgometerType::SkiErg, ErgometerType::Bike][idx];
            let pace = ErgometerCalculator::split_for_watts(erg, watts, &settings).unwrap();

            // Split is off by at most half a 0.01 s step
            let exact_split = (settings.power_constant / watts).cbrt() * erg.split_meters();
            prop_assert!((pace.split_seconds - exact_split).abs() <= 0.005 + 1e-9);

            // Back in watts, that half step is worth 3 * P * 0.005 / split,
            // plus half a 0.1 W step from rounding the result
            let back = ErgometerCalculator::watts_for_split(erg, pace.split_seconds, &settings).unwrap();
            let split_step = 3.0 * watts * 0.005 / pace.split_seconds;
            prop_assert!((back.watts - watts).abs() <= split_step * 1.01 + 0.05 + 1e-9);
        }
    }
}
