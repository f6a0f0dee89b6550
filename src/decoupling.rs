//! Aerobic decoupling (Pa:HR drift) of a steady run

use serde::{Deserialize, Serialize};

use crate::config::DecouplingSettings;
use crate::error::EstimatorError;
use crate::models::Confidence;

/// Average speed and heart rate over one half of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfSplit {
    pub speed_kmh: f64,
    pub heart_rate: f64,
}

impl HalfSplit {
    /// Efficiency factor: speed per heartbeat
    pub fn efficiency(&self) -> f64 {
        self.speed_kmh / self.heart_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecouplingResult {
    /// Positive when the second half was less efficient
    pub decoupling_pct: f64,
    pub confidence: Confidence,
    pub warnings: Vec<String>,
}

pub fn calculate_decoupling(
    first: HalfSplit,
    second: HalfSplit,
    settings: &DecouplingSettings,
) -> Result<DecouplingResult, EstimatorError> {
    for (name, value) in [
        ("first.speed_kmh", first.speed_kmh),
        ("first.heart_rate", first.heart_rate),
        ("second.speed_kmh", second.speed_kmh),
        ("second.heart_rate", second.heart_rate),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(EstimatorError::invalid("aerobic decoupling", name, value));
        }
    }

    let ef_first = first.efficiency();
    let decoupling_pct = (ef_first - second.efficiency()) / ef_first * 100.0;
    Ok(grade(decoupling_pct, settings))
}

/// Confidence tier for an already-measured decoupling percentage
pub fn grade(decoupling_pct: f64, settings: &DecouplingSettings) -> DecouplingResult {
    let magnitude = decoupling_pct.abs();
    let mut warnings = Vec::new();

    let confidence = if magnitude < settings.good_below_pct {
        Confidence::High
    } else if magnitude <= settings.fair_below_pct {
        Confidence::Medium
    } else {
        warnings.push(format!(
            "Aerobic decoupling of {:.1}% exceeds {:.0}%: threshold test may overstate aerobic fitness",
            decoupling_pct, settings.fair_below_pct
        ));
        Confidence::Low
    };

    DecouplingResult {
        decoupling_pct,
        confidence,
        warnings,
    }
}
