//! Evidence resolution
//!
//! Collapses a [`PhysiologicalProfile`] into the single highest-fidelity piece
//! of evidence that validates, in priority order Lab > FieldTest > RaceResult
//! > Heuristic. A tier that is present but unusable is skipped with a warning.
//! The heuristic tier always succeeds, so resolution is total.

use serde::{Deserialize, Serialize};

use crate::config::DecouplingSettings;
use crate::decoupling;
use crate::models::{Confidence, DataSource, ExperienceLevel, FieldTest, PhysiologicalProfile, RaceResult};
use crate::vdot;

/// Threshold speed relative to marathon-equivalent speed
pub const THRESHOLD_TO_MARATHON: f64 = 1.05;

/// Maximum heuristic adjustment for weekly volume
const VOLUME_NUDGE_LIMIT: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Evidence {
    Lab { vo2max: f64, effective_vdot: f64 },
    FieldTest { test: FieldTest },
    RaceResult { race: RaceResult, vdot: f64 },
    Heuristic { experience_level: ExperienceLevel, weekly_volume_km: Option<f64> },
}

/// Evidence plus the fitness anchor derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEvidence {
    pub evidence: Evidence,
    pub data_source: DataSource,
    pub confidence: Confidence,
    pub vdot: Option<f64>,
    /// Current marathon-equivalent speed (km/h)
    pub marathon_speed_kmh: f64,
    /// Current threshold speed (km/h)
    pub threshold_speed_kmh: f64,
    pub warnings: Vec<String>,
}

/// Fraction of lab VO2max a runner converts into running performance
pub fn running_efficiency(level: ExperienceLevel) -> f64 {
    match level {
        ExperienceLevel::Advanced => 1.00,
        ExperienceLevel::Intermediate => 0.97,
        ExperienceLevel::Beginner => 0.95,
    }
}

/// Base marathon-equivalent speed and reference weekly volume per tier
fn heuristic_baseline(level: ExperienceLevel) -> (f64, f64) {
    match level {
        ExperienceLevel::Beginner => (9.0, 20.0),
        ExperienceLevel::Intermediate => (11.0, 40.0),
        ExperienceLevel::Advanced => (13.5, 70.0),
    }
}

/// Marathon-equivalent speed from experience and weekly volume
pub fn heuristic_marathon_speed(level: ExperienceLevel, weekly_volume_km: Option<f64>) -> f64 {
    let (base, reference) = heuristic_baseline(level);
    let nudge = weekly_volume_km
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| ((v / reference) - 1.0) * VOLUME_NUDGE_LIMIT)
        .unwrap_or(0.0)
        .clamp(-VOLUME_NUDGE_LIMIT, VOLUME_NUDGE_LIMIT);
    base * (1.0 + nudge)
}

/// Resolve the highest-priority usable evidence tier
pub fn resolve_evidence(
    profile: &PhysiologicalProfile,
    decoupling_settings: &DecouplingSettings,
) -> ResolvedEvidence {
    let mut warnings = Vec::new();

    if let Some(vo2max) = profile.lab_vo2max {
        match from_lab(vo2max, profile.experience_level) {
            Ok(resolved) => return with_skipped(resolved, warnings),
            Err(reason) => warnings.push(format!("Lab VO2max skipped: {}", reason)),
        }
    }

    if let Some(test) = profile.field_test {
        match from_field_test(test, decoupling_settings) {
            Ok(resolved) => return with_skipped(resolved, warnings),
            Err(reason) => warnings.push(format!("Field test skipped: {}", reason)),
        }
    }

    if let Some(race) = profile.race_result {
        match from_race(race) {
            Ok(resolved) => return with_skipped(resolved, warnings),
            Err(reason) => warnings.push(format!("Race result skipped: {}", reason)),
        }
    }

    let marathon = heuristic_marathon_speed(profile.experience_level, profile.weekly_volume_km);
    tracing::debug!(
        level = ?profile.experience_level,
        marathon_speed_kmh = marathon,
        "Falling back to heuristic evidence"
    );

    ResolvedEvidence {
        evidence: Evidence::Heuristic {
            experience_level: profile.experience_level,
            weekly_volume_km: profile.weekly_volume_km,
        },
        data_source: DataSource::Estimate,
        confidence: if profile.weekly_volume_km.is_some() {
            Confidence::Low
        } else {
            Confidence::VeryLow
        },
        vdot: None,
        marathon_speed_kmh: marathon,
        threshold_speed_kmh: marathon * THRESHOLD_TO_MARATHON,
        warnings,
    }
}

/// Prepend warnings from skipped higher tiers
fn with_skipped(mut resolved: ResolvedEvidence, mut skipped: Vec<String>) -> ResolvedEvidence {
    skipped.append(&mut resolved.warnings);
    resolved.warnings = skipped;
    resolved
}

fn from_lab(vo2max: f64, level: ExperienceLevel) -> Result<ResolvedEvidence, String> {
    if !vo2max.is_finite() || vo2max <= 0.0 {
        return Err(format!("VO2max {} is not a positive number", vo2max));
    }

    let effective_vdot = vo2max * running_efficiency(level);
    let marathon = vdot::marathon_speed_kmh(effective_vdot).map_err(|e| e.to_string())?;
    let warnings: Vec<String> = vdot::plausibility_warning(effective_vdot).into_iter().collect();

    tracing::debug!(vo2max, effective_vdot, marathon_speed_kmh = marathon, "Using lab evidence");

    Ok(ResolvedEvidence {
        evidence: Evidence::Lab { vo2max, effective_vdot },
        data_source: DataSource::Lab,
        confidence: if warnings.is_empty() {
            Confidence::High
        } else {
            Confidence::Low
        },
        vdot: Some(effective_vdot),
        marathon_speed_kmh: marathon,
        threshold_speed_kmh: marathon * THRESHOLD_TO_MARATHON,
        warnings,
    })
}

fn from_field_test(
    test: FieldTest,
    decoupling_settings: &DecouplingSettings,
) -> Result<ResolvedEvidence, String> {
    let threshold = test.threshold_speed_kmh;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(format!("threshold speed {} km/h is not a positive number", threshold));
    }

    let (confidence, warnings) = match test.decoupling_pct.filter(|d| d.is_finite()) {
        Some(pct) => {
            let graded = decoupling::grade(pct, decoupling_settings);
            (graded.confidence, graded.warnings)
        }
        None => (Confidence::High, Vec::new()),
    };

    tracing::debug!(threshold_speed_kmh = threshold, ?confidence, "Using field test evidence");

    Ok(ResolvedEvidence {
        evidence: Evidence::FieldTest { test },
        data_source: DataSource::FieldTest,
        confidence,
        vdot: None,
        marathon_speed_kmh: threshold / THRESHOLD_TO_MARATHON,
        threshold_speed_kmh: threshold,
        warnings,
    })
}

fn from_race(race: RaceResult) -> Result<ResolvedEvidence, String> {
    let race_vdot = vdot::vdot_from_race(&race)
        .ok_or_else(|| format!("{} in {}s is not a valid performance", race.distance, race.time_seconds))?;
    let marathon = vdot::marathon_speed_kmh(race_vdot).map_err(|e| e.to_string())?;
    let warnings: Vec<String> = vdot::plausibility_warning(race_vdot).into_iter().collect();

    tracing::debug!(vdot = race_vdot, marathon_speed_kmh = marathon, "Using race evidence");

    Ok(ResolvedEvidence {
        evidence: Evidence::RaceResult { race, vdot: race_vdot },
        data_source: DataSource::RaceTime,
        confidence: if warnings.is_empty() {
            Confidence::High
        } else {
            Confidence::Low
        },
        vdot: Some(race_vdot),
        marathon_speed_kmh: marathon,
        threshold_speed_kmh: marathon * THRESHOLD_TO_MARATHON,
        warnings,
    })
}
