//! Daniels/Gilbert VDOT model
//!
//! Race performance → VDOT via the oxygen-cost and fraction-of-VO2max curves,
//! and the inverse: VDOT → predicted finish time by fixed-point iteration.

use crate::error::EstimatorError;
use crate::models::{RaceDistance, RaceResult};

/// Oxygen cost quadratic coefficient
const COST_A: f64 = 0.000_104;
/// Oxygen cost linear coefficient
const COST_B: f64 = 0.182_258;
/// Oxygen cost constant
const COST_C: f64 = -4.60;

/// Iterations used when inverting VDOT to a finish time
pub const PREDICTION_ITERATIONS: usize = 10;

/// Plausible VDOT range for human runners
pub const PLAUSIBLE_VDOT: (f64, f64) = (30.0, 85.0);

/// Oxygen cost (ml/kg/min) of running at `velocity` metres per minute
pub fn oxygen_cost(velocity: f64) -> f64 {
    (COST_A * velocity).mul_add(velocity, COST_B.mul_add(velocity, COST_C))
}

/// Fraction of VO2max sustainable for a race lasting `minutes`
pub fn fraction_of_vo2max(minutes: f64) -> f64 {
    0.8 + 0.189_439_3 * (-0.012_778 * minutes).exp() + 0.298_955_8 * (-0.193_260_5 * minutes).exp()
}

/// Velocity (m/min) whose oxygen cost equals `vo2`; positive root of the cost quadratic
pub fn velocity_for_vo2(vo2: f64) -> f64 {
    let c = COST_C - vo2;
    let discriminant = COST_B.mul_add(COST_B, -4.0 * COST_A * c);
    (-COST_B + discriminant.max(0.0).sqrt()) / (2.0 * COST_A)
}

/// VDOT from a race distance (metres) and finish time (seconds)
pub fn calculate_vdot(distance_meters: f64, time_seconds: f64) -> Result<f64, EstimatorError> {
    if !distance_meters.is_finite() || distance_meters <= 0.0 {
        return Err(EstimatorError::invalid("VDOT", "distance_meters", distance_meters));
    }
    if !time_seconds.is_finite() || time_seconds <= 0.0 {
        return Err(EstimatorError::invalid("VDOT", "time_seconds", time_seconds));
    }

    let minutes = time_seconds / 60.0;
    let velocity = distance_meters / minutes;
    let vdot = oxygen_cost(velocity) / fraction_of_vo2max(minutes);

    if !vdot.is_finite() || vdot <= 0.0 {
        return Err(EstimatorError::invalid("VDOT", "result", vdot));
    }
    Ok(vdot)
}

/// VDOT from a free-form distance label such as "5k" or "half"
pub fn vdot_for_label(label: &str, time_seconds: f64) -> Result<f64, EstimatorError> {
    let distance: RaceDistance = label.parse()?;
    calculate_vdot(distance.meters(), time_seconds)
}

/// Fail-closed wrapper: `None` on any invalid race so callers can fall back
pub fn vdot_from_race(race: &RaceResult) -> Option<f64> {
    calculate_vdot(race.distance.meters(), race.time_seconds).ok()
}

/// Warning text for a VDOT outside the plausible human range
pub fn plausibility_warning(vdot: f64) -> Option<String> {
    let (low, high) = PLAUSIBLE_VDOT;
    if vdot < low || vdot > high {
        Some(format!(
            "VDOT {:.1} is outside the plausible range ({:.0}-{:.0})",
            vdot, low, high
        ))
    } else {
        None
    }
}

/// Predicted finish time (seconds) over `distance_meters` for a given VDOT
pub fn predict_time(vdot: f64, distance_meters: f64) -> Result<f64, EstimatorError> {
    if !vdot.is_finite() || vdot <= 0.0 {
        return Err(EstimatorError::invalid("race prediction", "vdot", vdot));
    }
    if !distance_meters.is_finite() || distance_meters <= 0.0 {
        return Err(EstimatorError::invalid(
            "race prediction",
            "distance_meters",
            distance_meters,
        ));
    }

    // Seed: 5K at 97.5% of vVO2max, extrapolated with Riegel's exponent
    let v_max = velocity_for_vo2(vdot);
    let five_k_minutes = 5_000.0 / (0.975 * v_max);
    let mut minutes = five_k_minutes * (distance_meters / 5_000.0).powf(1.06);

    for _ in 0..PREDICTION_ITERATIONS {
        let required_vo2 = vdot * fraction_of_vo2max(minutes);
        let velocity = velocity_for_vo2(required_vo2);
        if velocity <= 0.0 {
            return Err(EstimatorError::invalid("race prediction", "vdot", vdot));
        }
        minutes = distance_meters / velocity;
    }

    Ok(minutes * 60.0)
}

/// Marathon-equivalent speed (km/h) for a VDOT
pub fn marathon_speed_kmh(vdot: f64) -> Result<f64, EstimatorError> {
    let seconds = predict_time(vdot, RaceDistance::Marathon.meters())?;
    Ok(RaceDistance::Marathon.kilometers() / (seconds / 3600.0))
}

/// Equivalent performance over another distance
pub fn equivalent_time(
    from: RaceDistance,
    time_seconds: f64,
    to: RaceDistance,
) -> Result<f64, EstimatorError> {
    let vdot = calculate_vdot(from.meters(), time_seconds)?;
    predict_time(vdot, to.meters())
}
