//! Week-by-week progression from current fitness to goal pace, and the
//! weekly volume ramp.

use crate::config::VolumeSettings;
use crate::models::Phase;

/// Share of the current→goal gap closed by the end of Base
const BASE_SHARE: f64 = 0.20;
/// Additional share closed across Build
const BUILD_SHARE: f64 = 0.70;

/// Target speed for a week.
///
/// Base closes 20% of the gap linearly, from the current speed in week 1 to
/// 20% on its last week. Build picks up from that 20% and closes a further
/// 70% in equal steps, reaching 90% on its last week. Peak and Taper sit
/// exactly at goal. A runner already at or beyond goal keeps their current
/// speed.
pub fn progressive_pace(
    current: f64,
    goal: f64,
    phase: Phase,
    week_in_phase: u32,
    weeks_in_phase: u32,
) -> f64 {
    if current >= goal {
        return current;
    }

    let gap = goal - current;
    let n = weeks_in_phase.max(1) as f64;
    let w = week_in_phase.clamp(1, weeks_in_phase.max(1)) as f64;

    match phase {
        Phase::Base if n > 1.0 => current + gap * BASE_SHARE * (w - 1.0) / (n - 1.0),
        Phase::Base => current,
        Phase::Build => current + gap * (BASE_SHARE + BUILD_SHARE * w / n),
        Phase::Peak | Phase::Taper => goal,
    }
}

/// Percentage of peak weekly volume, interpolated linearly across the phase
pub fn volume_percent(
    phase: Phase,
    week_in_phase: u32,
    weeks_in_phase: u32,
    settings: &VolumeSettings,
) -> f64 {
    let ramp = settings.ramp(phase);
    if weeks_in_phase <= 1 {
        return ramp.start;
    }
    let w = week_in_phase.clamp(1, weeks_in_phase) as f64;
    let t = (w - 1.0) / (weeks_in_phase as f64 - 1.0);
    (ramp.start + (ramp.end - ramp.start) * t).clamp(0.0, 150.0)
}
