//! Periodization: splitting a plan's weeks into Base/Build/Peak/Taper

use serde::{Deserialize, Serialize};

use crate::config::{PhaseRatio, PhaseRatioSettings};
use crate::models::{Methodology, Phase};

/// Weeks per phase; always sums to the plan length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseDistribution {
    pub base: u32,
    pub build: u32,
    pub peak: u32,
    pub taper: u32,
}

/// Where a plan week falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePosition {
    pub phase: Phase,
    /// 1-based
    pub week_in_phase: u32,
    pub weeks_in_phase: u32,
}

impl PhaseDistribution {
    /// Split `total_weeks` using the methodology's configured ratios
    pub fn for_methodology(
        total_weeks: u32,
        methodology: Methodology,
        ratios: &PhaseRatioSettings,
    ) -> Self {
        Self::calculate(total_weeks, ratios.for_methodology(methodology))
    }

    /// Split `total_weeks` by `ratio`.
    ///
    /// Base, build and peak are floored and raised to at least one week; taper
    /// takes the remainder but is capped at `max(1, round(total × taper ratio))`,
    /// with surplus weeks returned to the other phases by largest fractional
    /// remainder. Plans shorter than four weeks drop phases from the front.
    pub fn calculate(total_weeks: u32, ratio: PhaseRatio) -> Self {
        match total_weeks {
            0 => return Self::default(),
            1 => return Self { taper: 1, ..Self::default() },
            2 => return Self { peak: 1, taper: 1, ..Self::default() },
            3 => return Self { build: 1, peak: 1, taper: 1, ..Self::default() },
            _ => {}
        }

        let total = total_weeks as f64;
        let raw = [total * ratio.base, total * ratio.build, total * ratio.peak];
        let mut weeks: [u32; 3] = [0; 3];
        for (slot, value) in weeks.iter_mut().zip(raw.iter()) {
            *slot = (value.floor() as u32).max(1);
        }

        // Leave at least one week for taper
        while weeks.iter().sum::<u32>() > total_weeks - 1 {
            if let Some(largest) = (0..3).max_by_key(|&i| weeks[i]) {
                weeks[largest] -= 1;
            }
        }

        let taper_cap = ((total * ratio.taper).round() as u32).max(1);
        let mut taper = total_weeks - weeks.iter().sum::<u32>();

        if taper > taper_cap {
            let mut surplus = taper - taper_cap;
            taper = taper_cap;

            let mut order = [0usize, 1, 2];
            order.sort_by(|&a, &b| {
                let ra = raw[a] - raw[a].floor();
                let rb = raw[b] - raw[b].floor();
                rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
            });

            let mut next = 0;
            while surplus > 0 {
                weeks[order[next % 3]] += 1;
                surplus -= 1;
                next += 1;
            }
        }

        Self {
            base: weeks[0],
            build: weeks[1],
            peak: weeks[2],
            taper,
        }
    }

    pub fn total(&self) -> u32 {
        self.base + self.build + self.peak + self.taper
    }

    pub fn weeks_in(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Base => self.base,
            Phase::Build => self.build,
            Phase::Peak => self.peak,
            Phase::Taper => self.taper,
        }
    }

    /// Phase and week-in-phase for a 1-based plan week
    pub fn position(&self, week_number: u32) -> Option<PhasePosition> {
        if week_number == 0 {
            return None;
        }
        let mut start = 0;
        for phase in Phase::ALL {
            let weeks = self.weeks_in(phase);
            if week_number <= start + weeks {
                return Some(PhasePosition {
                    phase,
                    week_in_phase: week_number - start,
                    weeks_in_phase: weeks,
                });
            }
            start += weeks;
        }
        None
    }
}
