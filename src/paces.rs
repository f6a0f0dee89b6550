//! Methodology pace resolution
//!
//! Each methodology is a [`PaceResolver`] strategy that turns the fitness
//! anchor (current marathon-equivalent and threshold speeds, plus the goal)
//! into a [`MethodologyPaceSet`]. All speeds are km/h.

use serde::{Deserialize, Serialize};

use crate::evidence::ResolvedEvidence;
use crate::models::{Confidence, DataSource, ExperienceLevel, GoalPerformance, Methodology, RaceDistance};
use crate::vdot;

/// Interval speed multiplier on marathon-equivalent speed, by work duration
const INTERVAL_MULTIPLIERS: [(f64, f64); 4] = [(1.5, 1.31), (3.0, 1.23), (5.0, 1.19), (8.0, 1.12)];
const LONG_INTERVAL_MULTIPLIER: f64 = 1.05;

/// Reference durations for the set-level interval and repetition paces (minutes)
pub const INTERVAL_REFERENCE_MINUTES: f64 = 4.0;
pub const REPETITION_REFERENCE_MINUTES: f64 = 1.0;

/// Speed for a work interval of the given length
pub fn interval_speed(marathon_speed: f64, work_minutes: f64) -> f64 {
    let multiplier = INTERVAL_MULTIPLIERS
        .iter()
        .find(|(limit, _)| work_minutes <= *limit)
        .map(|(_, m)| *m)
        .unwrap_or(LONG_INTERVAL_MULTIPLIER);
    marathon_speed * multiplier
}

/// Share of training time per intensity band (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityDistribution {
    pub easy_pct: f64,
    pub tempo_pct: f64,
    pub hard_pct: f64,
}

/// Methodology-specific pace bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "methodology", rename_all = "snake_case")]
pub enum MethodologyZones {
    Polarized,
    Norwegian {
        sub_threshold: f64,
    },
    NorwegianDouble {
        am: f64,
        pm: f64,
    },
    Canova {
        regeneration: f64,
        fundamental: f64,
        /// Also the float pace between specific repetitions
        general_endurance: f64,
        special_endurance: f64,
        specific: f64,
        special_speed: f64,
    },
    Pyramidal {
        tempo: f64,
        distribution: IntensityDistribution,
    },
}

impl MethodologyZones {
    fn scaled(&self, factor: f64) -> Self {
        match self {
            MethodologyZones::Polarized => MethodologyZones::Polarized,
            MethodologyZones::Norwegian { sub_threshold } => MethodologyZones::Norwegian {
                sub_threshold: sub_threshold * factor,
            },
            MethodologyZones::NorwegianDouble { am, pm } => MethodologyZones::NorwegianDouble {
                am: am * factor,
                pm: pm * factor,
            },
            MethodologyZones::Canova {
                regeneration,
                fundamental,
                general_endurance,
                special_endurance,
                specific,
                special_speed,
            } => MethodologyZones::Canova {
                regeneration: regeneration * factor,
                fundamental: fundamental * factor,
                general_endurance: general_endurance * factor,
                special_endurance: special_endurance * factor,
                specific: specific * factor,
                special_speed: special_speed * factor,
            },
            MethodologyZones::Pyramidal { tempo, distribution } => MethodologyZones::Pyramidal {
                tempo: tempo * factor,
                distribution: *distribution,
            },
        }
    }

    fn speeds(&self) -> Vec<f64> {
        match self {
            MethodologyZones::Polarized => Vec::new(),
            MethodologyZones::Norwegian { sub_threshold } => vec![*sub_threshold],
            MethodologyZones::NorwegianDouble { am, pm } => vec![*am, *pm],
            MethodologyZones::Canova {
                regeneration,
                fundamental,
                general_endurance,
                special_endurance,
                specific,
                special_speed,
            } => vec![
                *regeneration,
                *fundamental,
                *general_endurance,
                *special_endurance,
                *specific,
                *special_speed,
            ],
            MethodologyZones::Pyramidal { tempo, .. } => vec![*tempo],
        }
    }
}

/// Pace set for one methodology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodologyPaceSet {
    pub methodology: Methodology,
    pub easy: f64,
    pub marathon: f64,
    pub threshold: f64,
    pub interval: f64,
    pub repetition: f64,
    pub zones: MethodologyZones,
    pub data_source: DataSource,
    pub confidence: Confidence,
    pub vdot: Option<f64>,
    /// Race-pace speed the set was derived from; progression scales relative to it
    pub reference_speed: f64,
}

impl MethodologyPaceSet {
    /// Every speed multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            easy: self.easy * factor,
            marathon: self.marathon * factor,
            threshold: self.threshold * factor,
            interval: self.interval * factor,
            repetition: self.repetition * factor,
            zones: self.zones.scaled(factor),
            reference_speed: self.reference_speed * factor,
            ..self.clone()
        }
    }

    /// Speed for a work interval of the given length, relative to this set
    pub fn interval_for(&self, work_minutes: f64) -> f64 {
        interval_speed(self.marathon, work_minutes)
    }

    /// Positive, finite and ordered easy < marathon ≤ threshold < interval < repetition
    pub fn is_valid(&self) -> bool {
        let core = [self.easy, self.marathon, self.threshold, self.interval, self.repetition];
        let all_positive = core
            .iter()
            .chain(self.zones.speeds().iter())
            .all(|s| s.is_finite() && *s > 0.0);

        all_positive
            && self.easy < self.marathon
            && self.marathon <= self.threshold
            && self.threshold < self.interval
            && self.interval < self.repetition
    }
}

/// Everything a resolver needs to know about the athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceAnchor {
    /// Current marathon-equivalent speed
    pub marathon: f64,
    /// Current threshold speed
    pub threshold: f64,
    /// Goal marathon-equivalent speed (current when no goal)
    pub goal_marathon: f64,
    pub experience_level: ExperienceLevel,
    pub data_source: DataSource,
    pub confidence: Confidence,
    pub vdot: Option<f64>,
}

impl PaceAnchor {
    /// Build the anchor from resolved evidence and an optional goal.
    ///
    /// Returns warnings when the goal cannot be converted.
    pub fn from_evidence(
        evidence: &ResolvedEvidence,
        experience_level: ExperienceLevel,
        goal: Option<&GoalPerformance>,
    ) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let goal_marathon = match goal {
            Some(goal) => match goal_marathon_speed(goal) {
                Ok(speed) => speed,
                Err(reason) => {
                    warnings.push(format!("Goal ignored: {}", reason));
                    evidence.marathon_speed_kmh
                }
            },
            None => evidence.marathon_speed_kmh,
        };

        (
            Self {
                marathon: evidence.marathon_speed_kmh,
                threshold: evidence.threshold_speed_kmh,
                goal_marathon,
                experience_level,
                data_source: evidence.data_source,
                confidence: evidence.confidence,
                vdot: evidence.vdot,
            },
            warnings,
        )
    }
}

/// Marathon-equivalent speed of a goal performance
pub fn goal_marathon_speed(goal: &GoalPerformance) -> Result<f64, String> {
    if !goal.time_seconds.is_finite() || goal.time_seconds <= 0.0 {
        return Err(format!("goal time {} is not a positive number", goal.time_seconds));
    }
    if goal.distance == RaceDistance::Marathon {
        return Ok(goal.speed_kmh());
    }
    let goal_vdot = vdot::calculate_vdot(goal.distance.meters(), goal.time_seconds)
        .map_err(|e| e.to_string())?;
    vdot::marathon_speed_kmh(goal_vdot).map_err(|e| e.to_string())
}

/// Strategy turning an anchor into a methodology's pace set
pub trait PaceResolver: Send + Sync {
    fn methodology(&self) -> Methodology;

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet;
}

/// 80/20 Daniels-style zones
pub struct PolarizedPaces;

impl PaceResolver for PolarizedPaces {
    fn methodology(&self) -> Methodology {
        Methodology::Polarized
    }

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet {
        daniels_set(Methodology::Polarized, anchor, MethodologyZones::Polarized)
    }
}

/// Single-threshold sub-LT2 zones
pub struct NorwegianPaces;

impl PaceResolver for NorwegianPaces {
    fn methodology(&self) -> Methodology {
        Methodology::Norwegian
    }

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet {
        let mut set = daniels_set(
            Methodology::Norwegian,
            anchor,
            MethodologyZones::Norwegian {
                sub_threshold: 0.97 * anchor.threshold,
            },
        );
        set.easy = 0.78 * anchor.marathon;
        set
    }
}

/// Double-threshold AM/PM bands
pub struct NorwegianDoublePaces;

impl PaceResolver for NorwegianDoublePaces {
    fn methodology(&self) -> Methodology {
        Methodology::NorwegianDouble
    }

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet {
        let mut set = daniels_set(
            Methodology::NorwegianDouble,
            anchor,
            MethodologyZones::NorwegianDouble {
                am: 0.94 * anchor.threshold,
                pm: 0.97 * anchor.threshold,
            },
        );
        set.easy = 0.78 * anchor.marathon;
        set
    }
}

/// Percentages of goal marathon pace
pub struct CanovaPaces;

impl CanovaPaces {
    /// Threshold sits closer to marathon pace the more trained the runner
    pub fn threshold_compression(level: ExperienceLevel) -> f64 {
        match level {
            ExperienceLevel::Advanced => 1.03,
            ExperienceLevel::Intermediate => 1.05,
            ExperienceLevel::Beginner => 1.07,
        }
    }
}

impl PaceResolver for CanovaPaces {
    fn methodology(&self) -> Methodology {
        Methodology::Canova
    }

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet {
        let goal = anchor.goal_marathon;
        let zones = MethodologyZones::Canova {
            regeneration: 0.65 * goal,
            fundamental: 0.80 * goal,
            general_endurance: 0.875 * goal,
            special_endurance: 0.925 * goal,
            specific: goal,
            special_speed: 1.075 * goal,
        };

        MethodologyPaceSet {
            methodology: Methodology::Canova,
            easy: 0.80 * goal,
            marathon: goal,
            threshold: goal * Self::threshold_compression(anchor.experience_level),
            interval: 1.075 * goal,
            repetition: 1.15 * goal,
            zones,
            data_source: anchor.data_source,
            confidence: anchor.confidence,
            vdot: anchor.vdot,
            reference_speed: goal,
        }
    }
}

/// 70/20/10 with a tempo band between marathon and threshold
pub struct PyramidalPaces;

impl PaceResolver for PyramidalPaces {
    fn methodology(&self) -> Methodology {
        Methodology::Pyramidal
    }

    fn resolve(&self, anchor: &PaceAnchor) -> MethodologyPaceSet {
        daniels_set(
            Methodology::Pyramidal,
            anchor,
            MethodologyZones::Pyramidal {
                tempo: (anchor.marathon + anchor.threshold) / 2.0,
                distribution: IntensityDistribution {
                    easy_pct: 70.0,
                    tempo_pct: 20.0,
                    hard_pct: 10.0,
                },
            },
        )
    }
}

fn daniels_set(methodology: Methodology, anchor: &PaceAnchor, zones: MethodologyZones) -> MethodologyPaceSet {
    let m = anchor.marathon;
    MethodologyPaceSet {
        methodology,
        easy: 0.85 * m,
        marathon: m,
        threshold: anchor.threshold,
        interval: interval_speed(m, INTERVAL_REFERENCE_MINUTES),
        repetition: interval_speed(m, REPETITION_REFERENCE_MINUTES),
        zones,
        data_source: anchor.data_source,
        confidence: anchor.confidence,
        vdot: anchor.vdot,
        reference_speed: m,
    }
}

static POLARIZED: PolarizedPaces = PolarizedPaces;
static NORWEGIAN: NorwegianPaces = NorwegianPaces;
static NORWEGIAN_DOUBLE: NorwegianDoublePaces = NorwegianDoublePaces;
static CANOVA: CanovaPaces = CanovaPaces;
static PYRAMIDAL: PyramidalPaces = PyramidalPaces;

/// Resolver registered for a methodology
pub fn resolver_for(methodology: Methodology) -> &'static dyn PaceResolver {
    match methodology {
        Methodology::Polarized => &POLARIZED,
        Methodology::Norwegian => &NORWEGIAN,
        Methodology::NorwegianDouble => &NORWEGIAN_DOUBLE,
        Methodology::Canova => &CANOVA,
        Methodology::Pyramidal => &PYRAMIDAL,
    }
}

/// Convenience: resolve a methodology's paces for an anchor
pub fn resolve_paces(methodology: Methodology, anchor: &PaceAnchor) -> MethodologyPaceSet {
    let set = resolver_for(methodology).resolve(anchor);
    tracing::debug!(
        %methodology,
        easy = set.easy,
        marathon = set.marathon,
        threshold = set.threshold,
        interval = set.interval,
        "Paces resolved"
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn anchor(marathon: f64, level: ExperienceLevel) -> PaceAnchor {
        PaceAnchor {
            marathon,
            threshold: marathon * 1.05,
            goal_marathon: marathon,
            experience_level: level,
            data_source: DataSource::RaceTime,
            confidence: Confidence::High,
            vdot: None,
        }
    }

    #[test]
    fn test_interval_speed_buckets() {
        assert!((interval_speed(10.0, 1.0) - 13.1).abs() < 1e-9);
        assert!((interval_speed(10.0, 1.5) - 13.1).abs() < 1e-9);
        assert!((interval_speed(10.0, 2.0) - 12.3).abs() < 1e-9);
        assert!((interval_speed(10.0, 4.0) - 11.9).abs() < 1e-9);
        assert!((interval_speed(10.0, 6.0) - 11.2).abs() < 1e-9);
        assert!((interval_speed(10.0, 12.0) - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_polarized_paces() {
        let set = resolve_paces(Methodology::Polarized, &anchor(12.0, ExperienceLevel::Intermediate));
        assert!((set.easy - 10.2).abs() < 1e-9);
        assert!((set.threshold - 12.6).abs() < 1e-9);
        assert!((set.interval - 14.28).abs() < 1e-9);
        assert!((set.repetition - 15.72).abs() < 1e-9);
        assert_eq!(set.reference_speed, 12.0);
        assert!(set.is_valid());
    }

    #[test]
    fn test_norwegian_bands() {
        let a = anchor(12.0, ExperienceLevel::Advanced);
        let single = resolve_paces(Methodology::Norwegian, &a);
        match single.zones {
            MethodologyZones::Norwegian { sub_threshold } => {
                assert!((sub_threshold - 0.97 * 12.6).abs() < 1e-9)
            }
            ref other => panic!("unexpected zones {:?}", other),
        }
        assert!((single.easy - 9.36).abs() < 1e-9);

        let double = resolve_paces(Methodology::NorwegianDouble, &a);
        match double.zones {
            MethodologyZones::NorwegianDouble { am, pm } => assert!(am < pm),
            ref other => panic!("unexpected zones {:?}", other),
        }
    }

    #[test]
    fn test_canova_is_goal_relative() {
        let mut a = anchor(12.0, ExperienceLevel::Beginner);
        a.goal_marathon = 13.0;
        let set = resolve_paces(Methodology::Canova, &a);

        assert_eq!(set.marathon, 13.0);
        assert_eq!(set.reference_speed, 13.0);
        assert!((set.threshold - 13.0 * 1.07).abs() < 1e-9);
        match set.zones {
            MethodologyZones::Canova { general_endurance, specific, .. } => {
                assert!((general_endurance - 11.375).abs() < 1e-9);
                assert_eq!(specific, 13.0);
            }
            ref other => panic!("unexpected zones {:?}", other),
        }
        assert!(set.is_valid());
    }

    #[test]
    fn test_pyramidal_tempo_midpoint() {
        let set = resolve_paces(Methodology::Pyramidal, &anchor(12.0, ExperienceLevel::Intermediate));
        match set.zones {
            MethodologyZones::Pyramidal { tempo, distribution } => {
                assert!((tempo - 12.3).abs() < 1e-9);
                assert_eq!(distribution.easy_pct, 70.0);
            }
            ref other => panic!("unexpected zones {:?}", other),
        }
    }

    #[test]
    fn test_goal_marathon_conversion() {
        let marathon_goal = GoalPerformance {
            distance: RaceDistance::Marathon,
            time_seconds: 3.0 * 3600.0,
        };
        assert!((goal_marathon_speed(&marathon_goal).unwrap() - 14.065).abs() < 1e-9);

        let half_goal = GoalPerformance {
            distance: RaceDistance::HalfMarathon,
            time_seconds: 5_400.0,
        };
        let speed = goal_marathon_speed(&half_goal).unwrap();
        assert!(speed < half_goal.speed_kmh());

        let bad = GoalPerformance {
            distance: RaceDistance::K10,
            time_seconds: 0.0,
        };
        assert!(goal_marathon_speed(&bad).is_err());
    }

    #[test]
    fn test_scaled_keeps_metadata() {
        let set = resolve_paces(Methodology::Norwegian, &anchor(12.0, ExperienceLevel::Intermediate));
        let faster = set.scaled(1.1);
        assert!((faster.marathon - 13.2).abs() < 1e-9);
        assert_eq!(faster.data_source, set.data_source);
        assert!(faster.is_valid());
    }

    proptest! {
        #[test]
        fn prop_paces_are_ordered(marathon in 6.0f64..22.0, method_idx in 0usize..5, level_idx in 0usize..3) {
            let level = [ExperienceLevel::Beginner, ExperienceLevel::Intermediate, ExperienceLevel::Advanced][level_idx];
            let set = resolve_paces(Methodology::ALL[method_idx], &anchor(marathon, level));
            prop_assert!(set.is_valid());
        }
    }
}
