use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::EstimatorError;

/// Self-reported training experience, ordered from least to most trained
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "novice" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" | "elite" => Ok(Self::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// Race distances the oxygen-cost model recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDistance {
    M1500,
    Mile,
    K3,
    K5,
    K8,
    K10,
    K15,
    HalfMarathon,
    Marathon,
}

impl RaceDistance {
    pub const ALL: [RaceDistance; 9] = [
        Self::M1500,
        Self::Mile,
        Self::K3,
        Self::K5,
        Self::K8,
        Self::K10,
        Self::K15,
        Self::HalfMarathon,
        Self::Marathon,
    ];

    /// Distance in metres
    pub fn meters(&self) -> f64 {
        match self {
            Self::M1500 => 1_500.0,
            Self::Mile => 1_609.344,
            Self::K3 => 3_000.0,
            Self::K5 => 5_000.0,
            Self::K8 => 8_000.0,
            Self::K10 => 10_000.0,
            Self::K15 => 15_000.0,
            Self::HalfMarathon => 21_097.5,
            Self::Marathon => 42_195.0,
        }
    }

    pub fn kilometers(&self) -> f64 {
        self.meters() / 1000.0
    }

    /// Parse a free-form label; `None` when the distance is not recognized
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();

        match normalized.as_str() {
            "1500" | "1500m" | "1.5k" => Some(Self::M1500),
            "mile" | "1mile" | "1mi" => Some(Self::Mile),
            "3k" | "3000" | "3000m" => Some(Self::K3),
            "5k" | "5000" | "5000m" => Some(Self::K5),
            "8k" | "8000" | "8000m" => Some(Self::K8),
            "10k" | "10000" | "10000m" => Some(Self::K10),
            "15k" | "15000" | "15000m" => Some(Self::K15),
            "half" | "hm" | "halfmarathon" | "21k" | "21.1k" => Some(Self::HalfMarathon),
            "marathon" | "full" | "fullmarathon" | "42k" | "42.2k" => Some(Self::Marathon),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::M1500 => "1500m",
            Self::Mile => "Mile",
            Self::K3 => "3K",
            Self::K5 => "5K",
            Self::K8 => "8K",
            Self::K10 => "10K",
            Self::K15 => "15K",
            Self::HalfMarathon => "Half Marathon",
            Self::Marathon => "Marathon",
        }
    }
}

impl FromStr for RaceDistance {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| EstimatorError::UnrecognizedDistance {
            label: s.to_string(),
        })
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A finished race: distance plus finish time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub distance: RaceDistance,
    pub time_seconds: f64,
}

/// Blood-lactate / field threshold test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldTest {
    /// Speed at the measured lactate threshold (km/h)
    pub threshold_speed_kmh: f64,
    /// Heart rate at that threshold
    pub threshold_hr: Option<u16>,
    /// Aerobic decoupling of the test run, in percent
    pub decoupling_pct: Option<f64>,
}

/// Snapshot of everything known about the athlete's physiology.
///
/// Created once per plan-generation request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalProfile {
    /// Laboratory VO2max (ml/kg/min)
    pub lab_vo2max: Option<f64>,
    pub field_test: Option<FieldTest>,
    pub race_result: Option<RaceResult>,
    pub experience_level: ExperienceLevel,
    /// Current weekly running volume (km)
    pub weekly_volume_km: Option<f64>,
}

impl PhysiologicalProfile {
    pub fn new(experience_level: ExperienceLevel) -> Self {
        Self {
            lab_vo2max: None,
            field_test: None,
            race_result: None,
            experience_level,
            weekly_volume_km: None,
        }
    }

    pub fn with_lab_vo2max(mut self, vo2max: f64) -> Self {
        self.lab_vo2max = Some(vo2max);
        self
    }

    pub fn with_field_test(mut self, field_test: FieldTest) -> Self {
        self.field_test = Some(field_test);
        self
    }

    pub fn with_race_result(mut self, distance: RaceDistance, time_seconds: f64) -> Self {
        self.race_result = Some(RaceResult { distance, time_seconds });
        self
    }

    pub fn with_weekly_volume(mut self, km: f64) -> Self {
        self.weekly_volume_km = Some(km);
        self
    }
}

/// Which evidence tier a derived value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Lab,
    FieldTest,
    RaceTime,
    Estimate,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Lab => write!(f, "LAB"),
            DataSource::FieldTest => write!(f, "FIELD_TEST"),
            DataSource::RaceTime => write!(f, "RACE_TIME"),
            DataSource::Estimate => write!(f, "ESTIMATE"),
        }
    }
}

/// Four-tier confidence, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryLow,
    Low,
    Medium,
    High,
}

/// Four-tier model-fit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFit {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Training methodology (periodization philosophy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    /// Default methodology: Daniels VDOT zones with an 80/20 easy/hard split
    #[default]
    Polarized,
    /// Single-threshold sub-LT2 intervals
    Norwegian,
    /// Two sub-threshold sessions on Tuesday and Thursday
    NorwegianDouble,
    /// Marathon-pace-relative zones with a long specific phase
    Canova,
    /// 70/20/10 easy/tempo/VO2max
    Pyramidal,
}

impl Methodology {
    pub const ALL: [Methodology; 5] = [
        Self::Polarized,
        Self::Norwegian,
        Self::NorwegianDouble,
        Self::Canova,
        Self::Pyramidal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Polarized => "polarized",
            Self::Norwegian => "norwegian",
            Self::NorwegianDouble => "norwegian_double",
            Self::Canova => "canova",
            Self::Pyramidal => "pyramidal",
        }
    }
}

impl FromStr for Methodology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "default" | "daniels" | "polarized" | "polarised" => Ok(Self::Polarized),
            "norwegian" | "norwegian_single" | "single_threshold" => Ok(Self::Norwegian),
            "norwegian_double" | "norwegian_doubles" | "double_threshold" => {
                Ok(Self::NorwegianDouble)
            }
            "canova" => Ok(Self::Canova),
            "pyramidal" => Ok(Self::Pyramidal),
            _ => Err(format!("Unknown methodology: {}", s)),
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Periodization phase, in plan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Base,
    Build,
    Peak,
    Taper,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Self::Base, Self::Build, Self::Peak, Self::Taper];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Base => write!(f, "Base"),
            Phase::Build => write!(f, "Build"),
            Phase::Peak => write!(f, "Peak"),
            Phase::Taper => write!(f, "Taper"),
        }
    }
}

/// Target race performance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPerformance {
    pub distance: RaceDistance,
    pub time_seconds: f64,
}

impl GoalPerformance {
    /// Average goal speed over the race distance (km/h)
    pub fn speed_kmh(&self) -> f64 {
        self.distance.kilometers() / (self.time_seconds / 3600.0)
    }
}

/// Scheduling parameters supplied verbatim by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingParams {
    /// Training days per week (1-7)
    pub sessions_per_week: u8,
    pub duration_weeks: u32,
    /// Monday of the first plan week
    pub start_date: NaiveDate,
    /// Nominal easy-session length in minutes
    pub session_minutes: u32,
    pub goal: Option<GoalPerformance>,
    pub target_date: Option<NaiveDate>,
    pub strength_sessions: u8,
    pub core_sessions: u8,
    /// Put supplementary sessions after a run rather than on free days
    pub schedule_after_cardio: bool,
}

impl SchedulingParams {
    pub fn new(start_date: NaiveDate, duration_weeks: u32) -> Self {
        Self {
            sessions_per_week: 5,
            duration_weeks,
            start_date,
            session_minutes: 45,
            goal: None,
            target_date: None,
            strength_sessions: 0,
            core_sessions: 0,
            schedule_after_cardio: false,
        }
    }

    pub fn with_sessions(mut self, sessions_per_week: u8) -> Self {
        self.sessions_per_week = sessions_per_week;
        self
    }

    pub fn with_goal(mut self, distance: RaceDistance, time_seconds: f64) -> Self {
        self.goal = Some(GoalPerformance { distance, time_seconds });
        self
    }

    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    pub fn with_supplementary(mut self, strength: u8, core: u8, after_cardio: bool) -> Self {
        self.strength_sessions = strength;
        self.core_sessions = core;
        self.schedule_after_cardio = after_cardio;
        self
    }
}

/// Period spent at altitude (informational)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltitudePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub elevation_m: Option<u32>,
}

impl AltitudePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Calendar exclusions fetched by the caller for the plan's date range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConstraints {
    pub blocked: BTreeSet<NaiveDate>,
    pub reduced: BTreeSet<NaiveDate>,
    pub altitude: Vec<AltitudePeriod>,
}

impl CalendarConstraints {
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.reduced.is_empty() && self.altitude.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_distance_labels() {
        assert_eq!(RaceDistance::from_label("5k"), Some(RaceDistance::K5));
        assert_eq!(RaceDistance::from_label("5000m"), Some(RaceDistance::K5));
        assert_eq!(RaceDistance::from_label("Half Marathon"), Some(RaceDistance::HalfMarathon));
        assert_eq!(RaceDistance::from_label(" marathon "), Some(RaceDistance::Marathon));
        assert_eq!(RaceDistance::from_label("7k"), None);

        let err = "ultra".parse::<RaceDistance>().unwrap_err();
        assert!(matches!(err, EstimatorError::UnrecognizedDistance { .. }));
    }

    #[test]
    fn test_methodology_parsing() {
        assert_eq!("default".parse::<Methodology>().unwrap(), Methodology::Polarized);
        assert_eq!("norwegian-double".parse::<Methodology>().unwrap(), Methodology::NorwegianDouble);
        assert_eq!("Canova".parse::<Methodology>().unwrap(), Methodology::Canova);
        assert!("hiit".parse::<Methodology>().is_err());
        assert_eq!(Methodology::default(), Methodology::Polarized);
    }

    #[test]
    fn test_experience_ordering() {
        assert!(ExperienceLevel::Beginner < ExperienceLevel::Intermediate);
        assert!(ExperienceLevel::Intermediate < ExperienceLevel::Advanced);
        assert_eq!("elite".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Advanced);
    }

    #[test]
    fn test_goal_speed() {
        let goal = GoalPerformance {
            distance: RaceDistance::K10,
            time_seconds: 3000.0,
        };
        assert!((goal.speed_kmh() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_altitude_period_contains() {
        let period = AltitudePeriod {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            elevation_m: Some(1800),
        };
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()));
    }
}
