//! Weekly workout templates, one strategy per methodology
//!
//! A template picks training days from a fixed priority list (truncated to the
//! athlete's session count) and fills each with the methodology's session for
//! that weekday. Weeks always contain seven days, Monday first.

mod canova;
mod norwegian;
mod norwegian_double;
mod polarized;
mod pyramidal;

pub use canova::CanovaWeek;
pub use norwegian::NorwegianWeek;
pub use norwegian_double::NorwegianDoubleWeek;
pub use polarized::PolarizedWeek;
pub use pyramidal::PyramidalWeek;

use crate::config::IntervalSettings;
use crate::models::{Methodology, Phase};
use crate::paces::MethodologyPaceSet;
use crate::workout::{DayPlan, Intensity, IntervalBlock, WorkoutPrescription};

/// Minimum length of any run (minutes)
const MIN_RUN_MINUTES: f64 = 20.0;

/// Everything a template needs to lay out one week
#[derive(Debug, Clone)]
pub struct WeekContext<'a> {
    pub phase: Phase,
    pub week_in_phase: u32,
    pub weeks_in_phase: u32,
    /// Pace set already scaled to this week's target
    pub paces: &'a MethodologyPaceSet,
    pub volume_percent: f64,
    pub session_minutes: f64,
    pub sessions_per_week: u8,
    pub intervals: &'a IntervalSettings,
}

impl WeekContext<'_> {
    /// Volume-scaled length of an ordinary easy run
    pub fn easy_minutes(&self) -> f64 {
        (self.session_minutes * self.volume_percent / 100.0)
            .round()
            .max(MIN_RUN_MINUTES)
    }

    pub fn long_minutes(&self) -> f64 {
        (self.easy_minutes() * self.intervals.long_run_factor).round()
    }

    /// Session length budget for structured workouts, warmup and cooldown included
    pub fn quality_minutes(&self) -> f64 {
        self.easy_minutes() + self.intervals.warmup_minutes + self.intervals.cooldown_minutes
    }

    /// Build and Peak carry the sharper sessions
    pub fn is_sharpening(&self) -> bool {
        matches!(self.phase, Phase::Build | Phase::Peak)
    }
}

/// Strategy laying out a methodology's training week
pub trait WeekTemplate: Send + Sync {
    fn methodology(&self) -> Methodology;

    /// Weekdays (1 = Monday) in the order they are given sessions
    fn day_priority(&self) -> [u8; 7];

    /// Workouts for a training day
    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription>;

    fn training_days(&self, sessions_per_week: u8) -> Vec<u8> {
        let count = sessions_per_week.clamp(1, 7) as usize;
        self.day_priority()[..count].to_vec()
    }

    fn compose(&self, ctx: &WeekContext<'_>) -> Vec<DayPlan> {
        let training = self.training_days(ctx.sessions_per_week);
        (1..=7u8)
            .map(|day| {
                if training.contains(&day) {
                    DayPlan::with_workouts(day, self.session(day, ctx))
                } else {
                    DayPlan::rest(day)
                }
            })
            .collect()
    }
}

static POLARIZED: PolarizedWeek = PolarizedWeek;
static NORWEGIAN: NorwegianWeek = NorwegianWeek;
static NORWEGIAN_DOUBLE: NorwegianDoubleWeek = NorwegianDoubleWeek;
static CANOVA: CanovaWeek = CanovaWeek;
static PYRAMIDAL: PyramidalWeek = PyramidalWeek;

pub fn template_for(methodology: Methodology) -> &'static dyn WeekTemplate {
    match methodology {
        Methodology::Polarized => &POLARIZED,
        Methodology::Norwegian => &NORWEGIAN,
        Methodology::NorwegianDouble => &NORWEGIAN_DOUBLE,
        Methodology::Canova => &CANOVA,
        Methodology::Pyramidal => &PYRAMIDAL,
    }
}

pub(crate) fn easy_run(ctx: &WeekContext<'_>) -> WorkoutPrescription {
    WorkoutPrescription::continuous("Easy run", Intensity::Easy, ctx.easy_minutes(), ctx.paces.easy, "Easy")
}

pub(crate) fn long_run(ctx: &WeekContext<'_>) -> WorkoutPrescription {
    WorkoutPrescription::continuous("Long run", Intensity::Moderate, ctx.long_minutes(), ctx.paces.easy, "Easy")
}

/// Interval session with the rep count fitted to the week's quality budget
pub(crate) fn fitted_intervals(
    ctx: &WeekContext<'_>,
    title: &str,
    intensity: Intensity,
    mut block: IntervalBlock,
) -> WorkoutPrescription {
    block.reps = IntervalBlock::fit_reps(ctx.quality_minutes(), block.work_min, block.rest_min, ctx.intervals);
    WorkoutPrescription::intervals(title, intensity, &block, ctx.paces.easy, ctx.intervals)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Confidence, DataSource};
    use crate::paces::{resolve_paces, PaceAnchor};

    pub fn paces(methodology: Methodology) -> MethodologyPaceSet {
        resolve_paces(
            methodology,
            &PaceAnchor {
                marathon: 12.0,
                threshold: 12.6,
                goal_marathon: 12.5,
                experience_level: crate::models::ExperienceLevel::Intermediate,
                data_source: DataSource::RaceTime,
                confidence: Confidence::High,
                vdot: Some(45.0),
            },
        )
    }

    pub fn context<'a>(
        paces: &'a MethodologyPaceSet,
        intervals: &'a IntervalSettings,
        phase: Phase,
        sessions: u8,
    ) -> WeekContext<'a> {
        WeekContext {
            phase,
            week_in_phase: 1,
            weeks_in_phase: 3,
            paces,
            volume_percent: 100.0,
            session_minutes: 45.0,
            sessions_per_week: sessions,
            intervals,
        }
    }
}
