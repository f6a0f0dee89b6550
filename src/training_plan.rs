//! Program generation
//!
//! Runs the stages in order: evidence → paces → phases → weekly composition
//! → supplementary sessions → calendar constraints. Every stage is pure over
//! its inputs; the only side effects are `tracing` events.

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constraints::{self, ConstraintReport};
use crate::error::{Result, TrainRxError};
use crate::evidence::{self, ResolvedEvidence};
use crate::format;
use crate::logging;
use crate::models::{CalendarConstraints, Methodology, Phase, PhysiologicalProfile, SchedulingParams};
use crate::paces::{self, MethodologyPaceSet, PaceAnchor};
use crate::phases::{PhaseDistribution, PhasePosition};
use crate::progression;
use crate::supplementary::{self, SupplementaryRequest};
use crate::templates::{self, WeekContext};
use crate::trace::{ComputationTrace, TraceStep};
use crate::workout::WeekPlan;

pub const MIN_WEEKS: u32 = 1;
pub const MAX_WEEKS: u32 = 52;
pub const MIN_SESSION_MINUTES: u32 = 20;
pub const MAX_SESSION_MINUTES: u32 = 180;

/// A complete multi-week plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramPlan {
    pub methodology: Methodology,
    pub start_date: NaiveDate,
    pub target_date: Option<NaiveDate>,
    pub evidence: ResolvedEvidence,
    /// Unscaled pace set; each week carries its own target speed
    pub paces: MethodologyPaceSet,
    pub phases: PhaseDistribution,
    pub weeks: Vec<WeekPlan>,
}

impl ProgramPlan {
    pub fn total_weeks(&self) -> usize {
        self.weeks.len()
    }

    pub fn week(&self, week_number: u32) -> Option<&WeekPlan> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    pub fn total_distance_km(&self) -> Decimal {
        self.weeks.iter().map(|w| w.total_distance_km).sum()
    }

    pub fn weeks_in_phase(&self, phase: Phase) -> impl Iterator<Item = &WeekPlan> {
        self.weeks.iter().filter(move |w| w.phase == phase)
    }
}

/// Plan plus everything needed to explain it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProgram {
    pub plan: ProgramPlan,
    pub warnings: Vec<String>,
    pub trace: ComputationTrace,
}

/// One independent generation request for batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequest {
    pub profile: PhysiologicalProfile,
    pub methodology: Methodology,
    pub params: SchedulingParams,
    #[serde(default)]
    pub constraints: CalendarConstraints,
}

/// Scheduling values after clamping to supported ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Schedule {
    weeks: u32,
    sessions_per_week: u8,
    session_minutes: u32,
}

impl Schedule {
    fn clamp(params: &SchedulingParams, warnings: &mut Vec<String>) -> Self {
        let weeks = params.duration_weeks.clamp(MIN_WEEKS, MAX_WEEKS);
        if weeks != params.duration_weeks {
            warnings.push(format!(
                "Plan length {} weeks adjusted to {} (supported {}-{})",
                params.duration_weeks, weeks, MIN_WEEKS, MAX_WEEKS
            ));
        }

        let sessions_per_week = params.sessions_per_week.clamp(1, 7);
        if sessions_per_week != params.sessions_per_week {
            warnings.push(format!(
                "Sessions per week {} adjusted to {}",
                params.sessions_per_week, sessions_per_week
            ));
        }

        let session_minutes = params.session_minutes.clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);
        if session_minutes != params.session_minutes {
            warnings.push(format!(
                "Session length {} min adjusted to {} min",
                params.session_minutes, session_minutes
            ));
        }

        Self {
            weeks,
            sessions_per_week,
            session_minutes,
        }
    }
}

/// Weekly focus line
pub fn phase_focus(methodology: Methodology, phase: Phase) -> &'static str {
    match (methodology, phase) {
        (Methodology::Canova, Phase::Base) => "General endurance and fundamental volume",
        (Methodology::Canova, Phase::Build) => "Special endurance around goal pace",
        (Methodology::Canova, Phase::Peak) => "Specific volume at goal pace",
        (Methodology::Norwegian | Methodology::NorwegianDouble, Phase::Build) => {
            "Sub-threshold volume under lactate control"
        }
        (_, Phase::Base) => "Aerobic base and durability",
        (_, Phase::Build) => "Raise threshold and aerobic power",
        (_, Phase::Peak) => "Race-specific sharpening",
        (_, Phase::Taper) => "Reduce volume, keep intensity, arrive fresh",
    }
}

/// Generation with an explicit configuration
#[derive(Debug, Clone, Default)]
pub struct PrescriptionEngine {
    config: EngineConfig,
}

impl PrescriptionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate one plan
    pub fn generate(
        &self,
        profile: &PhysiologicalProfile,
        methodology: Methodology,
        params: &SchedulingParams,
        calendar: &CalendarConstraints,
    ) -> Result<GeneratedProgram> {
        let mut warnings = Vec::new();
        let mut trace = ComputationTrace::new();

        let schedule = Schedule::clamp(params, &mut warnings);
        trace.record(
            TraceStep::new("schedule", "Scheduling parameters accepted")
                .input("duration_weeks", params.duration_weeks)
                .input("sessions_per_week", params.sessions_per_week)
                .input("session_minutes", params.session_minutes)
                .output("weeks", schedule.weeks)
                .output("sessions_per_week", schedule.sessions_per_week)
                .output("session_minutes", schedule.session_minutes),
        );

        // Evidence
        let resolved = evidence::resolve_evidence(profile, &self.config.decoupling);
        warnings.extend(resolved.warnings.iter().cloned());
        trace.record(
            TraceStep::new("evidence", "Fitness evidence resolved")
                .input("experience_level", format!("{:?}", profile.experience_level))
                .output("data_source", resolved.data_source)
                .output("confidence", format!("{:?}", resolved.confidence))
                .output("marathon_speed_kmh", format!("{:.3}", resolved.marathon_speed_kmh))
                .output("threshold_speed_kmh", format!("{:.3}", resolved.threshold_speed_kmh)),
        );

        // Paces
        let (anchor, goal_warnings) =
            PaceAnchor::from_evidence(&resolved, profile.experience_level, params.goal.as_ref());
        warnings.extend(goal_warnings);
        if params.goal.is_some() && anchor.goal_marathon < anchor.marathon {
            warnings.push("Goal is slower than current fitness; paces stay at current level".to_string());
        }

        let pace_set = paces::resolve_paces(methodology, &anchor);
        if !pace_set.is_valid() {
            return Err(TrainRxError::Internal(format!(
                "{} paces out of order for marathon speed {:.3} km/h",
                methodology, anchor.marathon
            )));
        }
        trace.record(
            TraceStep::new("paces", "Methodology paces resolved")
                .input("methodology", methodology)
                .input("goal_marathon_kmh", format!("{:.3}", anchor.goal_marathon))
                .output("easy", format::pace_per_km(pace_set.easy))
                .output("marathon", format::pace_per_km(pace_set.marathon))
                .output("threshold", format::pace_per_km(pace_set.threshold))
                .output("interval", format::pace_per_km(pace_set.interval)),
        );

        // Phases
        let phases = PhaseDistribution::for_methodology(schedule.weeks, methodology, &self.config.phases);
        trace.record(
            TraceStep::new("phases", "Plan periodized")
                .input("weeks", schedule.weeks)
                .output("base", phases.base)
                .output("build", phases.build)
                .output("peak", phases.peak)
                .output("taper", phases.taper),
        );

        // Weeks
        let request = SupplementaryRequest {
            strength: params.strength_sessions,
            core: params.core_sessions,
            after_cardio: params.schedule_after_cardio,
        };
        let mut weeks = Vec::with_capacity(schedule.weeks as usize);
        let mut short_supplementary = false;
        for week_number in 1..=schedule.weeks {
            let position = phases.position(week_number).ok_or_else(|| {
                TrainRxError::Internal(format!("week {} has no phase in {:?}", week_number, phases))
            })?;
            let (week, placement) =
                self.compose_week(week_number, position, methodology, &anchor, &pace_set, schedule, request);
            short_supplementary |= placement.strength < request.strength as usize
                || placement.core < request.core as usize;
            weeks.push(week);
        }
        if short_supplementary {
            warnings.push("More supplementary sessions requested than days available; extras dropped".to_string());
        }

        let total: Decimal = weeks.iter().map(|w| w.total_distance_km).sum();
        trace.record(
            TraceStep::new("weeks", "Weekly workouts composed")
                .input("sessions_per_week", schedule.sessions_per_week)
                .input("strength_sessions", request.strength)
                .input("core_sessions", request.core)
                .output("weeks", weeks.len())
                .output("total_distance", format::distance_km(total)),
        );

        // Constraints
        let (weeks, report): (Vec<WeekPlan>, ConstraintReport) =
            constraints::apply_constraints(weeks, params.start_date, calendar, params.target_date);
        warnings.extend(report.warnings.iter().cloned());
        trace.record(
            TraceStep::new("constraints", "Calendar constraints applied")
                .input("blocked_dates", calendar.blocked.len())
                .input("reduced_dates", calendar.reduced.len())
                .output("blocked_days", report.blocked_days)
                .output("reduced_days", report.reduced_days)
                .output("altitude_days", report.altitude_days)
                .output(
                    "race_day",
                    report
                        .race_day
                        .map(|(w, d)| format!("week {} day {}", w, d))
                        .unwrap_or_else(|| "none".to_string()),
                ),
        );

        logging::log_warnings("generate", &warnings);
        tracing::info!(
            %methodology,
            weeks = weeks.len(),
            warnings = warnings.len(),
            "Program generated"
        );

        Ok(GeneratedProgram {
            plan: ProgramPlan {
                methodology,
                start_date: params.start_date,
                target_date: params.target_date,
                evidence: resolved,
                paces: pace_set,
                phases,
                weeks,
            },
            warnings,
            trace,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn compose_week(
        &self,
        week_number: u32,
        position: PhasePosition,
        methodology: Methodology,
        anchor: &PaceAnchor,
        pace_set: &MethodologyPaceSet,
        schedule: Schedule,
        request: SupplementaryRequest,
    ) -> (WeekPlan, supplementary::Placement) {
        let target = progression::progressive_pace(
            anchor.marathon,
            anchor.goal_marathon,
            position.phase,
            position.week_in_phase,
            position.weeks_in_phase,
        );
        let week_paces = pace_set.scaled(target / pace_set.reference_speed);
        let volume = progression::volume_percent(
            position.phase,
            position.week_in_phase,
            position.weeks_in_phase,
            &self.config.volume,
        );

        let ctx = WeekContext {
            phase: position.phase,
            week_in_phase: position.week_in_phase,
            weeks_in_phase: position.weeks_in_phase,
            paces: &week_paces,
            volume_percent: volume,
            session_minutes: f64::from(schedule.session_minutes),
            sessions_per_week: schedule.sessions_per_week,
            intervals: &self.config.intervals,
        };
        let composed = templates::template_for(methodology).compose(&ctx);
        let (days, placement) = supplementary::insert_supplementary(composed, request);

        let mut week = WeekPlan {
            week_number,
            phase: position.phase,
            week_in_phase: position.week_in_phase,
            volume_percent: volume,
            focus: phase_focus(methodology, position.phase).to_string(),
            target_speed_kmh: target,
            total_distance_km: Decimal::ZERO,
            days,
        };
        week.refresh_distance();

        tracing::trace!(
            week = week_number,
            phase = %position.phase,
            target_pace = %format::pace_per_km(target),
            volume_percent = volume,
            "Week composed"
        );
        (week, placement)
    }

    /// Generate independent requests in parallel
    pub fn generate_batch(&self, requests: &[ProgramRequest]) -> Vec<Result<GeneratedProgram>> {
        requests
            .par_iter()
            .map(|r| self.generate(&r.profile, r.methodology, &r.params, &r.constraints))
            .collect()
    }
}

/// Generate one plan with the default configuration
pub fn generate_program(
    profile: &PhysiologicalProfile,
    methodology: Methodology,
    params: &SchedulingParams,
    calendar: &CalendarConstraints,
) -> Result<GeneratedProgram> {
    PrescriptionEngine::default().generate(profile, methodology, params, calendar)
}

/// Generate many plans in parallel with the default configuration
pub fn generate_programs(requests: &[ProgramRequest]) -> Vec<Result<GeneratedProgram>> {
    PrescriptionEngine::default().generate_batch(requests)
}
