use super::{easy_run, fitted_intervals, long_run, WeekContext, WeekTemplate};
use crate::models::Methodology;
use crate::paces::MethodologyZones;
use crate::workout::{Intensity, IntervalBlock, SessionSlot, WorkoutPrescription};

/// Tuesday and Thursday double-threshold days
pub struct NorwegianDoubleWeek;

impl NorwegianDoubleWeek {
    fn bands(ctx: &WeekContext<'_>) -> (f64, f64) {
        match ctx.paces.zones {
            MethodologyZones::NorwegianDouble { am, pm } => (am, pm),
            _ => (ctx.paces.threshold * 0.94, ctx.paces.threshold * 0.97),
        }
    }

    fn double_day(ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        let (am, pm) = Self::bands(ctx);
        let morning = fitted_intervals(
            ctx,
            "AM threshold: long reps",
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: 6.0,
                work_speed: am,
                work_zone: "Threshold (low)",
                rest_min: 1.0,
                rest_speed: None,
                rest_zone: "Standing rest",
            },
        )
        .with_slot(SessionSlot::Am);

        let evening = fitted_intervals(
            ctx,
            "PM threshold: short reps",
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: 3.0,
                work_speed: pm,
                work_zone: "Threshold (high)",
                rest_min: 1.0,
                rest_speed: None,
                rest_zone: "Standing rest",
            },
        )
        .with_slot(SessionSlot::Pm);

        vec![morning, evening]
    }

    fn hill_session(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        fitted_intervals(
            ctx,
            "Hill / VO2max reps",
            Intensity::VeryHard,
            IntervalBlock {
                reps: 0,
                work_min: 2.0,
                work_speed: ctx.paces.interval_for(2.0),
                work_zone: "VO2max",
                rest_min: 2.0,
                rest_speed: Some(ctx.paces.easy),
                rest_zone: "Jog down",
            },
        )
    }
}

impl WeekTemplate for NorwegianDoubleWeek {
    fn methodology(&self) -> Methodology {
        Methodology::NorwegianDouble
    }

    fn day_priority(&self) -> [u8; 7] {
        [2, 4, 7, 6, 1, 3, 5]
    }

    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        match day {
            2 | 4 => Self::double_day(ctx),
            6 if ctx.is_sharpening() => vec![Self::hill_session(ctx)],
            7 => vec![long_run(ctx)],
            _ => vec![easy_run(ctx)],
        }
    }
}
