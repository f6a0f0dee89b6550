use super::{easy_run, fitted_intervals, long_run, WeekContext, WeekTemplate};
use crate::models::{Methodology, Phase};
use crate::workout::{Intensity, IntervalBlock, Segment, SegmentKind, WorkoutPrescription};
use crate::format;

/// Sunday long run, Tuesday VO2max, Thursday second quality day
pub struct PolarizedWeek;

/// Strides appended to an easy run
const STRIDE_COUNT: usize = 6;
const STRIDE_MINUTES: f64 = 20.0 / 60.0;
const STRIDE_RECOVERY_MINUTES: f64 = 100.0 / 60.0;

impl PolarizedWeek {
    fn vo2_work_minutes(phase: Phase) -> f64 {
        match phase {
            Phase::Base | Phase::Taper => 3.0,
            Phase::Build => 4.0,
            Phase::Peak => 5.0,
        }
    }

    fn vo2_intervals(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        let work = Self::vo2_work_minutes(ctx.phase);
        fitted_intervals(
            ctx,
            "VO2max intervals",
            Intensity::VeryHard,
            IntervalBlock {
                reps: 0,
                work_min: work,
                work_speed: ctx.paces.interval_for(work),
                work_zone: "VO2max",
                rest_min: 3.0,
                rest_speed: Some(ctx.paces.easy),
                rest_zone: "Jog",
            },
        )
    }

    fn long_intervals(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        fitted_intervals(
            ctx,
            "Long intervals",
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: 8.0,
                work_speed: ctx.paces.interval_for(8.0),
                work_zone: "Aerobic power",
                rest_min: 2.0,
                rest_speed: Some(ctx.paces.easy),
                rest_zone: "Jog",
            },
        )
    }

    /// Easy run finishing with relaxed strides
    pub(crate) fn strides(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        let stride_block = STRIDE_COUNT as f64 * (STRIDE_MINUTES + STRIDE_RECOVERY_MINUTES);
        let easy = (ctx.easy_minutes() - stride_block).max(10.0);

        let mut segments = vec![Segment::new(SegmentKind::Warmup, easy, Some(ctx.paces.easy), "Easy")];
        for _ in 0..STRIDE_COUNT {
            segments.push(Segment::new(
                SegmentKind::Work,
                STRIDE_MINUTES,
                Some(ctx.paces.repetition),
                "Stride",
            ));
            segments.push(Segment::new(
                SegmentKind::Rest,
                STRIDE_RECOVERY_MINUTES,
                Some(ctx.paces.easy),
                "Easy",
            ));
        }

        let instructions = format!(
            "{} easy at {}, then {} x 20s strides at {}",
            format::duration_minutes(easy),
            format::pace_per_km(ctx.paces.easy),
            STRIDE_COUNT,
            format::pace_per_km(ctx.paces.repetition)
        );
        WorkoutPrescription::run("Easy run + strides", Intensity::Easy, segments, instructions)
    }
}

impl WeekTemplate for PolarizedWeek {
    fn methodology(&self) -> Methodology {
        Methodology::Polarized
    }

    fn day_priority(&self) -> [u8; 7] {
        [7, 2, 4, 6, 1, 3, 5]
    }

    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        let workout = match day {
            7 => long_run(ctx),
            2 => Self::vo2_intervals(ctx),
            4 if ctx.is_sharpening() => Self::long_intervals(ctx),
            4 => Self::strides(ctx),
            _ => easy_run(ctx),
        };
        vec![workout]
    }
}
