use super::{fitted_intervals, WeekContext, WeekTemplate};
use crate::format;
use crate::models::Methodology;
use crate::paces::MethodologyZones;
use crate::workout::{Intensity, IntervalBlock, Segment, SegmentKind, WorkoutPrescription};

/// Goal-pace centred week: special endurance Tuesday, fundamental Thursday,
/// specific Saturday, long Sunday
pub struct CanovaWeek;

/// Canova bands resolved from the scaled pace set
struct Bands {
    regeneration: f64,
    fundamental: f64,
    general_endurance: f64,
    special_endurance: f64,
    specific: f64,
}

impl CanovaWeek {
    fn bands(ctx: &WeekContext<'_>) -> Bands {
        match ctx.paces.zones {
            MethodologyZones::Canova {
                regeneration,
                fundamental,
                general_endurance,
                special_endurance,
                specific,
                ..
            } => Bands {
                regeneration,
                fundamental,
                general_endurance,
                special_endurance,
                specific,
            },
            _ => {
                let goal = ctx.paces.marathon;
                Bands {
                    regeneration: 0.65 * goal,
                    fundamental: 0.80 * goal,
                    general_endurance: 0.875 * goal,
                    special_endurance: 0.925 * goal,
                    specific: goal,
                }
            }
        }
    }

    fn special_endurance(ctx: &WeekContext<'_>, bands: &Bands) -> WorkoutPrescription {
        fitted_intervals(
            ctx,
            "Special endurance intervals",
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: 6.0,
                work_speed: bands.special_endurance,
                work_zone: "Special endurance",
                rest_min: 2.0,
                rest_speed: Some(bands.general_endurance),
                rest_zone: "General endurance",
            },
        )
    }

    fn specific(ctx: &WeekContext<'_>, bands: &Bands) -> WorkoutPrescription {
        fitted_intervals(
            ctx,
            "Specific session",
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: 10.0,
                work_speed: bands.specific,
                work_zone: "Specific",
                rest_min: 3.0,
                rest_speed: Some(bands.general_endurance),
                rest_zone: "General endurance",
            },
        )
    }

    fn long_run(ctx: &WeekContext<'_>, bands: &Bands) -> WorkoutPrescription {
        let total = ctx.long_minutes();
        if !ctx.is_sharpening() {
            return WorkoutPrescription::continuous(
                "Long run",
                Intensity::Moderate,
                total,
                bands.fundamental,
                "Fundamental",
            );
        }

        let opening = (total * 0.5).round();
        let goal_block = (total * 0.3).round();
        let closing = total - opening - goal_block;
        let segments = vec![
            Segment::new(SegmentKind::Warmup, opening, Some(bands.fundamental), "Fundamental"),
            Segment::new(SegmentKind::Work, goal_block, Some(bands.specific), "Specific"),
            Segment::new(SegmentKind::Cooldown, closing, Some(bands.regeneration), "Regeneration"),
        ];
        let instructions = format!(
            "{} at {}, {} at goal pace {}, {} easy",
            format::duration_minutes(opening),
            format::pace_per_km(bands.fundamental),
            format::duration_minutes(goal_block),
            format::pace_per_km(bands.specific),
            format::duration_minutes(closing)
        );
        WorkoutPrescription::run("Long run with goal-pace block", Intensity::Hard, segments, instructions)
    }
}

impl WeekTemplate for CanovaWeek {
    fn methodology(&self) -> Methodology {
        Methodology::Canova
    }

    fn day_priority(&self) -> [u8; 7] {
        [2, 6, 7, 4, 1, 3, 5]
    }

    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        let bands = Self::bands(ctx);
        let workout = match day {
            2 => Self::special_endurance(ctx, &bands),
            4 => WorkoutPrescription::continuous(
                "Fundamental run",
                Intensity::Moderate,
                ctx.easy_minutes(),
                bands.fundamental,
                "Fundamental",
            ),
            6 => Self::specific(ctx, &bands),
            7 => Self::long_run(ctx, &bands),
            _ => WorkoutPrescription::continuous(
                "Regeneration run",
                Intensity::Recovery,
                ctx.easy_minutes(),
                bands.regeneration,
                "Regeneration",
            ),
        };
        vec![workout]
    }
}
