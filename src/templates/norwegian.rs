use super::{easy_run, fitted_intervals, long_run, WeekContext, WeekTemplate};
use crate::models::Methodology;
use crate::paces::MethodologyZones;
use crate::workout::{Intensity, IntervalBlock, WorkoutPrescription};

/// Three sub-threshold interval days (Tue, Thu, Sat) plus a Sunday long run
pub struct NorwegianWeek;

impl NorwegianWeek {
    fn sub_threshold(ctx: &WeekContext<'_>) -> f64 {
        match ctx.paces.zones {
            MethodologyZones::Norwegian { sub_threshold } => sub_threshold,
            _ => ctx.paces.threshold * 0.97,
        }
    }

    /// Rep length per session day: medium Tuesday, long Thursday, short Saturday
    fn rep_shape(day: u8) -> (f64, f64, &'static str) {
        match day {
            2 => (6.0, 1.0, "Sub-threshold intervals (1 km reps)"),
            4 => (10.0, 2.0, "Sub-threshold intervals (2 km reps)"),
            _ => (3.0, 1.0, "Sub-threshold intervals (short reps)"),
        }
    }

    fn session_for(day: u8, ctx: &WeekContext<'_>) -> WorkoutPrescription {
        let (work, rest, title) = Self::rep_shape(day);
        fitted_intervals(
            ctx,
            title,
            Intensity::Hard,
            IntervalBlock {
                reps: 0,
                work_min: work,
                work_speed: Self::sub_threshold(ctx),
                work_zone: "Sub-threshold",
                rest_min: rest,
                rest_speed: None,
                rest_zone: "Standing rest",
            },
        )
    }
}

impl WeekTemplate for NorwegianWeek {
    fn methodology(&self) -> Methodology {
        Methodology::Norwegian
    }

    fn day_priority(&self) -> [u8; 7] {
        [2, 4, 7, 6, 1, 3, 5]
    }

    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        let workout = match day {
            2 | 4 | 6 => Self::session_for(day, ctx),
            7 => long_run(ctx),
            _ => easy_run(ctx),
        };
        vec![workout]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntervalSettings;
    use crate::models::Phase;
    use crate::templates::test_support::{context, paces};
    use crate::workout::SegmentKind;

    #[test]
    fn test_three_sub_threshold_days() {
        let paces = paces(Methodology::Norwegian);
        let intervals = IntervalSettings::default();
        let days = NorwegianWeek.compose(&context(&paces, &intervals, Phase::Base, 6));

        let quality: Vec<u8> = days
            .iter()
            .filter(|d| d.workouts.iter().any(|w| w.title.starts_with("Sub-threshold")))
            .map(|d| d.day_number)
            .collect();
        assert_eq!(quality, vec![2, 4, 6]);
        assert_eq!(days[6].workouts[0].title, "Long run");
    }

    #[test]
    fn test_work_pace_is_below_threshold() {
        let paces = paces(Methodology::Norwegian);
        let intervals = IntervalSettings::default();
        let days = NorwegianWeek.compose(&context(&paces, &intervals, Phase::Build, 3));
        for workout in days.iter().flat_map(|d| d.workouts.iter()) {
            for segment in workout.segments.iter().filter(|s| s.kind == SegmentKind::Work) {
                if segment.zone == "Sub-threshold" {
                    assert!(segment.target_speed_kmh.unwrap() < paces.threshold);
                }
            }
        }
    }
}
