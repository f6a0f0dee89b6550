use super::{easy_run, fitted_intervals, long_run, WeekContext, WeekTemplate};
use crate::format;
use crate::models::Methodology;
use crate::paces::MethodologyZones;
use crate::workout::{Intensity, IntervalBlock, Segment, SegmentKind, WorkoutPrescription};

/// Tuesday VO2max, Thursday tempo, Sunday long run
pub struct PyramidalWeek;

/// Shortest tempo block worth prescribing (minutes)
const MIN_TEMPO_MINUTES: f64 = 15.0;

impl PyramidalWeek {
    fn tempo_speed(ctx: &WeekContext<'_>) -> f64 {
        match ctx.paces.zones {
            MethodologyZones::Pyramidal { tempo, .. } => tempo,
            _ => (ctx.paces.marathon + ctx.paces.threshold) / 2.0,
        }
    }

    fn tempo_run(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        let warmup = ctx.intervals.warmup_minutes;
        let cooldown = ctx.intervals.cooldown_minutes;
        let tempo_minutes = (ctx.quality_minutes() - warmup - cooldown).max(MIN_TEMPO_MINUTES);
        let tempo = Self::tempo_speed(ctx);

        let segments = vec![
            Segment::new(SegmentKind::Warmup, warmup, Some(ctx.paces.easy), "Easy"),
            Segment::new(SegmentKind::Work, tempo_minutes, Some(tempo), "Tempo"),
            Segment::new(SegmentKind::Cooldown, cooldown, Some(ctx.paces.easy), "Easy"),
        ];
        let instructions = format!(
            "{} warmup, {} continuous at {} (tempo), {} cooldown",
            format::duration_minutes(warmup),
            format::duration_minutes(tempo_minutes),
            format::pace_per_km(tempo),
            format::duration_minutes(cooldown)
        );
        WorkoutPrescription::run("Tempo run", Intensity::Hard, segments, instructions)
    }

    fn vo2_intervals(ctx: &WeekContext<'_>) -> WorkoutPrescription {
        fitted_intervals(
            ctx,
            "VO2max intervals",
            Intensity::VeryHard,
            IntervalBlock {
                reps: 0,
                work_min: 4.0,
                work_speed: ctx.paces.interval,
                work_zone: "VO2max",
                rest_min: 3.0,
                rest_speed: Some(ctx.paces.easy),
                rest_zone: "Jog",
            },
        )
    }
}

impl WeekTemplate for PyramidalWeek {
    fn methodology(&self) -> Methodology {
        Methodology::Pyramidal
    }

    fn day_priority(&self) -> [u8; 7] {
        [7, 2, 4, 6, 1, 3, 5]
    }

    fn session(&self, day: u8, ctx: &WeekContext<'_>) -> Vec<WorkoutPrescription> {
        let workout = match day {
            7 => long_run(ctx),
            2 => Self::vo2_intervals(ctx),
            4 => Self::tempo_run(ctx),
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

    #[test]
    fn test_tempo_between_marathon_and_threshold() {
        let paces = paces(Methodology::Pyramidal);
        let intervals = IntervalSettings::default();
        let days = PyramidalWeek.compose(&context(&paces, &intervals, Phase::Build, 4));

        let tempo = &days[3].workouts[0];
        assert_eq!(tempo.title, "Tempo run");
        let speed = tempo.segments[1].target_speed_kmh.unwrap();
        assert!(speed > paces.marathon && speed < paces.threshold);
        assert_eq!(tempo.duration_min, 10.0 + 45.0 + 10.0);
    }
}
