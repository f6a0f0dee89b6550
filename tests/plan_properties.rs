use chrono::NaiveDate;
use proptest::prelude::*;
use trainrx::{
    generate_program, CalendarConstraints, ExperienceLevel, Methodology, PhysiologicalProfile, RaceDistance,
    SchedulingParams,
};

/// Structural properties that hold for any valid request

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_plan_structure(
        race_seconds in 1_800.0f64..4_200.0,
        goal_factor in 0.9f64..1.1,
        weeks in 1u32..=30,
        sessions in 1u8..=7,
        method_idx in 0usize..5,
    ) {
        let profile = PhysiologicalProfile::new(ExperienceLevel::Intermediate)
            .with_race_result(RaceDistance::K10, race_seconds);
        let params = SchedulingParams::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), weeks)
            .with_sessions(sessions)
            .with_goal(RaceDistance::K10, race_seconds * goal_factor);
        let methodology = Methodology::ALL[method_idx];

        let program = generate_program(&profile, methodology, &params, &CalendarConstraints::default()).unwrap();
        let plan = &program.plan;

        prop_assert_eq!(plan.weeks.len() as u32, weeks);
        prop_assert_eq!(plan.phases.total(), weeks);

        let mut previous_target = 0.0;
        for (i, week) in plan.weeks.iter().enumerate() {
            prop_assert_eq!(week.week_number, i as u32 + 1);
            prop_assert_eq!(week.days.len(), 7);
            prop_assert_eq!(week.training_days(), sessions as usize);
            prop_assert!(week.target_speed_kmh > 0.0);
            prop_assert!(week.target_speed_kmh >= previous_target - 1e-9);
            previous_target = week.target_speed_kmh;

            for workout in week.days.iter().flat_map(|d| d.workouts.iter()) {
                let sum: f64 = workout.segments.iter().map(|s| s.duration_min).sum();
                prop_assert!((sum - workout.duration_min).abs() < 1e-9);
                for segment in &workout.segments {
                    if let Some(speed) = segment.target_speed_kmh {
                        prop_assert!(speed.is_finite() && speed > 0.0);
                    }
                }
            }
        }
    }
}
