use chrono::NaiveDate;
use trainrx::constraints::{self, BLOCKED_NOTE, RACE_NOTE};
use trainrx::workout::SessionSlot;
use trainrx::{
    generate_program, generate_programs, CalendarConstraints, Confidence, DataSource, EngineConfig,
    ExperienceLevel, Methodology, Phase, PhysiologicalProfile, PrescriptionEngine, ProgramRequest, RaceDistance,
    SchedulingParams, SegmentKind, WorkoutKind,
};

/// End-to-end plan generation through the public API

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn ten_k_runner() -> PhysiologicalProfile {
    PhysiologicalProfile::new(ExperienceLevel::Intermediate)
        .with_race_result(RaceDistance::K10, 2_700.0)
        .with_weekly_volume(45.0)
}

fn twelve_weeks() -> SchedulingParams {
    SchedulingParams::new(start(), 12).with_goal(RaceDistance::K10, 2_580.0)
}

#[test]
fn test_every_methodology_produces_a_complete_plan() {
    for methodology in Methodology::ALL {
        let program =
            generate_program(&ten_k_runner(), methodology, &twelve_weeks(), &CalendarConstraints::default())
                .unwrap();
        let plan = &program.plan;

        assert_eq!(plan.weeks.len(), 12, "{}", methodology);
        assert_eq!(plan.phases.total(), 12);
        assert!(program.warnings.is_empty(), "{}: {:?}", methodology, program.warnings);

        for phase in Phase::ALL {
            assert_eq!(plan.weeks_in_phase(phase).count() as u32, plan.phases.weeks_in(phase));
        }
        assert!(plan.weeks.windows(2).all(|w| w[0].phase <= w[1].phase));

        for week in &plan.weeks {
            assert_eq!(week.days.len(), 7);
            assert_eq!(week.training_days(), 5);
            assert_eq!(week.total_distance_km, week.running_distance());
            for workout in week.days.iter().flat_map(|d| d.workouts.iter()) {
                let sum: f64 = workout.segments.iter().map(|s| s.duration_min).sum();
                assert!((sum - workout.duration_min).abs() < 1e-9);
            }
        }
        assert!(plan.total_distance_km() > rust_decimal::Decimal::ZERO);
    }
}

#[test]
fn test_canova_twelve_weeks() {
    let program =
        generate_program(&ten_k_runner(), Methodology::Canova, &twelve_weeks(), &CalendarConstraints::default())
            .unwrap();
    let plan = &program.plan;
    let goal = plan.paces.marathon;

    assert_eq!(
        (plan.phases.base, plan.phases.build, plan.phases.peak, plan.phases.taper),
        (3, 3, 5, 1)
    );

    // Peak long run carries a goal-pace block
    let peak_week = plan.week(7).unwrap();
    assert_eq!(peak_week.phase, Phase::Peak);
    let long_run = &peak_week.days[6].workouts[0];
    assert_eq!(long_run.segments.len(), 3);
    assert!((long_run.segments[1].target_speed_kmh.unwrap() - goal).abs() < 1e-9);

    // Week one specific work sits below goal pace and converges later
    let first_specific = plan.weeks[0].days[5].workouts[0]
        .segments
        .iter()
        .find(|s| s.kind == SegmentKind::Work)
        .and_then(|s| s.target_speed_kmh)
        .unwrap();
    assert!(first_specific < goal);
    assert!((plan.weeks[11].target_speed_kmh - goal).abs() < 1e-9);
}

#[test]
fn test_norwegian_double_days() {
    let program = generate_program(
        &ten_k_runner(),
        Methodology::NorwegianDouble,
        &twelve_weeks(),
        &CalendarConstraints::default(),
    )
    .unwrap();

    for week in &program.plan.weeks {
        for day in [1usize, 3] {
            let slots: Vec<_> = week.days[day].workouts.iter().map(|w| w.slot).collect();
            assert_eq!(slots, vec![Some(SessionSlot::Am), Some(SessionSlot::Pm)]);
        }
    }
}

#[test]
fn test_calendar_constraints_applied_once() {
    let race_day = constraints::day_date(start(), 12, 7).unwrap();
    let blocked = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let mut calendar = CalendarConstraints::default();
    calendar.blocked.insert(blocked);

    let params = twelve_weeks().with_target_date(race_day);
    let program = generate_program(&ten_k_runner(), Methodology::Polarized, &params, &calendar).unwrap();
    let plan = &program.plan;

    let tuesday = &plan.weeks[0].days[1];
    assert!(tuesday.is_rest());
    assert!(tuesday.notes.contains(&BLOCKED_NOTE.to_string()));

    let race = &plan.weeks[11].days[6];
    assert!(race.is_rest());
    assert!(race.notes.contains(&RACE_NOTE.to_string()));
    assert_eq!(plan.weeks[0].training_days(), 4);

    let (again, report) =
        constraints::apply_constraints(plan.weeks.clone(), plan.start_date, &calendar, plan.target_date);
    assert_eq!(again, plan.weeks);
    assert_eq!(report.race_day, Some((12, 7)));
}

#[test]
fn test_invalid_lab_value_falls_back_to_race() {
    let profile = PhysiologicalProfile::new(ExperienceLevel::Advanced)
        .with_lab_vo2max(0.0)
        .with_race_result(RaceDistance::K10, 2_400.0);

    let program =
        generate_program(&profile, Methodology::Pyramidal, &twelve_weeks(), &CalendarConstraints::default())
            .unwrap();
    assert_eq!(program.plan.evidence.data_source, DataSource::RaceTime);
    assert_eq!(program.plan.paces.data_source, DataSource::RaceTime);
    assert!(program.warnings.iter().any(|w| w.starts_with("Lab VO2max skipped")));
}

#[test]
fn test_experience_only_profile_still_plans() {
    let profile = PhysiologicalProfile::new(ExperienceLevel::Beginner);
    let params = SchedulingParams::new(start(), 8).with_sessions(3);

    let program = generate_program(&profile, Methodology::Polarized, &params, &CalendarConstraints::default())
        .unwrap();
    assert_eq!(program.plan.evidence.data_source, DataSource::Estimate);
    assert_eq!(program.plan.paces.confidence, Confidence::VeryLow);
    assert!(program.plan.paces.is_valid());
    assert!(program.plan.weeks.iter().all(|w| w.training_days() == 3));
}

#[test]
fn test_supplementary_sessions_every_week() {
    let params = twelve_weeks().with_supplementary(2, 1, true);
    let program = generate_program(&ten_k_runner(), Methodology::Norwegian, &params, &CalendarConstraints::default())
        .unwrap();

    for week in &program.plan.weeks {
        let strength: usize = week.days.iter().map(|d| d.count_kind(WorkoutKind::Strength)).sum();
        let core: usize = week.days.iter().map(|d| d.count_kind(WorkoutKind::Core)).sum();
        assert_eq!((strength, core), (2, 1));
        for day in week.days.iter().filter(|d| d.count_kind(WorkoutKind::Strength) > 0) {
            assert!(day.has_run());
            assert_eq!(day.count_kind(WorkoutKind::Strength), 1);
        }
    }
}

#[test]
fn test_batch_matches_sequential() {
    let requests: Vec<ProgramRequest> = Methodology::ALL
        .iter()
        .map(|&methodology| ProgramRequest {
            profile: ten_k_runner(),
            methodology,
            params: twelve_weeks(),
            constraints: CalendarConstraints::default(),
        })
        .collect();

    let batch = generate_programs(&requests);
    assert_eq!(batch.len(), requests.len());
    for (request, result) in requests.iter().zip(batch) {
        let sequential = generate_program(
            &request.profile,
            request.methodology,
            &request.params,
            &request.constraints,
        )
        .unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
}

#[test]
fn test_engine_uses_configured_phase_ratios() {
    let config = EngineConfig::from_toml_str(
        r#"
        [phases.polarized]
        base = 0.25
        build = 0.25
        peak = 0.25
        taper = 0.25
        "#,
    )
    .unwrap();
    let engine = PrescriptionEngine::new(config).unwrap();

    let params = SchedulingParams::new(start(), 8);
    let program = engine
        .generate(&ten_k_runner(), Methodology::Polarized, &params, &CalendarConstraints::default())
        .unwrap();
    let phases = program.plan.phases;
    assert_eq!((phases.base, phases.build, phases.peak, phases.taper), (2, 2, 2, 2));
}
