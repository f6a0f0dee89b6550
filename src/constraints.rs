//! Calendar overrides applied to a finished plan
//!
//! The pass takes the composed weeks and hands back an amended copy. It only
//! touches workout lists and notes, never adds or removes weeks or days, and
//! running it twice gives the same plan.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::CalendarConstraints;
use crate::workout::WeekPlan;

pub const BLOCKED_NOTE: &str = "Blocked: rest day";
pub const REDUCED_NOTE: &str = "Reduced capacity: shorten sessions and keep effort easy";
pub const RACE_NOTE: &str = "Race day";

/// What the constraint pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub blocked_days: usize,
    pub reduced_days: usize,
    pub altitude_days: usize,
    /// (week, day) of the race marker
    pub race_day: Option<(u32, u8)>,
    pub warnings: Vec<String>,
}

/// Calendar date of a plan day; `week` and `day` are 1-based
pub fn day_date(start: NaiveDate, week: u32, day: u8) -> Option<NaiveDate> {
    let offset = 7 * u64::from(week.checked_sub(1)?) + u64::from(day.checked_sub(1)?);
    start.checked_add_days(Days::new(offset))
}

fn altitude_note(elevation_m: Option<u32>) -> String {
    match elevation_m {
        Some(m) => format!("At altitude ({} m): expect slower paces, run by effort", m),
        None => "At altitude: expect slower paces, run by effort".to_string(),
    }
}

/// Apply blocked, reduced and altitude dates plus the race marker
pub fn apply_constraints(
    mut weeks: Vec<WeekPlan>,
    start: NaiveDate,
    constraints: &CalendarConstraints,
    target_date: Option<NaiveDate>,
) -> (Vec<WeekPlan>, ConstraintReport) {
    let mut report = ConstraintReport::default();

    for week in weeks.iter_mut() {
        let week_number = week.week_number;
        for day in week.days.iter_mut() {
            let Some(date) = day_date(start, week_number, day.day_number) else {
                continue;
            };

            if target_date == Some(date) {
                day.workouts.clear();
                day.add_note(RACE_NOTE);
                report.race_day = Some((week_number, day.day_number));
                continue;
            }

            if constraints.blocked.contains(&date) {
                day.workouts.clear();
                day.add_note(BLOCKED_NOTE);
                report.blocked_days += 1;
            } else if constraints.reduced.contains(&date) {
                day.add_note(REDUCED_NOTE);
                report.reduced_days += 1;
            }

            if let Some(period) = constraints.altitude.iter().find(|p| p.contains(date)) {
                day.add_note(&altitude_note(period.elevation_m));
                report.altitude_days += 1;
            }
        }
        week.refresh_distance();
    }

    if let (Some(target), None) = (target_date, report.race_day) {
        report
            .warnings
            .push(format!("Target date {} falls outside the plan; no race day marked", target));
    }

    tracing::debug!(
        blocked = report.blocked_days,
        reduced = report.reduced_days,
        altitude = report.altitude_days,
        race_day = ?report.race_day,
        "Calendar constraints applied"
    );
    (weeks, report)
}
