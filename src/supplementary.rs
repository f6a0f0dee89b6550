//! Strength and core sessions layered onto a composed week

use crate::workout::{DayPlan, WorkoutKind, WorkoutPrescription};

pub const STRENGTH_MINUTES: f64 = 30.0;
pub const CORE_MINUTES: f64 = 20.0;

/// Requested supplementary work for each week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupplementaryRequest {
    pub strength: u8,
    pub core: u8,
    pub after_cardio: bool,
}

impl SupplementaryRequest {
    pub fn is_empty(&self) -> bool {
        self.strength == 0 && self.core == 0
    }
}

/// How many sessions of each kind actually landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub strength: usize,
    pub core: usize,
}

/// Week with strength then core sessions added.
///
/// A day receives at most one of each kind from this pass, so requests above
/// the number of days are truncated.
pub fn insert_supplementary(days: Vec<DayPlan>, request: SupplementaryRequest) -> (Vec<DayPlan>, Placement) {
    if request.is_empty() {
        return (days, Placement::default());
    }

    let (days, strength) = place(days, WorkoutKind::Strength, request.strength, request.after_cardio);
    let (days, core) = place(days, WorkoutKind::Core, request.core, request.after_cardio);

    tracing::trace!(strength, core, after_cardio = request.after_cardio, "Supplementary sessions placed");
    (days, Placement { strength, core })
}

/// Day indices in the order they should receive a session.
///
/// After-cardio puts run days first; otherwise the emptiest days lead. Ties
/// break on weekday.
fn candidate_order(days: &[DayPlan], after_cardio: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..days.len()).collect();
    if after_cardio {
        order.sort_by_key(|&i| (!days[i].has_run(), days[i].workouts.len(), days[i].day_number));
    } else {
        order.sort_by_key(|&i| (days[i].workouts.len(), days[i].day_number));
    }
    order
}

fn place(days: Vec<DayPlan>, kind: WorkoutKind, count: u8, after_cardio: bool) -> (Vec<DayPlan>, usize) {
    if count == 0 {
        return (days, 0);
    }
    let minutes = match kind {
        WorkoutKind::Strength => STRENGTH_MINUTES,
        _ => CORE_MINUTES,
    };

    let targets: Vec<usize> = candidate_order(&days, after_cardio)
        .into_iter()
        .filter(|&i| days[i].count_kind(kind) == 0)
        .take(count as usize)
        .collect();

    let days = days
        .into_iter()
        .enumerate()
        .map(|(i, mut day)| {
            if targets.contains(&i) {
                day.workouts.push(WorkoutPrescription::supplementary(kind, minutes));
            }
            day
        })
        .collect();
    (days, targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Intensity;
    use rust_decimal::Decimal;

    fn week(run_days: &[u8]) -> Vec<DayPlan> {
        (1..=7u8)
            .map(|day| {
                if run_days.contains(&day) {
                    DayPlan::with_workouts(
                        day,
                        vec![WorkoutPrescription::continuous("Easy run", Intensity::Easy, 40.0, 10.0, "Easy")],
                    )
                } else {
                    DayPlan::rest(day)
                }
            })
            .collect()
    }

    fn days_with(days: &[DayPlan], kind: WorkoutKind) -> Vec<u8> {
        days.iter().filter(|d| d.count_kind(kind) > 0).map(|d| d.day_number).collect()
    }

    #[test]
    fn test_after_cardio_prefers_run_days() {
        let (days, placed) = insert_supplementary(
            week(&[2, 4, 7]),
            SupplementaryRequest { strength: 2, core: 1, after_cardio: true },
        );

        assert_eq!(placed, Placement { strength: 2, core: 1 });
        assert_eq!(days_with(&days, WorkoutKind::Strength), vec![2, 4]);
        // Day 7 is now the emptiest run day
        assert_eq!(days_with(&days, WorkoutKind::Core), vec![7]);
    }

    #[test]
    fn test_free_days_used_first_otherwise() {
        let (days, _) =
            insert_supplementary(week(&[2, 4, 6, 7]), SupplementaryRequest { strength: 2, core: 2, after_cardio: false });

        assert_eq!(days_with(&days, WorkoutKind::Strength), vec![1, 3]);
        // Rest day 5 is now the only empty day, then ties break on weekday
        assert_eq!(days_with(&days, WorkoutKind::Core), vec![1, 5]);
    }

    #[test]
    fn test_at_most_one_of_each_kind_per_day() {
        let (days, placed) = insert_supplementary(
            week(&[1, 2, 3, 4, 5, 6, 7]),
            SupplementaryRequest { strength: 9, core: 9, after_cardio: true },
        );

        assert_eq!(placed, Placement { strength: 7, core: 7 });
        for day in &days {
            assert_eq!(day.count_kind(WorkoutKind::Strength), 1);
            assert_eq!(day.count_kind(WorkoutKind::Core), 1);
            assert!(day.has_run());
        }
    }

    #[test]
    fn test_supplementary_adds_no_distance() {
        let distances = |days: &[DayPlan]| -> Vec<Decimal> {
            days.iter()
                .map(|d| d.workouts.iter().map(|w| w.distance_km).sum())
                .collect()
        };

        let before = week(&[7]);
        let (days, _) =
            insert_supplementary(before.clone(), SupplementaryRequest { strength: 3, core: 3, after_cardio: false });
        assert_eq!(distances(&days), distances(&before));
        assert_eq!(days.iter().map(|d| d.workouts.len()).sum::<usize>(), 7);
    }

    #[test]
    fn test_composed_week_left_untouched() {
        let composed = week(&[2, 4]);
        let (days, placed) = insert_supplementary(
            composed.clone(),
            SupplementaryRequest { strength: 1, core: 1, after_cardio: true },
        );

        assert_eq!(placed, Placement { strength: 1, core: 1 });
        assert_eq!(composed, week(&[2, 4]));
        assert_ne!(days, composed);
        assert_eq!(days.len(), composed.len());
    }
}
