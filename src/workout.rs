//! Plan data types: weeks, days, workouts and their segments
//!
//! Workout duration is always the sum of its segments, and distance is always
//! derived from segment duration × target speed, so the two can never drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::IntervalSettings;
use crate::format;
use crate::models::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Run,
    Strength,
    Core,
}

/// Session slot on double days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionSlot {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Recovery,
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Warmup,
    Work,
    Rest,
    Cooldown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub duration_min: f64,
    /// None for strength/core blocks and standing rest
    pub target_speed_kmh: Option<f64>,
    pub zone: String,
}

impl Segment {
    pub fn new(kind: SegmentKind, duration_min: f64, target_speed_kmh: Option<f64>, zone: &str) -> Self {
        Self {
            kind,
            duration_min,
            target_speed_kmh,
            zone: zone.to_string(),
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.target_speed_kmh
            .map(|speed| self.duration_min / 60.0 * speed)
            .unwrap_or(0.0)
    }
}

/// Repeated work/rest block
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBlock {
    pub reps: u32,
    pub work_min: f64,
    pub work_speed: f64,
    pub work_zone: &'static str,
    pub rest_min: f64,
    /// Active recovery speed; None for standing rest
    pub rest_speed: Option<f64>,
    pub rest_zone: &'static str,
}

impl IntervalBlock {
    /// Number of reps that fits `session_min` once warmup and cooldown are
    /// taken out, clamped to the configured range
    pub fn fit_reps(session_min: f64, work_min: f64, rest_min: f64, settings: &IntervalSettings) -> u32 {
        let available = session_min - settings.warmup_minutes - settings.cooldown_minutes;
        let per_rep = work_min + rest_min;
        let reps = if per_rep > 0.0 && available > 0.0 {
            (available / per_rep).floor() as u32
        } else {
            0
        };
        reps.clamp(settings.min_reps, settings.max_reps)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPrescription {
    pub kind: WorkoutKind,
    pub slot: Option<SessionSlot>,
    pub intensity: Intensity,
    pub title: String,
    pub duration_min: f64,
    /// Derived from segments, two decimal places
    pub distance_km: Decimal,
    pub instructions: String,
    pub segments: Vec<Segment>,
}

impl WorkoutPrescription {
    /// Run made of explicit segments
    pub fn run(title: &str, intensity: Intensity, segments: Vec<Segment>, instructions: String) -> Self {
        let duration_min = segments.iter().map(|s| s.duration_min).sum();
        let distance: f64 = segments.iter().map(Segment::distance_km).sum();
        Self {
            kind: WorkoutKind::Run,
            slot: None,
            intensity,
            title: title.to_string(),
            duration_min,
            distance_km: format::km_decimal(distance),
            instructions,
            segments,
        }
    }

    /// Single steady segment
    pub fn continuous(title: &str, intensity: Intensity, minutes: f64, speed: f64, zone: &str) -> Self {
        let instructions = format!(
            "{} at {} ({})",
            format::duration_minutes(minutes),
            format::pace_per_km(speed),
            zone
        );
        Self::run(
            title,
            intensity,
            vec![Segment::new(SegmentKind::Work, minutes, Some(speed), zone)],
            instructions,
        )
    }

    /// Warmup, N × (work, rest), cooldown
    pub fn intervals(
        title: &str,
        intensity: Intensity,
        block: &IntervalBlock,
        easy_speed: f64,
        settings: &IntervalSettings,
    ) -> Self {
        let mut segments = Vec::with_capacity(block.reps as usize * 2 + 2);
        segments.push(Segment::new(
            SegmentKind::Warmup,
            settings.warmup_minutes,
            Some(easy_speed),
            "Easy",
        ));
        for _ in 0..block.reps {
            segments.push(Segment::new(
                SegmentKind::Work,
                block.work_min,
                Some(block.work_speed),
                block.work_zone,
            ));
            segments.push(Segment::new(
                SegmentKind::Rest,
                block.rest_min,
                block.rest_speed,
                block.rest_zone,
            ));
        }
        segments.push(Segment::new(
            SegmentKind::Cooldown,
            settings.cooldown_minutes,
            Some(easy_speed),
            "Easy",
        ));

        let recovery = match block.rest_speed {
            Some(speed) => format!("{} float at {}", format::duration_minutes(block.rest_min), format::pace_per_km(speed)),
            None => format!("{} rest", format::duration_minutes(block.rest_min)),
        };
        let instructions = format!(
            "{} warmup, {} x {} at {} ({}) with {}, {} cooldown",
            format::duration_minutes(settings.warmup_minutes),
            block.reps,
            format::duration_minutes(block.work_min),
            format::pace_per_km(block.work_speed),
            block.work_zone,
            recovery,
            format::duration_minutes(settings.cooldown_minutes)
        );

        Self::run(title, intensity, segments, instructions)
    }

    /// Strength or core session
    pub fn supplementary(kind: WorkoutKind, minutes: f64) -> Self {
        let (title, instructions) = match kind {
            WorkoutKind::Strength => (
                "Strength",
                "Lower-body and posterior-chain strength: squats, lunges, deadlifts, calf raises",
            ),
            _ => ("Core", "Planks, side planks, dead bugs and bird dogs"),
        };
        Self {
            kind,
            slot: None,
            intensity: Intensity::Moderate,
            title: title.to_string(),
            duration_min: minutes,
            distance_km: Decimal::ZERO,
            instructions: instructions.to_string(),
            segments: vec![Segment::new(SegmentKind::Work, minutes, None, title)],
        }
    }

    pub fn with_slot(mut self, slot: SessionSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn is_run(&self) -> bool {
        self.kind == WorkoutKind::Run
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1 = Monday .. 7 = Sunday
    pub day_number: u8,
    pub notes: Vec<String>,
    /// Empty on rest days
    pub workouts: Vec<WorkoutPrescription>,
}

impl DayPlan {
    pub fn rest(day_number: u8) -> Self {
        Self {
            day_number,
            notes: Vec::new(),
            workouts: Vec::new(),
        }
    }

    pub fn with_workouts(day_number: u8, workouts: Vec<WorkoutPrescription>) -> Self {
        Self {
            day_number,
            notes: Vec::new(),
            workouts,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn has_run(&self) -> bool {
        self.workouts.iter().any(WorkoutPrescription::is_run)
    }

    pub fn count_kind(&self, kind: WorkoutKind) -> usize {
        self.workouts.iter().filter(|w| w.kind == kind).count()
    }

    /// Add a note unless it is already present
    pub fn add_note(&mut self, note: &str) {
        if !self.notes.iter().any(|n| n == note) {
            self.notes.push(note.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week_number: u32,
    pub phase: Phase,
    pub week_in_phase: u32,
    pub volume_percent: f64,
    pub focus: String,
    /// Race-pace speed targeted this week (km/h)
    pub target_speed_kmh: f64,
    pub total_distance_km: Decimal,
    /// Always seven, Monday first
    pub days: Vec<DayPlan>,
}

impl WeekPlan {
    /// Sum of workout distances
    pub fn running_distance(&self) -> Decimal {
        self.days
            .iter()
            .flat_map(|d| d.workouts.iter())
            .map(|w| w.distance_km)
            .sum()
    }

    pub fn refresh_distance(&mut self) {
        self.total_distance_km = self.running_distance();
    }

    pub fn training_days(&self) -> usize {
        self.days.iter().filter(|d| d.has_run()).count()
    }
}
