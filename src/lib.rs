// Library interface for TrainRx modules
// Integration tests and benchmarks go through these re-exports

pub mod config;
pub mod constraints;
pub mod decoupling;
pub mod ergometer;
pub mod error;
pub mod evidence;
pub mod format;
pub mod logging;
pub mod models;
pub mod paces;
pub mod phases;
pub mod power;
pub mod progression;
pub mod supplementary;
pub mod templates;
pub mod trace;
pub mod training_plan;
pub mod vdot;
pub mod workout;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use error::{ConfigError, EstimatorError, Result, TrainRxError};
pub use evidence::{resolve_evidence, Evidence, ResolvedEvidence};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use paces::{resolve_paces, MethodologyPaceSet, MethodologyZones, PaceAnchor, PaceResolver};
pub use phases::PhaseDistribution;
pub use power::{CpModelResult, PowerAnalyzer, TimeTrial};
pub use ergometer::{ErgometerCalculator, ErgometerType, ThresholdSource};
pub use templates::{template_for, WeekTemplate};
pub use trace::ComputationTrace;
pub use training_plan::{
    generate_program, generate_programs, GeneratedProgram, PrescriptionEngine, ProgramPlan, ProgramRequest,
};
pub use workout::{DayPlan, Segment, SegmentKind, WeekPlan, WorkoutKind, WorkoutPrescription};
