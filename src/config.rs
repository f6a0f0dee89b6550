//! Engine configuration
//!
//! Every hand-tuned threshold used by the estimators and the plan composer
//! lives here rather than inline in the algorithms, so it can be recalibrated
//! from a TOML file without touching code. Defaults reproduce the published
//! behaviour exactly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::{Methodology, Phase};

/// Root configuration for the prescription engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub critical_power: CriticalPowerSettings,

    #[serde(default)]
    pub w_prime: WPrimeSettings,

    #[serde(default)]
    pub ergometer: ErgometerSettings,

    #[serde(default)]
    pub decoupling: DecouplingSettings,

    #[serde(default)]
    pub phases: PhaseRatioSettings,

    #[serde(default)]
    pub volume: VolumeSettings,

    #[serde(default)]
    pub intervals: IntervalSettings,
}

/// Quality scoring for the 3-minute test and the multi-trial regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalPowerSettings {
    /// Minimum one-second samples for the 3-minute test
    pub min_samples: usize,
    /// Final window averaged into CP (seconds)
    pub final_window_seconds: usize,
    /// Window compared for pacing (first vs middle), seconds
    pub pacing_window_seconds: usize,
    /// Opening window used as the decay reference, seconds
    pub start_window_seconds: usize,
    /// Required fractional drop from opening to final window
    pub min_decay_fraction: f64,
    /// Latest acceptable peak sample (seconds into the test)
    pub max_peak_second: usize,
    pub w_prime_min_joules: f64,
    pub w_prime_max_joules: f64,
    pub pacing_penalty: f64,
    pub decay_penalty: f64,
    pub late_peak_penalty: f64,
    pub w_prime_range_penalty: f64,
    /// Score cut-offs for Excellent/Good/Fair (and High/Medium/Low)
    pub score_excellent: f64,
    pub score_good: f64,
    pub score_fair: f64,
    /// Multi-trial regression weighting of R² in the confidence score
    pub r_squared_weight: f64,
    pub trial_count_bonus: f64,
    pub duration_spread_bonus: f64,
    pub regression_high: f64,
    pub regression_medium: f64,
    pub regression_low: f64,
    pub r_squared_excellent: f64,
    pub r_squared_good: f64,
    pub r_squared_fair: f64,
    /// Per-trial residual that triggers a warning (percent)
    pub residual_warning_pct: f64,
}

impl Default for CriticalPowerSettings {
    fn default() -> Self {
        Self {
            min_samples: 150,
            final_window_seconds: 30,
            pacing_window_seconds: 30,
            start_window_seconds: 10,
            min_decay_fraction: 0.30,
            max_peak_second: 45,
            w_prime_min_joules: 8_000.0,
            w_prime_max_joules: 60_000.0,
            pacing_penalty: 25.0,
            decay_penalty: 25.0,
            late_peak_penalty: 15.0,
            w_prime_range_penalty: 20.0,
            score_excellent: 85.0,
            score_good: 70.0,
            score_fair: 50.0,
            r_squared_weight: 80.0,
            trial_count_bonus: 5.0,
            duration_spread_bonus: 5.0,
            regression_high: 90.0,
            regression_medium: 75.0,
            regression_low: 60.0,
            r_squared_excellent: 0.99,
            r_squared_good: 0.95,
            r_squared_fair: 0.90,
            residual_warning_pct: 5.0,
        }
    }
}

/// W' reconstitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WPrimeSettings {
    /// Recovery time constant (seconds)
    pub tau_seconds: f64,
}

impl Default for WPrimeSettings {
    fn default() -> Self {
        Self { tau_seconds: 546.0 }
    }
}

/// Concept2-style ergometer conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErgometerSettings {
    /// watts = constant / (seconds per metre)^3
    pub power_constant: f64,
    pub min_plausible_watts: f64,
    pub max_plausible_watts: f64,
}

impl Default for ErgometerSettings {
    fn default() -> Self {
        Self {
            power_constant: 2.80,
            min_plausible_watts: 30.0,
            max_plausible_watts: 1_000.0,
        }
    }
}

/// Aerobic decoupling cut-offs (percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecouplingSettings {
    pub good_below_pct: f64,
    pub fair_below_pct: f64,
}

impl Default for DecouplingSettings {
    fn default() -> Self {
        Self {
            good_below_pct: 5.0,
            fair_below_pct: 10.0,
        }
    }
}

/// Fractions of the plan given to each phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRatio {
    pub base: f64,
    pub build: f64,
    pub peak: f64,
    pub taper: f64,
}

impl PhaseRatio {
    pub const fn new(base: f64, build: f64, peak: f64, taper: f64) -> Self {
        Self { base, build, peak, taper }
    }

    pub fn sum(&self) -> f64 {
        self.base + self.build + self.peak + self.taper
    }
}

/// Per-methodology phase ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseRatioSettings {
    pub polarized: PhaseRatio,
    pub norwegian: PhaseRatio,
    pub norwegian_double: PhaseRatio,
    pub canova: PhaseRatio,
    pub pyramidal: PhaseRatio,
}

impl Default for PhaseRatioSettings {
    fn default() -> Self {
        Self {
            polarized: PhaseRatio::new(0.40, 0.35, 0.15, 0.10),
            norwegian: PhaseRatio::new(0.45, 0.30, 0.15, 0.10),
            norwegian_double: PhaseRatio::new(0.45, 0.30, 0.15, 0.10),
            // Inverted: the specific (peak) block dominates
            canova: PhaseRatio::new(0.25, 0.27, 0.40, 0.08),
            pyramidal: PhaseRatio::new(0.40, 0.35, 0.15, 0.10),
        }
    }
}

impl PhaseRatioSettings {
    pub fn for_methodology(&self, methodology: Methodology) -> PhaseRatio {
        match methodology {
            Methodology::Polarized => self.polarized,
            Methodology::Norwegian => self.norwegian,
            Methodology::NorwegianDouble => self.norwegian_double,
            Methodology::Canova => self.canova,
            Methodology::Pyramidal => self.pyramidal,
        }
    }
}

/// Linear volume ramp across a phase, in percent of peak volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRamp {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    pub base: VolumeRamp,
    pub build: VolumeRamp,
    pub peak: VolumeRamp,
    pub taper: VolumeRamp,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            base: VolumeRamp { start: 70.0, end: 85.0 },
            build: VolumeRamp { start: 85.0, end: 95.0 },
            peak: VolumeRamp { start: 100.0, end: 100.0 },
            taper: VolumeRamp { start: 70.0, end: 50.0 },
        }
    }
}

impl VolumeSettings {
    pub fn ramp(&self, phase: Phase) -> VolumeRamp {
        match phase {
            Phase::Base => self.base,
            Phase::Build => self.build,
            Phase::Peak => self.peak,
            Phase::Taper => self.taper,
        }
    }
}

/// Structured-session shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalSettings {
    pub warmup_minutes: f64,
    pub cooldown_minutes: f64,
    pub min_reps: u32,
    pub max_reps: u32,
    /// Long run length relative to the nominal session length
    pub long_run_factor: f64,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            warmup_minutes: 10.0,
            cooldown_minutes: 10.0,
            min_reps: 3,
            max_reps: 12,
            long_run_factor: 2.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| "Failed to parse engine configuration")?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trainrx")
            .join("engine.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(path = %config_path.display(), error = %err, "Using default engine configuration");
                Self::default()
            }
        }
    }

    /// Reject values that would break the algorithms' invariants
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let cp = &self.critical_power;
        if cp.final_window_seconds == 0 || cp.min_samples < cp.final_window_seconds {
            return Err(invalid("critical_power.min_samples", "must cover the final window"));
        }
        if cp.min_samples < cp.pacing_window_seconds * 3 {
            return Err(invalid("critical_power.min_samples", "must cover three pacing windows"));
        }
        if cp.pacing_window_seconds == 0 {
            return Err(invalid("critical_power.pacing_window_seconds", "must be positive"));
        }
        if cp.start_window_seconds == 0 || cp.start_window_seconds > cp.min_samples {
            return Err(invalid(
                "critical_power.start_window_seconds",
                "must be positive and no longer than min_samples",
            ));
        }
        if !(cp.score_excellent >= cp.score_good && cp.score_good >= cp.score_fair) {
            return Err(invalid("critical_power.score_*", "cut-offs must be descending"));
        }
        if self.w_prime.tau_seconds <= 0.0 {
            return Err(invalid("w_prime.tau_seconds", "must be positive"));
        }
        if self.ergometer.power_constant <= 0.0 {
            return Err(invalid("ergometer.power_constant", "must be positive"));
        }
        if self.decoupling.good_below_pct > self.decoupling.fair_below_pct {
            return Err(invalid("decoupling", "good cut-off must not exceed fair cut-off"));
        }
        for methodology in Methodology::ALL {
            let ratio = self.phases.for_methodology(methodology);
            let parts = [ratio.base, ratio.build, ratio.peak, ratio.taper];
            if parts.iter().any(|r| *r <= 0.0) || (ratio.sum() - 1.0).abs() > 0.01 {
                return Err(invalid(
                    &format!("phases.{}", methodology.name()),
                    "ratios must be positive and sum to 1",
                ));
            }
        }
        if self.intervals.min_reps == 0 || self.intervals.min_reps > self.intervals.max_reps {
            return Err(invalid("intervals.min_reps", "must be between 1 and max_reps"));
        }
        if !(self.intervals.long_run_factor.is_finite() && self.intervals.long_run_factor > 0.0) {
            return Err(invalid("intervals.long_run_factor", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [w_prime]
            tau_seconds = 400.0

            [critical_power]
            residual_warning_pct = 7.5
            "#,
        )
        .unwrap();

        assert_eq!(config.w_prime.tau_seconds, 400.0);
        assert_eq!(config.critical_power.residual_warning_pct, 7.5);
        assert_eq!(config.critical_power.min_samples, 150);
        assert_eq!(config.phases.canova.peak, 0.40);
    }

    #[test]
    fn test_invalid_phase_ratio_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [phases.canova]
            base = 0.5
            build = 0.5
            peak = 0.5
            taper = 0.1
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_start_window_longer_than_recording_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [critical_power]
            min_samples = 150
            start_window_seconds = 200
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "critical_power.start_window_seconds"
        ));

        let mut config = EngineConfig::default();
        config.critical_power.start_window_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_long_run_factor_must_be_positive() {
        let result = EngineConfig::from_toml_str(
            r#"
            [intervals]
            long_run_factor = 0.0
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "intervals.long_run_factor"
        ));

        let mut config = EngineConfig::default();
        config.intervals.long_run_factor = -1.5;
        assert!(config.validate().is_err());
        config.intervals.long_run_factor = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = EngineConfig::from_toml_str("[w_prime\ntau_seconds = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("engine.toml");

        let mut config = EngineConfig::default();
        config.decoupling.fair_below_pct = 12.0;
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
