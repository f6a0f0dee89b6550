//! Critical Power modelling
//!
//! Two ways to estimate CP and W′ (the 3-minute all-out test and a
//! multi-trial work/time regression), W′ balance tracking with exponential
//! reconstitution, and time-to-exhaustion above CP.
//!
//! Implausible results never fail: they are scored down and carry warnings.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::CriticalPowerSettings;
use crate::error::EstimatorError;
use crate::models::{Confidence, ModelFit};

/// How a CP model was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpMethod {
    /// Single 3-minute maximal effort
    ThreeMinuteTest,
    /// Linear regression of work on duration over several trials
    MultiTrial,
}

/// Critical Power model with its quality assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpModelResult {
    pub method: CpMethod,
    /// Critical Power (W)
    pub critical_power: f64,
    /// W′ (J); may be negative, in which case a warning is attached
    pub w_prime: f64,
    /// 0-100
    pub quality_score: f64,
    pub model_fit: ModelFit,
    pub confidence: Confidence,
    pub r_squared: Option<f64>,
    pub warnings: Vec<String>,
}

/// One maximal time trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeTrial {
    pub duration_seconds: f64,
    pub average_power: f64,
}

impl TimeTrial {
    pub fn new(duration_seconds: f64, average_power: f64) -> Self {
        Self {
            duration_seconds,
            average_power,
        }
    }
}

/// W′ balance series over an effort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WPrimeBalance {
    /// Balance (J) after each sample
    pub balance: Vec<f64>,
    /// Most depleted point
    pub min_balance: f64,
    /// Time spent with W′ fully depleted (seconds)
    pub seconds_depleted: f64,
}

/// Predicted sustainable duration at a target power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeToExhaustion {
    Finite { seconds: f64 },
    /// At or below CP
    Unbounded,
}

impl TimeToExhaustion {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TimeToExhaustion::Finite { seconds } => Some(*seconds),
            TimeToExhaustion::Unbounded => None,
        }
    }
}

/// Critical Power analyzer
pub struct PowerAnalyzer;

impl PowerAnalyzer {
    /// Estimate CP and W′ from one-second samples of a 3-minute all-out test
    pub fn three_minute_test(
        samples: &[f64],
        settings: &CriticalPowerSettings,
    ) -> Result<CpModelResult, EstimatorError> {
        const CALC: &str = "3-minute test";

        // Every analysis window has to fit inside the recording
        let required = settings
            .min_samples
            .max(settings.final_window_seconds)
            .max(settings.pacing_window_seconds * 3)
            .max(settings.start_window_seconds);
        if samples.len() < required {
            return Err(EstimatorError::insufficient(CALC, required, samples.len()));
        }
        if settings.final_window_seconds == 0
            || settings.pacing_window_seconds == 0
            || settings.start_window_seconds == 0
        {
            return Err(EstimatorError::invalid(CALC, "window_seconds", 0));
        }
        if let Some(bad) = samples.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(EstimatorError::invalid(CALC, "power", bad));
        }

        let n = samples.len();
        let window = settings.final_window_seconds;
        let critical_power = samples[n - window..].iter().mean();
        let total_work: f64 = samples.iter().sum();
        let w_prime = total_work - critical_power * n as f64;

        let mut score = 100.0;
        let mut warnings = Vec::new();

        // Pacing: opening window should be harder than the middle of the test
        let pacing = settings.pacing_window_seconds;
        let first = samples[..pacing].iter().mean();
        let middle_start = (n / 2).saturating_sub(pacing / 2);
        let middle = samples[middle_start..middle_start + pacing].iter().mean();
        if first <= middle {
            score -= settings.pacing_penalty;
            warnings.push(format!(
                "Pacing: first {}s averaged {:.0} W, not above the middle {}s ({:.0} W)",
                pacing, first, pacing, middle
            ));
        }

        let opening = samples[..settings.start_window_seconds].iter().mean();
        let decay = if opening > 0.0 {
            (opening - critical_power) / opening
        } else {
            0.0
        };
        if decay < settings.min_decay_fraction {
            score -= settings.decay_penalty;
            warnings.push(format!(
                "Power only fell {:.0}% from the opening seconds; the effort may not have been all-out",
                decay * 100.0
            ));
        }

        let peak_second = samples
            .iter()
            .enumerate()
            .fold((0usize, f64::MIN), |best, (i, p)| if *p > best.1 { (i, *p) } else { best })
            .0;
        if peak_second > settings.max_peak_second {
            score -= settings.late_peak_penalty;
            warnings.push(format!("Peak power occurred late, at {}s", peak_second));
        }

        if w_prime < 0.0 {
            warnings.push(format!("Negative W′ ({:.0} J): test data is inconsistent", w_prime));
        }
        if w_prime < settings.w_prime_min_joules || w_prime > settings.w_prime_max_joules {
            score -= settings.w_prime_range_penalty;
            warnings.push(format!(
                "W′ of {:.1} kJ is outside the expected {:.0}-{:.0} kJ range",
                w_prime / 1000.0,
                settings.w_prime_min_joules / 1000.0,
                settings.w_prime_max_joules / 1000.0
            ));
        }

        let quality_score = score.clamp(0.0, 100.0);
        tracing::debug!(critical_power, w_prime, quality_score, "3-minute test evaluated");

        Ok(CpModelResult {
            method: CpMethod::ThreeMinuteTest,
            critical_power,
            w_prime,
            quality_score,
            model_fit: Self::fit_from_score(quality_score, settings),
            confidence: Self::confidence_from_score(
                quality_score,
                settings.score_excellent,
                settings.score_good,
                settings.score_fair,
            ),
            r_squared: None,
            warnings,
        })
    }

    /// Fit CP (slope) and W′ (intercept) by regressing work on duration
    pub fn fit_multi_trial(
        trials: &[TimeTrial],
        settings: &CriticalPowerSettings,
    ) -> Result<CpModelResult, EstimatorError> {
        const CALC: &str = "multi-trial CP";

        if trials.len() < 2 {
            return Err(EstimatorError::insufficient(CALC, 2, trials.len()));
        }
        for trial in trials {
            if !trial.duration_seconds.is_finite() || trial.duration_seconds <= 0.0 {
                return Err(EstimatorError::invalid(CALC, "duration_seconds", trial.duration_seconds));
            }
            if !trial.average_power.is_finite() || trial.average_power <= 0.0 {
                return Err(EstimatorError::invalid(CALC, "average_power", trial.average_power));
            }
        }

        // work = CP * t + W'
        let n = trials.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xx = 0.0;
        let mut sum_xy = 0.0;

        for trial in trials {
            let x = trial.duration_seconds;
            let y = trial.average_power * trial.duration_seconds;
            sum_x += x;
            sum_y += y;
            sum_xx += x * x;
            sum_xy += x * y;
        }

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() < 1e-9 * sum_xx.max(1.0) {
            return Err(EstimatorError::Singular {
                calculation: CALC.to_string(),
                reason: "trials need at least two distinct durations".to_string(),
            });
        }

        let critical_power = (n * sum_xy - sum_x * sum_y) / denominator;
        let w_prime = (sum_y - critical_power * sum_x) / n;

        let mean_y = sum_y / n;
        let mut ss_tot = 0.0;
        let mut ss_res = 0.0;
        for trial in trials {
            let y = trial.average_power * trial.duration_seconds;
            let predicted = critical_power * trial.duration_seconds + w_prime;
            ss_tot += (y - mean_y).powi(2);
            ss_res += (y - predicted).powi(2);
        }
        let r_squared = if ss_tot > 0.0 {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        if w_prime < 0.0 {
            warnings.push(format!("Negative W′ ({:.0} J): trials are inconsistent", w_prime));
        }
        for trial in trials {
            let predicted = critical_power + w_prime / trial.duration_seconds;
            if predicted > 0.0 {
                let deviation = (trial.average_power - predicted).abs() / predicted * 100.0;
                if deviation > settings.residual_warning_pct {
                    warnings.push(format!(
                        "{:.0}s trial at {:.0} W deviates {:.1}% from the model ({:.0} W)",
                        trial.duration_seconds, trial.average_power, deviation, predicted
                    ));
                }
            }
        }

        let shortest = trials
            .iter()
            .map(|t| t.duration_seconds)
            .fold(f64::INFINITY, f64::min);
        let longest = trials
            .iter()
            .map(|t| t.duration_seconds)
            .fold(0.0, f64::max);
        let spread = longest / shortest;

        let mut score = settings.r_squared_weight * r_squared;
        if trials.len() >= 3 {
            score += settings.trial_count_bonus;
        }
        if trials.len() >= 4 {
            score += settings.trial_count_bonus;
        }
        if spread >= 3.0 {
            score += settings.duration_spread_bonus;
        }
        if spread >= 4.0 {
            score += settings.duration_spread_bonus;
        }
        let quality_score = score.clamp(0.0, 100.0);

        let model_fit = if r_squared >= settings.r_squared_excellent {
            ModelFit::Excellent
        } else if r_squared >= settings.r_squared_good {
            ModelFit::Good
        } else if r_squared >= settings.r_squared_fair {
            ModelFit::Fair
        } else {
            ModelFit::Poor
        };

        tracing::debug!(critical_power, w_prime, r_squared, quality_score, "CP regression fitted");

        Ok(CpModelResult {
            method: CpMethod::MultiTrial,
            critical_power,
            w_prime,
            quality_score,
            model_fit,
            confidence: Self::confidence_from_score(
                quality_score,
                settings.regression_high,
                settings.regression_medium,
                settings.regression_low,
            ),
            r_squared: Some(r_squared),
            warnings,
        })
    }

    /// Track W′ balance over evenly spaced samples.
    ///
    /// Above CP the balance drains by (P − CP)·dt; at or below CP it recovers
    /// exponentially toward W′ with time constant `tau_seconds`.
    pub fn w_prime_balance(
        samples: &[f64],
        sample_interval_seconds: f64,
        critical_power: f64,
        w_prime: f64,
        tau_seconds: f64,
    ) -> Result<WPrimeBalance, EstimatorError> {
        const CALC: &str = "W′ balance";

        if !critical_power.is_finite() || critical_power <= 0.0 {
            return Err(EstimatorError::invalid(CALC, "critical_power", critical_power));
        }
        if !w_prime.is_finite() || w_prime <= 0.0 {
            return Err(EstimatorError::invalid(CALC, "w_prime", w_prime));
        }
        if !sample_interval_seconds.is_finite() || sample_interval_seconds <= 0.0 {
            return Err(EstimatorError::invalid(CALC, "sample_interval_seconds", sample_interval_seconds));
        }
        if !tau_seconds.is_finite() || tau_seconds <= 0.0 {
            return Err(EstimatorError::invalid(CALC, "tau_seconds", tau_seconds));
        }

        let dt = sample_interval_seconds;
        let recovery_fraction = 1.0 - (-dt / tau_seconds).exp();

        let mut current = w_prime;
        let mut balance = Vec::with_capacity(samples.len());
        let mut min_balance = w_prime;
        let mut seconds_depleted = 0.0;

        for &power in samples {
            if power > critical_power {
                current -= (power - critical_power) * dt;
            } else {
                current += (w_prime - current) * recovery_fraction;
            }
            current = current.clamp(0.0, w_prime);

            if current <= 0.0 {
                seconds_depleted += dt;
            }
            min_balance = min_balance.min(current);
            balance.push(current);
        }

        Ok(WPrimeBalance {
            balance,
            min_balance,
            seconds_depleted,
        })
    }

    /// Hyperbolic model: t = W′ / (P − CP) above CP, unbounded otherwise
    pub fn time_to_exhaustion(
        critical_power: f64,
        w_prime_available: f64,
        target_power: f64,
    ) -> Result<TimeToExhaustion, EstimatorError> {
        const CALC: &str = "time to exhaustion";

        if !critical_power.is_finite() || critical_power <= 0.0 {
            return Err(EstimatorError::invalid(CALC, "critical_power", critical_power));
        }
        if !target_power.is_finite() || target_power < 0.0 {
            return Err(EstimatorError::invalid(CALC, "target_power", target_power));
        }
        if !w_prime_available.is_finite() {
            return Err(EstimatorError::invalid(CALC, "w_prime", w_prime_available));
        }

        if target_power <= critical_power {
            return Ok(TimeToExhaustion::Unbounded);
        }

        Ok(TimeToExhaustion::Finite {
            seconds: w_prime_available.max(0.0) / (target_power - critical_power),
        })
    }

    fn fit_from_score(score: f64, settings: &CriticalPowerSettings) -> ModelFit {
        if score >= settings.score_excellent {
            ModelFit::Excellent
        } else if score >= settings.score_good {
            ModelFit::Good
        } else if score >= settings.score_fair {
            ModelFit::Fair
        } else {
            ModelFit::Poor
        }
    }

    fn confidence_from_score(score: f64, high: f64, medium: f64, low: f64) -> Confidence {
        if score >= high {
            Confidence::High
        } else if score >= medium {
            Confidence::Medium
        } else if score >= low {
            Confidence::Low
        } else {
            Confidence::VeryLow
        }
    }
}
