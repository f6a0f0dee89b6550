//! Human-readable formatting for paces, splits, durations and distances

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// km/h → "m:ss/km"
pub fn pace_per_km(speed_kmh: f64) -> String {
    if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return "--:--/km".to_string();
    }
    format!("{}/km", clock(3600.0 / speed_kmh))
}

/// Seconds → "m:ss" (or "h:mm:ss" past the hour), rounded to whole seconds
pub fn clock(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Split time keeping tenths, e.g. "1:52.4" for an ergometer pace
pub fn split(seconds: f64) -> String {
    let tenths = (seconds * 10.0).round().max(0.0) as u64;
    let minutes = tenths / 600;
    let rem = tenths % 600;
    format!("{}:{:02}.{}", minutes, rem / 10, rem % 10)
}

/// Minutes → "45 min" or "1h 30min"
pub fn duration_minutes(minutes: f64) -> String {
    let total = minutes.round().max(0.0) as u64;
    if total >= 60 {
        let hours = total / 60;
        let mins = total % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}min", hours, mins)
        }
    } else {
        format!("{} min", total)
    }
}

/// Kilometres rounded to two places
pub fn km_decimal(km: f64) -> Decimal {
    Decimal::from_f64(km)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

/// "12.40 km"
pub fn distance_km(km: Decimal) -> String {
    format!("{:.2} km", km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pace_per_km() {
        assert_eq!(pace_per_km(12.0), "5:00/km");
        assert_eq!(pace_per_km(15.0), "4:00/km");
        assert_eq!(pace_per_km(0.0), "--:--/km");
    }

    #[test]
    fn test_clock() {
        assert_eq!(clock(1200.0), "20:00");
        assert_eq!(clock(3725.4), "1:02:05");
    }

    #[test]
    fn test_split() {
        assert_eq!(split(112.44), "1:52.4");
        assert_eq!(split(90.0), "1:30.0");
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(duration_minutes(45.0), "45 min");
        assert_eq!(duration_minutes(90.0), "1h 30min");
        assert_eq!(duration_minutes(120.0), "2h");
    }

    #[test]
    fn test_km_decimal() {
        assert_eq!(km_decimal(12.3456), dec!(12.35));
        assert_eq!(distance_km(dec!(8.5)), "8.50 km");
    }
}
