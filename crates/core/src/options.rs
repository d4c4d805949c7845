use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WARNING_AGE_HOURS: f64 = 25.0;
pub const DEFAULT_CRITICAL_AGE_HOURS: f64 = 26.0;
pub const DEFAULT_MIN_EXPECTED_ROUTES: i64 = 100;

/// Fully resolved evaluation thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub warning_age_hours: f64,
    pub critical_age_hours: f64,
    pub min_expected_routes: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning_age_hours: DEFAULT_WARNING_AGE_HOURS,
            critical_age_hours: DEFAULT_CRITICAL_AGE_HOURS,
            min_expected_routes: DEFAULT_MIN_EXPECTED_ROUTES,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("warningAgeHours must be a positive finite number, got {0}")]
    WarningAge(f64),
    #[error("criticalAgeHours ({critical}) must be a finite number greater than warningAgeHours ({warning})")]
    CriticalAge { warning: f64, critical: f64 },
}

impl Thresholds {
    /// NaN or infinite hours would make every age comparison false, so they
    /// are rejected along with a critical threshold at or below the warning one.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let warning = self.warning_age_hours;
        let critical = self.critical_age_hours;
        if !warning.is_finite() || warning <= 0.0 {
            return Err(ThresholdError::WarningAge(warning));
        }
        if !critical.is_finite() || critical <= warning {
            return Err(ThresholdError::CriticalAge { warning, critical });
        }
        Ok(())
    }
}

/// Per-call overrides. Unset fields fall back to the base [`Thresholds`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckOptions {
    pub warning_age_hours: Option<f64>,
    pub critical_age_hours: Option<f64>,
    pub min_expected_routes: Option<i64>,
}

impl CheckOptions {
    /// Merges the overrides onto `base` and validates the result.
    pub fn resolve(&self, base: &Thresholds) -> Result<Thresholds, ThresholdError> {
        let resolved = Thresholds {
            warning_age_hours: self.warning_age_hours.unwrap_or(base.warning_age_hours),
            critical_age_hours: self.critical_age_hours.unwrap_or(base.critical_age_hours),
            min_expected_routes: self.min_expected_routes.unwrap_or(base.min_expected_routes),
        };
        resolved.validate()?;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_options_keep_base_values() {
        let base = Thresholds::default();
        assert_eq!(CheckOptions::default().resolve(&base), Ok(base));
    }

    #[test]
    fn set_options_override_individually() {
        let options = CheckOptions {
            warning_age_hours: Some(30.0),
            ..CheckOptions::default()
        };
        let resolved = options.resolve(&Thresholds::default()).expect("valid");
        assert_eq!(resolved.warning_age_hours, 30.0);
        assert_eq!(resolved.critical_age_hours, DEFAULT_CRITICAL_AGE_HOURS);
        assert_eq!(resolved.min_expected_routes, DEFAULT_MIN_EXPECTED_ROUTES);
    }

    #[test]
    fn rejects_non_finite_overrides() {
        let base = Thresholds::default();
        let nan = CheckOptions {
            warning_age_hours: Some(f64::NAN),
            critical_age_hours: Some(f64::NAN),
            ..CheckOptions::default()
        };
        assert!(matches!(nan.resolve(&base), Err(ThresholdError::WarningAge(_))));

        let infinite_critical = CheckOptions {
            critical_age_hours: Some(f64::INFINITY),
            ..CheckOptions::default()
        };
        assert!(matches!(
            infinite_critical.resolve(&base),
            Err(ThresholdError::CriticalAge { .. })
        ));
    }

    #[test]
    fn rejects_critical_at_or_below_warning() {
        let base = Thresholds::default();
        let equal = CheckOptions {
            warning_age_hours: Some(30.0),
            critical_age_hours: Some(30.0),
            ..CheckOptions::default()
        };
        assert_eq!(
            equal.resolve(&base),
            Err(ThresholdError::CriticalAge { warning: 30.0, critical: 30.0 })
        );

        // Raising only the warning threshold past the base critical one is also invalid.
        let lopsided = CheckOptions {
            warning_age_hours: Some(40.0),
            ..CheckOptions::default()
        };
        assert!(lopsided.resolve(&base).is_err());
    }

    #[test]
    fn deserializes_camel_case_query_shape() {
        let options: CheckOptions =
            serde_json::from_str(r#"{"minExpectedRoutes": 5}"#).expect("deserialize");
        assert_eq!(options.min_expected_routes, Some(5));
        assert!(options.warning_age_hours.is_none());
    }
}
