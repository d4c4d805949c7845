use backup_health_core::{AgeStatus, HealthIssue, Thresholds};
use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours elapsed between the manifest timestamp (epoch millis) and `now`.
///
/// The timestamp is producer-supplied; differences outside `i64` saturate,
/// so an absurdly old timestamp classifies as critical.
pub fn age_hours(now: DateTime<Utc>, timestamp_ms: i64) -> f64 {
    now.timestamp_millis().saturating_sub(timestamp_ms) as f64 / MILLIS_PER_HOUR
}

/// Both boundaries are inclusive on the better side: an age equal to a
/// threshold still classifies below it.
pub fn classify_age(age_hours: f64, thresholds: &Thresholds) -> AgeStatus {
    if age_hours > thresholds.critical_age_hours {
        AgeStatus::Critical
    } else if age_hours > thresholds.warning_age_hours {
        AgeStatus::Warning
    } else {
        AgeStatus::Ok
    }
}

pub fn age_issue(age_hours: f64, status: AgeStatus, thresholds: &Thresholds) -> Option<HealthIssue> {
    let hours = age_hours.round() as i64;
    match status {
        AgeStatus::Ok => None,
        AgeStatus::Warning => Some(HealthIssue::warning(format!(
            "Backup is {hours} hours old (expected within {}h)",
            thresholds.warning_age_hours
        ))),
        AgeStatus::Critical => Some(HealthIssue::critical(format!(
            "Backup is {hours} hours old (critical after {}h)",
            thresholds.critical_age_hours
        ))),
    }
}

/// Route-count dips are a data-quality signal and never raise above warning.
pub fn route_count_issue(total_routes: i64, thresholds: &Thresholds) -> Option<HealthIssue> {
    if total_routes >= thresholds.min_expected_routes {
        return None;
    }
    Some(HealthIssue::warning(format!(
        "Route count {total_routes} is below expected minimum {}",
        thresholds.min_expected_routes
    )))
}
