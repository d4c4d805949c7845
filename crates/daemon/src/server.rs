use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use backup_health_core::{BackupHealthResponse, CheckOptions, Severity};
use backup_health_monitor::HealthMonitor;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub monitor: HealthMonitor,
    pub api_token: Option<String>,
}

// --- Template view models ---

struct IssueView {
    severity: &'static str,
    message: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "health.html")]
struct HealthWidget {
    status: &'static str,
    checked_at: String,
    last_backup: String,
    age_display: String,
    files_display: String,
    routes_display: String,
    issues: Vec<IssueView>,
}

fn format_backup_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date.to_owned())
}

impl From<&BackupHealthResponse> for HealthWidget {
    fn from(report: &BackupHealthResponse) -> Self {
        let last = report.last_backup.as_ref();
        let files = last.map(|b| b.files.as_slice()).unwrap_or_default();
        let present = files.iter().filter(|f| f.exists).count();
        let manifest = last.and_then(|b| b.manifest.as_ref());

        HealthWidget {
            status: report.status.as_str(),
            checked_at: report.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            last_backup: last
                .map(|b| format_backup_date(&b.date))
                .unwrap_or_else(|| "none".to_owned()),
            age_display: last
                .and_then(|b| b.age_hours)
                .map(|h| format!("{h:.1}h ago"))
                .unwrap_or_else(|| "unknown".to_owned()),
            files_display: format!("{present} / {} present", files.len()),
            routes_display: manifest
                .map(|m| m.total_routes.to_string())
                .unwrap_or_else(|| "unknown".to_owned()),
            issues: report
                .issues
                .iter()
                .map(|issue| IssueView {
                    severity: match issue.severity {
                        Severity::Warning => "warning",
                        Severity::Critical => "critical",
                    },
                    message: issue.message.clone(),
                })
                .collect(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(widget))
        .route("/api/v1/healthz", get(liveness))
        .route("/api/v1/backup/health", get(backup_health))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
    version: &'static str,
}

/// Process liveness only; says nothing about the backups themselves.
async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Bearer-token gate for the JSON API. Open when no token is configured.
fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), StatusCode> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if bearer == Some(expected) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// `200 OK` for every verdict; the health state lives in the body. Only an
/// unusable request (bad token, unparsable or inconsistent thresholds) fails.
async fn backup_health(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(options): Query<CheckOptions>,
) -> Result<Json<BackupHealthResponse>, (StatusCode, String)> {
    authorize(state.api_token.as_deref(), &headers).map_err(|code| (code, String::new()))?;
    match state.monitor.check(&options).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!(error = %e, "rejected threshold overrides");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn widget(State(state): State<AppState>) -> Result<HealthWidget, StatusCode> {
    let report = state
        .monitor
        .check(&CheckOptions::default())
        .await
        .map_err(|e| {
            error!(error = %e, "configured thresholds are invalid");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(HealthWidget::from(&report))
}
