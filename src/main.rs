use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use student_insight::config::AppConfig;
use student_insight::error::AppError;
use student_insight::ingest;
use student_insight::profiling::domain::{
    Cat4Domain, CohortSummary, PassFactor, StudentRecord, TriangulatedProfile,
};
use student_insight::profiling::risk::{predict_risk, RiskPrediction};
use student_insight::profiling::{summarize_cohort, ProfileEngine, ThresholdConfig};
use student_insight::telemetry;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Student Insight",
    about = "Triangulate PASS, CAT4, and academic assessments into student profiles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Profile a roster CSV and print the findings
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Roster CSV to profile
    #[arg(long)]
    roster: PathBuf,
    /// Limit the report to one student id
    #[arg(long)]
    student: Option<String>,
    /// Emit the full profiles as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct ProfileRequest {
    record: StudentRecord,
    #[serde(default)]
    include_prediction: bool,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    profile: TriangulatedProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<RiskPrediction>,
}

#[derive(Debug, Deserialize)]
struct CohortRequest {
    roster_csv: String,
}

#[derive(Debug, Serialize)]
struct CohortResponse {
    summary: CohortSummary,
    profiles: Vec<TriangulatedProfile>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Analyze(args) => run_analyze(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/students/profile", post(profile_endpoint))
        .route("/api/v1/cohort/analyze", post(cohort_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "student insight service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        roster,
        student,
        json,
    } = args;

    let config = AppConfig::load()?;
    let mut records = ingest::read_roster(&roster)?;
    if let Some(id) = &student {
        records.retain(|record| &record.student_id == id);
    }

    let engine = ProfileEngine::new(ThresholdConfig::instruction_set());
    let profiles = engine.profile_cohort(&records);

    if json {
        let summary = summarize_cohort(&profiles);
        let payload = json!({ "summary": summary, "profiles": profiles });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", cohort_report(&config.report.school_name, &profiles));
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn profile_endpoint(
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let ProfileRequest {
        record,
        include_prediction,
    } = payload;

    let engine = ProfileEngine::default();
    let profile = engine.profile(&record);
    let prediction =
        include_prediction.then(|| predict_risk(&profile, &[], engine.thresholds()));

    Ok(Json(ProfileResponse {
        profile,
        prediction,
    }))
}

async fn cohort_endpoint(
    Json(payload): Json<CohortRequest>,
) -> Result<Json<CohortResponse>, AppError> {
    let reader = Cursor::new(payload.roster_csv.into_bytes());
    let records = ingest::parse_roster(reader)?;

    let engine = ProfileEngine::default();
    let profiles = engine.profile_cohort(&records);
    let summary = summarize_cohort(&profiles);

    Ok(Json(CohortResponse { summary, profiles }))
}

fn cohort_report(school_name: &str, profiles: &[TriangulatedProfile]) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Student profiling report - {school_name}");
    let _ = writeln!(out, "Students profiled: {}", profiles.len());

    let summary = summarize_cohort(profiles);
    let _ = writeln!(out, "\nGrade overview");
    for (grade, grade_summary) in &summary.grade_levels {
        let _ = writeln!(
            out,
            "- Grade {}: {} students, {} high risk, {} medium risk, {} fragile learners",
            grade,
            grade_summary.students,
            grade_summary.high_risk,
            grade_summary.medium_risk,
            grade_summary.fragile_learners
        );
    }

    for profile in profiles {
        let _ = writeln!(out, "\n{} ({})", profile.name, profile.student_id);
        let _ = writeln!(
            out,
            "  Grade {}{} | risk: {:?} | fragile learner: {:?}",
            profile.grade,
            profile
                .section
                .as_deref()
                .map(|s| format!(" section {s}"))
                .unwrap_or_default(),
            profile.risk_profile,
            profile.fragile_learner
        );

        if let Some(pass) = &profile.pass {
            let _ = writeln!(
                out,
                "  PASS factors reported: {} of {}",
                pass.factors.len(),
                PassFactor::ALL.len()
            );
            for risk in &pass.risk_areas {
                let _ = writeln!(
                    out,
                    "  - {} is {} at percentile {:.0}. {}",
                    risk.factor.label(),
                    risk.level.as_str(),
                    risk.percentile,
                    risk.factor.description()
                );
            }
        }

        if let Some(cat4) = &profile.cat4 {
            let _ = writeln!(
                out,
                "  CAT4 batteries reported: {} of {}",
                cat4.domains.len(),
                Cat4Domain::ALL.len()
            );
            for weakness in &cat4.weakness_areas {
                let _ = writeln!(
                    out,
                    "  - {} is a {} at SAS {:.0}. {}",
                    weakness.domain.label(),
                    weakness.level.as_str(),
                    weakness.sas,
                    weakness.domain.description()
                );
            }
        }

        if profile.top_weaknesses.is_empty() {
            let _ = writeln!(out, "  Priority areas: none");
        } else {
            let _ = writeln!(out, "  Priority areas");
            for weakness in &profile.top_weaknesses {
                let _ = writeln!(
                    out,
                    "  - [{}] {} ({}, score {:.1})",
                    weakness.domain.label(),
                    weakness.name,
                    weakness.kind,
                    weakness.score
                );
            }
        }

        if !profile.top_strengths.is_empty() {
            let _ = writeln!(out, "  Strengths");
            for strength in &profile.top_strengths {
                let _ = writeln!(
                    out,
                    "  - [{}] {} ({}, score {:.1})",
                    strength.domain.label(),
                    strength.name,
                    strength.kind,
                    strength.score
                );
            }
        }

        if profile.interventions.is_empty() {
            let _ = writeln!(out, "  Interventions: none recommended");
        } else {
            let _ = writeln!(out, "  Interventions");
            for intervention in &profile.interventions {
                let _ = writeln!(
                    out,
                    "  - [{}] {} (trigger: {})",
                    intervention.priority.as_str(),
                    intervention.title,
                    intervention.trigger
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::collections::BTreeMap;
    use student_insight::profiling::domain::{Cat4Score, RiskBand};
    use tower::ServiceExt;

    fn sample_record() -> StudentRecord {
        let mut record = StudentRecord::new("S001", "Amina Khalid", "7");
        record.pass_percentiles = BTreeMap::from([
            (PassFactor::SelfRegard, 30.0),
            (PassFactor::GeneralWorkEthic, 70.0),
        ]);
        record
    }

    #[tokio::test]
    async fn health_and_readiness_routes_respond() {
        let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: prometheus_handle,
        };
        let app = Router::new()
            .route("/health", get(healthcheck))
            .route("/ready", get(readiness_endpoint))
            .layer(prometheus_layer)
            .with_state(state);

        let health = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");
        assert_eq!(health.status(), StatusCode::OK);

        let ready = app
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn profile_endpoint_returns_a_profile() {
        let request = ProfileRequest {
            record: sample_record(),
            include_prediction: false,
        };

        let Json(body) = super::profile_endpoint(Json(request))
            .await
            .expect("profile builds");

        assert_eq!(body.profile.student_id, "S001");
        assert!(body.profile.pass.is_some());
        assert!(body.prediction.is_none());
    }

    #[tokio::test]
    async fn profile_endpoint_can_include_a_prediction() {
        let request = ProfileRequest {
            record: sample_record(),
            include_prediction: true,
        };

        let Json(body) = super::profile_endpoint(Json(request))
            .await
            .expect("profile builds");

        let prediction = body.prediction.expect("prediction returned");
        assert!(!prediction.recommendations.is_empty());
    }

    #[tokio::test]
    async fn cohort_endpoint_profiles_a_roster() {
        let request = CohortRequest {
            roster_csv: "student_id,name,grade,pass:self_regard,English\nS001,Amina Khalid,7,30,3\nS002,Ben Okafor,7,80,8\n".to_string(),
        };

        let Json(body) = super::cohort_endpoint(Json(request))
            .await
            .expect("cohort builds");

        assert_eq!(body.summary.total_students, 2);
        assert_eq!(body.profiles.len(), 2);
        assert_eq!(body.profiles[1].risk_profile, RiskBand::Low);
    }

    #[test]
    fn cohort_report_details_levels_and_descriptions() {
        let mut record = sample_record();
        record.cat4_scores = BTreeMap::from([(Cat4Domain::Verbal, Cat4Score::Sas(85.0))]);

        let engine = ProfileEngine::default();
        let profiles = engine.profile_cohort(&[record]);
        let report = cohort_report("Falcon Academy", &profiles);

        assert!(report.contains("Falcon Academy"));
        assert!(report.contains("PASS factors reported: 2 of 11"));
        assert!(report.contains("CAT4 batteries reported: 1 of 4"));
        assert!(report.contains("Self-Regard is at-risk at percentile 30"));
        assert!(report.contains("How positive the student feels about themselves"));
        assert!(report.contains("Verbal Reasoning is a weakness at SAS 85"));
        assert!(report.contains("analyze words"));
        assert!(report.contains("- [PASS]"));
        assert!(report.contains("- [high]") || report.contains("- [medium]"));
    }

    #[tokio::test]
    async fn cohort_endpoint_rejects_a_malformed_roster() {
        let request = CohortRequest {
            roster_csv: "name,grade\nAmina,7\n".to_string(),
        };

        let err = super::cohort_endpoint(Json(request))
            .await
            .expect_err("missing column rejected");
        assert!(matches!(err, AppError::Ingest(_)));
    }
}
