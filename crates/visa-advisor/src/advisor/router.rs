use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{AdvisorError, InputProfile, JobCategory, Nationality, Route, VisaKey};
use super::eligibility::Exclusion;
use super::explainer::DEFAULT_MAX_TAGS;
use super::scoring::{Ranking, Recommendation};
use super::service::{AssessmentRequest, VisaAdvisor};
use super::tables::CatalogEntry;
use crate::error::AppError;

/// Router exposing the advisor operations under `/api/v1/advisor`.
pub fn advisor_router(advisor: Arc<VisaAdvisor>) -> Router {
    Router::new()
        .route("/api/v1/advisor/catalog", get(catalog_handler))
        .route("/api/v1/advisor/eligibility", post(eligibility_handler))
        .route("/api/v1/advisor/rank", post(rank_handler))
        .route("/api/v1/advisor/explain", post(explain_handler))
        .route("/api/v1/advisor/cost", post(cost_handler))
        .route("/api/v1/advisor/tco", post(tco_handler))
        .route("/api/v1/advisor/timeline", post(timeline_handler))
        .route("/api/v1/advisor/assessment", post(assessment_handler))
        .with_state(advisor)
}

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub version: String,
    pub unit: String,
    pub candidates: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct EligibilityView {
    pub eligible: Vec<VisaKey>,
    pub excluded: Vec<ExclusionView>,
}

#[derive(Debug, Serialize)]
pub struct ExclusionView {
    #[serde(flatten)]
    pub exclusion: Exclusion,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct RankingView {
    #[serde(flatten)]
    pub ranking: Ranking,
    pub recommendation: Recommendation,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub candidate: VisaKey,
    #[serde(default)]
    pub profile: InputProfile,
    #[serde(default)]
    pub max_tags: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CostRequest {
    pub candidate: VisaKey,
    pub headcount: u32,
    #[serde(default)]
    pub nationality: Option<Nationality>,
    pub horizon_months: u32,
}

#[derive(Debug, Deserialize)]
pub struct TcoRequest {
    pub candidate: VisaKey,
    pub job_category: JobCategory,
    pub headcount: u32,
    pub horizon_months: u32,
    #[serde(default)]
    pub nationality: Option<Nationality>,
}

/// Assessment body as sent over HTTP; omitted fields take the advisor defaults.
#[derive(Debug, Deserialize)]
pub struct AssessmentPayload {
    #[serde(default)]
    pub profile: InputProfile,
    #[serde(default)]
    pub selected: Option<VisaKey>,
    #[serde(default)]
    pub horizon_months: Option<u32>,
    #[serde(default)]
    pub decided_on: Option<NaiveDate>,
    #[serde(default)]
    pub route: Option<Route>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineRequest {
    pub candidate: VisaKey,
    pub route: Route,
    #[serde(default)]
    pub decided_on: Option<NaiveDate>,
}

fn error_response(error: AdvisorError) -> Response {
    AppError::from(error).into_response()
}

fn respond<T: Serialize>(result: Result<T, AdvisorError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn catalog_handler(State(advisor): State<Arc<VisaAdvisor>>) -> Response {
    let tables = advisor.tables();
    let view = CatalogView {
        version: tables.version.clone(),
        unit: tables.unit.clone(),
        candidates: tables.candidates().to_vec(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn eligibility_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(profile): Json<InputProfile>,
) -> Response {
    if let Err(error) = profile.validate() {
        return error_response(error);
    }
    let screening = advisor.screen(&profile);
    let view = EligibilityView {
        eligible: screening
            .eligible
            .iter()
            .map(|entry| entry.key.clone())
            .collect(),
        excluded: screening
            .excluded
            .into_iter()
            .map(|exclusion| ExclusionView {
                summary: exclusion.reason.summary(),
                exclusion,
            })
            .collect(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn rank_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(profile): Json<InputProfile>,
) -> Response {
    if let Err(error) = profile.validate() {
        return error_response(error);
    }
    let ranking = advisor.rank_candidates(&profile);
    let recommendation = ranking.recommendation();
    (
        StatusCode::OK,
        Json(RankingView {
            ranking,
            recommendation,
        }),
    )
        .into_response()
}

pub(crate) async fn explain_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(request): Json<ExplainRequest>,
) -> Response {
    let max_tags = request.max_tags.unwrap_or(DEFAULT_MAX_TAGS);
    respond(advisor.explain_candidate_with(&request.candidate, &request.profile, max_tags))
}

pub(crate) async fn cost_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(request): Json<CostRequest>,
) -> Response {
    respond(advisor.project_cost(
        &request.candidate,
        request.headcount,
        request.nationality,
        request.horizon_months,
    ))
}

pub(crate) async fn tco_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(request): Json<TcoRequest>,
) -> Response {
    respond(advisor.compare_tco(
        &request.candidate,
        request.job_category,
        request.headcount,
        request.horizon_months,
        request.nationality,
    ))
}

pub(crate) async fn timeline_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(request): Json<TimelineRequest>,
) -> Response {
    let decided_on = request
        .decided_on
        .unwrap_or_else(|| Local::now().date_naive());
    respond(advisor.project_timeline(&request.candidate, request.route, decided_on))
}

pub(crate) async fn assessment_handler(
    State(advisor): State<Arc<VisaAdvisor>>,
    Json(payload): Json<AssessmentPayload>,
) -> Response {
    let request = AssessmentRequest {
        profile: payload.profile,
        selected: payload.selected,
        horizon_months: payload
            .horizon_months
            .unwrap_or_else(|| advisor.default_horizon_months()),
        decided_on: payload
            .decided_on
            .unwrap_or_else(|| Local::now().date_naive()),
        route: payload.route,
    };
    respond(advisor.assess(&request))
}
