//! `grades` component group: transcripts, class grade tables, distributions
//! and grade entry.
//!
//! GET /api/v1/grades/student/{sid}                    - transcript
//! GET /api/v1/grades/class/{tcid}?sort=..&order=..    - sorted grade table
//! GET /api/v1/grades/class/{tcid}/distribution        - counts per band
//! PUT /api/v1/grades/student/{sid}/course/{cid}       - enter scores (auth)

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use gradebook_types::error::AuthError;
use gradebook_types::grade::{
    Distribution, GradeRecord, GradeRow, ScoreSheet, SortDirection, SortKey, TranscriptRow,
};
use gradebook_types::outcome::Outcome;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub tcid: String,
    pub students: usize,
    pub bands: Distribution,
}

#[derive(Debug, Serialize)]
pub struct ScoreEntryResponse {
    pub outcome: Outcome,
    pub record: GradeRecord,
}

pub async fn transcript(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<ApiResponse<Vec<TranscriptRow>>, AppError> {
    let start = Instant::now();
    let rows = state.gradebook.grades().transcript(&sid).await?;
    Ok(ApiResponse::success(rows, start))
}

pub async fn class_table(
    State(state): State<AppState>,
    Path(tcid): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<ApiResponse<Vec<GradeRow>>, AppError> {
    let start = Instant::now();
    let key: SortKey = query
        .sort
        .as_deref()
        .unwrap_or("sid")
        .parse()
        .map_err(AppError::Validation)?;
    let direction: SortDirection = match query.order.as_deref() {
        Some(order) => order.parse().map_err(AppError::Validation)?,
        None => SortDirection::default(),
    };

    let rows = state
        .gradebook
        .grades()
        .sorted_grade_table(&tcid, key, direction)
        .await?;
    Ok(ApiResponse::success(rows, start))
}

pub async fn class_distribution(
    State(state): State<AppState>,
    Path(tcid): Path<String>,
) -> Result<ApiResponse<DistributionResponse>, AppError> {
    let start = Instant::now();
    let bands = state.gradebook.grades().distribution(&tcid).await?;
    Ok(ApiResponse::success(
        DistributionResponse {
            tcid,
            students: bands.total(),
            bands,
        },
        start,
    ))
}

/// Components missing from the body keep their stored value.
pub async fn enter_scores(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path((sid, cid)): Path<(String, String)>,
    Json(scores): Json<ScoreSheet>,
) -> Result<ApiResponse<ScoreEntryResponse>, AppError> {
    let start = Instant::now();
    let grades = state.gradebook.grades();

    if !grades
        .can_grade_student(&session.user_id, session.role, &sid, &cid)
        .await?
    {
        return Err(AuthError::Forbidden(format!(
            "{} does not teach {sid} in {cid}",
            session.user_id
        ))
        .into());
    }

    let record = grades.record_scores(&sid, &cid, scores).await?;
    tracing::info!(by = %session.user_id, sid, cid, "scores entered over HTTP");
    Ok(ApiResponse::success(
        ScoreEntryResponse {
            outcome: Outcome::success(format!("total for {sid} in {cid} is {:.2}", record.total)),
            record,
        },
        start,
    ))
}
