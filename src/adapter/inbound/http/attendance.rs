//! Marking and removing attendance, and attendance history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::error::ApiError;
use super::extract::{JsonBody, QueryParams};
use super::{ApiResult, AppState};
use crate::application::{AttendanceOutcome, MarkAttendance};
use crate::domain::{Attendance, AttendanceId, BusinessId, ClassId, Package, PackageId, UserId};
use crate::port::AttendanceQuery;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub student_id: Option<UserId>,
}

/// Business-wide history, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    QueryParams(query): QueryParams<HistoryQuery>,
) -> ApiResult<Vec<Attendance>> {
    let query = AttendanceQuery {
        student_id: query.student_id,
        ..AttendanceQuery::default()
    };
    Ok(Json(
        state.services.attendance.history(&business, &query).await?,
    ))
}

pub async fn mark(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(request): JsonBody<MarkAttendance>,
) -> Result<(StatusCode, Json<AttendanceOutcome>), ApiError> {
    let outcome = state.services.attendance.mark(&business, request).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Returns the refunded package.
pub async fn remove(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, AttendanceId)>,
) -> ApiResult<Package> {
    Ok(Json(
        state.services.attendance.remove(&business, &id).await?,
    ))
}

pub async fn for_class(
    State(state): State<AppState>,
    Path((business, class)): Path<(BusinessId, ClassId)>,
) -> ApiResult<Vec<Attendance>> {
    state
        .services
        .scheduling
        .get_class(&business, &class)
        .await?;
    let query = AttendanceQuery {
        class_id: Some(class),
        ..AttendanceQuery::default()
    };
    Ok(Json(
        state.services.attendance.history(&business, &query).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct MarkForClassBody {
    pub student_id: UserId,
    #[serde(default)]
    pub package_id: Option<PackageId>,
    pub recorded_by: UserId,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn mark_for_class(
    State(state): State<AppState>,
    Path((business, class)): Path<(BusinessId, ClassId)>,
    JsonBody(body): JsonBody<MarkForClassBody>,
) -> Result<(StatusCode, Json<AttendanceOutcome>), ApiError> {
    let request = MarkAttendance {
        class_id: class,
        student_id: body.student_id,
        package_id: body.package_id,
        recorded_by: body.recorded_by,
        notes: body.notes,
    };
    let outcome = state.services.attendance.mark(&business, request).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
