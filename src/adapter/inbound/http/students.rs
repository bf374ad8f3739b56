//! Student roster and the student-facing views: packages, upcoming classes,
//! self check-in and attendance history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::error::ApiError;
use super::extract::{JsonBody, QueryParams};
use super::{ApiResult, AppState};
use crate::application::{AttendanceOutcome, UpcomingClass};
use crate::domain::user::ProfileFields;
use crate::domain::{Attendance, BusinessId, ClassId, ClassTypeId, Package, User, UserId};
use crate::port::AttendanceQuery;

pub async fn list(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
) -> ApiResult<Vec<User>> {
    Ok(Json(state.services.roster.list_students(&business).await?))
}

/// Owners and instructors, for instructor pickers.
pub async fn staff(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
) -> ApiResult<Vec<User>> {
    Ok(Json(state.services.roster.list_staff(&business).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
) -> ApiResult<User> {
    Ok(Json(state.services.roster.get_student(&business, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
    JsonBody(fields): JsonBody<ProfileFields>,
) -> ApiResult<User> {
    Ok(Json(
        state
            .services
            .roster
            .update_student(&business, &id, fields)
            .await?,
    ))
}

pub async fn packages(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
) -> ApiResult<Vec<Package>> {
    Ok(Json(
        state.services.packages.for_student(&business, &id).await?,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct UsableQuery {
    #[serde(default)]
    pub class_type_id: Option<ClassTypeId>,
}

/// Packages that could pay for a class this week, best first.
pub async fn usable_packages(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
    QueryParams(query): QueryParams<UsableQuery>,
) -> ApiResult<Vec<Package>> {
    Ok(Json(
        state
            .services
            .packages
            .usable_now(&business, &id, query.class_type_id.as_ref())
            .await?,
    ))
}

pub async fn upcoming(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
) -> ApiResult<Vec<UpcomingClass>> {
    Ok(Json(
        state.services.scheduling.upcoming(&business, &id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
    pub class_id: ClassId,
}

pub async fn check_in(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
    JsonBody(body): JsonBody<CheckInBody>,
) -> Result<(StatusCode, Json<AttendanceOutcome>), ApiError> {
    let outcome = state
        .services
        .attendance
        .check_in(&business, &id, &body.class_id)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn attendance(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, UserId)>,
) -> ApiResult<Vec<Attendance>> {
    state.services.roster.get_student(&business, &id).await?;
    let query = AttendanceQuery {
        student_id: Some(id),
        ..AttendanceQuery::default()
    };
    Ok(Json(
        state.services.attendance.history(&business, &query).await?,
    ))
}
