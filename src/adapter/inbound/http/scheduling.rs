//! Recurring schedules, class generation and one-time classes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::catalog::ActiveBody;
use super::error::ApiError;
use super::extract::{JsonBody, QueryParams};
use super::{ApiResult, AppState};
use crate::domain::class::ClassFields;
use crate::domain::schedule::ScheduleFields;
use crate::domain::{BusinessId, Class, ClassId, ClassStatus, RecurringSchedule, ScheduleId};
use crate::port::ClassQuery;

pub async fn list_schedules(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
) -> ApiResult<Vec<RecurringSchedule>> {
    Ok(Json(
        state.services.scheduling.list_schedules(&business).await?,
    ))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(fields): JsonBody<ScheduleFields>,
) -> Result<(StatusCode, Json<RecurringSchedule>), ApiError> {
    let schedule = state
        .services
        .scheduling
        .create_schedule(&business, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ScheduleId)>,
) -> ApiResult<RecurringSchedule> {
    Ok(Json(
        state.services.scheduling.get_schedule(&business, &id).await?,
    ))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ScheduleId)>,
    JsonBody(fields): JsonBody<ScheduleFields>,
) -> ApiResult<RecurringSchedule> {
    Ok(Json(
        state
            .services
            .scheduling
            .update_schedule(&business, &id, fields)
            .await?,
    ))
}

pub async fn set_schedule_active(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ScheduleId)>,
    JsonBody(body): JsonBody<ActiveBody>,
) -> ApiResult<RecurringSchedule> {
    Ok(Json(
        state
            .services
            .scheduling
            .set_schedule_active(&business, &id, body.is_active)
            .await?,
    ))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ScheduleId)>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .scheduling
        .delete_schedule(&business, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Returns only the classes this call created.
pub async fn generate(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ScheduleId)>,
    JsonBody(body): JsonBody<GenerateBody>,
) -> Result<(StatusCode, Json<Vec<Class>>), ApiError> {
    let created = state
        .services
        .scheduling
        .generate(&business, &id, body.from, body.to)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassListQuery {
    #[serde(default)]
    pub one_time_only: bool,
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
    #[serde(default)]
    pub status: Option<ClassStatus>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl From<ClassListQuery> for ClassQuery {
    fn from(q: ClassListQuery) -> Self {
        Self {
            one_time_only: q.one_time_only,
            schedule_id: q.schedule_id,
            status: q.status,
            from: q.from,
            to: q.to,
        }
    }
}

pub async fn list_classes(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    QueryParams(query): QueryParams<ClassListQuery>,
) -> ApiResult<Vec<Class>> {
    Ok(Json(
        state
            .services
            .scheduling
            .list_classes(&business, &query.into())
            .await?,
    ))
}

pub async fn create_class(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(fields): JsonBody<ClassFields>,
) -> Result<(StatusCode, Json<Class>), ApiError> {
    let class = state
        .services
        .scheduling
        .create_class(&business, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassId)>,
) -> ApiResult<Class> {
    Ok(Json(
        state.services.scheduling.get_class(&business, &id).await?,
    ))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassId)>,
    JsonBody(fields): JsonBody<ClassFields>,
) -> ApiResult<Class> {
    Ok(Json(
        state
            .services
            .scheduling
            .update_class(&business, &id, fields)
            .await?,
    ))
}

async fn set_status(
    state: &AppState,
    business: &BusinessId,
    id: &ClassId,
    status: ClassStatus,
) -> ApiResult<Class> {
    Ok(Json(
        state
            .services
            .scheduling
            .set_class_status(business, id, status)
            .await?,
    ))
}

pub async fn cancel_class(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassId)>,
) -> ApiResult<Class> {
    set_status(&state, &business, &id, ClassStatus::Cancelled).await
}

pub async fn complete_class(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassId)>,
) -> ApiResult<Class> {
    set_status(&state, &business, &id, ClassStatus::Completed).await
}

/// Attendance charged for the class is refunded before it is removed.
pub async fn delete_class(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassId)>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .scheduling
        .delete_class(&business, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
