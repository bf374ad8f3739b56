//! Admin endpoints for creating and deleting student accounts.
//!
//! Bodies use camelCase keys. A required field that is absent or empty
//! fails with "Missing required fields" before any other check.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

use super::error::ApiError;
use super::extract::JsonBody;
use super::AppState;
use crate::domain::user::ProfileFields;
use crate::domain::{BusinessId, NewStudent, UserId};

const MISSING_FIELDS: &str = "Missing required fields";

/// Body of `POST /api/admin/create-student`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub business_id: Option<String>,
}

/// Body of `DELETE /api/admin/delete-student`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentBody {
    pub student_id: Option<String>,
    pub business_id: Option<String>,
}

fn required(value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))
}

/// Check `Authorization: Bearer <token>` when an admin token is configured.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(ApiError::unauthorized())
    }
}

/// `POST /api/admin/create-student`
pub async fn create_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<CreateStudentBody>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let request = NewStudent {
        email: required(body.email)?,
        password: required(body.password)?,
        profile: ProfileFields {
            first_name: required(body.first_name)?,
            last_name: required(body.last_name)?,
            phone: body.phone,
        },
        business_id: BusinessId::from(required(body.business_id)?),
    };

    let user = state.services.roster.create_student(request).await?;
    Ok(Json(json!({
        "success": true,
        "user": { "id": user.id, "email": user.email },
    })))
}

/// `DELETE /api/admin/delete-student`
pub async fn delete_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<DeleteStudentBody>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let student = UserId::from(required(body.student_id)?);
    let business = BusinessId::from(required(body.business_id)?);

    state
        .services
        .roster
        .delete_student(&business, &student)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Student deleted successfully",
    })))
}
