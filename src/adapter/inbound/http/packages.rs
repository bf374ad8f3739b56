//! Package sales and edits.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::{JsonBody, QueryParams};
use super::{ApiResult, AppState};
use crate::application::AssignPackage;
use crate::domain::package::PackageEdit;
use crate::domain::{BusinessId, Package, PackageId, UserId};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub student_id: Option<UserId>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Vec<Package>> {
    Ok(Json(
        state
            .services
            .packages
            .list(&business, query.student_id.as_ref())
            .await?,
    ))
}

pub async fn assign(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(request): JsonBody<AssignPackage>,
) -> Result<(StatusCode, Json<Package>), ApiError> {
    let package = state.services.packages.assign(&business, request).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn get(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, PackageId)>,
) -> ApiResult<Package> {
    Ok(Json(state.services.packages.get(&business, &id).await?))
}

pub async fn edit(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, PackageId)>,
    JsonBody(edit): JsonBody<PackageEdit>,
) -> ApiResult<Package> {
    Ok(Json(
        state.services.packages.edit(&business, &id, edit).await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct ExpireSummary {
    pub expired: usize,
}

/// Run the expiration sweep now. The sweep covers every studio; it only
/// moves packages that are already past their expiration date.
pub async fn expire(
    State(state): State<AppState>,
    Path(_business): Path<BusinessId>,
) -> ApiResult<ExpireSummary> {
    let expired = state.services.packages.expire_overdue().await?;
    Ok(Json(ExpireSummary { expired }))
}
