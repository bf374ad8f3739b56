//! Class types and package types.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::{JsonBody, QueryParams};
use super::{ApiResult, AppState};
use crate::domain::class_type::ClassTypeFields;
use crate::domain::package_type::PackageTypeFields;
use crate::domain::{BusinessId, ClassType, ClassTypeId, PackageType, PackageTypeId};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct ActiveBody {
    pub is_active: bool,
}

pub async fn list_class_types(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Vec<ClassType>> {
    Ok(Json(
        state
            .services
            .catalog
            .list_class_types(&business, query.include_inactive)
            .await?,
    ))
}

pub async fn create_class_type(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(fields): JsonBody<ClassTypeFields>,
) -> Result<(StatusCode, Json<ClassType>), ApiError> {
    let class_type = state
        .services
        .catalog
        .create_class_type(&business, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(class_type)))
}

pub async fn get_class_type(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassTypeId)>,
) -> ApiResult<ClassType> {
    Ok(Json(
        state.services.catalog.get_class_type(&business, &id).await?,
    ))
}

pub async fn update_class_type(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassTypeId)>,
    JsonBody(fields): JsonBody<ClassTypeFields>,
) -> ApiResult<ClassType> {
    Ok(Json(
        state
            .services
            .catalog
            .update_class_type(&business, &id, fields)
            .await?,
    ))
}

pub async fn set_class_type_active(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassTypeId)>,
    JsonBody(body): JsonBody<ActiveBody>,
) -> ApiResult<ClassType> {
    Ok(Json(
        state
            .services
            .catalog
            .set_class_type_active(&business, &id, body.is_active)
            .await?,
    ))
}

pub async fn delete_class_type(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, ClassTypeId)>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .catalog
        .delete_class_type(&business, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_package_types(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Vec<PackageType>> {
    Ok(Json(
        state
            .services
            .catalog
            .list_package_types(&business, query.include_inactive)
            .await?,
    ))
}

pub async fn create_package_type(
    State(state): State<AppState>,
    Path(business): Path<BusinessId>,
    JsonBody(fields): JsonBody<PackageTypeFields>,
) -> Result<(StatusCode, Json<PackageType>), ApiError> {
    let package_type = state
        .services
        .catalog
        .create_package_type(&business, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(package_type)))
}

pub async fn get_package_type(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, PackageTypeId)>,
) -> ApiResult<PackageType> {
    Ok(Json(
        state
            .services
            .catalog
            .get_package_type(&business, &id)
            .await?,
    ))
}

pub async fn update_package_type(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, PackageTypeId)>,
    JsonBody(fields): JsonBody<PackageTypeFields>,
) -> ApiResult<PackageType> {
    Ok(Json(
        state
            .services
            .catalog
            .update_package_type(&business, &id, fields)
            .await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct PackageTypeActivation {
    pub package_type: PackageType,
    /// Existing packages reference this type and keep working.
    pub in_use: bool,
}

pub async fn set_package_type_active(
    State(state): State<AppState>,
    Path((business, id)): Path<(BusinessId, PackageTypeId)>,
    JsonBody(body): JsonBody<ActiveBody>,
) -> ApiResult<PackageTypeActivation> {
    let (package_type, in_use) = state
        .services
        .catalog
        .set_package_type_active(&business, &id, body.is_active)
        .await?;
    Ok(Json(PackageTypeActivation {
        package_type,
        in_use,
    }))
}
