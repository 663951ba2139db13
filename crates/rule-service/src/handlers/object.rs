//! 数据对象 API 处理器

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use validator::Validate;

use crate::{
    dto::{ApiResponse, CreateObjectRequest},
    error::ServiceError,
    extract::AppJson,
    models::DataObject,
    state::AppState,
};

/// 保存数据对象
///
/// POST /api/objects
pub async fn create_object(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateObjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DataObject>>), ServiceError> {
    req.validate()?;

    let object = state.objects.insert(DataObject::from(req));

    Ok((StatusCode::CREATED, Json(ApiResponse::success(object))))
}

/// 获取所有数据对象
///
/// GET /api/objects
pub async fn list_objects(State(state): State<AppState>) -> Json<ApiResponse<Vec<DataObject>>> {
    Json(ApiResponse::success(state.objects.list()))
}
