use axum::{
    Json,
    body::to_bytes,
    extract::{Path, Query, State},
};

use crate::{
    adapters::inbound::http::{
        dto::{PartNumberQuery, UploadSessionDto},
        error::ApiError,
        extract::{RequestBody, body_stream},
        router::AppState,
    },
    domain::{
        models::PartResult,
        value_objects::{ObjectKey, UploadId},
    },
};

/// Largest part list accepted by the finish call
const MAX_PART_LIST_BYTES: usize = 1024 * 1024;

/// Start a multipart upload
pub async fn init_upload(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UploadSessionDto>, ApiError> {
    let key = ObjectKey::new(name).map_err(ApiError::InvalidKey)?;

    let session = app_state.multipart_service.init_upload(&key).await?;

    Ok(Json(session.into()))
}

/// Upload one part of a multipart upload
pub async fn upload_part(
    State(app_state): State<AppState>,
    Path((name, upload_id)): Path<(String, String)>,
    Query(query): Query<PartNumberQuery>,
    RequestBody(body): RequestBody,
) -> Result<Json<PartResult>, ApiError> {
    let part_number = query
        .parse()
        .ok_or(ApiError::MissingPartNumber)?
        .map_err(|_| ApiError::InvalidPartNumber)?;
    let body = body.ok_or(ApiError::MissingBody)?;

    let key = ObjectKey::new(name).map_err(ApiError::InvalidKey)?;
    let upload_id = UploadId::new(upload_id).map_err(ApiError::InvalidUploadId)?;

    let part = app_state
        .multipart_service
        .upload_part(&key, &upload_id, part_number, body_stream(body))
        .await?;

    Ok(Json(part))
}

/// Complete a multipart upload from the client's list of uploaded parts
pub async fn finish_upload(
    State(app_state): State<AppState>,
    Path((name, upload_id)): Path<(String, String)>,
    RequestBody(body): RequestBody,
) -> Result<String, ApiError> {
    let body = body.ok_or(ApiError::MissingParts)?;

    let bytes = to_bytes(body, MAX_PART_LIST_BYTES)
        .await
        .map_err(|e| ApiError::InvalidParts(e.to_string()))?;
    let parts: Vec<PartResult> =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidParts(e.to_string()))?;

    let key = ObjectKey::new(name).map_err(ApiError::InvalidKey)?;
    let upload_id = UploadId::new(upload_id).map_err(ApiError::InvalidUploadId)?;

    let meta = app_state
        .multipart_service
        .finish_upload(&key, &upload_id, parts)
        .await?;

    Ok(meta.key.into_inner())
}
