//! User account API handlers
//!
//! Thin wrappers over `UserService`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use super::dto::{CreateUserRequest, EditUserMultipart, EditUserResponse, UserDto};
use super::multipart::EditUserForm;
use crate::application::UserService;
use crate::domain::{DomainError, EditUserParams, UploadedImage, User, UserLookup, UserUpdate};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
    pub max_image_bytes: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserDto>),
        (status = 409, description = "Email or username already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state.user_service.register(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details with balance", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    match state.user_service.get_user_details(&id).await? {
        Some(user) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        None => Err(ApiError::not_found(format!("User '{}' not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/activate",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User activated", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn activate_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.user_service.activate(&id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body(content = EditUserMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<EditUserResponse>),
        (status = 403, description = "Balance fields sent by a non-admin"),
        (status = 409, description = "Email or username already registered")
    )
)]
pub async fn edit_me(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> ApiResult<Json<ApiResponse<EditUserResponse>>> {
    let form = EditUserForm::parse(multipart, state.max_image_bytes).await?;
    if form.has_balance_changes() {
        return Err(
            DomainError::Forbidden("Only administrators may change balances".into()).into(),
        );
    }

    let (profile, image) = form.into_plain();
    edit(&state, &caller.user_id, profile.into(), image).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body(content = EditUserMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User updated", body = ApiResponse<EditUserResponse>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Email or username already registered")
    )
)]
pub async fn admin_edit_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<ApiResponse<EditUserResponse>>> {
    let form = EditUserForm::parse(multipart, state.max_image_bytes).await?;
    let (dto, image) = form.into_privileged();
    edit(&state, &id, dto.into(), image).await
}

async fn edit(
    state: &UserHandlerState,
    id: &str,
    update: UserUpdate,
    image: Option<UploadedImage>,
) -> ApiResult<Json<ApiResponse<EditUserResponse>>> {
    let old_user = load_snapshot(&state.user_service, id).await?;

    let mut params = EditUserParams::new(id, update).with_old_user(old_user);
    if let Some(image) = image {
        params = params.with_image(image);
    }

    let result = state.user_service.edit_user(params).await?;
    Ok(Json(ApiResponse::success(EditUserResponse::from(result))))
}

async fn load_snapshot(service: &UserService, id: &str) -> ApiResult<User> {
    service
        .find_unique_by(UserLookup::Id(id.to_string()))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/images/{filename}",
    tag = "Users",
    params(("filename" = String, Path, description = "Stored image name")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Invalid image name"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_image(
    State(state): State<UserHandlerState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state
        .user_service
        .read_image(&filename)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Image '{}' not found", filename)))?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes))
}

fn content_type_for(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
