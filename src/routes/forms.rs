use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::forms::{FormView, SubmitResponse},
    error::AppResult,
    response::ApiResponse,
    services::form_service::{self, FormPart},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_create_form))
        .route("/edit/{product_id}", post(open_edit_form))
        .route("/{form_id}", get(get_form).delete(discard_form))
        .route("/{form_id}/submit", post(submit_form))
}

#[utoipa::path(
    post,
    path = "/api/admin/forms",
    responses(
        (status = 200, description = "Empty create form", body = ApiResponse<FormView>)
    ),
    tag = "Forms"
)]
pub async fn open_create_form(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FormView>>> {
    let resp = form_service::open_create_form(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/forms/edit/{product_id}",
    params(
        ("product_id" = String, Path, description = "Remote product ID")
    ),
    responses(
        (status = 200, description = "Edit form pre-populated from the product", body = ApiResponse<FormView>),
        (status = 404, description = "Product not found"),
        (status = 502, description = "Product API unreachable"),
    ),
    tag = "Forms"
)]
pub async fn open_edit_form(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<FormView>>> {
    let resp = form_service::open_edit_form(&state, &product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/forms/{form_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID")
    ),
    responses(
        (status = 200, description = "Current draft and phase", body = ApiResponse<FormView>),
        (status = 404, description = "Form not found"),
    ),
    tag = "Forms"
)]
pub async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FormView>>> {
    let resp = form_service::get_form(&state, form_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/forms/{form_id}/submit",
    params(
        ("form_id" = Uuid, Path, description = "Form ID")
    ),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Fields: name, category, price, sale, description, tags (repeated), image, gallery (repeated). File parts replace images, text parts keep stored URLs. Omitted fields keep their current values; send an empty `tags` or `gallery` text part to clear that list."
    ),
    responses(
        (status = 200, description = "Product saved", body = ApiResponse<SubmitResponse>),
        (status = 404, description = "Form not found"),
        (status = 409, description = "A submit is already in flight"),
        (status = 422, description = "Field errors"),
        (status = 502, description = "Upload or save failed"),
    ),
    tag = "Forms"
)]
pub async fn submit_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<SubmitResponse>>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?.to_vec();
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    let patch = form_service::patch_from_parts(parts)?;
    let resp = form_service::submit_form(&state, form_id, patch).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/forms/{form_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID")
    ),
    responses(
        (status = 200, description = "Form discarded"),
        (status = 404, description = "Form not found"),
    ),
    tag = "Forms"
)]
pub async fn discard_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = form_service::discard_form(&state, form_id).await?;
    Ok(Json(resp))
}
