use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::products::{CatalogList, TagList},
    error::AppResult,
    response::ApiResponse,
    routes::forms,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/products", get(list_products))
        .nest("/forms", forms::router())
}

#[utoipa::path(
    get,
    path = "/api/admin/tags",
    responses(
        (status = 200, description = "Selectable product tags", body = ApiResponse<TagList>)
    ),
    tag = "Admin"
)]
pub async fn list_tags() -> Json<ApiResponse<TagList>> {
    Json(catalog_service::list_tags())
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "Products saved through this service", body = ApiResponse<CatalogList>)
    ),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CatalogList>>> {
    let resp = catalog_service::list_products(&state).await?;
    Ok(Json(resp))
}
