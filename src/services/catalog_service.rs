use crate::{
    dto::products::{CatalogList, TagList},
    error::AppResult,
    models::tag_vocabulary,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn list_tags() -> ApiResponse<TagList> {
    let items = tag_vocabulary();
    let total = items.len();
    ApiResponse::success("Tags", TagList { items }, Some(Meta::total(total)))
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<CatalogList>> {
    let items = state.catalog.list().await;
    let total = items.len();
    Ok(ApiResponse::success(
        "Products",
        CatalogList { items },
        Some(Meta::total(total)),
    ))
}
