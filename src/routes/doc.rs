use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::CatalogEntry,
    dto::{
        forms::{FormView, SubmitResponse},
        products::{CatalogList, DraftView, NumberInput, TagList},
    },
    form::{FailureStage, FormPhase, Notification, NotificationKind, SubmitFailure},
    models::{ImageRefView, Product, ProductPayload, Tag, TagOption},
    response::{ApiResponse, Meta},
    routes::{admin, forms, health},
    validation::{FieldError, FieldErrors, FormVariant},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        admin::list_tags,
        admin::list_products,
        forms::open_create_form,
        forms::open_edit_form,
        forms::get_form,
        forms::submit_form,
        forms::discard_form
    ),
    components(
        schemas(
            Product,
            ProductPayload,
            Tag,
            TagOption,
            ImageRefView,
            NumberInput,
            DraftView,
            FormView,
            FormVariant,
            FormPhase,
            FieldError,
            FieldErrors,
            Notification,
            NotificationKind,
            SubmitFailure,
            FailureStage,
            SubmitResponse,
            CatalogEntry,
            TagList,
            CatalogList,
            health::HealthData,
            Meta,
            ApiResponse<FormView>,
            ApiResponse<SubmitResponse>,
            ApiResponse<TagList>,
            ApiResponse<CatalogList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Admin", description = "Tag vocabulary and saved products"),
        (name = "Forms", description = "Create and edit product forms"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
