use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::products::DraftView,
    form::{FormController, FormPhase, Notification},
    models::Product,
};
use crate::validation::FormVariant;

/// State of an open form as the front end renders it.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormView {
    pub form_id: Uuid,
    pub variant: FormVariant,
    pub product_id: Option<String>,
    pub phase: FormPhase,
    pub disabled: bool,
    pub draft: DraftView,
}

impl From<&FormController> for FormView {
    fn from(form: &FormController) -> Self {
        Self {
            form_id: form.id(),
            variant: form.variant(),
            product_id: form.product_id().map(str::to_string),
            phase: form.phase(),
            disabled: form.is_disabled(),
            draft: DraftView::from(&form.draft()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub product: Product,
    pub notification: Notification,
}
