use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct Meta {
    pub total: Option<usize>,
    pub form_id: Option<Uuid>,
}

impl Meta {
    pub fn total(total: usize) -> Self {
        Self {
            total: Some(total),
            form_id: None,
        }
    }

    pub fn form(form_id: Uuid) -> Self {
        Self {
            total: None,
            form_id: Some(form_id),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
