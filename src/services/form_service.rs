use uuid::Uuid;

use crate::{
    dto::{
        forms::{FormView, SubmitResponse},
        products::{DraftPatch, NumberInput},
    },
    error::{AppError, AppResult},
    form::{FormController, SubmitOutcome},
    models::{FileUpload, ImageRef},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn open_create_form(state: &AppState) -> AppResult<ApiResponse<FormView>> {
    let form = state.forms.insert(FormController::new_create(state.ctx.clone()));
    tracing::info!(form_id = %form.id(), "create form opened");
    Ok(ApiResponse::success(
        "Form opened",
        FormView::from(form.as_ref()),
        Some(Meta::form(form.id())),
    ))
}

pub async fn open_edit_form(
    state: &AppState,
    product_id: &str,
) -> AppResult<ApiResponse<FormView>> {
    let form = FormController::load_edit(product_id, state.ctx.clone()).await?;
    let form = state.forms.insert(form);
    tracing::info!(form_id = %form.id(), product_id, "edit form opened");
    Ok(ApiResponse::success(
        "Form opened",
        FormView::from(form.as_ref()),
        Some(Meta::form(form.id())),
    ))
}

pub async fn get_form(state: &AppState, form_id: Uuid) -> AppResult<ApiResponse<FormView>> {
    let form = state.forms.get(form_id).ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Form",
        FormView::from(form.as_ref()),
        Some(Meta::form(form_id)),
    ))
}

/// Runs the submit procedure for an open form. The form is closed after a
/// save and stays open for a retry otherwise.
pub async fn submit_form(
    state: &AppState,
    form_id: Uuid,
    patch: DraftPatch,
) -> AppResult<ApiResponse<SubmitResponse>> {
    let form = state.forms.get(form_id).ok_or(AppError::NotFound)?;
    match form.submit_changes(patch).await {
        SubmitOutcome::Saved {
            product,
            notification,
        } => {
            state.forms.remove(form_id);
            Ok(ApiResponse::success(
                notification.title.clone(),
                SubmitResponse {
                    product,
                    notification,
                },
                Some(Meta::form(form_id)),
            ))
        }
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::Failed(failure) => Err(AppError::SubmitFailed(failure)),
        SubmitOutcome::Busy => Err(AppError::Busy),
    }
}

pub async fn discard_form(
    state: &AppState,
    form_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // An in-flight submit keeps its own handle and finishes on its own.
    state.forms.remove(form_id).ok_or(AppError::NotFound)?;
    tracing::info!(%form_id, "form discarded");
    Ok(ApiResponse::success(
        "Discarded",
        serde_json::json!({}),
        Some(Meta::form(form_id)),
    ))
}

/// One multipart part of a form submission.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FormPart {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: None,
            content_type: None,
            bytes: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, file: FileUpload) -> Self {
        Self {
            name: name.to_string(),
            file_name: Some(file.file_name),
            content_type: Some(file.content_type),
            bytes: file.bytes,
        }
    }

    fn value(&self) -> AppResult<String> {
        String::from_utf8(self.bytes.clone())
            .map_err(|_| AppError::BadRequest(format!("field `{}` is not valid UTF-8", self.name)))
    }

    /// Text parts for image fields carry the URL already stored on the product.
    /// Browsers send an empty, nameless file part when nothing was picked.
    fn image(self) -> AppResult<Option<ImageRef>> {
        let Some(file_name) = self.file_name.clone() else {
            let url = self.value()?;
            let url = url.trim();
            return Ok((!url.is_empty()).then(|| ImageRef::Unchanged(url.to_string())));
        };
        if file_name.is_empty() && self.bytes.is_empty() {
            return Ok(None);
        }
        let content_type = self
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(Some(ImageRef::Replaced(FileUpload::new(
            file_name,
            content_type,
            self.bytes,
        ))))
    }
}

/// Collects the fields present in a submission. Absent fields stay `None` so
/// the form keeps whatever it already holds for them.
pub fn patch_from_parts(parts: Vec<FormPart>) -> AppResult<DraftPatch> {
    let mut patch = DraftPatch::default();
    for part in parts {
        match part.name.as_str() {
            "name" => patch.name = Some(part.value()?),
            "category" | "type" => patch.category = Some(part.value()?),
            "price" => patch.price = Some(NumberInput::Text(part.value()?)),
            "sale" => patch.sale = Some(NumberInput::Text(part.value()?)),
            "description" => patch.description = Some(part.value()?),
            "tags" | "tags[]" => patch.tags.get_or_insert_with(Vec::new).push(part.value()?),
            "image" => {
                if let Some(image) = part.image()? {
                    patch.image = Some(image);
                }
            }
            "gallery" | "gallery[]" | "listImages" | "listImages[]" => {
                let is_text = part.file_name.is_none();
                match part.image()? {
                    Some(image) => patch.gallery.get_or_insert_with(Vec::new).push(image),
                    // An empty text part clears the gallery; an empty file input leaves it.
                    None if is_text => {
                        patch.gallery.get_or_insert_with(Vec::new);
                    }
                    None => {}
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_file_parts_map_to_draft_fields() {
        let parts = vec![
            FormPart::text("name", "Chair A"),
            FormPart::text("type", "chair"),
            FormPart::text("price", "15000"),
            FormPart::text("tags", "chair"),
            FormPart::text("tags", "home"),
            FormPart::file("image", FileUpload::new("a.png", "image/png", vec![1, 2])),
            FormPart::text("gallery", "https://cdn.example.com/g1.png"),
            FormPart::file("gallery", FileUpload::new("g2.webp", "image/webp", vec![3])),
        ];
        let patch = patch_from_parts(parts).expect("patch");

        assert_eq!(patch.name.as_deref(), Some("Chair A"));
        assert_eq!(patch.category.as_deref(), Some("chair"));
        assert_eq!(patch.price, Some(NumberInput::Text("15000".into())));
        assert_eq!(patch.tags, Some(vec!["chair".to_string(), "home".to_string()]));
        assert!(patch.image.as_ref().is_some_and(ImageRef::is_replaced));
        let gallery = patch.gallery.expect("gallery");
        assert_eq!(gallery[0].url(), Some("https://cdn.example.com/g1.png"));
        assert!(gallery[1].is_replaced());
        assert!(patch.sale.is_none());
        assert!(patch.description.is_none());
    }

    #[test]
    fn empty_file_part_leaves_image_untouched() {
        let empty = FormPart {
            name: "image".into(),
            file_name: Some(String::new()),
            content_type: Some("application/octet-stream".into()),
            bytes: vec![],
        };
        let patch = patch_from_parts(vec![empty, FormPart::text("price", "20000")])
            .expect("patch");
        assert!(patch.image.is_none());
        assert_eq!(patch.price, Some(NumberInput::Text("20000".into())));
    }

    #[test]
    fn empty_gallery_file_part_keeps_gallery_but_empty_text_clears_it() {
        let empty_file = FormPart {
            name: "gallery".into(),
            file_name: Some(String::new()),
            content_type: Some("application/octet-stream".into()),
            bytes: vec![],
        };
        let patch = patch_from_parts(vec![empty_file]).expect("patch");
        assert!(patch.gallery.is_none());

        let patch = patch_from_parts(vec![FormPart::text("gallery", "")]).expect("patch");
        assert_eq!(patch.gallery, Some(vec![]));
    }

    #[test]
    fn empty_tags_part_clears_tags() {
        let patch = patch_from_parts(vec![FormPart::text("tags", "")]).expect("patch");
        assert_eq!(patch.tags, Some(vec![String::new()]));
    }

    #[test]
    fn rejects_non_utf8_text() {
        let part = FormPart {
            name: "name".into(),
            file_name: None,
            content_type: None,
            bytes: vec![0xff, 0xfe],
        };
        assert!(matches!(
            patch_from_parts(vec![part]),
            Err(AppError::BadRequest(_))
        ));
    }
}
