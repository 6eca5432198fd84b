//! Create/edit form lifecycle.
//!
//! A [`FormController`] is one open form. It owns the draft, the phase used as
//! the disabled flag, and the submit procedure:
//! validate, upload replaced images, create or update the record, then report
//! the saved product to the catalog owner.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::ProductEvent,
    client::{ClientError, ClientResult, FileUploader, ProductApi},
    dto::products::{DraftPatch, ProductDraft},
    models::{FileUpload, ImageRef, Product, ProductPayload},
    validation::{FieldErrors, FormVariant, ProductSchema, ValidatedDraft},
};

pub const NOTIFICATION_DURATION_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    Validating,
    Uploading,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
}

/// Transient confirmation shown to the user after a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub duration_ms: u64,
}

impl Notification {
    pub fn saved(variant: FormVariant) -> Self {
        let title = match variant {
            FormVariant::Create => "Create product Success.",
            FormVariant::Edit => "Edit product Success.",
        };
        Self {
            kind: NotificationKind::Success,
            title: title.to_string(),
            duration_ms: NOTIFICATION_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Upload,
    Persist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmitFailure {
    pub stage: FailureStage,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved {
        product: Product,
        notification: Notification,
    },
    Invalid(FieldErrors),
    Failed(SubmitFailure),
    /// A submit for this form is already in flight.
    Busy,
}

/// Collaborators shared by every form.
#[derive(Clone)]
pub struct FormContext {
    pub api: Arc<dyn ProductApi>,
    pub uploader: Arc<dyn FileUploader>,
    pub events: mpsc::UnboundedSender<ProductEvent>,
    pub min_price: f64,
}

#[derive(Debug, Clone)]
enum FormTarget {
    Create,
    Edit { product_id: String, loaded: Product },
}

pub struct FormController {
    id: Uuid,
    target: FormTarget,
    schema: ProductSchema,
    ctx: FormContext,
    draft: Mutex<ProductDraft>,
    phase: Mutex<FormPhase>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("phase", &*self.phase.lock())
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn new_create(ctx: FormContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: FormTarget::Create,
            schema: ProductSchema::create(ctx.min_price),
            ctx,
            draft: Mutex::new(ProductDraft::default()),
            phase: Mutex::new(FormPhase::Idle),
        }
    }

    /// Fetches the product and pre-populates the draft from it.
    pub async fn load_edit(product_id: &str, ctx: FormContext) -> ClientResult<Self> {
        let loaded = ctx.api.get_product(product_id).await?;
        tracing::debug!(product_id, "edit form hydrated");
        Ok(Self {
            id: Uuid::new_v4(),
            draft: Mutex::new(ProductDraft::from_product(&loaded)),
            target: FormTarget::Edit {
                product_id: product_id.to_string(),
                loaded,
            },
            schema: ProductSchema::edit(ctx.min_price),
            ctx,
            phase: Mutex::new(FormPhase::Idle),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> FormVariant {
        self.schema.variant
    }

    pub fn product_id(&self) -> Option<&str> {
        match &self.target {
            FormTarget::Create => None,
            FormTarget::Edit { product_id, .. } => Some(product_id),
        }
    }

    pub fn phase(&self) -> FormPhase {
        *self.phase.lock()
    }

    /// Inputs and the submit control are disabled while a submit is in flight.
    pub fn is_disabled(&self) -> bool {
        self.phase() != FormPhase::Idle
    }

    pub fn draft(&self) -> ProductDraft {
        self.draft.lock().clone()
    }

    /// Merges the touched fields into the held draft and submits the result.
    /// The merged draft is kept, so a failed submit can be retried as is.
    pub async fn submit_changes(&self, patch: DraftPatch) -> SubmitOutcome {
        let Some(guard) = self.begin() else {
            return SubmitOutcome::Busy;
        };
        let draft = {
            let mut held = self.draft.lock();
            held.apply(patch);
            held.clone()
        };
        self.run(guard, draft).await
    }

    pub async fn submit(&self, draft: ProductDraft) -> SubmitOutcome {
        let Some(guard) = self.begin() else {
            return SubmitOutcome::Busy;
        };
        *self.draft.lock() = draft.clone();
        self.run(guard, draft).await
    }

    fn begin(&self) -> Option<PhaseGuard<'_>> {
        let mut phase = self.phase.lock();
        if *phase != FormPhase::Idle {
            tracing::warn!(form_id = %self.id, phase = ?*phase, "submit rejected: form busy");
            return None;
        }
        *phase = FormPhase::Validating;
        Some(PhaseGuard { phase: &self.phase })
    }

    async fn run(&self, guard: PhaseGuard<'_>, draft: ProductDraft) -> SubmitOutcome {
        let span = tracing::info_span!(
            "submit",
            form_id = %self.id,
            submission_id = %Uuid::new_v4(),
            variant = ?self.variant(),
        );
        self.run_steps(guard, draft).instrument(span).await
    }

    async fn run_steps(&self, guard: PhaseGuard<'_>, draft: ProductDraft) -> SubmitOutcome {
        let valid = match self.schema.validate(&draft) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::debug!(%errors, "draft rejected");
                return SubmitOutcome::Invalid(errors);
            }
        };

        guard.set(FormPhase::Uploading);
        let payload = match self.resolve_payload(valid).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "image upload failed");
                return SubmitOutcome::Failed(SubmitFailure {
                    stage: FailureStage::Upload,
                    reason: err.to_string(),
                });
            }
        };

        guard.set(FormPhase::Submitting);
        let saved = match &self.target {
            FormTarget::Create => self.ctx.api.create_product(&payload).await,
            FormTarget::Edit { product_id, .. } => {
                self.ctx.api.update_product(product_id, &payload).await
            }
        };
        let product = match saved {
            Ok(product) => product,
            Err(err) => {
                tracing::error!(error = %err, "product save failed");
                return SubmitOutcome::Failed(SubmitFailure {
                    stage: FailureStage::Persist,
                    reason: err.to_string(),
                });
            }
        };

        let event = match self.target {
            FormTarget::Create => ProductEvent::Created(product.clone()),
            FormTarget::Edit { .. } => ProductEvent::Updated(product.clone()),
        };
        if let Err(err) = self.ctx.events.send(event) {
            tracing::warn!(error = %err, "catalog update dropped");
        }

        *self.draft.lock() = ProductDraft::from_product(&product);
        tracing::info!(product_id = %product.id, "product saved");
        SubmitOutcome::Saved {
            product,
            notification: Notification::saved(self.variant()),
        }
    }

    /// Swaps replaced files for uploaded URLs and builds the request body.
    async fn resolve_payload(&self, valid: ValidatedDraft) -> ClientResult<ProductPayload> {
        let image = match valid.image {
            Some(ImageRef::Unchanged(url)) => url,
            Some(ImageRef::Replaced(file)) => self.ctx.uploader.upload_file(&file).await?,
            None => match &self.target {
                FormTarget::Edit { loaded, .. } => loaded.image.clone(),
                FormTarget::Create => String::new(),
            },
        };
        let gallery = self.resolve_gallery(valid.gallery).await?;

        Ok(ProductPayload {
            name: valid.name,
            category: valid.category,
            price: valid.price,
            sale: valid.sale,
            image,
            gallery,
            tags: valid.tags.iter().map(|t| t.to_string()).collect(),
            description: valid.description,
        })
    }

    /// Replaced gallery files go up in one batch; order is preserved.
    async fn resolve_gallery(&self, gallery: Vec<ImageRef>) -> ClientResult<Vec<String>> {
        let files: Vec<FileUpload> = gallery
            .iter()
            .filter_map(|img| match img {
                ImageRef::Replaced(file) => Some(file.clone()),
                ImageRef::Unchanged(_) => None,
            })
            .collect();
        if files.is_empty() {
            return Ok(gallery
                .into_iter()
                .filter_map(|img| img.url().map(str::to_string))
                .collect());
        }

        let mut uploaded = self.ctx.uploader.upload_files(&files).await?.into_iter();
        gallery
            .into_iter()
            .map(|img| match img {
                ImageRef::Unchanged(url) => Ok(url),
                ImageRef::Replaced(_) => uploaded.next().ok_or_else(|| {
                    ClientError::InvalidResponse("upload returned too few urls".into())
                }),
            })
            .collect()
    }
}

/// Holds the form out of `Idle` for the duration of one submit.
struct PhaseGuard<'a> {
    phase: &'a Mutex<FormPhase>,
}

impl PhaseGuard<'_> {
    fn set(&self, next: FormPhase) {
        *self.phase.lock() = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = FormPhase::Idle;
    }
}
