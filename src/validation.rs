//! Field rules for product drafts.
//!
//! The create and edit forms share one rule set; they only differ in whether
//! the main image must be present.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::products::{NumberInput, ProductDraft},
    models::{ImageRef, Tag},
};

pub const DEFAULT_MIN_PRICE: f64 = 10_000.0;
pub const MAX_SALE: f64 = 60.0;
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_CATEGORY_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failing field of a draft, first failing rule per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors {
    #[schema(value_type = Vec<FieldError>)]
    pub errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// A draft that passed its schema. Numbers are coerced, tags normalized.
/// Images may still hold files that need uploading.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub sale: f64,
    pub image: Option<ImageRef>,
    pub gallery: Vec<ImageRef>,
    pub tags: Vec<Tag>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductSchema {
    pub variant: FormVariant,
    pub min_price: f64,
}

impl ProductSchema {
    pub fn create(min_price: f64) -> Self {
        Self {
            variant: FormVariant::Create,
            min_price,
        }
    }

    pub fn edit(min_price: f64) -> Self {
        Self {
            variant: FormVariant::Edit,
            min_price,
        }
    }

    pub fn image_required(&self) -> bool {
        self.variant == FormVariant::Create
    }

    pub fn validate(&self, draft: &ProductDraft) -> Result<ValidatedDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = draft.name.clone().unwrap_or_default();
        if name.chars().count() < MIN_NAME_LEN {
            errors.push("name", "Name must be at least 2 characters.");
        }

        let category = match &draft.category {
            None => {
                errors.push("category", "Please select a category for product.");
                String::new()
            }
            Some(c) => {
                if c.chars().count() < MIN_CATEGORY_LEN {
                    errors.push("category", "Category must be at least 2 characters.");
                }
                c.clone()
            }
        };

        let price = coerce_field(&mut errors, "price", draft.price.as_ref());
        if price.is_some_and(|p| p < self.min_price) {
            errors.push(
                "price",
                format!("Price must be at least {} VND.", self.min_price),
            );
        }

        let sale = coerce_field(&mut errors, "sale", draft.sale.as_ref());
        if sale.is_some_and(|s| s > MAX_SALE) {
            errors.push("sale", "Sale must be less than 60%.");
        }

        match &draft.image {
            None if self.image_required() => errors.push("image", "File is required"),
            Some(ImageRef::Replaced(file)) if !file.is_accepted_image() => {
                errors.push("image", IMAGE_TYPE_MESSAGE)
            }
            _ => {}
        }

        let bad_gallery = draft.gallery.iter().any(|img| match img {
            ImageRef::Replaced(file) => !file.is_accepted_image(),
            ImageRef::Unchanged(_) => false,
        });
        if bad_gallery {
            errors.push("gallery", IMAGE_TYPE_MESSAGE);
        }

        let tags = normalize_tags(&mut errors, &draft.tags);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedDraft {
            name,
            category,
            price: price.unwrap_or_default(),
            sale: sale.unwrap_or_default(),
            image: draft.image.clone(),
            gallery: draft.gallery.clone(),
            tags,
            description: draft.description.clone().unwrap_or_default(),
        })
    }
}

const IMAGE_TYPE_MESSAGE: &str = "Only .jpg, .jpeg, .png and .webp files are accepted.";

fn coerce_field(errors: &mut FieldErrors, field: &str, input: Option<&NumberInput>) -> Option<f64> {
    let value = input.and_then(NumberInput::coerce);
    if value.is_none() {
        errors.push(field, "Expected number, received nan");
    }
    value
}

fn normalize_tags(errors: &mut FieldErrors, raw: &[String]) -> Vec<Tag> {
    let mut tags = Vec::new();
    for entry in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        match Tag::from_str(entry) {
            Ok(tag) if !tags.contains(&tag) => tags.push(tag),
            Ok(_) => {}
            Err(_) => {
                errors.push("tags", format!("Unknown tag \"{entry}\"."));
                return Vec::new();
            }
        }
    }
    if tags.is_empty() {
        errors.push("tags", "You have to select at least one item.");
    }
    tags
}
