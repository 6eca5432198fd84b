use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::CatalogEntry,
    models::{ImageRef, ImageRefView, Product, TagOption},
};

/// Numeric form input. Inputs arrive either as numbers or as the raw text of
/// a number field and are coerced before any bound is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Empty text coerces to zero; anything that is not a finite number fails.
    pub fn coerce(&self) -> Option<f64> {
        match self {
            NumberInput::Number(n) => n.is_finite().then_some(*n),
            NumberInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Some(0.0);
                }
                text.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        NumberInput::Text(value.to_string())
    }
}

/// In-progress product record held by a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<NumberInput>,
    pub sale: Option<NumberInput>,
    pub image: Option<ImageRef>,
    pub gallery: Vec<ImageRef>,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl ProductDraft {
    /// Pre-populates a draft from a fetched record; stored images stay URLs.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            category: Some(product.category.clone()),
            price: Some(NumberInput::Number(product.price)),
            sale: Some(NumberInput::Number(product.sale)),
            image: (!product.image.is_empty())
                .then(|| ImageRef::Unchanged(product.image.clone())),
            gallery: product
                .gallery
                .iter()
                .cloned()
                .map(ImageRef::Unchanged)
                .collect(),
            tags: product.tags.clone(),
            description: Some(product.description.clone()),
        }
    }

    /// Overwrites the fields the user touched and keeps the rest.
    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(price) = patch.price {
            self.price = Some(price);
        }
        if let Some(sale) = patch.sale {
            self.sale = Some(sale);
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(gallery) = patch.gallery {
            self.gallery = gallery;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Fields present in one submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<NumberInput>,
    pub sale: Option<NumberInput>,
    pub image: Option<ImageRef>,
    pub gallery: Option<Vec<ImageRef>>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DraftView {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<NumberInput>,
    pub sale: Option<NumberInput>,
    pub image: Option<ImageRefView>,
    pub gallery: Vec<ImageRefView>,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl From<&ProductDraft> for DraftView {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.clone(),
            price: draft.price.clone(),
            sale: draft.sale.clone(),
            image: draft.image.as_ref().map(ImageRefView::from),
            gallery: draft.gallery.iter().map(ImageRefView::from).collect(),
            tags: draft.tags.clone(),
            description: draft.description.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TagList {
    #[schema(value_type = Vec<TagOption>)]
    pub items: Vec<TagOption>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CatalogList {
    #[schema(value_type = Vec<CatalogEntry>)]
    pub items: Vec<CatalogEntry>,
}
