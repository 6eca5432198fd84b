use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Product record as stored by the remote product API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub sale: f64,
    /// Empty when the stored record has no image.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, alias = "listImages")]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body sent on create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub sale: f64,
    pub image: String,
    pub gallery: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
}

impl ProductPayload {
    pub fn into_product(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            category: self.category,
            price: self.price,
            sale: self.sale,
            image: self.image,
            gallery: self.gallery,
            tags: self.tags,
            description: self.description,
        }
    }
}

impl From<&Product> for ProductPayload {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            sale: product.sale,
            image: product.image.clone(),
            gallery: product.gallery.clone(),
            tags: product.tags.clone(),
            description: product.description.clone(),
        }
    }
}

/// Selectable product tags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tag {
    Recents,
    Home,
    Applications,
    Desk,
    Chair,
    Sofa,
}

impl Tag {
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Recents => "Recents",
            Tag::Home => "Home",
            Tag::Applications => "Applications",
            Tag::Desk => "Desk",
            Tag::Chair => "Chair",
            Tag::Sofa => "Sofa",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagOption {
    pub id: Tag,
    pub label: String,
}

pub fn tag_vocabulary() -> Vec<TagOption> {
    Tag::iter()
        .map(|id| TagOption {
            id,
            label: id.label().to_string(),
        })
        .collect()
}

/// Content types accepted for product images.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// A file picked in the form but not uploaded yet.
#[derive(Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_accepted_image(&self) -> bool {
        ACCEPTED_IMAGE_TYPES
            .iter()
            .any(|accepted| self.content_type.eq_ignore_ascii_case(accepted))
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Current value of an image field: either the URL already stored on the
/// product, or a new file that must be uploaded before the record is saved.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    Unchanged(String),
    Replaced(FileUpload),
}

impl ImageRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Unchanged(url) => Some(url),
            ImageRef::Replaced(_) => None,
        }
    }

    pub fn is_replaced(&self) -> bool {
        matches!(self, ImageRef::Replaced(_))
    }
}

/// Serialized view of an [`ImageRef`] for form state responses.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRefView {
    Unchanged { url: String },
    Replaced { file_name: String, content_type: String, size: usize },
}

impl From<&ImageRef> for ImageRefView {
    fn from(value: &ImageRef) -> Self {
        match value {
            ImageRef::Unchanged(url) => ImageRefView::Unchanged { url: url.clone() },
            ImageRef::Replaced(file) => ImageRefView::Replaced {
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                size: file.bytes.len(),
            },
        }
    }
}
