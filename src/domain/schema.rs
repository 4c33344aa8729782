//! Declared joins and item layouts per collection.
//!
//! Reference fields are listed explicitly instead of being discovered from
//! field names at runtime. The name heuristic is still available as an
//! opt-in [`ReferenceSchema::NameHeuristic`] for CMS schemas that are not
//! known ahead of time.

use crate::domain::collection::CollectionName;

/// Field populated on every category with the complete product list.
pub const ALL_PRODUCTS_FIELD: &str = "allProducts";

/// Suffix of the synthesized field holding resolved reference targets.
pub const RESOLVED_SUFFIX: &str = "_data";

/// CMS system fields start with this prefix (`_id`, `_owner`, ...).
pub const SYSTEM_FIELD_PREFIX: &str = "_";

const HEURISTIC_MARKERS: [&str; 4] = ["product", "reference", "category", "item"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// One declared join: `field` on the source collection holds ids of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceField {
    pub field: String,
    pub target: CollectionName,
    pub cardinality: Cardinality,
}

impl ReferenceField {
    pub fn new(field: &str, target: CollectionName, cardinality: Cardinality) -> Self {
        Self {
            field: field.to_string(),
            target,
            cardinality,
        }
    }
}

/// How reference fields on a record are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSchema {
    Declared(Vec<ReferenceField>),
    NameHeuristic,
}

impl ReferenceSchema {
    /// Default joins for the category collection.
    pub fn categories() -> Self {
        ReferenceSchema::Declared(vec![
            ReferenceField::new("productReferences", CollectionName::ProductDetail, Cardinality::Many),
            ReferenceField::new("products", CollectionName::ProductDetail, Cardinality::Many),
            ReferenceField::new("featuredProduct", CollectionName::ProductDetail, Cardinality::One),
        ])
    }

    /// Joins that apply to a record carrying `fields`. Declared joins keep
    /// their declaration order; heuristic joins follow field order and are
    /// always many-valued product references.
    pub fn reference_fields<'a, I>(&self, fields: I) -> Vec<ReferenceField>
    where
        I: IntoIterator<Item = &'a String>,
    {
        match self {
            ReferenceSchema::Declared(decls) => {
                let present: Vec<&String> = fields.into_iter().collect();
                decls
                    .iter()
                    .filter(|d| !is_synthesized(&d.field))
                    .filter(|d| present.iter().any(|f| **f == d.field))
                    .cloned()
                    .collect()
            }
            ReferenceSchema::NameHeuristic => fields
                .into_iter()
                .filter(|f| looks_like_reference(f))
                .map(|f| ReferenceField::new(f, CollectionName::ProductDetail, Cardinality::Many))
                .collect(),
        }
    }
}

/// Name-based reference detection.
pub fn looks_like_reference(field: &str) -> bool {
    if field.starts_with(SYSTEM_FIELD_PREFIX) || is_synthesized(field) {
        return false;
    }
    let lc = field.to_lowercase();
    HEURISTIC_MARKERS.iter().any(|m| lc.contains(m))
}

/// Fields written by the resolver itself.
pub fn is_synthesized(field: &str) -> bool {
    field == ALL_PRODUCTS_FIELD || field.ends_with(RESOLVED_SUFFIX)
}

pub fn resolved_field_name(field: &str) -> String {
    format!("{field}{RESOLVED_SUFFIX}")
}

/// Where an item's content lives in the CMS envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemLayout {
    /// Content under `data`.
    DataEnvelope,
    /// Content is the item's non-system top-level fields.
    TopLevel,
    /// `DataEnvelope` when `data` is a non-empty object, else `TopLevel`.
    #[default]
    Detect,
}

/// Item layout per collection. Everything the site reads uses `Detect`
/// except the carousel, which the CMS serves without a data envelope.
pub fn item_layout(collection: CollectionName) -> ItemLayout {
    match collection {
        CollectionName::CarouselImage => ItemLayout::TopLevel,
        _ => ItemLayout::Detect,
    }
}
