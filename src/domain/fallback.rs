//! Static substitute content and the fallback decision table.

use crate::domain::collection::CollectionName;
use crate::domain::record::Record;
use serde_json::json;

/// Error text fragments that identify failures inside the CMS itself
/// (as opposed to bad credentials or a missing collection).
pub const KNOWN_INTERNAL_SIGNATURES: [&str; 4] =
    ["WDE0", "internal error", "internal server error", "INTERNAL"];

/// Field set on emergency records so the presentation layer can tell
/// degraded content apart.
pub const EMERGENCY_FLAG_FIELD: &str = "isEmergencyFallback";

/// What to serve once a section has exhausted its fetch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    /// Static mock records for the collection.
    Mock,
    /// A single record flagged as degraded.
    Emergency,
    /// Nothing; the section renders its own empty state.
    Empty,
    /// Return the error to the caller.
    Propagate,
}

impl FallbackAction {
    /// | credentials | internal signature | required | action    |
    /// |-------------|--------------------|----------|-----------|
    /// | no          | any                | any      | Mock      |
    /// | yes         | any                | yes      | Propagate |
    /// | yes         | yes                | no       | Emergency |
    /// | yes         | no                 | no       | Empty     |
    pub fn decide(credentials_present: bool, internal_signature: bool, required: bool) -> Self {
        match (credentials_present, internal_signature, required) {
            (false, _, _) => FallbackAction::Mock,
            (true, _, true) => FallbackAction::Propagate,
            (true, true, false) => FallbackAction::Emergency,
            (true, false, false) => FallbackAction::Empty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FallbackAction::Mock => "mock",
            FallbackAction::Emergency => "emergency",
            FallbackAction::Empty => "empty",
            FallbackAction::Propagate => "propagate",
        }
    }
}

/// True when `text` contains any of `signatures` (case-insensitive).
pub fn matches_internal_signature(text: &str, signatures: &[String]) -> bool {
    let lc = text.to_lowercase();
    signatures
        .iter()
        .filter(|s| !s.is_empty())
        .any(|s| lc.contains(&s.to_lowercase()))
}

pub fn default_signatures() -> Vec<String> {
    KNOWN_INTERNAL_SIGNATURES.iter().map(|s| s.to_string()).collect()
}

fn mock(id: &str) -> Record {
    let mut record = Record::new(id);
    record.is_active = Some(true);
    record
}

/// Static content served when no CMS credentials are configured.
pub fn mock_records(collection: CollectionName) -> Vec<Record> {
    match collection {
        CollectionName::Hero => vec![mock("mock-hero")
            .with("title", "Premium Agricultural Imports")
            .with("subtitle", "Sourcing quality produce from trusted growers worldwide")
            .with("ctaText", "Explore Our Products")
            .with("ctaLink", "#products")
            .with("backgroundImage", "/images/hero-bg.jpg")],
        CollectionName::About => vec![mock("mock-about")
            .with("title", "About Us")
            .with(
                "description",
                "We connect smallholder farms with international buyers, handling sourcing, quality control and logistics.",
            )
            .with("mission", "Reliable supply of traceable agricultural commodities.")
            .with("image", "/images/about.jpg")],
        CollectionName::CoreValues => vec![
            mock("mock-value-quality")
                .with("title", "Quality")
                .with("description", "Every shipment is graded and inspected.")
                .with("reference", "mock-about"),
            mock("mock-value-integrity")
                .with("title", "Integrity")
                .with("description", "Fair prices and transparent contracts with growers.")
                .with("reference", "mock-about"),
        ],
        CollectionName::Services => vec![
            mock("mock-service-sourcing")
                .with("title", "Sourcing")
                .with("description", "Direct relationships with certified farms."),
            mock("mock-service-logistics")
                .with("title", "Logistics")
                .with("description", "Door-to-port shipping and customs clearance."),
        ],
        CollectionName::ProductCatalog => vec![
            mock("mock-category-spices")
                .with("name", "Spices")
                .with("productReferences", json!(["mock-product-ginger"])),
            mock("mock-category-beans")
                .with("name", "Beans & Seeds")
                .with("productReferences", json!(["mock-product-cocoa"])),
        ],
        CollectionName::ProductDetail => vec![
            mock("mock-product-ginger")
                .with("name", "Ginger")
                .with("description", "Dried split ginger, sun-dried.")
                .with("category", "mock-category-spices"),
            mock("mock-product-cocoa")
                .with("name", "Cocoa")
                .with("description", "Fermented cocoa beans.")
                .with("category", "mock-category-beans"),
        ],
        CollectionName::Contact => vec![mock("mock-contact")
            .with("email", "info@example.com")
            .with("phone", "+1 000 000 0000")
            .with("address", "Head office address not configured")],
        CollectionName::CarouselImage => vec![
            mock("mock-carousel-1")
                .with("image", "/images/carousel-1.jpg")
                .with("alt", "Harvest"),
            mock("mock-carousel-2")
                .with("image", "/images/carousel-2.jpg")
                .with("alt", "Warehouse"),
        ],
    }
}

/// Single degraded record served while the CMS reports internal errors.
pub fn emergency_record(collection: CollectionName) -> Record {
    let base = Record::new(format!("emergency-{}", collection.slug()))
        .with(EMERGENCY_FLAG_FIELD, true)
        .with("title", "Content temporarily unavailable");
    match collection {
        CollectionName::About => base.with(
            "description",
            "Our company information is being updated. Please check back shortly.",
        ),
        CollectionName::Contact => base.with("email", "info@example.com"),
        _ => base,
    }
}
