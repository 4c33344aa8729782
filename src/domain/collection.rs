use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical CMS collections consumed by the site.
///
/// The slug is the stable name used by the inbound API; the CMS collection id
/// defaults to [`CollectionName::default_collection_id`] and can be overridden
/// per deployment through `CmsConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionName {
    Hero,
    About,
    CoreValues,
    Services,
    /// Product categories.
    #[serde(rename = "categories")]
    ProductCatalog,
    /// Individual products.
    #[serde(rename = "products")]
    ProductDetail,
    Contact,
    #[serde(rename = "carousel-images")]
    CarouselImage,
}

impl CollectionName {
    pub const ALL: [CollectionName; 8] = [
        CollectionName::Hero,
        CollectionName::About,
        CollectionName::CoreValues,
        CollectionName::Services,
        CollectionName::ProductCatalog,
        CollectionName::ProductDetail,
        CollectionName::Contact,
        CollectionName::CarouselImage,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            CollectionName::Hero => "hero",
            CollectionName::About => "about",
            CollectionName::CoreValues => "core-values",
            CollectionName::Services => "services",
            CollectionName::ProductCatalog => "categories",
            CollectionName::ProductDetail => "products",
            CollectionName::Contact => "contact",
            CollectionName::CarouselImage => "carousel-images",
        }
    }

    pub fn default_collection_id(self) -> &'static str {
        match self {
            CollectionName::Hero => "Hero",
            CollectionName::About => "About",
            CollectionName::CoreValues => "CoreValues",
            CollectionName::Services => "Services",
            CollectionName::ProductCatalog => "ProductCatalog",
            CollectionName::ProductDetail => "ProductDetail",
            CollectionName::Contact => "Contact",
            CollectionName::CarouselImage => "CarouselImage",
        }
    }

    /// Env var holding the collection id override.
    pub fn env_override_key(self) -> &'static str {
        match self {
            CollectionName::Hero => "WIX_COLLECTION_HERO",
            CollectionName::About => "WIX_COLLECTION_ABOUT",
            CollectionName::CoreValues => "WIX_COLLECTION_CORE_VALUES",
            CollectionName::Services => "WIX_COLLECTION_SERVICES",
            CollectionName::ProductCatalog => "WIX_COLLECTION_CATEGORIES",
            CollectionName::ProductDetail => "WIX_COLLECTION_PRODUCTS",
            CollectionName::Contact => "WIX_COLLECTION_CONTACT",
            CollectionName::CarouselImage => "WIX_COLLECTION_CAROUSEL",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection '{0}'")]
pub struct UnknownCollection(pub String);

impl FromStr for CollectionName {
    type Err = UnknownCollection;

    /// Accepts the slug or the default CMS id, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CollectionName::ALL
            .into_iter()
            .find(|c| {
                c.slug().eq_ignore_ascii_case(needle)
                    || c.default_collection_id().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slugs_and_cms_ids() {
        assert_eq!("categories".parse::<CollectionName>(), Ok(CollectionName::ProductCatalog));
        assert_eq!("ProductDetail".parse::<CollectionName>(), Ok(CollectionName::ProductDetail));
        assert_eq!(" HERO ".parse::<CollectionName>(), Ok(CollectionName::Hero));
        assert!("blog".parse::<CollectionName>().is_err());
    }

    #[test]
    fn serialized_names_are_the_slugs() {
        for c in CollectionName::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), serde_json::json!(c.slug()));
            let back: CollectionName = serde_json::from_value(serde_json::json!(c.slug())).unwrap();
            assert_eq!(back, c);
        }
    }
}
