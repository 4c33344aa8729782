//! Category → product reference resolution.

use crate::domain::collection::CollectionName;
use crate::domain::record::Record;
use crate::domain::schema::{resolved_field_name, Cardinality, ReferenceSchema, ALL_PRODUCTS_FIELD};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Records of one target collection, indexed by id. Later duplicates win.
type TargetIndex<'a> = HashMap<&'a str, &'a Record>;

fn index(records: &[Record]) -> TargetIndex<'_> {
    let mut by_id = HashMap::with_capacity(records.len());
    for record in records {
        by_id.insert(record.id.as_str(), record);
    }
    by_id
}

/// Resolves product references on every category and embeds the complete
/// product list under `allProducts`.
///
/// Only joins targeting the products collection are resolved here; joins to
/// any other collection are left untouched. Unknown ids are dropped. A
/// `Many` join writes an array under `<field>_data`, a `One` join writes the
/// first resolved record. The function is total and idempotent: running it
/// again on its own output produces the same `allProducts` and `*_data`
/// fields.
pub fn resolve_category_references(
    categories: Vec<Record>,
    all_products: &[Record],
    schema: &ReferenceSchema,
) -> Vec<Record> {
    let targets = HashMap::from([(CollectionName::ProductDetail, index(all_products))]);
    let all_products_json = JsonValue::Array(all_products.iter().map(Record::to_json).collect());

    categories
        .into_iter()
        .map(|mut category| {
            resolve_record(&mut category, &targets, schema);
            category.set(ALL_PRODUCTS_FIELD, all_products_json.clone());
            category
        })
        .collect()
}

fn resolve_record(
    record: &mut Record,
    targets: &HashMap<CollectionName, TargetIndex<'_>>,
    schema: &ReferenceSchema,
) {
    for join in schema.reference_fields(record.fields.keys()) {
        let Some(lookup) = targets.get(&join.target) else {
            continue;
        };
        let Some(value) = record.fields.get(&join.field) else {
            continue;
        };
        let mut resolved: Vec<JsonValue> = reference_ids(value)
            .into_iter()
            .filter_map(|id| lookup.get(id.as_str()))
            .map(|target| target.to_json())
            .collect();
        if resolved.is_empty() {
            continue;
        }
        let embedded = match join.cardinality {
            Cardinality::Many => JsonValue::Array(resolved),
            Cardinality::One => resolved.swap_remove(0),
        };
        record.set(resolved_field_name(&join.field), embedded);
    }
}

/// Ids carried by a reference value: a string, an expanded record with
/// `_id`/`id`, or an array of either. Anything else carries no ids.
pub fn reference_ids(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => vec![s.clone()],
        JsonValue::Object(_) => object_id(value).into_iter().collect(),
        JsonValue::Array(values) => values
            .iter()
            .filter_map(|v| match v {
                JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
                JsonValue::Object(_) => object_id(v),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn object_id(value: &JsonValue) -> Option<String> {
    value
        .get("_id")
        .or_else(|| value.get("id"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::ReferenceField;
    use serde_json::json;

    fn products() -> Vec<Record> {
        vec![
            Record::new("p1").with("name", "Ginger"),
            Record::new("p2").with("name", "Cocoa"),
        ]
    }

    #[test]
    fn resolves_known_ids_and_embeds_every_product() {
        let category = Record::new("c1").with("productReferences", json!(["p1", "p9"]));
        let out = resolve_category_references(vec![category], &products(), &ReferenceSchema::categories());

        assert_eq!(
            out[0].get("productReferences_data"),
            Some(&json!([{"id": "p1", "name": "Ginger"}]))
        );
        assert_eq!(
            out[0].get("allProducts"),
            Some(&json!([{"id": "p1", "name": "Ginger"}, {"id": "p2", "name": "Cocoa"}]))
        );
    }

    #[test]
    fn heuristic_mode_matches_declared_mode_on_known_fields() {
        let category = Record::new("c1")
            .with("productReferences", json!(["p2"]))
            .with("featuredItem", json!("p1"));
        let out = resolve_category_references(vec![category], &products(), &ReferenceSchema::NameHeuristic);

        assert_eq!(out[0].get("productReferences_data"), Some(&json!([{"id": "p2", "name": "Cocoa"}])));
        assert_eq!(out[0].get("featuredItem_data"), Some(&json!([{"id": "p1", "name": "Ginger"}])));
    }

    #[test]
    fn empty_products_yield_empty_embeds_and_no_data_fields() {
        let category = Record::new("c1").with("productReferences", json!(["p1"]));
        let out = resolve_category_references(vec![category], &[], &ReferenceSchema::categories());

        assert_eq!(out[0].get("allProducts"), Some(&json!([])));
        assert!(out[0].get("productReferences_data").is_none());
    }

    #[test]
    fn categories_without_references_only_gain_all_products() {
        let category = Record::new("c1").with("title", "Spices");
        let out = resolve_category_references(vec![category.clone()], &products(), &ReferenceSchema::NameHeuristic);

        let mut expected = category;
        expected.set("allProducts", JsonValue::Array(products().iter().map(Record::to_json).collect()));
        assert_eq!(out[0], expected);
    }

    #[test]
    fn resolution_is_idempotent() {
        let categories = vec![
            Record::new("c1").with("productReferences", json!(["p1", "p9"])),
            Record::new("c2").with("featuredProduct", json!({"_id": "p2", "name": "Cocoa"})),
        ];
        for schema in [ReferenceSchema::categories(), ReferenceSchema::NameHeuristic] {
            let once = resolve_category_references(categories.clone(), &products(), &schema);
            let twice = resolve_category_references(once.clone(), &products(), &schema);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn duplicate_product_ids_keep_the_last_record() {
        let dupes = vec![
            Record::new("p1").with("name", "Old"),
            Record::new("p1").with("name", "New"),
        ];
        let category = Record::new("c1").with("products", json!(["p1"]));
        let out = resolve_category_references(vec![category], &dupes, &ReferenceSchema::categories());

        assert_eq!(out[0].get("products_data"), Some(&json!([{"id": "p1", "name": "New"}])));
    }

    #[test]
    fn single_valued_joins_embed_one_record() {
        let category = Record::new("c1").with("featuredProduct", json!("p2"));
        let out = resolve_category_references(vec![category], &products(), &ReferenceSchema::categories());

        assert_eq!(out[0].get("featuredProduct_data"), Some(&json!({"id": "p2", "name": "Cocoa"})));
    }

    #[test]
    fn joins_to_other_collections_are_not_resolved_against_products() {
        let schema = ReferenceSchema::Declared(vec![
            ReferenceField::new("productReferences", CollectionName::ProductDetail, Cardinality::Many),
            ReferenceField::new("services", CollectionName::Services, Cardinality::Many),
        ]);
        let category = Record::new("c1")
            .with("productReferences", json!(["p1"]))
            .with("services", json!(["p1"]));
        let out = resolve_category_references(vec![category], &products(), &schema);

        assert!(out[0].get("productReferences_data").is_some());
        assert!(out[0].get("services_data").is_none());
    }

    #[test]
    fn reference_ids_ignore_non_id_values() {
        assert_eq!(reference_ids(&json!(42)), Vec::<String>::new());
        assert_eq!(reference_ids(&json!(["a", 1, {"id": "b"}, ""])), vec!["a", "b"]);
    }
}
