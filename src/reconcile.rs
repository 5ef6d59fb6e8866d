//! Left-anchored join of article counts and metadata onto the boundary entities.
//!
//! The geo entity list is the universe: the output has exactly one row per
//! entity, in entity order, whether or not anything matched. Unmatched rows
//! carry zero articles and no population or GDP.
//!
//! If two entities share a canonical key, both receive the same attached data.
//! This is reported through [`alias_collisions`] and a warning, never repaired.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{GeoEntity, MetadataRecord, ReconciledRow};
use crate::types::{CanonicalKey, DisplayName};

/// Canonical key shared by more than one geo entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AliasCollision {
    /// Key claimed by several entities.
    pub key: CanonicalKey,
    /// Display names of the colliding entities, in boundary order.
    pub display_names: Vec<DisplayName>,
}

/// List canonical keys claimed by more than one geo entity, in first-seen order.
pub fn alias_collisions(geo_entities: &[GeoEntity]) -> Vec<AliasCollision> {
    let mut by_key: IndexMap<&CanonicalKey, Vec<DisplayName>> = IndexMap::new();
    for entity in geo_entities {
        if let Some(key) = &entity.key {
            by_key
                .entry(key)
                .or_default()
                .push(entity.display_name.clone());
        }
    }
    by_key
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(key, display_names)| AliasCollision {
            key: key.clone(),
            display_names,
        })
        .collect()
}

/// Join article counts and metadata onto `geo_entities`.
///
/// Derived metrics are left unset; see [`crate::metrics::derive_metrics`].
pub fn reconcile(
    geo_entities: &[GeoEntity],
    article_counts_by_key: &IndexMap<CanonicalKey, u64>,
    metadata_by_key: &IndexMap<CanonicalKey, MetadataRecord>,
) -> Vec<ReconciledRow> {
    for collision in alias_collisions(geo_entities) {
        warn!(
            key = %collision.key,
            entities = ?collision.display_names,
            "geo entities share a canonical key; attached data is duplicated"
        );
    }

    let mut matched_articles = 0usize;
    let mut matched_metadata = 0usize;
    let rows: Vec<ReconciledRow> = geo_entities
        .iter()
        .map(|entity| {
            let total_articles = entity
                .key
                .as_ref()
                .and_then(|key| article_counts_by_key.get(key))
                .copied();
            let metadata = entity.key.as_ref().and_then(|key| metadata_by_key.get(key));
            matched_articles += usize::from(total_articles.is_some());
            matched_metadata += usize::from(metadata.is_some());
            ReconciledRow {
                display_name: entity.display_name.clone(),
                key: entity.key.clone(),
                total_articles: total_articles.unwrap_or(0),
                population: metadata.and_then(|record| record.population),
                gdp: metadata.and_then(|record| record.gdp),
                articles_per_million: None,
                articles_per_gdp_unit: None,
            }
        })
        .collect();

    debug!(
        entities = rows.len(),
        matched_articles,
        matched_metadata,
        unmatched_article_keys = article_counts_by_key
            .keys()
            .filter(|key| {
                !geo_entities
                    .iter()
                    .any(|entity| entity.key.as_ref() == Some(*key))
            })
            .count(),
        "reconciled coverage table"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasResolver;

    fn resolver() -> AliasResolver {
        AliasResolver::standard().unwrap()
    }

    fn entity(name: &str) -> GeoEntity {
        GeoEntity {
            key: resolver().resolve(name),
            display_name: name.to_string(),
        }
    }

    fn meta(country: &str, population: Option<f64>, gdp: Option<f64>) -> MetadataRecord {
        MetadataRecord {
            country: country.to_string(),
            key: resolver().resolve(country),
            population,
            gdp,
        }
    }

    #[test]
    fn every_entity_appears_once_in_order() {
        let geo = vec![entity("Kenya"), entity("Ghana"), entity("Togo")];
        let mut counts = IndexMap::new();
        counts.insert(resolver().resolve("Ghana").unwrap(), 4);
        counts.insert(resolver().resolve("Atlantis").unwrap(), 9);
        let rows = reconcile(&geo, &counts, &IndexMap::new());

        let names: Vec<&str> = rows.iter().map(|row| row.display_name.as_str()).collect();
        assert_eq!(names, vec!["Kenya", "Ghana", "Togo"]);
        assert_eq!(rows[0].total_articles, 0);
        assert_eq!(rows[1].total_articles, 4);
    }

    #[test]
    fn unmatched_metadata_stays_null() {
        let geo = vec![entity("Kenya"), entity("Chad")];
        let mut metadata = IndexMap::new();
        let kenya = meta("Kenya", Some(53_005_000.0), Some(110.0));
        metadata.insert(kenya.key.clone().unwrap(), kenya);
        let rows = reconcile(&geo, &IndexMap::new(), &metadata);

        assert_eq!(rows[0].population, Some(53_005_000.0));
        assert_eq!(rows[0].gdp, Some(110.0));
        assert_eq!(rows[1].population, None);
        assert_eq!(rows[1].gdp, None);
        assert_eq!(rows[1].total_articles, 0);
    }

    #[test]
    fn aliased_metadata_joins_display_name() {
        let geo = vec![entity("Ivory Coast")];
        let mut metadata = IndexMap::new();
        let record = meta("Côte d'Ivoire", Some(28_000_000.0), Some(70.0));
        metadata.insert(record.key.clone().unwrap(), record);
        let rows = reconcile(&geo, &IndexMap::new(), &metadata);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].population, Some(28_000_000.0));
    }

    #[test]
    fn colliding_entities_both_receive_data() {
        let geo = vec![entity("Swaziland"), entity("eSwatini")];
        let collisions = alias_collisions(&geo);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].key.as_str(), "eswatini");
        assert_eq!(collisions[0].display_names, vec!["Swaziland", "eSwatini"]);

        let mut counts = IndexMap::new();
        counts.insert(resolver().resolve("eswatini").unwrap(), 2);
        let rows = reconcile(&geo, &counts, &IndexMap::new());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.total_articles == 2));
    }

    #[test]
    fn keyless_entity_gets_zero_and_null() {
        let geo = vec![
            entity("Kenya"),
            GeoEntity {
                key: None,
                display_name: String::new(),
            },
        ];
        let mut counts = IndexMap::new();
        counts.insert(resolver().resolve("Kenya").unwrap(), 3);
        let mut metadata = IndexMap::new();
        let kenya = meta("Kenya", Some(53_005_000.0), Some(110.0));
        metadata.insert(kenya.key.clone().unwrap(), kenya);

        let rows = reconcile(&geo, &counts, &metadata);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_articles, 3);
        assert_eq!(rows[1].key, None);
        assert_eq!(rows[1].total_articles, 0);
        assert_eq!(rows[1].population, None);
        assert_eq!(rows[1].gdp, None);
        assert!(alias_collisions(&geo).is_empty());
    }

    #[test]
    fn empty_universe_yields_empty_table() {
        let mut counts = IndexMap::new();
        counts.insert(resolver().resolve("Kenya").unwrap(), 1);
        assert!(reconcile(&[], &counts, &IndexMap::new()).is_empty());
        assert!(alias_collisions(&[]).is_empty());
    }
}
