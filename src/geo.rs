//! Boundary reference loading.
//!
//! The boundary file defines the universe of output rows, so any problem
//! reading it is fatal: a missing file, invalid JSON, a missing feature array,
//! or a feature without a string `properties.name`. A blank name still yields
//! an entity, with no join key.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::alias::AliasResolver;
use crate::constants::geo::{FEATURES_KEY, NAME_PROPERTY, PROPERTIES_KEY};
use crate::data::GeoEntity;
use crate::errors::AtlasError;

/// Parsed boundary reference: named entities plus the raw feature collection.
///
/// The collection is kept for map rendering, which keys geometry by the same
/// display names carried by `entities`.
#[derive(Clone, Debug)]
pub struct GeoReference {
    /// One entity per feature, in file order.
    pub entities: Vec<GeoEntity>,
    /// The feature collection as parsed.
    pub collection: Value,
}

/// Load the named entities of the boundary file at `path`, in feature order.
pub fn load_geo_entities(
    path: &Path,
    resolver: &AliasResolver,
) -> Result<Vec<GeoEntity>, AtlasError> {
    load_geo_reference(path, resolver).map(|reference| reference.entities)
}

/// Load the boundary file at `path`, keeping the parsed collection.
pub fn load_geo_reference(
    path: &Path,
    resolver: &AliasResolver,
) -> Result<GeoReference, AtlasError> {
    let raw = fs::read_to_string(path).map_err(|err| AtlasError::fatal_input(path, err))?;
    let collection: Value =
        serde_json::from_str(&raw).map_err(|err| AtlasError::fatal_input(path, err))?;
    let entities = entities_from_collection(&collection, path, resolver)?;
    info!(path = %path.display(), entities = entities.len(), "loaded boundary reference");
    Ok(GeoReference {
        entities,
        collection,
    })
}

/// Extract entities from an already parsed feature collection.
pub fn entities_from_collection(
    collection: &Value,
    origin: &Path,
    resolver: &AliasResolver,
) -> Result<Vec<GeoEntity>, AtlasError> {
    let features = collection
        .get(FEATURES_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AtlasError::fatal_input(origin, format!("missing '{FEATURES_KEY}' array"))
        })?;

    let mut entities = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let display_name = feature
            .get(PROPERTIES_KEY)
            .and_then(|properties| properties.get(NAME_PROPERTY))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AtlasError::fatal_input(
                    origin,
                    format!("feature {idx} has no string '{PROPERTIES_KEY}.{NAME_PROPERTY}'"),
                )
            })?;
        let key = resolver.resolve(display_name);
        if key.is_none() {
            warn!(path = %origin.display(), feature = idx, "boundary feature has a blank name");
        }
        entities.push(GeoEntity {
            key,
            display_name: display_name.to_string(),
        });
    }
    Ok(entities)
}
