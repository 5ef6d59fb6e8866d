//! Country-name canonicalization.
//!
//! Every loader funnels raw labels through [`AliasResolver::resolve`], which
//! normalizes case and whitespace and then applies a fixed override table.
//! The table is validated once at construction: variants must already be in
//! normalized form and canonical values must be fixed points of the table, so
//! resolving a key a second time never changes it.

use indexmap::IndexMap;

use crate::constants::alias::ALIAS_OVERRIDES;
use crate::errors::AtlasError;
use crate::types::CanonicalKey;
use crate::utils::normalize_inline_whitespace;

/// Maps raw country names to canonical join keys.
#[derive(Clone, Debug)]
pub struct AliasResolver {
    overrides: IndexMap<String, CanonicalKey>,
}

impl AliasResolver {
    /// Build a resolver from the built-in override table.
    pub fn standard() -> Result<Self, AtlasError> {
        Self::new(ALIAS_OVERRIDES.iter().copied())
    }

    /// Build a resolver from `(variant, canonical)` pairs, validating the table.
    pub fn new<'a, I>(entries: I) -> Result<Self, AtlasError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut overrides = IndexMap::new();
        for (variant, canonical) in entries {
            let normalized_variant = normalize_name(variant);
            if normalized_variant.is_empty() || normalized_variant != variant {
                return Err(AtlasError::Configuration(format!(
                    "alias variant '{variant}' is not in normalized form (expected '{normalized_variant}')"
                )));
            }
            let normalized_canonical = normalize_name(canonical);
            if normalized_canonical.is_empty() {
                return Err(AtlasError::Configuration(format!(
                    "alias variant '{variant}' has no canonical value"
                )));
            }
            if normalized_canonical != canonical {
                return Err(AtlasError::Configuration(format!(
                    "canonical value '{canonical}' for alias '{variant}' is not in normalized form"
                )));
            }
            if let Some(previous) = overrides.get(variant)
                && previous != &CanonicalKey::new(canonical)
            {
                return Err(AtlasError::Configuration(format!(
                    "alias '{variant}' maps to both '{previous}' and '{canonical}'"
                )));
            }
            overrides.insert(variant.to_string(), CanonicalKey::new(canonical));
        }

        let resolver = Self { overrides };
        resolver.validate_fixed_points()?;
        Ok(resolver)
    }

    fn validate_fixed_points(&self) -> Result<(), AtlasError> {
        for (variant, canonical) in &self.overrides {
            if let Some(next) = self.overrides.get(canonical.as_str())
                && next != canonical
            {
                return Err(AtlasError::Configuration(format!(
                    "alias '{variant}' maps to '{canonical}', which itself maps to '{next}'"
                )));
            }
        }
        Ok(())
    }

    /// Resolve a raw name to its canonical key.
    ///
    /// Returns `None` for empty or whitespace-only input. Names absent from the
    /// override table resolve to their normalized form.
    pub fn resolve(&self, raw: &str) -> Option<CanonicalKey> {
        let normalized = normalize_name(raw);
        if normalized.is_empty() {
            return None;
        }
        match self.overrides.get(&normalized) {
            Some(canonical) => Some(canonical.clone()),
            None => Some(CanonicalKey::new(normalized)),
        }
    }

    /// Number of override entries.
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Returns `true` when the override table is empty.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Iterate `(variant, canonical)` override pairs in table order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &CanonicalKey)> {
        self.overrides
            .iter()
            .map(|(variant, canonical)| (variant.as_str(), canonical))
    }
}

fn normalize_name(raw: &str) -> String {
    normalize_inline_whitespace(raw.to_lowercase())
}
