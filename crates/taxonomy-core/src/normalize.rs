//! Term normalization: raw label -> canonical slug and labels.
//!
//! A raw label is slugified, then the taxonomy's per-term settings are
//! applied: redirects are followed to their terminal slug and configured
//! labels decide what the term record and the association display.

use std::collections::{BTreeMap, HashSet};

use crate::config::{TaxonomyConfig, TermSettings};
use crate::error::ConfigurationError;
use crate::model::TaxonomyKey;
use crate::slug::Slugifier;

pub type Taxonomies = BTreeMap<TaxonomyKey, TaxonomyConfig>;

/// Result of normalizing one raw label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTerm {
    /// Slug of the raw label before any redirect
    pub raw_slug: String,
    /// Terminal slug after following redirects
    pub slug: String,
    /// Label kept on the association
    pub label: String,
    /// Label for the term record
    pub term_label: String,
    /// The term label was carried over a redirect, not configured
    pub labelled_from_redirect: bool,
}

/// Outcome of applying term settings to a (slug, label) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSettings {
    pub slug: String,
    pub label: String,
    /// Configured label of the terminal term, if any
    pub final_label: Option<String>,
}

fn taxonomy<'a>(
    taxonomies: &'a Taxonomies,
    key: &str,
) -> Result<&'a TaxonomyConfig, ConfigurationError> {
    taxonomies
        .get(key)
        .ok_or_else(|| ConfigurationError::UnknownTaxonomy(key.to_string()))
}

/// Walks a redirect chain and hands back the settings of the terminal slug.
fn resolve_chain<'a>(
    taxonomy_key: &str,
    config: &'a TaxonomyConfig,
    slug: &str,
) -> Result<(String, Option<&'a TermSettings>), ConfigurationError> {
    let mut current = slug.to_string();
    let mut visited = HashSet::new();
    let mut chain = Vec::new();

    loop {
        chain.push(current.clone());
        if !visited.insert(current.clone()) {
            return Err(ConfigurationError::RedirectCycle {
                taxonomy: taxonomy_key.to_string(),
                chain,
            });
        }

        match config.term_settings(&current) {
            Some(TermSettings {
                redirect: Some(target),
                ..
            }) => current = target.clone(),
            settings => return Ok((current, settings)),
        }
    }
}

/// Follow redirects only; used where a slug is supplied directly.
pub fn follow_slug_redirect(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    slug: &str,
) -> Result<String, ConfigurationError> {
    let config = taxonomy(taxonomies, taxonomy_key)?;
    resolve_chain(taxonomy_key, config, slug).map(|(slug, _)| slug)
}

/// Apply the per-term settings to an already slugified term.
pub fn apply_term_settings(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    slug: &str,
    label: &str,
) -> Result<AppliedSettings, ConfigurationError> {
    let config = taxonomy(taxonomies, taxonomy_key)?;
    let (slug, settings) = resolve_chain(taxonomy_key, config, slug)?;

    let Some(settings) = settings else {
        return Ok(AppliedSettings {
            slug,
            label: label.to_string(),
            final_label: None,
        });
    };

    let forced = settings.override_label || config.always_override_label;
    let label = match (&settings.label, forced) {
        (Some(configured), true) => configured.clone(),
        _ => label.to_string(),
    };

    Ok(AppliedSettings {
        slug,
        label,
        final_label: settings.label.clone(),
    })
}

/// Slugify with the taxonomy's configured style.
pub fn slugify_with_settings(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    label: &str,
) -> Result<String, ConfigurationError> {
    let config = taxonomy(taxonomies, taxonomy_key)?;
    Ok(config.slugify.slugify(label))
}

/// Slugify a label and follow its redirects.
pub fn slugify_and_redirect(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    label: &str,
    slugifier: &dyn Slugifier,
) -> Result<String, ConfigurationError> {
    let slug = slugifier.slugify(label);
    follow_slug_redirect(taxonomies, taxonomy_key, &slug)
}

/// Normalize a raw label with the taxonomy's own slug style.
pub fn normalize(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    raw_label: &str,
) -> Result<Option<NormalizedTerm>, ConfigurationError> {
    let style = taxonomy(taxonomies, taxonomy_key)?.slugify;
    normalize_with(taxonomies, taxonomy_key, raw_label, &style)
}

/// Normalize a raw label.
///
/// Returns `Ok(None)` for labels that carry no term: empty strings and
/// labels whose slug is empty.
pub fn normalize_with(
    taxonomies: &Taxonomies,
    taxonomy_key: &str,
    raw_label: &str,
    slugifier: &dyn Slugifier,
) -> Result<Option<NormalizedTerm>, ConfigurationError> {
    if raw_label.is_empty() {
        return Ok(None);
    }

    let raw_slug = slugifier.slugify(raw_label);
    if raw_slug.is_empty() {
        return Ok(None);
    }

    let applied = apply_term_settings(taxonomies, taxonomy_key, &raw_slug, raw_label)?;
    let labelled_from_redirect = applied.final_label.is_none() && raw_slug != applied.slug;
    let term_label = applied
        .final_label
        .clone()
        .unwrap_or_else(|| applied.label.clone());

    Ok(Some(NormalizedTerm {
        raw_slug,
        slug: applied.slug,
        label: applied.label,
        term_label,
        labelled_from_redirect,
    }))
}
