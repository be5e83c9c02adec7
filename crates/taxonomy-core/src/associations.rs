use log::{debug, warn};
use std::collections::HashMap;

use crate::assembler::NodeAssembler;
use crate::config::PluginConfig;
use crate::error::{Result, StoreError};
use crate::identity::{value_term_id, value_terms_id};
use crate::model::{Association, ContentNode, TaxonomyKey};
use crate::normalize::{normalize_with, NormalizedTerm};
use crate::registry::get_or_create_term;
use crate::resolver::{raw_labels, ResolveContext, ResolverTable};
use crate::slug::{Slugifier, SlugifierOverrides};
use crate::store::GraphStore;

/// Links content nodes to the terms their resolver reports.
pub struct AssociationBuilder<'a> {
    config: &'a PluginConfig,
    resolvers: &'a ResolverTable,
    slugifiers: Option<&'a SlugifierOverrides>,
}

impl<'a> AssociationBuilder<'a> {
    pub fn new(config: &'a PluginConfig, resolvers: &'a ResolverTable) -> Self {
        Self {
            config,
            resolvers,
            slugifiers: None,
        }
    }

    pub fn with_slugifiers(mut self, slugifiers: &'a SlugifierOverrides) -> Self {
        self.slugifiers = Some(slugifiers);
        self
    }

    fn slugifier(&self, key: &str) -> &'a dyn Slugifier {
        if let Some(custom) = self.slugifiers.and_then(|s| s.get(key)) {
            return custom.as_ref();
        }
        &self.config.taxonomies[key].slugify
    }

    /// Resolve and normalize every term of `node` without touching the store.
    ///
    /// `None` when no resolver is registered for the node type. Every raw
    /// label is kept, in resolver order, so that each one reaches the term
    /// registry even when several share a canonical slug.
    pub fn plan(&self, node: &ContentNode) -> Result<Option<Vec<(TaxonomyKey, NormalizedTerm)>>> {
        let Some(resolver) = self.resolvers.get(&node.node_type) else {
            return Ok(None);
        };

        let mut planned = Vec::new();

        for (key, options) in &self.config.taxonomies {
            let ctx = ResolveContext {
                node,
                key,
                options,
                config: self.config,
            };

            for raw_label in raw_labels(resolver.resolve(&ctx), &node.node_type)? {
                let normalized = normalize_with(
                    &self.config.taxonomies,
                    key,
                    &raw_label,
                    self.slugifier(key),
                )?;
                let Some(term) = normalized else {
                    warn!(
                        "skipping empty {} term {:?} on node {}",
                        key, raw_label, node.id
                    );
                    continue;
                };

                planned.push((key.clone(), term));
            }
        }

        Ok(Some(planned))
    }

    /// Write the terms, associations and the value-terms marker for `node`.
    ///
    /// The content node must already be in the store. Nothing is written
    /// when resolving or normalizing any of its terms fails. Labels sharing
    /// a canonical slug each upsert the term but yield one association,
    /// which carries the last of those labels.
    pub fn build<S: GraphStore + ?Sized>(
        &self,
        store: &mut S,
        node: &ContentNode,
    ) -> Result<Vec<Association>> {
        let Some(planned) = self.plan(node)? else {
            debug!("no terms resolver for {} nodes", node.node_type);
            return Ok(Vec::new());
        };

        if store.get_node(&node.id)?.is_none() {
            return Err(StoreError::ParentNotFound(node.id).into());
        }

        let mut associations: Vec<Association> = Vec::with_capacity(planned.len());
        let mut positions: HashMap<(TaxonomyKey, String), usize> = HashMap::new();
        for (key, term) in planned {
            let record = get_or_create_term(
                store,
                &key,
                &term.slug,
                &term.term_label,
                term.labelled_from_redirect,
            )?;

            let association = Association {
                id: value_term_id(&node.id, &key, &term.slug),
                taxonomy: key.clone(),
                label: term.label,
                term: record.id,
                value: node.id,
            };
            store.create_node(NodeAssembler::value_term(association.clone())?)?;
            store.create_parent_child_link(&node.id, &association.id)?;

            match positions.get(&(key.clone(), term.slug.clone())) {
                Some(&index) => associations[index] = association,
                None => {
                    positions.insert((key, term.slug), associations.len());
                    associations.push(association);
                }
            }
        }

        store.create_node(NodeAssembler::value_terms(&node.id)?)?;
        store.create_parent_child_link(&node.id, &value_terms_id(&node.id))?;

        debug!(
            "linked node {} to {} terms",
            node.id,
            associations.len()
        );
        Ok(associations)
    }
}

/// Build the associations of one content node with the configured slug styles.
pub fn build_associations<S: GraphStore + ?Sized>(
    store: &mut S,
    node: &ContentNode,
    config: &PluginConfig,
    resolvers: &ResolverTable,
) -> Result<Vec<Association>> {
    AssociationBuilder::new(config, resolvers).build(store, node)
}
