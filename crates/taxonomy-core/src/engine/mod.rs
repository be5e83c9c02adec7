use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assembler::NodeAssembler;
use crate::associations::AssociationBuilder;
use crate::config::PluginConfig;
use crate::counter::count_terms;
use crate::error::Result;
use crate::model::{
    Association, ContentNode, CountedTerm, NodeId, PageRequest, TaxonomyKey, TaxonomyNode,
    TermListing, VALUE_TERM_TYPE,
};
use crate::normalize::slugify_and_redirect;
use crate::pages::{plan_pages, TemplateLocator};
use crate::resolver::ResolverTable;
use crate::slug::{Slugifier, SlugifierOverrides};
use crate::store::{GraphStore, MemoryStore, NodeFilter};

#[cfg(test)]
mod tests;

/// The TaxonomyEngine is the high-level facade of the plugin.
///
/// It mirrors the build hooks of a static-site host:
///
/// *   `source_taxonomies` once, before content is processed,
/// *   `on_create_node` for every content node the host creates,
/// *   `count_terms` / `value_terms_by_taxonomy` / `to_term_slug` as
///     read-side resolvers,
/// *   `plan_pages` once all content has been seen.
///
/// The configuration is owned immutably for the whole build.
pub struct TaxonomyEngine<S: GraphStore = MemoryStore> {
    config: PluginConfig,
    resolvers: ResolverTable,
    slugifiers: SlugifierOverrides,
    store: S,
}

impl TaxonomyEngine<MemoryStore> {
    pub fn in_memory(config: PluginConfig, resolvers: ResolverTable) -> Self {
        Self::new(config, resolvers, MemoryStore::new())
    }
}

impl<S: GraphStore> TaxonomyEngine<S> {
    pub fn new(config: PluginConfig, resolvers: ResolverTable, store: S) -> Self {
        Self {
            config,
            resolvers,
            slugifiers: SlugifierOverrides::new(),
            store,
        }
    }

    /// Use a custom slug function for one taxonomy instead of its configured style.
    pub fn with_slugifier(mut self, taxonomy: &str, slugifier: impl Slugifier + 'static) -> Self {
        self.slugifiers
            .insert(taxonomy.to_string(), Arc::new(slugifier));
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------------
    // Build hooks (writes)
    // ------------------------------------------------------------------------

    /// Create one Taxonomy node per configured taxonomy.
    pub fn source_taxonomies(&mut self) -> Result<Vec<TaxonomyNode>> {
        let mut sourced = Vec::with_capacity(self.config.taxonomies.len());
        for (key, options) in &self.config.taxonomies {
            let taxonomy = TaxonomyNode {
                key: key.clone(),
                label: options.label.clone(),
                label_singular: options.label_singular.clone(),
                taxonomy_page_path: options.index_path(key),
                term_page_path: options.term_path(key),
            };
            self.store
                .create_node(NodeAssembler::taxonomy(taxonomy.clone())?)?;
            sourced.push(taxonomy);
        }
        debug!("sourced {} taxonomies", sourced.len());
        Ok(sourced)
    }

    /// Derive terms and associations for a node already present in the store.
    pub fn on_create_node(&mut self, node: &ContentNode) -> Result<Vec<Association>> {
        AssociationBuilder::new(&self.config, &self.resolvers)
            .with_slugifiers(&self.slugifiers)
            .build(&mut self.store, node)
    }

    /// Store a content node, then run `on_create_node` for it.
    pub fn add_content_node(&mut self, node: &ContentNode) -> Result<Vec<Association>> {
        self.store.create_node(NodeAssembler::content(node)?)?;
        self.on_create_node(node)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn count_terms(&self, taxonomy: &str) -> Result<Vec<CountedTerm>> {
        self.config.taxonomy(taxonomy)?;
        count_terms(&self.store, taxonomy)
    }

    /// Terms of one content node grouped by taxonomy, labelled as written
    /// on the node and slugged canonically.
    pub fn value_terms_by_taxonomy(
        &self,
        value: &NodeId,
    ) -> Result<BTreeMap<TaxonomyKey, Vec<TermListing>>> {
        let mut grouped: BTreeMap<TaxonomyKey, Vec<TermListing>> = BTreeMap::new();
        let filter = NodeFilter::of_type(VALUE_TERM_TYPE).with_parent(*value);

        for node in self.store.run_query(&filter)? {
            let Some(association) = node.as_association() else {
                continue;
            };
            let Some(term_node) = self.store.get_node(&association.term)? else {
                continue;
            };
            let Some(term) = term_node.as_term() else {
                continue;
            };
            grouped
                .entry(association.taxonomy.clone())
                .or_default()
                .push(TermListing {
                    slug: term.slug.clone(),
                    label: association.label.clone(),
                });
        }
        Ok(grouped)
    }

    /// Slug of the term a raw label ends up at.
    pub fn to_term_slug(&self, taxonomy: &str, raw: &str) -> Result<String> {
        let options = self.config.taxonomy(taxonomy)?;
        let slugifier: &dyn Slugifier = match self.slugifiers.get(taxonomy) {
            Some(custom) => custom.as_ref(),
            None => &options.slugify,
        };
        Ok(slugify_and_redirect(
            &self.config.taxonomies,
            taxonomy,
            raw,
            slugifier,
        )?)
    }

    pub fn plan_pages(&self, templates: &dyn TemplateLocator) -> Result<Vec<PageRequest>> {
        plan_pages(&self.store, &self.config, templates)
    }

    /// Log per-taxonomy term statistics when enabled in the config.
    pub fn log_stats(&self) -> Result<()> {
        if !self.config.logging.show_stats {
            return Ok(());
        }
        for key in self.config.taxonomies.keys() {
            let counted = count_terms(&self.store, key)?;
            let uses: usize = counted.iter().map(|c| c.count).sum();
            info!("{}: {} terms, {} associations", key, counted.len(), uses);
        }
        Ok(())
    }
}
