use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ConfigurationError, Result};
use crate::model::TaxonomyKey;
use crate::normalize::follow_slug_redirect;
use crate::slug::SlugStyle;

/// Top-level plugin configuration.
///
/// Loaded once per build and passed by reference to every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Declared taxonomies, keyed by taxonomy key (e.g. "tags")
    #[serde(default)]
    pub taxonomies: BTreeMap<TaxonomyKey, TaxonomyConfig>,
    /// Declarative terms resolvers, keyed by content node type
    #[serde(default)]
    pub resolvers: BTreeMap<String, ResolverConfig>,
    /// Whether `plan_pages` emits anything at all
    #[serde(default = "default_true")]
    pub create_pages: bool,
    #[serde(default = "default_taxonomy_template")]
    pub taxonomy_template: PathBuf,
    #[serde(default = "default_term_template")]
    pub term_template: PathBuf,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for a single taxonomy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Display label, e.g. "Tags"
    pub label: Option<String>,
    /// Singular display label, e.g. "Tag"
    pub label_singular: Option<String>,
    /// Index page path; defaults to the taxonomy key
    pub taxonomy_page_path: Option<String>,
    /// Term page prefix; defaults to the index page path
    pub term_page_path: Option<String>,
    /// Per-term overrides keyed by slug
    #[serde(default)]
    pub terms: BTreeMap<String, TermSettings>,
    #[serde(default)]
    pub slugify: SlugStyle,
    /// Apply configured labels to associations even without `override_label`
    #[serde(default)]
    pub always_override_label: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSettings {
    /// Canonical slug this slug is an alias of
    pub redirect: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub override_label: bool,
}

/// Where a content node type keeps its terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Dotted field path per taxonomy. Taxonomies not listed here read
    /// `frontmatter.<taxonomy key>`.
    #[serde(default)]
    pub fields: BTreeMap<TaxonomyKey, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Node type assigned to scanned markdown files
    #[serde(default = "default_node_type")]
    pub node_type: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to log term statistics after a build
    #[serde(default = "default_true")]
    pub show_stats: bool,
}

fn default_true() -> bool {
    true
}

fn default_taxonomy_template() -> PathBuf {
    PathBuf::from("src/templates/taxonomy")
}

fn default_term_template() -> PathBuf {
    PathBuf::from("src/templates/term")
}

fn default_node_type() -> String {
    "MarkdownRemark".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            taxonomies: BTreeMap::new(),
            resolvers: BTreeMap::new(),
            create_pages: true,
            taxonomy_template: default_taxonomy_template(),
            term_template: default_term_template(),
            content: ContentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            node_type: default_node_type(),
            extensions: default_extensions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { show_stats: true }
    }
}

impl TaxonomyConfig {
    pub fn index_path(&self, key: &str) -> String {
        self.taxonomy_page_path
            .clone()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn term_path(&self, key: &str) -> String {
        self.term_page_path
            .clone()
            .or_else(|| self.taxonomy_page_path.clone())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn term_settings(&self, slug: &str) -> Option<&TermSettings> {
        self.terms.get(slug)
    }
}

impl PluginConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: PluginConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn taxonomy(&self, key: &str) -> std::result::Result<&TaxonomyConfig, ConfigurationError> {
        self.taxonomies
            .get(key)
            .ok_or_else(|| ConfigurationError::UnknownTaxonomy(key.to_string()))
    }

    /// Reject configurations that could never produce a valid build:
    /// redirect cycles, empty redirect targets and resolvers naming
    /// undeclared taxonomies.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        for (key, taxonomy) in &self.taxonomies {
            for (slug, settings) in &taxonomy.terms {
                if settings.redirect.as_deref() == Some("") {
                    return Err(ConfigurationError::InvalidConfig(format!(
                        "term `{}` in taxonomy `{}` redirects to an empty slug",
                        slug, key
                    )));
                }
                follow_slug_redirect(&self.taxonomies, key, slug)?;
            }
        }

        for (node_type, resolver) in &self.resolvers {
            if let Some(key) = resolver
                .fields
                .keys()
                .find(|key| !self.taxonomies.contains_key(*key))
            {
                return Err(ConfigurationError::InvalidConfig(format!(
                    "resolver for `{}` names unknown taxonomy `{}`",
                    node_type, key
                )));
            }
        }

        Ok(())
    }
}
