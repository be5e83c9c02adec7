//! Taxonomy CLI Library
//!
//! Command layer: loads the YAML config, scans the content tree into an
//! in-memory graph, runs the build hooks and renders the requested view
//! as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use taxonomy_core::content::{content_node_id, scan_content};
use taxonomy_core::pages::FsTemplateLocator;
use taxonomy_core::vfs::{FileSystem, PhysicalFileSystem};
use taxonomy_core::{PluginConfig, ResolverTable, TaxonomyEngine};


#[derive(Debug, Parser)]
#[command(name = "taxonomy", version, about = "Derive taxonomy terms and pages from content")]
pub struct Cli {
    /// Plugin configuration (YAML)
    #[arg(short, long, default_value = "taxonomy.yaml")]
    pub config: PathBuf,

    /// Content directory to scan
    #[arg(long, default_value = "content")]
    pub content: PathBuf,

    /// Site root used to resolve templates
    #[arg(long, default_value = ".")]
    pub site_root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and content, print terms per taxonomy
    Check,
    /// Print the planned pages
    Pages,
    /// Print term usage counts of one taxonomy
    Terms { taxonomy: String },
    /// Print the terms of one content file, by path relative to the content dir
    Node { path: PathBuf },
    /// Print the canonical slug of a raw label
    Slug { taxonomy: String, label: String },
}

pub fn load_config(fs: &dyn FileSystem, path: &Path) -> Result<PluginConfig> {
    let text = fs
        .read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PluginConfig::from_yaml(&text).with_context(|| format!("loading config {}", path.display()))
}

/// Source taxonomies and process every content file.
pub fn build_engine(
    fs: &dyn FileSystem,
    config: PluginConfig,
    content_root: &Path,
) -> Result<TaxonomyEngine> {
    let resolvers = ResolverTable::from_config(&config);
    let nodes = scan_content(fs, content_root, &config.content);
    let mut engine = TaxonomyEngine::in_memory(config, resolvers);

    engine.source_taxonomies()?;
    for node in &nodes {
        engine.add_content_node(node).with_context(|| {
            format!(
                "processing {}",
                node.path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        })?;
    }
    info!("processed {} content nodes", nodes.len());
    engine.log_stats()?;
    Ok(engine)
}

pub fn run(cli: &Cli, fs: Arc<dyn FileSystem>) -> Result<Value> {
    let config = load_config(&*fs, &cli.config)?;
    let engine = build_engine(&*fs, config, &cli.content)?;

    let output = match &cli.command {
        Command::Check => {
            let mut summary = serde_json::Map::new();
            for key in engine.config().taxonomies.keys() {
                summary.insert(key.clone(), json!(engine.count_terms(key)?.len()));
            }
            Value::Object(summary)
        }
        Command::Pages => {
            let locator = FsTemplateLocator::new(cli.site_root.clone(), fs.clone());
            serde_json::to_value(engine.plan_pages(&locator)?)?
        }
        Command::Terms { taxonomy } => serde_json::to_value(engine.count_terms(taxonomy)?)?,
        Command::Node { path } => {
            let id = content_node_id(path, &engine.config().content.node_type);
            serde_json::to_value(engine.value_terms_by_taxonomy(&id)?)?
        }
        Command::Slug { taxonomy, label } => json!(engine.to_term_slug(taxonomy, label)?),
    };
    Ok(output)
}

pub fn default_fs() -> Arc<dyn FileSystem> {
    Arc::new(PhysicalFileSystem)
}
