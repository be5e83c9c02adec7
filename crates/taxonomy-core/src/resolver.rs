use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::{PluginConfig, TaxonomyConfig};
use crate::error::ConfigurationError;
use crate::model::{ContentNode, TaxonomyKey};

/// What a resolver gets to look at.
pub struct ResolveContext<'a> {
    pub node: &'a ContentNode,
    pub key: &'a str,
    pub options: &'a TaxonomyConfig,
    pub config: &'a PluginConfig,
}

/// Extracts raw term labels of one taxonomy from a content node.
///
/// Returns `None` (or JSON `null`) when the node has no terms, a string for
/// a single term or an array of strings.
pub trait TermsResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<Value>;
}

impl<F> TermsResolver for F
where
    F: Fn(&ResolveContext<'_>) -> Option<Value> + Send + Sync,
{
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<Value> {
        self(ctx)
    }
}

/// Reads terms from a dotted field path of the node, per taxonomy.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    fields: BTreeMap<TaxonomyKey, String>,
}

impl FieldResolver {
    pub fn new(fields: BTreeMap<TaxonomyKey, String>) -> Self {
        Self { fields }
    }

    pub fn field_for(&self, key: &str) -> String {
        self.fields
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("frontmatter.{}", key))
    }
}

impl TermsResolver for FieldResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<Value> {
        let path = self.field_for(ctx.key);
        path.split('.')
            .try_fold(&ctx.node.fields, |value, segment| value.get(segment))
            .cloned()
    }
}

/// Content node type -> resolver.
#[derive(Clone, Default)]
pub struct ResolverTable {
    resolvers: HashMap<String, Arc<dyn TermsResolver>>,
}

impl ResolverTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field resolvers for every node type listed under `resolvers`.
    pub fn from_config(config: &PluginConfig) -> Self {
        let mut table = Self::new();
        for (node_type, resolver) in &config.resolvers {
            table.register(node_type, FieldResolver::new(resolver.fields.clone()));
        }
        table
    }

    pub fn register<R: TermsResolver + 'static>(&mut self, node_type: &str, resolver: R) {
        self.resolvers
            .insert(node_type.to_string(), Arc::new(resolver));
    }

    pub fn register_fn<F>(&mut self, node_type: &str, resolver: F)
    where
        F: Fn(&ResolveContext<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.register(node_type, resolver);
    }

    pub fn get(&self, node_type: &str) -> Option<&dyn TermsResolver> {
        self.resolvers.get(node_type).map(|r| r.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

/// Flatten a resolver result into raw labels.
///
/// `null` entries are skipped; anything else that is not a string is a
/// configuration error.
pub fn raw_labels(
    resolved: Option<Value>,
    node_type: &str,
) -> Result<Vec<String>, ConfigurationError> {
    let non_string = |value: &Value| ConfigurationError::NonStringTerm {
        node_type: node_type.to_string(),
        value: value.to_string(),
    };

    match resolved {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(label)) => Ok(vec![label]),
        Some(Value::Array(items)) => {
            let mut labels = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(label) => labels.push(label),
                    Value::Null => {}
                    other => return Err(non_string(&other)),
                }
            }
            Ok(labels)
        }
        Some(other) => Err(non_string(&other)),
    }
}
