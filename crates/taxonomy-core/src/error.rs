use std::path::PathBuf;
use thiserror::Error;

use crate::model::NodeId;

/// Fatal configuration problems. Any of these aborts the current build step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("the taxonomy term on a {node_type} wasn't a string! was {value}")]
    NonStringTerm { node_type: String, value: String },

    #[error("redirect cycle in taxonomy `{taxonomy}`: {}", chain.join(" -> "))]
    RedirectCycle { taxonomy: String, chain: Vec<String> },

    #[error("template not found: {}", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("unknown taxonomy: {0}")]
    UnknownTaxonomy(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("parent node not found: {0}")]
    ParentNotFound(NodeId),
}

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("graph store error: {0}")]
    Store(#[from] StoreError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TaxonomyError>;
