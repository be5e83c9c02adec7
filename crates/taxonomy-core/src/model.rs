use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

pub const TAXONOMY_TYPE: &str = "Taxonomy";
pub const TERM_TYPE: &str = "TaxonomyTerm";
pub const VALUE_TERM_TYPE: &str = "TaxonomyValueTerm";
pub const VALUE_TERMS_TYPE: &str = "TaxonomyValueTerms";

/// Stable node identifier, derived from a seed string (see `identity`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type TaxonomyKey = String;

/// A node handed to the plugin by the host (a markdown file, a blog post...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    /// Host type name, used to pick a terms resolver.
    pub node_type: String,
    pub path: Option<PathBuf>,
    pub fields: serde_json::Value,
}

/// Graph representation of a configured taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub key: TaxonomyKey,
    pub label: Option<String>,
    pub label_singular: Option<String>,
    pub taxonomy_page_path: String,
    pub term_page_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: NodeId,
    pub taxonomy: TaxonomyKey,
    pub slug: String,
    pub label: String,
    /// True when the label was carried over a redirect rather than configured.
    pub labelled_from_redirect: bool,
}

/// Link between one content node and one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: NodeId,
    pub taxonomy: TaxonomyKey,
    /// Label as written on the content node (or the forced override).
    pub label: String,
    pub term: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    Content(serde_json::Value),
    Taxonomy(TaxonomyNode),
    Term(TermRecord),
    ValueTerm(Association),
    ValueTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInternal {
    pub node_type: String,
    pub content_digest: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub internal: NodeInternal,
    pub data: NodeData,
}

impl GraphNode {
    pub fn node_type(&self) -> &str {
        &self.internal.node_type
    }

    pub fn as_taxonomy(&self) -> Option<&TaxonomyNode> {
        match &self.data {
            NodeData::Taxonomy(taxonomy) => Some(taxonomy),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&TermRecord> {
        match &self.data {
            NodeData::Term(term) => Some(term),
            _ => None,
        }
    }

    pub fn as_association(&self) -> Option<&Association> {
        match &self.data {
            NodeData::ValueTerm(association) => Some(association),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedTerm {
    pub term: TermRecord,
    pub count: usize,
}

/// One term of a content node, as shown next to that node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermListing {
    pub slug: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageContext {
    Taxonomy {
        id: NodeId,
        taxonomy: TaxonomyKey,
    },
    Term {
        id: NodeId,
        taxonomy: TaxonomyKey,
        slug: String,
        label: String,
    },
}

/// A (path, template, context) triple for the host page builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub path: String,
    pub component: PathBuf,
    pub context: PageContext,
}
