use crate::error::Result;
use crate::identity::{content_digest, taxonomy_id, value_terms_id};
use crate::model::{
    Association, ContentNode, GraphNode, NodeData, NodeId, NodeInternal, TaxonomyNode,
    TermRecord, TAXONOMY_TYPE, TERM_TYPE, VALUE_TERMS_TYPE, VALUE_TERM_TYPE,
};

/// Wraps plugin records into graph nodes with their bookkeeping fields
/// (type, digest, description, parent).
pub struct NodeAssembler;

impl NodeAssembler {
    pub fn taxonomy(taxonomy: TaxonomyNode) -> Result<GraphNode> {
        Ok(GraphNode {
            id: taxonomy_id(&taxonomy.key),
            parent: None,
            children: Vec::new(),
            internal: NodeInternal {
                node_type: TAXONOMY_TYPE.to_string(),
                content_digest: content_digest(&taxonomy)?,
                description: "A representation of a Taxonomy".to_string(),
            },
            data: NodeData::Taxonomy(taxonomy),
        })
    }

    pub fn term(term: TermRecord) -> Result<GraphNode> {
        Ok(GraphNode {
            id: term.id,
            parent: Some(taxonomy_id(&term.taxonomy)),
            children: Vec::new(),
            internal: NodeInternal {
                node_type: TERM_TYPE.to_string(),
                content_digest: content_digest(&term)?,
                description: "A representation of a TaxonomyTerm".to_string(),
            },
            data: NodeData::Term(term),
        })
    }

    pub fn value_term(association: Association) -> Result<GraphNode> {
        Ok(GraphNode {
            id: association.id,
            parent: Some(association.value),
            children: Vec::new(),
            internal: NodeInternal {
                node_type: VALUE_TERM_TYPE.to_string(),
                content_digest: content_digest(&association)?,
                description: "A representation of a TaxonomyValueTerm".to_string(),
            },
            data: NodeData::ValueTerm(association),
        })
    }

    pub fn value_terms(value: &NodeId) -> Result<GraphNode> {
        Ok(GraphNode {
            id: value_terms_id(value),
            parent: Some(*value),
            children: Vec::new(),
            internal: NodeInternal {
                node_type: VALUE_TERMS_TYPE.to_string(),
                content_digest: content_digest(&serde_json::json!({ "parent": value }))?,
                description: "A set of all taxonomy terms attached to a taxonomy value"
                    .to_string(),
            },
            data: NodeData::ValueTerms,
        })
    }

    pub fn content(node: &ContentNode) -> Result<GraphNode> {
        Ok(GraphNode {
            id: node.id,
            parent: None,
            children: Vec::new(),
            internal: NodeInternal {
                node_type: node.node_type.clone(),
                content_digest: content_digest(&node.fields)?,
                description: match &node.path {
                    Some(path) => format!("Content from {}", path.display()),
                    None => "Content node".to_string(),
                },
            },
            data: NodeData::Content(node.fields.clone()),
        })
    }
}
