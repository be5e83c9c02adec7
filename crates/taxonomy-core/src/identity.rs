use crate::model::NodeId;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Namespace under which all plugin node ids are derived.
const NODE_NAMESPACE: Uuid = Uuid::from_u128(0x5c1e_7a0b_3f44_4d6e_9a2b_8c17_e4d0_61f3);

/// Derive a stable node id from a seed such as `Taxonomy >>> tags`.
///
/// The same seed always yields the same id, which is what makes the
/// term upsert idempotent across content nodes.
pub fn create_node_id(seed: &str) -> NodeId {
    NodeId(Uuid::new_v5(&NODE_NAMESPACE, seed.as_bytes()))
}

pub fn taxonomy_id(taxonomy: &str) -> NodeId {
    create_node_id(&format!("Taxonomy >>> {}", taxonomy))
}

pub fn term_id(taxonomy: &str, slug: &str) -> NodeId {
    create_node_id(&format!(
        "Taxonomy >>> {} >>> TaxonomyTerm >>> {}",
        taxonomy, slug
    ))
}

pub fn value_term_id(value: &NodeId, taxonomy: &str, slug: &str) -> NodeId {
    create_node_id(&format!(
        "{} >>> TaxonomyValueTerm >>> {} >>> {}",
        value, taxonomy, slug
    ))
}

pub fn value_terms_id(value: &NodeId) -> NodeId {
    create_node_id(&format!("{} >>> TaxonomyValueTerms", value))
}

/// Hex SHA-256 over the JSON form of `fields`.
pub fn content_digest<T: Serialize>(fields: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(fields)?;
    Ok(digest_bytes(&json))
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
