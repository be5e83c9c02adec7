use log::debug;

use crate::assembler::NodeAssembler;
use crate::error::{Result, StoreError};
use crate::identity::{taxonomy_id, term_id};
use crate::model::TermRecord;
use crate::store::GraphStore;

/// Return the term record for `(taxonomy, slug)`, creating it if needed.
///
/// An existing record is kept as is unless it was labelled from a redirect
/// and this call brings a configured label; then the label is replaced.
/// A record with a configured label is never relabelled.
pub fn get_or_create_term<S: GraphStore + ?Sized>(
    store: &mut S,
    taxonomy: &str,
    slug: &str,
    label: &str,
    labelled_from_redirect: bool,
) -> Result<TermRecord> {
    let id = term_id(taxonomy, slug);
    let parent = taxonomy_id(taxonomy);
    if store.get_node(&parent)?.is_none() {
        return Err(StoreError::ParentNotFound(parent).into());
    }

    if let Some(existing) = store.get_node(&id)? {
        if let Some(record) = existing.as_term() {
            if !record.labelled_from_redirect || labelled_from_redirect {
                return Ok(record.clone());
            }
            debug!(
                "relabelling term {}/{}: {:?} -> {:?}",
                taxonomy, slug, record.label, label
            );
        }
    }

    let record = TermRecord {
        id,
        taxonomy: taxonomy.to_string(),
        slug: slug.to_string(),
        label: label.to_string(),
        labelled_from_redirect,
    };

    store.create_node(NodeAssembler::term(record.clone())?)?;
    store.create_parent_child_link(&parent, &id)?;
    Ok(record)
}
