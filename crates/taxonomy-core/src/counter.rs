use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::model::{CountedTerm, VALUE_TERM_TYPE};
use crate::slug::deburr;
use crate::store::{GraphStore, NodeFilter};

/// Count how many associations point at each term of `taxonomy`.
///
/// The result is ordered by term label (see [`compare_labels`]); terms with
/// no association are not listed.
pub fn count_terms<S: GraphStore + ?Sized>(store: &S, taxonomy: &str) -> Result<Vec<CountedTerm>> {
    let associations =
        store.run_query(&NodeFilter::of_type(VALUE_TERM_TYPE).in_taxonomy(taxonomy))?;

    let mut by_slug: HashMap<String, usize> = HashMap::new();
    let mut counted: Vec<CountedTerm> = Vec::new();

    for node in &associations {
        let Some(association) = node.as_association() else {
            continue;
        };
        let term_node = store
            .get_node(&association.term)?
            .ok_or(StoreError::NodeNotFound(association.term))?;
        let Some(term) = term_node.as_term() else {
            return Err(StoreError::NodeNotFound(association.term).into());
        };

        match by_slug.get(&term.slug) {
            Some(&index) => counted[index].count += 1,
            None => {
                by_slug.insert(term.slug.clone(), counted.len());
                counted.push(CountedTerm {
                    term: term.clone(),
                    count: 1,
                });
            }
        }
    }

    counted.sort_by(|a, b| {
        compare_labels(&a.term.label, &b.term.label).then_with(|| a.term.slug.cmp(&b.term.slug))
    });
    Ok(counted)
}

/// Dictionary-style label order: accents and case are ignored first, then
/// lowercase sorts before uppercase and plain before accented
/// ("apple" < "Apple" < "banana" < "Éclair").
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    let (folded_a, folded_b) = (deburr(a), deburr(b));
    folded_a
        .to_lowercase()
        .cmp(&folded_b.to_lowercase())
        .then_with(|| folded_b.cmp(&folded_a))
        .then_with(|| a.cmp(b))
}
