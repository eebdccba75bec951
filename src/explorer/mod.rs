use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::transaction::Transaction;

/// A (description, resolved category) pair for eyeballing categorisation
/// accuracy in the absence of ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategorisedTransaction {
    pub(crate) description: String,
    pub(crate) category_name: String,
}

/// Categorised deduplicated transactions of one household, in load order.
pub(crate) fn categorised_for_household(
    deduplicated: &[Transaction],
    household_id: &str,
) -> Vec<CategorisedTransaction> {
    deduplicated
        .iter()
        .filter(|t| t.household_id == household_id)
        .filter_map(|t| {
            t.category_name.as_ref().map(|name| CategorisedTransaction {
                description: t.description.clone(),
                category_name: name.clone(),
            })
        })
        .collect()
}

/// Random permutation of the rows. Called on every shuffle trigger so each
/// trigger produces a fresh ordering.
pub(crate) fn shuffle(rows: &mut [CategorisedTransaction]) {
    rows.shuffle(&mut thread_rng());
}
