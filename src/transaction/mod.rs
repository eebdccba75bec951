use chrono::NaiveDate;

/// A transaction after the category reference data has been joined on.
/// `category_id` is the raw `categorized_as` value from the transactions file;
/// `category_name` is only present when a matching reference row exists.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) household_id: String,
    pub(crate) description: String,
    pub(crate) amount: f32,
    pub(crate) date: NaiveDate,
    pub(crate) category_id: Option<String>,
    pub(crate) category_name: Option<String>,
}

impl Transaction {
    /// Natural key used for duplicate removal. The amount is keyed by its bit
    /// pattern so the tuple is hashable.
    pub(crate) fn dedup_key(&self) -> (String, String, u32, NaiveDate) {
        (
            self.household_id.clone(),
            self.description.clone(),
            self.amount.to_bits(),
            self.date,
        )
    }

    pub(crate) fn is_categorised(&self) -> bool {
        self.category_name.is_some()
    }
}

/// One row of the category reference file. (household_id, category_id) is
/// unique within a household's reference set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Category {
    pub(crate) household_id: String,
    pub(crate) category_id: String,
    pub(crate) name: String,
}
