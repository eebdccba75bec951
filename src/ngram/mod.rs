use std::collections::HashMap;

use tokenizers::{
    normalizers::BertNormalizer, pre_tokenizers::bert::BertPreTokenizer, NormalizedString,
    Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer,
};

use crate::transaction::Transaction;

/// N-gram sizes accepted at the parameter boundary.
pub(crate) const MIN_NGRAM_SIZE: usize = 1;
pub(crate) const MAX_NGRAM_SIZE: usize = 3;

/// How many n-grams a frequency ranking reports.
pub(crate) const TOP_NGRAMS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NgramFrequency {
    pub(crate) ngram: String,
    pub(crate) frequency: usize,
}

/// Split a description into word tokens: Bert normalisation (lowercase, clean
/// text) followed by Bert pre-tokenisation, keeping only pieces that contain
/// at least one alphanumeric character. This is the one fixed tokeniser used
/// for all n-gram analysis.
pub(crate) fn tokenise(text: &str) -> Vec<String> {
    let normaliser = BertNormalizer::new(true, true, None, true);
    let mut normalised = NormalizedString::from(text);
    normaliser.normalize(&mut normalised).unwrap();

    let pre_tokenizer = BertPreTokenizer {};
    let mut pre_tokenized = PreTokenizedString::from(normalised.get());
    pre_tokenizer.pre_tokenize(&mut pre_tokenized).unwrap();

    pre_tokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .filter_map(|(piece, _, _)| {
            if piece.chars().any(char::is_alphanumeric) {
                Some(piece.to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Most frequent contiguous n-grams in the descriptions of uncategorised
/// transactions, ranked by descending frequency with ties in lexical order.
/// Returns at most `TOP_NGRAMS` entries; an empty result when no transaction
/// is uncategorised.
pub(crate) fn uncategorised_ngrams(deduplicated: &[Transaction], n: usize) -> Vec<NgramFrequency> {
    debug_assert!((MIN_NGRAM_SIZE..=MAX_NGRAM_SIZE).contains(&n));

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for t in deduplicated.iter().filter(|t| !t.is_categorised()) {
        let tokens = tokenise(&t.description);
        for window in tokens.windows(n) {
            *frequencies.entry(window.join(" ")).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<NgramFrequency> = frequencies
        .into_iter()
        .map(|(ngram, frequency)| NgramFrequency { ngram, frequency })
        .collect();
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.ngram.cmp(&b.ngram)));
    ranked.truncate(TOP_NGRAMS);
    ranked
}
