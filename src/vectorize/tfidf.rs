//! TF-IDF over the knowledge-base questions.
//!
//! Terms are lowercased runs of two or more word characters. The vocabulary is
//! sorted, idf is smoothed (`ln((1 + n) / (1 + df)) + 1`), and every vector is
//! L2-normalised, so two texts with the same term counts map to the same unit vector.

use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

impl TfidfModel {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let unique: BTreeSet<String> = tokenize(document.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        let model = Self { vocabulary, idf };
        log::debug!(
            "Fitted TF-IDF model on {} documents, vocabulary size {}",
            documents.len(),
            model.dimension()
        );
        model
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Unknown terms are ignored. A text with no known terms maps to the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0f64; self.idf.len()];
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                vector[column] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq::search::cosine_similarity;

    #[test]
    fn tokenizer_drops_punctuation_and_single_chars() {
        assert_eq!(
            tokenize("What is a CPU's cache?"),
            vec!["what", "is", "cpu", "cache"]
        );
        assert_eq!(tokenize("snake_case x"), vec!["snake_case"]);
    }

    #[test]
    fn vocabulary_columns_follow_sorted_terms() {
        let model = TfidfModel::fit(&["beta alpha", "gamma"]);

        assert_eq!(model.dimension(), 3);
        let alpha = model.transform("alpha");
        assert!(alpha[0] > 0.99);
        assert_eq!(alpha[1], 0.0);
    }

    #[test]
    fn idf_weights_rare_terms_higher() {
        let model = TfidfModel::fit(&["common rare", "common", "common"]);

        let v = model.transform("common rare");
        // columns: common, rare
        assert!(v[1] > v[0]);
    }

    #[test]
    fn transform_is_case_and_punctuation_insensitive() {
        let model = TfidfModel::fit(&["What is Deep Learning?", "What is an operating system?"]);

        let stored = model.transform("What is Deep Learning?");
        let query = model.transform("what is deep learning");

        assert!((cosine_similarity(&stored, &query) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_terms_give_a_zero_vector() {
        let model = TfidfModel::fit(&["binary search tree"]);

        let v = model.transform("xyzzy plugh");

        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(v.len(), model.dimension());
    }

    #[test]
    fn empty_corpus_has_no_dimensions() {
        let model = TfidfModel::fit::<&str>(&[]);

        assert_eq!(model.dimension(), 0);
        assert!(model.transform("anything").is_empty());
    }
}
