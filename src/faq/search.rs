use crate::faq::types::FaqEntry;

/// Cosine similarity of two vectors. Zero-norm inputs score 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

/// Finds the question vector closest to the query.
/// Returns the index and similarity score of the best match, or None if the input is empty.
/// Ties go to the lowest index.
pub fn find_best_match(
    query_vector: &[f64],
    question_vectors: &[Vec<f64>],
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, q_vector) in question_vectors.iter().enumerate() {
        let similarity = cosine_similarity(query_vector, q_vector);
        log::trace!("Similarity with Q#{}: {:.4}", index, similarity);
        match best {
            Some((_, best_similarity)) if similarity <= best_similarity => {}
            _ => best = Some((index, similarity)),
        }
    }
    best
}

/// Searches for entries whose question contains the given keywords.
/// The search is case-insensitive and returns up to 10 matches.
pub fn search_by_keyword(entries: &[FaqEntry], keywords: &str) -> Vec<FaqEntry> {
    let keywords = keywords.trim();
    if keywords.is_empty() {
        return Vec::new();
    }
    let lower_keywords = keywords.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.question.to_lowercase().contains(&lower_keywords))
        .take(10)
        .cloned()
        .collect()
}
