//! Cosine-similarity ranking over note embeddings.

use canvas::doc::Note;

use super::types::ScoredNote;

#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Top `limit` notes scoring at least `min_score`, best first.
///
/// Notes without an embedding, or whose embedding length differs from the
/// query's, are skipped.
#[must_use]
pub fn rank(query: &[f32], candidates: &[Note], limit: usize, min_score: f32) -> Vec<ScoredNote> {
    let mut scored: Vec<ScoredNote> = candidates
        .iter()
        .filter_map(|note| {
            let embedding = note.embedding.as_deref()?;
            if embedding.is_empty() || embedding.len() != query.len() {
                return None;
            }
            let score = cosine_similarity(embedding, query);
            (score >= min_score).then_some(ScoredNote { id: note.id, score })
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
