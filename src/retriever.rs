//! Similarity retrieval over the attraction store

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::Result;
use crate::embedding::{Embedder, cosine_distance};
use crate::models::{AttractionRecord, destination_tokens};
use crate::store::AttractionStore;

/// A retrieved attraction with its distance to the query
#[derive(Debug, Clone)]
pub struct ScoredAttraction {
    pub record: Arc<AttractionRecord>,
    /// Cosine distance, smaller is closer
    pub distance: f32,
}

impl ScoredAttraction {
    /// Cosine similarity recovered from the distance
    #[must_use]
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// Query text sent to the embedder
#[must_use]
pub fn build_query(destination: &str, interests: &BTreeSet<String>) -> String {
    let interests = interests.iter().cloned().collect::<Vec<_>>().join(", ");
    format!("Tourist attractions in {destination} for interests: {interests}")
}

/// Closer first; ties go to the higher rating, then more reviews, then id
fn compare(a: &ScoredAttraction, b: &ScoredAttraction) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| b.record.rating.total_cmp(&a.record.rating))
        .then_with(|| b.record.review_count.cmp(&a.record.review_count))
        .then_with(|| a.record.id.cmp(&b.record.id))
}

pub struct SimilarityRetriever {
    store: Arc<AttractionStore>,
    embedder: Arc<dyn Embedder>,
}

impl SimilarityRetriever {
    pub fn new(store: Arc<AttractionStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &Arc<AttractionStore> {
        &self.store
    }

    /// Embed the query and return the `k` nearest attractions at the destination.
    ///
    /// An unknown destination yields an empty vector. The embedder is not
    /// called when nothing matches the destination.
    #[instrument(skip(self, interests), fields(interests = interests.len()))]
    pub async fn retrieve(
        &self,
        destination: &str,
        interests: &BTreeSet<String>,
        k: usize,
    ) -> Result<Vec<ScoredAttraction>> {
        let tokens = destination_tokens(destination);
        let candidates: Vec<&Arc<AttractionRecord>> = self
            .store
            .records()
            .iter()
            .filter(|r| r.matches_destination(&tokens))
            .collect();

        if candidates.is_empty() || k == 0 {
            debug!("No attractions match destination '{}'", destination);
            return Ok(Vec::new());
        }

        let query = build_query(destination, interests);
        let query_embedding = self.embedder.embed(&query).await?;

        let results = rank(candidates, &query_embedding, k);
        debug!(
            "Retrieved {} attractions for '{}' (best distance {:?})",
            results.len(),
            destination,
            results.first().map(|r| r.distance)
        );
        Ok(results)
    }
}

/// Order candidates by distance to the query and keep the first `k`
pub fn rank<'a, I>(candidates: I, query_embedding: &[f32], k: usize) -> Vec<ScoredAttraction>
where
    I: IntoIterator<Item = &'a Arc<AttractionRecord>>,
{
    let mut scored: Vec<ScoredAttraction> = candidates
        .into_iter()
        .map(|record| ScoredAttraction {
            distance: cosine_distance(query_embedding, &record.embedding),
            record: Arc::clone(record),
        })
        .collect();
    scored.sort_by(compare);
    scored.truncate(k);
    scored
}
