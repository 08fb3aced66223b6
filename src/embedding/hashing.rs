//! Local feature-hashing embedder.
//!
//! Produces deterministic dense vectors by hashing terms into fixed-dimension
//! buckets and weighting by term frequency. Needs no network access, so the
//! planner works out of the box and tests are reproducible.

use async_trait::async_trait;
use std::collections::HashMap;

use super::Embedder;
use crate::Result;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "at", "by", "for", "from", "in", "is", "it", "of", "on", "or",
    "the", "to", "with",
];

pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket for a term
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Lowercase alphanumeric terms with a crude plural fold ("beaches" -> "beach")
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|s| s.len() >= 2 && !STOPWORDS.contains(&s.as_str()))
            .map(|s| fold_plural(&s))
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in tf {
            // longer terms carry more meaning than short function words
            let weight = (count / total) * (1.0 + (term.len() as f32).ln());
            vec[Self::bucket(term, self.dimensions)] += weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

fn fold_plural(term: &str) -> String {
    if term.len() > 4 && term.ends_with("ies") {
        format!("{}y", &term[..term.len() - 3])
    } else if term.len() > 4 && (term.ends_with("ches") || term.ends_with("shes")) {
        term[..term.len() - 2].to_string()
    } else if term.len() > 3 && term.ends_with('s') && !term.ends_with("ss") {
        term[..term.len() - 1].to_string()
    } else {
        term.to_string()
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "feature-hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed("Gateway of India, historic monument").await.unwrap();
        let b = embedder.embed("Gateway of India, historic monument").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_related_text_is_closer() {
        let embedder = HashingEmbedder::new(256);
        let query = embedder.embed("beaches and seafood").await.unwrap();
        let beach = embedder.embed("Calangute beach with seafood shacks").await.unwrap();
        let fort = embedder.embed("Amber fort palace history").await.unwrap();
        assert!(cosine_similarity(&query, &beach) > cosine_similarity(&query, &fort));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        let v = embedder.embed("  , the of ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_fold_plural() {
        assert_eq!(fold_plural("beaches"), "beach");
        assert_eq!(fold_plural("galleries"), "gallery");
        assert_eq!(fold_plural("temples"), "temple");
        assert_eq!(fold_plural("glass"), "glass");
        assert_eq!(fold_plural("food"), "food");
    }
}
