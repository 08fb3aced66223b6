//! Attraction store
//!
//! Loads the curated attraction dataset once at startup and keeps it as
//! read-only shared state. Rows may carry a precomputed embedding; rows
//! without one are embedded with the configured [`Embedder`] during load.

use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::embedding::Embedder;
use crate::models::{AttractionRecord, Coordinates, CostLevel};
use crate::{Result, TripPlannerError};

const DEFAULT_DURATION_HOURS: f32 = 3.0;

/// One CSV row as it appears in the dataset file
#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    region: String,
    /// Semicolon separated
    #[serde(default)]
    tags: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    review_count: Option<u64>,
    #[serde(default)]
    review_count_lakhs: Option<f64>,
    #[serde(default, alias = "typical_duration_hours")]
    duration_hours: Option<f32>,
    #[serde(default)]
    entry_fee: Option<f64>,
    #[serde(default)]
    cost_level: Option<String>,
    #[serde(default)]
    best_season: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    /// Space separated floats
    #[serde(default)]
    embedding: Option<String>,
}

impl DatasetRow {
    fn into_record(self, line: usize) -> Result<(AttractionRecord, bool)> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(TripPlannerError::dataset(format!("Row {line}: name is empty")));
        }

        let duration_hours = self.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS);
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err(TripPlannerError::dataset(format!(
                "Row {line} ({name}): duration must be positive, got {duration_hours}"
            )));
        }

        let entry_fee = self.entry_fee.unwrap_or(0.0);
        if !entry_fee.is_finite() || entry_fee < 0.0 {
            return Err(TripPlannerError::dataset(format!(
                "Row {line} ({name}): entry fee cannot be negative"
            )));
        }

        let cost_level = match self.cost_level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => level
                .parse::<CostLevel>()
                .map_err(|e| TripPlannerError::dataset(format!("Row {line} ({name}): {e}")))?,
            _ => CostLevel::from_entry_fee(entry_fee),
        };

        let review_count = match (self.review_count, self.review_count_lakhs) {
            (Some(count), _) => count,
            (None, Some(lakhs)) if lakhs.is_finite() && lakhs > 0.0 => {
                (lakhs * 100_000.0).round() as u64
            }
            _ => 0,
        };

        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let embedding = match self.embedding.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_embedding(raw)
                .map_err(|e| TripPlannerError::dataset(format!("Row {line} ({name}): {e}")))?,
            _ => Vec::new(),
        };
        let precomputed = !embedding.is_empty();

        let tags: BTreeSet<String> = self
            .tags
            .split([';', '|'])
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let record = AttractionRecord {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("attr-{line:04}")),
            name,
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            region: self.region.trim().to_string(),
            tags,
            description: self.description.trim().to_string(),
            rating: self.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            review_count,
            duration_hours,
            entry_fee,
            cost_level,
            best_season: self.best_season.trim().to_string(),
            coordinates,
            embedding,
        };
        Ok((record, precomputed))
    }
}

fn parse_embedding(raw: &str) -> std::result::Result<Vec<f32>, String> {
    raw.split_whitespace()
        .map(|v| {
            v.parse::<f32>()
                .map_err(|_| format!("invalid embedding component '{v}'"))
        })
        .collect()
}

/// Records in file order plus the indexes of rows that still need a vector
fn parse_rows<R: Read>(reader: R) -> Result<(Vec<AttractionRecord>, Vec<usize>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut missing = Vec::new();
    for (idx, row) in csv_reader.deserialize::<DatasetRow>().enumerate() {
        let (record, precomputed) = row?.into_record(idx + 1)?;
        if !precomputed {
            missing.push(records.len());
        }
        records.push(record);
    }
    Ok((records, missing))
}

/// Immutable collection of attractions with embeddings
#[derive(Debug)]
pub struct AttractionStore {
    records: Vec<Arc<AttractionRecord>>,
    dimensions: usize,
}

impl AttractionStore {
    /// Load the dataset CSV at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>, embedder: &dyn Embedder) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            TripPlannerError::dataset(format!(
                "Cannot open dataset {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let store = Self::from_reader(file, embedder).await?;
        info!(
            "Loaded {} attractions ({} dimensions)",
            store.len(),
            store.dimensions()
        );
        Ok(store)
    }

    /// Parse CSV from any reader and embed rows lacking a vector
    pub async fn from_reader<R: Read>(reader: R, embedder: &dyn Embedder) -> Result<Self> {
        let (mut records, missing) = parse_rows(reader)?;

        if !missing.is_empty() {
            debug!(
                "Embedding {} rows with {}",
                missing.len(),
                embedder.model_name()
            );
            let texts: Vec<String> = missing.iter().map(|&i| records[i].embedding_text()).collect();
            let vectors = embedder.embed_batch(&texts).await?;
            if vectors.len() != missing.len() {
                return Err(TripPlannerError::dataset(format!(
                    "Embedder returned {} vectors for {} rows",
                    vectors.len(),
                    missing.len()
                )));
            }
            for (i, vector) in missing.into_iter().zip(vectors) {
                records[i].embedding = vector;
            }
        }

        Self::from_records(records, embedder.dimensions())
    }

    /// Build a store from ready records, checking ids and vector lengths
    pub fn from_records(records: Vec<AttractionRecord>, dimensions: usize) -> Result<Self> {
        if records.is_empty() {
            return Err(TripPlannerError::dataset("Dataset contains no attractions"));
        }

        let mut ids = HashSet::new();
        for record in &records {
            if !ids.insert(record.id.as_str()) {
                return Err(TripPlannerError::dataset(format!(
                    "Duplicate attraction id '{}'",
                    record.id
                )));
            }
            if record.embedding.len() != dimensions {
                return Err(TripPlannerError::dataset(format!(
                    "Attraction '{}' has a {}-dimensional embedding, expected {dimensions}",
                    record.id,
                    record.embedding.len()
                )));
            }
        }

        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
            dimensions,
        })
    }

    pub fn records(&self) -> &[Arc<AttractionRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn get(&self, id: &str) -> Option<&Arc<AttractionRecord>> {
        self.records.iter().find(|r| r.id == id)
    }

    /// True when `record` is the very instance held by this store
    pub fn contains(&self, record: &Arc<AttractionRecord>) -> bool {
        self.records.iter().any(|r| Arc::ptr_eq(r, record))
    }

    /// Distinct cities and states, sorted, for the destination picker
    pub fn destinations(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = BTreeSet::new();
        for record in &self.records {
            for name in [&record.city, &record.state] {
                if !name.is_empty() {
                    names.insert(name.clone());
                }
            }
        }
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;

    const CSV: &str = "\
id,name,city,state,region,tags,description,rating,review_count_lakhs,typical_duration_hours,entry_fee,best_season,latitude,longitude
gw,Gateway of India,Mumbai,Maharashtra,Western,monument;history,Arch monument on the waterfront,4.6,1.5,1,0,Nov-Feb,18.9220,72.8347
jb,Juhu Beach,Mumbai,Maharashtra,Western,beach;food,Beach famous for street food,4.4,0.9,2,,Oct-Mar,,
";

    #[tokio::test]
    async fn test_load_from_reader_embeds_rows() {
        let embedder = HashingEmbedder::new(32);
        let store = AttractionStore::from_reader(CSV.as_bytes(), &embedder).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.dimensions(), 32);
        let gateway = store.get("gw").unwrap();
        assert_eq!(gateway.review_count, 150_000);
        assert_eq!(gateway.duration_hours, 1.0);
        assert!(gateway.coordinates.is_some());
        assert!(gateway.tags.contains("history"));
        assert_eq!(gateway.embedding.len(), 32);

        let juhu = store.get("jb").unwrap();
        assert_eq!(juhu.entry_fee, 0.0);
        assert_eq!(juhu.cost_level, CostLevel::Low);
        assert!(juhu.coordinates.is_none());
        assert!(store.contains(juhu));
        assert_eq!(store.destinations(), vec!["Maharashtra", "Mumbai"]);
    }

    #[tokio::test]
    async fn test_precomputed_embedding_dimension_mismatch() {
        let csv = "name,city,embedding\nFort,Jaipur,0.1 0.2 0.3\n";
        let embedder = HashingEmbedder::new(4);
        let err = AttractionStore::from_reader(csv.as_bytes(), &embedder).await.unwrap_err();
        assert!(matches!(err, TripPlannerError::Dataset { .. }));
        assert!(err.to_string().contains("expected 4"));
    }

    #[tokio::test]
    async fn test_precomputed_embedding_is_kept() {
        let csv = "name,city,embedding\nFort,Jaipur,1 0 0\n";
        let embedder = HashingEmbedder::new(3);
        let store = AttractionStore::from_reader(csv.as_bytes(), &embedder).await.unwrap();
        assert_eq!(store.records()[0].embedding, vec![1.0, 0.0, 0.0]);
        assert_eq!(store.records()[0].id, "attr-0001");
    }

    #[tokio::test]
    async fn test_rejects_duplicate_ids_and_bad_rows() {
        let embedder = HashingEmbedder::new(8);

        let dup = "id,name,city\na,One,Goa\na,Two,Goa\n";
        let err = AttractionStore::from_reader(dup.as_bytes(), &embedder).await.unwrap_err();
        assert!(err.to_string().contains("Duplicate"));

        let negative = "name,city,duration_hours\nFort,Jaipur,-1\n";
        let err = AttractionStore::from_reader(negative.as_bytes(), &embedder).await.unwrap_err();
        assert!(err.to_string().contains("duration must be positive"));

        let empty = "name,city\n";
        let err = AttractionStore::from_reader(empty.as_bytes(), &embedder).await.unwrap_err();
        assert!(err.to_string().contains("no attractions"));
    }
}
