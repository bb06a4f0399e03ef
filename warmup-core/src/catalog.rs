//! The prompt catalog.
//!
//! Catalog documents have drifted between versions: older ones carry a
//! single `time` and a `prompt` body, newer ones use `timeMin`/`timeMax`,
//! `body`, and optional `mode`, `goal` and `howTo` fields. Entries are read
//! through a raw shape and normalized into [`PromptEntry`].

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading a catalog. Any of these is fatal to a session.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog document: {0}")]
    InvalidDocument(&'static str),

    #[error("Duplicate prompt id: {0}")]
    DuplicateId(String),

    #[error("Prompt {id} has no time (expected `time` or `timeMin`/`timeMax`)")]
    MissingTime { id: String },

    #[error("Prompt {id} has an inverted time range {min}-{max}")]
    InvalidRange { id: String, min: u32, max: u32 },
}

/// How long an exercise takes, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeMinutes {
    Exact(u32),
    Range { min: u32, max: u32 },
}

impl TimeMinutes {
    /// Build from optional catalog fields, preferring the single `time`.
    fn from_fields(
        id: &str,
        time: Option<u32>,
        min: Option<u32>,
        max: Option<u32>,
    ) -> Result<Self, CatalogError> {
        match (time, min, max) {
            (Some(t), _, _) => Ok(TimeMinutes::Exact(t)),
            (None, Some(min), Some(max)) if min == max => Ok(TimeMinutes::Exact(min)),
            (None, Some(min), Some(max)) if min > max => Err(CatalogError::InvalidRange {
                id: id.to_string(),
                min,
                max,
            }),
            (None, Some(min), Some(max)) => Ok(TimeMinutes::Range { min, max }),
            (None, Some(t), None) | (None, None, Some(t)) => Ok(TimeMinutes::Exact(t)),
            (None, None, None) => Err(CatalogError::MissingTime { id: id.to_string() }),
        }
    }

    /// Inclusive `(min, max)` bounds.
    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            TimeMinutes::Exact(t) => (t, t),
            TimeMinutes::Range { min, max } => (min, max),
        }
    }

    pub fn min(&self) -> u32 {
        self.bounds().0
    }

    pub fn max(&self) -> u32 {
        self.bounds().1
    }

    /// Whether the inclusive interval `[lo, hi]` overlaps this time.
    pub fn overlaps(&self, lo: u32, hi: u32) -> bool {
        let (min, max) = self.bounds();
        min <= hi && lo <= max
    }
}

impl fmt::Display for TimeMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMinutes::Exact(t) => write!(f, "{t} min"),
            TimeMinutes::Range { min, max } => write!(f, "{min}-{max} min"),
        }
    }
}

/// A single warmup exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptEntry {
    pub id: String,
    pub title: String,
    pub body: String,
    pub time: TimeMinutes,
    pub tags: BTreeSet<String>,
    pub mode: Option<String>,
    pub difficulty: Option<u8>,
    pub goal: Option<String>,
    pub how_to: Vec<String>,
}

impl PromptEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Catalog record as it appears on disk, before normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: String,
    title: String,
    #[serde(default, alias = "prompt")]
    body: String,
    time: Option<u32>,
    time_min: Option<u32>,
    time_max: Option<u32>,
    #[serde(default)]
    tags: Vec<String>,
    mode: Option<String>,
    difficulty: Option<u8>,
    goal: Option<String>,
    #[serde(default)]
    how_to: Option<TextOrList>,
}

/// `howTo` is a paragraph in some catalogs and a list of steps in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TryFrom<RawEntry> for PromptEntry {
    type Error = CatalogError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let time = TimeMinutes::from_fields(&raw.id, raw.time, raw.time_min, raw.time_max)?;
        let how_to = match raw.how_to {
            Some(TextOrList::Text(text)) => vec![text],
            Some(TextOrList::List(steps)) => steps,
            None => Vec::new(),
        };

        Ok(Self {
            id: raw.id,
            title: raw.title,
            body: raw.body,
            time,
            tags: raw.tags.into_iter().collect(),
            mode: raw.mode.filter(|m| !m.is_empty()),
            difficulty: raw.difficulty,
            goal: raw.goal,
            how_to,
        })
    }
}

/// The full, immutable set of prompts for a session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<PromptEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(entries: Vec<PromptEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Parse a catalog document: either a bare array or `{ "prompts": [...] }`.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let records = match serde_json::from_str::<Value>(content)? {
            Value::Object(mut document) => document
                .remove("prompts")
                .ok_or(CatalogError::InvalidDocument("object without `prompts`"))?,
            list @ Value::Array(_) => list,
            _ => return Err(CatalogError::InvalidDocument("expected an array or object")),
        };

        let entries = serde_json::from_value::<Vec<RawEntry>>(records)?
            .into_iter()
            .map(PromptEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// Load a catalog document from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            prompts = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&PromptEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every tag used by some entry, sorted.
    pub fn tags(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .collect()
    }

    /// Every mode used by some entry, sorted.
    pub fn modes(&self) -> BTreeSet<&str> {
        self.entries.iter().filter_map(|e| e.mode.as_deref()).collect()
    }

    /// Distinct exact times across the catalog, usable as time buckets.
    pub fn time_buckets(&self) -> BTreeSet<u32> {
        self.entries
            .iter()
            .flat_map(|e| {
                let (min, max) = e.time.bounds();
                [min, max]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_time_variant() {
        let catalog = Catalog::from_json_str(
            r#"[{"id":"w1","title":"Logo remix","prompt":"Redraw a logo","time":10,
                 "difficulty":2,"tags":["branding","sketch"]}]"#,
        )
        .unwrap();

        let entry = catalog.get("w1").unwrap();
        assert_eq!(entry.body, "Redraw a logo");
        assert_eq!(entry.time, TimeMinutes::Exact(10));
        assert_eq!(entry.difficulty, Some(2));
        assert!(entry.has_tag("sketch"));
        assert!(entry.mode.is_none());
    }

    #[test]
    fn test_parse_range_variant_with_rich_fields() {
        let catalog = Catalog::from_json_str(
            r#"{"prompts":[{"id":"w2","title":"Type poster","body":"Set one word",
                 "timeMin":5,"timeMax":15,"mode":"solo","goal":"Hierarchy",
                 "howTo":["Pick a word","Pick a face"]}]}"#,
        )
        .unwrap();

        let entry = catalog.get("w2").unwrap();
        assert_eq!(entry.time, TimeMinutes::Range { min: 5, max: 15 });
        assert_eq!(entry.mode.as_deref(), Some("solo"));
        assert_eq!(entry.goal.as_deref(), Some("Hierarchy"));
        assert_eq!(entry.how_to, vec!["Pick a word", "Pick a face"]);
    }

    #[test]
    fn test_how_to_as_text() {
        let catalog = Catalog::from_json_str(
            r#"[{"id":"a","title":"A","time":5,"howTo":"Just start"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.get("a").unwrap().how_to, vec!["Just start"]);
    }

    #[test]
    fn test_equal_range_collapses_to_exact() {
        let catalog =
            Catalog::from_json_str(r#"[{"id":"a","title":"A","timeMin":7,"timeMax":7}]"#).unwrap();
        assert_eq!(catalog.get("a").unwrap().time, TimeMinutes::Exact(7));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Catalog::from_json_str(
            r#"[{"id":"a","title":"A","time":5},{"id":"a","title":"B","time":5}]"#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_missing_time_rejected() {
        let err = Catalog::from_json_str(
            r#"[{"id":"a","title":"A","time":5},{"id":"b","title":"B"}]"#,
        )
        .unwrap_err();
        assert!(matches!(&err, CatalogError::MissingTime { id } if id == "b"));
        assert!(err.to_string().contains("Prompt b has no time"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = Catalog::from_json_str(
            r#"{"prompts":[{"id":"a","title":"A","timeMin":9,"timeMax":3}]}"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::InvalidRange { ref id, min: 9, max: 3 }) if id == "a"
        ));
    }

    #[test]
    fn test_unexpected_document_shape_rejected() {
        assert!(matches!(
            Catalog::from_json_str(r#"{"items":[]}"#),
            Err(CatalogError::InvalidDocument(_))
        ));
        assert!(matches!(
            Catalog::from_json_str("42"),
            Err(CatalogError::InvalidDocument(_))
        ));
        assert!(matches!(
            Catalog::from_json_str(r#"[{"title":"no id","time":5}]"#),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_malformed_document_rejected() {
        assert!(matches!(
            Catalog::from_json_str("not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_facets() {
        let catalog = Catalog::from_json_str(
            r#"[{"id":"a","title":"A","time":5,"tags":["x"],"mode":"solo"},
                {"id":"b","title":"B","timeMin":10,"timeMax":20,"tags":["x","y"],"mode":"pair"}]"#,
        )
        .unwrap();

        assert_eq!(catalog.tags().into_iter().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(
            catalog.modes().into_iter().collect::<Vec<_>>(),
            vec!["pair", "solo"]
        );
        assert_eq!(
            catalog.time_buckets().into_iter().collect::<Vec<_>>(),
            vec![5, 10, 20]
        );
    }

    #[test]
    fn test_time_overlap() {
        let range = TimeMinutes::Range { min: 5, max: 10 };
        assert!(range.overlaps(10, 10));
        assert!(range.overlaps(1, 5));
        assert!(!range.overlaps(11, 15));
        assert!(TimeMinutes::Exact(5).overlaps(5, 5));
        assert!(!TimeMinutes::Exact(5).overlaps(6, 6));
    }

    #[tokio::test]
    async fn test_load_json_from_file() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("prompts.json");
        std::fs::write(&path, r#"[{"id":"a","title":"A","time":5}]"#).unwrap();

        let catalog = Catalog::load_json(&path).await.expect("Load should succeed");
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_load_json_missing_file() {
        let result = Catalog::load_json("/definitely/not/here.json").await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
