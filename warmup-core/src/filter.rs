//! User-selected constraints over the catalog.

use crate::catalog::{Catalog, PromptEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Unknown filter axis: {0} (expected time, tag or mode)")]
    UnknownAxis(String),

    #[error("Invalid time bucket: {0}")]
    InvalidBucket(String),
}

/// The three independent filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAxis {
    Time,
    Tag,
    Mode,
}

impl FilterAxis {
    pub const ALL: [FilterAxis; 3] = [FilterAxis::Time, FilterAxis::Tag, FilterAxis::Mode];

    pub fn name(&self) -> &'static str {
        match self {
            FilterAxis::Time => "time",
            FilterAxis::Tag => "tag",
            FilterAxis::Mode => "mode",
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterAxis {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" | "times" => Ok(FilterAxis::Time),
            "tag" | "tags" => Ok(FilterAxis::Tag),
            "mode" | "modes" => Ok(FilterAxis::Mode),
            other => Err(FilterError::UnknownAxis(other.to_string())),
        }
    }
}

/// A time filter value: `"10"` means exactly ten minutes, `"5-10"` an
/// inclusive range. A trailing `min` is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket {
    pub min: u32,
    pub max: u32,
}

impl FromStr for TimeBucket {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix("min").unwrap_or(trimmed).trim();
        let invalid = || FilterError::InvalidBucket(s.to_string());

        let (min, max) = match trimmed.split_once('-') {
            Some((lo, hi)) => (
                lo.trim().parse().map_err(|_| invalid())?,
                hi.trim().parse().map_err(|_| invalid())?,
            ),
            None => {
                let t: u32 = trimmed.parse().map_err(|_| invalid())?;
                (t, t)
            }
        };

        if min > max {
            return Err(invalid());
        }
        Ok(TimeBucket { min, max })
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Stored form of a filter value. Time buckets are normalized so equivalent
/// spellings share one entry.
fn canonical(axis: FilterAxis, value: String) -> String {
    match axis {
        FilterAxis::Time => value
            .parse::<TimeBucket>()
            .map(|bucket| bucket.to_string())
            .unwrap_or(value),
        FilterAxis::Tag | FilterAxis::Mode => value,
    }
}

/// Current selection on each axis. An empty axis places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    times: BTreeSet<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    modes: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `value` on `axis`. Returns whether it is now selected.
    pub fn toggle(&mut self, axis: FilterAxis, value: impl Into<String>) -> bool {
        let value = canonical(axis, value.into());
        let set = self.values_mut(axis);
        if set.remove(&value) {
            false
        } else {
            set.insert(value);
            true
        }
    }

    pub fn with(mut self, axis: FilterAxis, value: impl Into<String>) -> Self {
        self.values_mut(axis).insert(canonical(axis, value.into()));
        self
    }

    pub fn is_selected(&self, axis: FilterAxis, value: &str) -> bool {
        self.values(axis).contains(&canonical(axis, value.to_string()))
    }

    pub fn values(&self, axis: FilterAxis) -> &BTreeSet<String> {
        match axis {
            FilterAxis::Time => &self.times,
            FilterAxis::Tag => &self.tags,
            FilterAxis::Mode => &self.modes,
        }
    }

    fn values_mut(&mut self, axis: FilterAxis) -> &mut BTreeSet<String> {
        match axis {
            FilterAxis::Time => &mut self.times,
            FilterAxis::Tag => &mut self.tags,
            FilterAxis::Mode => &mut self.modes,
        }
    }

    pub fn clear(&mut self) {
        self.times.clear();
        self.tags.clear();
        self.modes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() && self.tags.is_empty() && self.modes.is_empty()
    }

    /// Whether `entry` satisfies every non-empty axis.
    ///
    /// Time and mode are disjunctive within the axis; tags are conjunctive
    /// (the entry must carry every selected tag).
    pub fn matches(&self, entry: &PromptEntry) -> bool {
        self.matches_time(entry) && self.matches_tags(entry) && self.matches_mode(entry)
    }

    fn matches_time(&self, entry: &PromptEntry) -> bool {
        if self.times.is_empty() {
            return true;
        }
        self.times.iter().any(|raw| match raw.parse::<TimeBucket>() {
            Ok(bucket) => entry.time.overlaps(bucket.min, bucket.max),
            Err(_) => false,
        })
    }

    fn matches_tags(&self, entry: &PromptEntry) -> bool {
        self.tags.iter().all(|tag| entry.has_tag(tag))
    }

    fn matches_mode(&self, entry: &PromptEntry) -> bool {
        if self.modes.is_empty() {
            return true;
        }
        entry
            .mode
            .as_ref()
            .is_some_and(|mode| self.modes.contains(mode))
    }

    /// Catalog entries matching this filter, in catalog order.
    pub fn matching<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a PromptEntry> {
        catalog.iter().filter(move |entry| self.matches(entry))
    }

    /// Short human-readable summary, e.g. `tag: x+y | mode: solo`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = FilterAxis::ALL
            .iter()
            .filter(|axis| !self.values(**axis).is_empty())
            .map(|axis| {
                let joiner = if *axis == FilterAxis::Tag { "+" } else { "|" };
                let values: Vec<&str> = self.values(*axis).iter().map(String::as_str).collect();
                format!("{axis}: {}", values.join(joiner))
            })
            .collect();

        if parts.is_empty() {
            "all prompts".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::prompt;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = FilterSet::new();
        assert!(filter.matches(&prompt("a").build()));
        assert!(filter.matches(&prompt("b").mode("pair").tags(["x"]).build()));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut filter = FilterSet::new();
        assert!(filter.toggle(FilterAxis::Tag, "x"));
        assert!(filter.is_selected(FilterAxis::Tag, "x"));
        assert!(!filter.toggle(FilterAxis::Tag, "x"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_tags_are_conjunctive() {
        let filter = FilterSet::new()
            .with(FilterAxis::Tag, "x")
            .with(FilterAxis::Tag, "y");

        assert!(!filter.matches(&prompt("a").tags(["x"]).build()));
        assert!(!filter.matches(&prompt("b").tags(["y"]).build()));
        assert!(filter.matches(&prompt("c").tags(["x", "y", "z"]).build()));
    }

    #[test]
    fn test_modes_are_disjunctive() {
        let filter = FilterSet::new()
            .with(FilterAxis::Mode, "solo")
            .with(FilterAxis::Mode, "pair");

        assert!(filter.matches(&prompt("a").mode("solo").build()));
        assert!(filter.matches(&prompt("b").mode("pair").build()));
        assert!(!filter.matches(&prompt("c").mode("group").build()));
    }

    #[test]
    fn test_missing_mode_fails_mode_axis() {
        let filter = FilterSet::new().with(FilterAxis::Mode, "solo");
        assert!(!filter.matches(&prompt("a").build()));
    }

    #[test]
    fn test_time_exact_and_range() {
        let ten = FilterSet::new().with(FilterAxis::Time, "10");

        assert!(ten.matches(&prompt("a").time(10).build()));
        assert!(!ten.matches(&prompt("b").time(5).build()));
        assert!(ten.matches(&prompt("c").range(5, 15).build()));
        assert!(!ten.matches(&prompt("d").range(11, 15).build()));

        let short = FilterSet::new().with(FilterAxis::Time, "1-5 min");
        assert!(short.matches(&prompt("e").time(3).build()));
        assert!(short.matches(&prompt("f").range(5, 20).build()));
        assert!(!short.matches(&prompt("g").time(6).build()));
    }

    #[test]
    fn test_unparseable_bucket_matches_nothing() {
        let filter = FilterSet::new().with(FilterAxis::Time, "soon");
        assert!(!filter.matches(&prompt("a").time(5).build()));
    }

    #[test]
    fn test_axes_combine() {
        let filter = FilterSet::new()
            .with(FilterAxis::Tag, "x")
            .with(FilterAxis::Mode, "solo")
            .with(FilterAxis::Time, "5");

        assert!(filter.matches(&prompt("a").tags(["x"]).mode("solo").time(5).build()));
        assert!(!filter.matches(&prompt("b").tags(["x"]).mode("solo").time(10).build()));
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("Tags".parse::<FilterAxis>().unwrap(), FilterAxis::Tag);
        assert_eq!("time".parse::<FilterAxis>().unwrap(), FilterAxis::Time);
        assert!("colour".parse::<FilterAxis>().is_err());
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!(
            "5-10".parse::<TimeBucket>().unwrap(),
            TimeBucket { min: 5, max: 10 }
        );
        assert_eq!(
            " 15 min".parse::<TimeBucket>().unwrap(),
            TimeBucket { min: 15, max: 15 }
        );
        assert!("10-5".parse::<TimeBucket>().is_err());
    }

    #[test]
    fn test_equivalent_time_spellings_share_one_entry() {
        let mut filter = FilterSet::new();
        assert!(filter.toggle(FilterAxis::Time, "10 min"));
        assert!(filter.is_selected(FilterAxis::Time, "10"));
        assert!(filter.is_selected(FilterAxis::Time, "10-10"));
        assert_eq!(filter.values(FilterAxis::Time).len(), 1);
        assert_eq!(filter.summary(), "time: 10");

        assert!(!filter.toggle(FilterAxis::Time, "10"));
        assert!(filter.is_empty());

        let range = FilterSet::new()
            .with(FilterAxis::Time, " 5 - 15 min")
            .with(FilterAxis::Time, "5-15");
        assert_eq!(range.values(FilterAxis::Time).len(), 1);
        assert!(range.is_selected(FilterAxis::Time, "5-15"));
        assert_eq!(TimeBucket { min: 5, max: 15 }.to_string(), "5-15");
    }

    #[test]
    fn test_clear() {
        let mut filter = FilterSet::new()
            .with(FilterAxis::Tag, "x")
            .with(FilterAxis::Time, "5");
        filter.clear();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_summary() {
        assert_eq!(FilterSet::new().summary(), "all prompts");
        let filter = FilterSet::new()
            .with(FilterAxis::Tag, "x")
            .with(FilterAxis::Tag, "y");
        assert_eq!(filter.summary(), "tag: x+y");
    }
}
