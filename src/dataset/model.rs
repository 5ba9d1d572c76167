use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::foundation::core::TimeUnit;
use crate::foundation::error::{RaceError, RaceResult};

/// A named entity racing in the chart.
///
/// `name` is unique within a dataset. `category` only affects color grouping:
/// entities sharing a category share a color.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    /// Unique display name.
    pub name: String,
    /// Optional color-grouping category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Element {
    /// Create an element without a category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    /// Create an element grouped under a category.
    pub fn with_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
        }
    }
}

/// One dated sampling of entity values.
///
/// Entities missing from `values` are treated as 0 during interpolation only;
/// they are never promoted to real data points.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Sample timestamp.
    pub timestamp: DateTime<Utc>,
    /// Value per entity name.
    pub values: HashMap<String, f64>,
}

/// The time series consumed by the keyframe builder.
///
/// `snapshots` must be sorted ascending by timestamp; the builder does not
/// re-sort. Unsorted input produces time-inverted synthetic frames rather
/// than an error.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    /// Racing entities in declaration order (rank tie-break order).
    pub elements: Vec<Element>,
    /// Dated value samples, ascending by timestamp.
    pub snapshots: Vec<Snapshot>,
}

impl Dataset {
    /// Create a dataset from parts.
    pub fn new(elements: Vec<Element>, snapshots: Vec<Snapshot>) -> Self {
        Self {
            elements,
            snapshots,
        }
    }

    /// Whether animating this dataset is meaningful (at least two snapshots
    /// and one element). Callers guard animation entry with this; the builder
    /// itself accepts degenerate input and produces a degenerate sequence.
    pub fn is_animatable(&self) -> bool {
        self.snapshots.len() >= 2 && !self.elements.is_empty()
    }

    /// Whether any element declares a category.
    pub fn has_categories(&self) -> bool {
        self.elements.iter().any(|e| e.category.is_some())
    }
}

/// One record of the external payload's `values_by_date` sequences.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SnapshotRecord {
    /// ISO-8601 date string.
    pub date: String,
    /// Value per entity name.
    pub values: HashMap<String, f64>,
}

/// External time-series payload, as produced by the upstream query pipeline.
///
/// `values_by_date` carries the default (yearly) sampling; the optional
/// `values_by_date_monthly` / `values_by_date_daily` variants carry finer
/// granularities when the upstream computed them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RacePayload {
    /// Racing entities in declaration order.
    pub elements: Vec<Element>,
    /// Yearly snapshot records.
    pub values_by_date: Vec<SnapshotRecord>,
    /// Monthly snapshot records, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_by_date_monthly: Option<Vec<SnapshotRecord>>,
    /// Daily snapshot records, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_by_date_daily: Option<Vec<SnapshotRecord>>,
}

impl RacePayload {
    /// Select one sampling granularity and convert it into a [`Dataset`].
    ///
    /// Requesting a granularity the payload does not carry is a validation
    /// error.
    pub fn dataset(&self, unit: TimeUnit) -> RaceResult<Dataset> {
        let records = match unit {
            TimeUnit::Year => &self.values_by_date,
            TimeUnit::Month => self
                .values_by_date_monthly
                .as_ref()
                .ok_or_else(|| RaceError::validation("payload has no monthly values"))?,
            TimeUnit::Day => self
                .values_by_date_daily
                .as_ref()
                .ok_or_else(|| RaceError::validation("payload has no daily values"))?,
        };

        let snapshots = records
            .iter()
            .map(|r| {
                Ok(Snapshot {
                    timestamp: parse_date(&r.date)?,
                    values: r.values.clone(),
                })
            })
            .collect::<RaceResult<Vec<_>>>()?;

        Ok(Dataset::new(self.elements.clone(), snapshots))
    }
}

/// Parse an ISO-8601 timestamp, accepting full RFC 3339 or a plain
/// `YYYY-MM-DD` date (interpreted as midnight UTC).
pub fn parse_date(s: &str) -> RaceResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| RaceError::validation(format!("unparseable date: {s}")))?;
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| RaceError::validation(format!("unparseable date: {s}")))?;
    Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/model.rs"]
mod tests;
