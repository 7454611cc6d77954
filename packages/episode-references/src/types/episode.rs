//! Crawled episode records and the batches they are stored in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{StoreError, StoreResult};

/// One crawled episode page.
///
/// Written once by the crawl stage and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    /// Episode page URL; identity key within a batch
    pub href: String,

    /// Episode title
    pub title: String,

    /// Show notes, the source text for reference extraction
    pub description: String,

    /// ISO-8601 publish timestamp, normalized at crawl time.
    ///
    /// Kept as the stored string so results copy it byte for byte.
    #[serde(alias = "pubDate")]
    pub publish_date: String,
}

impl EpisodeRecord {
    /// Create a record from already-normalized fields.
    pub fn new(
        href: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        publish_date: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            description: description.into(),
            publish_date: publish_date.into(),
        }
    }

    /// Create a record from the epoch-seconds timestamp found on an episode
    /// page. Returns `None` if the timestamp is out of range.
    pub fn from_unix_seconds(
        href: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        seconds: i64,
    ) -> Option<Self> {
        let published = DateTime::from_timestamp(seconds, 0)?;
        Some(Self::new(
            href,
            title,
            description,
            format_publish_date(published),
        ))
    }

    /// Parse the stored publish date.
    ///
    /// Accepts RFC 3339 as well as the ISO-8601 forms without an offset
    /// (`2020-01-01T00:00:00`, `2020-01-01`), which are read as UTC.
    pub fn published_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        let raw = self.publish_date.trim();

        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN).and_utc())
            })
    }

    /// Check the record invariants, returning the first violation.
    pub fn check(&self) -> Result<(), String> {
        if self.href.trim().is_empty() {
            return Err("href is empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        self.published_at()
            .map(|_| ())
            .map_err(|e| format!("publishDate '{}' is not ISO-8601: {}", self.publish_date, e))
    }
}

/// Normalized form of a publish timestamp: UTC, millisecond precision,
/// `Z` suffix (`2020-01-01T00:00:00.000Z`).
pub fn format_publish_date(published: DateTime<Utc>) -> String {
    published.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Identifier of a persisted batch. Ordering is creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Batch id for the `sequence`-th stored batch (`000000001`, ...).
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{:09}", sequence))
    }

    /// Sequence number, if the id is numeric.
    pub fn sequence(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk shape of one batch: `{ "data": [EpisodeRecord, ...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDocument {
    pub data: Vec<EpisodeRecord>,
}

/// A loaded batch of episode records, in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub id: BatchId,
    pub records: Vec<EpisodeRecord>,
}

impl Batch {
    pub fn new(id: BatchId, records: Vec<EpisodeRecord>) -> Self {
        Self { id, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Enforce record invariants and href uniqueness.
    pub fn validated(self) -> StoreResult<Self> {
        let mut seen = HashSet::with_capacity(self.records.len());

        for record in &self.records {
            record.check().map_err(|reason| StoreError::InvalidRecord {
                batch: self.id.clone(),
                href: record.href.clone(),
                reason,
            })?;

            if !seen.insert(record.href.clone()) {
                return Err(StoreError::DuplicateHref {
                    batch: self.id.clone(),
                    href: record.href.clone(),
                });
            }
        }

        Ok(self)
    }
}
