use std::fmt;

use tidemark_core::{
    MetricDescriptor, MetricKind, MetricValue, Numeric, RevisionRecord, RevisionSummary,
};
use tidemark_store::RevisionCache;
use tracing::debug;

use crate::classify::{DeltaClass, DeltaRenderer, classify_delta};
use crate::error::ReportError;

/// Max number of characters of a commit message shown in a report.
pub const MAX_MESSAGE_WIDTH: usize = 50;
pub const NOT_FOUND_CELL: &str = "Not found";

/// The layer of `operator -> path -> key` at which a lookup came up empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNotFound {
    Operator(String),
    Path(String),
    Key(String),
    /// The key exists but holds something other than a number or string.
    Unsupported(String),
}

impl fmt::Display for ValueNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(operator) => write!(f, "operator '{operator}' not in record"),
            Self::Path(path) => write!(f, "path '{path}' not in operator data"),
            Self::Key(key) => write!(f, "key '{key}' not in path data"),
            Self::Unsupported(key) => write!(f, "key '{key}' holds a non-scalar value"),
        }
    }
}

pub fn extract_value(
    record: &RevisionRecord,
    operator: &str,
    path: &str,
    key: &str,
) -> Result<MetricValue, ValueNotFound> {
    let paths = record
        .operator_data
        .get(operator)
        .ok_or_else(|| ValueNotFound::Operator(operator.to_owned()))?;
    let keys = paths
        .get(path)
        .ok_or_else(|| ValueNotFound::Path(path.to_owned()))?;
    let raw = keys
        .get(key)
        .ok_or_else(|| ValueNotFound::Key(key.to_owned()))?;
    MetricValue::from_json(raw).ok_or_else(|| ValueNotFound::Unsupported(key.to_owned()))
}

/// Holds the last numeric value seen while walking oldest to newest.
#[derive(Debug, Clone, Default)]
pub struct DeltaTracker {
    last: Option<Numeric>,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Numeric> {
        self.last
    }

    /// Delta of `value` against the held baseline. Only numeric values of numeric
    /// metrics move the baseline; everything else yields zero.
    pub fn observe(&mut self, kind: MetricKind, value: &MetricValue) -> Numeric {
        if kind != MetricKind::Numeric {
            return Numeric::default();
        }
        let Some(current) = value.as_numeric() else {
            return Numeric::default();
        };

        let delta = self
            .last
            .map(|previous| current.minus(previous))
            .unwrap_or_default();
        self.last = Some(current);
        delta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryCell {
    Found {
        value: MetricValue,
        delta: Numeric,
        class: DeltaClass,
    },
    NotFound(ValueNotFound),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub archiver: String,
    pub revision_id: String,
    pub author_name: String,
    pub commit_date: i64,
    pub message: Option<String>,
    pub cell: HistoryCell,
    pub rendered_value: String,
}

pub fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_MESSAGE_WIDTH).collect()
}

pub struct HistoryWalker<'a> {
    cache: &'a dyn RevisionCache,
    renderer: &'a dyn DeltaRenderer,
}

impl<'a> HistoryWalker<'a> {
    pub fn new(cache: &'a dyn RevisionCache, renderer: &'a dyn DeltaRenderer) -> Self {
        Self { cache, renderer }
    }

    /// Rows for the `limit` newest revisions of `archiver`, oldest first.
    pub fn walk(
        &self,
        archiver: &str,
        metric: &MetricDescriptor,
        path: &str,
        limit: usize,
        include_message: bool,
    ) -> Result<Vec<ReportRow>, ReportError> {
        let mut window = self
            .cache
            .get_index(archiver)
            .map_err(|source| ReportError::ArchiverAccess {
                archiver: archiver.to_owned(),
                source,
            })?;
        window.truncate(limit);
        window.reverse();

        debug!(
            archiver = archiver,
            metric = %metric.identifier(),
            path = path,
            revisions = window.len(),
            "walking revision history"
        );

        let mut tracker = DeltaTracker::new();
        let mut rows = Vec::with_capacity(window.len());
        for revision in window {
            let record = self
                .cache
                .get_record(archiver, &revision.revision_id)
                .map_err(|source| ReportError::CacheAccess {
                    archiver: archiver.to_owned(),
                    revision: revision.revision_id.clone(),
                    source,
                })?;

            let cell = match extract_value(&record, &metric.operator_key, path, &metric.key) {
                Ok(value) => {
                    let delta = tracker.observe(metric.kind, &value);
                    HistoryCell::Found {
                        class: classify_delta(metric.directionality, delta),
                        value,
                        delta,
                    }
                }
                Err(missing) => {
                    debug!(
                        archiver = archiver,
                        revision = %revision.revision_id,
                        reason = %missing,
                        "metric value not found"
                    );
                    HistoryCell::NotFound(missing)
                }
            };

            rows.push(self.row(archiver, revision, cell, include_message));
        }

        Ok(rows)
    }

    fn row(
        &self,
        archiver: &str,
        revision: RevisionSummary,
        cell: HistoryCell,
        include_message: bool,
    ) -> ReportRow {
        let rendered_value = match &cell {
            HistoryCell::Found {
                value,
                delta,
                class,
            } => format!("{value} ({})", self.renderer.render(*delta, *class)),
            HistoryCell::NotFound(_) => NOT_FOUND_CELL.to_owned(),
        };

        ReportRow {
            archiver: archiver.to_owned(),
            message: include_message.then(|| truncate_message(&revision.message)),
            revision_id: revision.revision_id,
            author_name: revision.author_name,
            commit_date: revision.commit_date,
            cell,
            rendered_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record_with(value: serde_json::Value) -> RevisionRecord {
        let mut record = RevisionRecord::default();
        record.insert("raw", "src/app.py", "loc", value);
        record
    }

    #[test]
    fn extract_value_reports_the_missing_layer() {
        let record = record_with(json!(10));

        assert_eq!(
            extract_value(&record, "raw", "src/app.py", "loc"),
            Ok(MetricValue::Integer(10))
        );
        assert_eq!(
            extract_value(&record, "halstead", "src/app.py", "loc"),
            Err(ValueNotFound::Operator("halstead".to_owned()))
        );
        assert_eq!(
            extract_value(&record, "raw", "src/other.py", "loc"),
            Err(ValueNotFound::Path("src/other.py".to_owned()))
        );
        assert_eq!(
            extract_value(&record, "raw", "src/app.py", "sloc"),
            Err(ValueNotFound::Key("sloc".to_owned()))
        );
    }

    #[test]
    fn extract_value_treats_null_as_missing() {
        let record = record_with(json!(null));
        assert_eq!(
            extract_value(&record, "raw", "src/app.py", "loc"),
            Err(ValueNotFound::Unsupported("loc".to_owned()))
        );
    }

    #[test]
    fn tracker_first_value_yields_zero_then_differences() {
        let mut tracker = DeltaTracker::new();
        let deltas = [10, 12, 9]
            .into_iter()
            .map(|value| tracker.observe(MetricKind::Numeric, &MetricValue::Integer(value)))
            .collect::<Vec<_>>();

        assert_eq!(
            deltas,
            vec![Numeric::Integer(0), Numeric::Integer(2), Numeric::Integer(-3)]
        );
        assert_eq!(tracker.last(), Some(Numeric::Integer(9)));
    }

    #[test]
    fn tracker_accepts_zero_as_a_real_baseline() {
        let mut tracker = DeltaTracker::new();
        tracker.observe(MetricKind::Numeric, &MetricValue::Integer(0));
        let delta = tracker.observe(MetricKind::Numeric, &MetricValue::Integer(4));
        assert_eq!(delta, Numeric::Integer(4));
    }

    #[test]
    fn tracker_ignores_text_values_and_text_metrics() {
        let mut tracker = DeltaTracker::new();
        tracker.observe(MetricKind::Numeric, &MetricValue::Integer(5));

        let text = tracker.observe(MetricKind::Numeric, &MetricValue::Text("n/a".to_owned()));
        assert_eq!(text, Numeric::Integer(0));
        assert_eq!(tracker.last(), Some(Numeric::Integer(5)));

        let mut ranks = DeltaTracker::new();
        assert!(ranks.observe(MetricKind::Text, &MetricValue::Text("A".to_owned())).is_zero());
        assert!(ranks.observe(MetricKind::Text, &MetricValue::Text("B".to_owned())).is_zero());
        assert_eq!(ranks.last(), None);
    }

    #[test]
    fn truncate_message_is_a_hard_cut_at_fifty_chars() {
        assert_eq!(truncate_message("short"), "short");
        assert_eq!(truncate_message(""), "");

        let long = "x".repeat(80);
        assert_eq!(truncate_message(&long).chars().count(), MAX_MESSAGE_WIDTH);

        let wide = "é".repeat(60);
        let cut = truncate_message(&wide);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_WIDTH);
        assert!(!cut.ends_with("..."));
    }
}
