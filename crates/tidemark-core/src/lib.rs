use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod operators;

pub use operators::{MetricSpec, OPERATORS, OperatorSpec, list_metrics, lookup};

pub type RevisionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Numeric,
    Text,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

/// Which direction of change counts as an improvement for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directionality {
    AimHigh,
    AimLow,
    Informational,
}

impl Directionality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AimHigh => "aim_high",
            Self::AimLow => "aim_low",
            Self::Informational => "informational",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub operator_key: String,
    pub key: String,
    pub display_name: String,
    pub kind: MetricKind,
    pub directionality: Directionality,
}

impl MetricDescriptor {
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.operator_key, self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSummary {
    pub revision_id: RevisionId,
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    /// Commit time in seconds since the unix epoch.
    pub commit_date: i64,
    #[serde(default)]
    pub message: String,
}

/// Cached analysis output for one revision: operator -> path -> metric key -> value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevisionRecord {
    #[serde(default)]
    pub operator_data: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>,
}

impl RevisionRecord {
    pub fn insert(
        &mut self,
        operator: impl Into<String>,
        path: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) {
        self.operator_data
            .entry(operator.into())
            .or_default()
            .entry(path.into())
            .or_default()
            .insert(key.into(), value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    /// `self - previous`. Two integers stay integral unless the subtraction overflows.
    /// Float differences are rounded to the displayed precision, so sign and display agree.
    pub fn minus(self, previous: Numeric) -> Numeric {
        match (self, previous) {
            (Self::Integer(current), Self::Integer(previous)) => current
                .checked_sub(previous)
                .map(Self::Integer)
                .unwrap_or_else(|| Self::Float(current as f64 - previous as f64)),
            (current, previous) => {
                Self::Float(round_to_display(current.as_f64() - previous.as_f64()))
            }
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    /// Sign relative to zero; NaN compares equal to zero.
    pub fn sign(self) -> Ordering {
        match self {
            Self::Integer(value) => value.cmp(&0),
            Self::Float(value) => value.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
        }
    }

    pub fn is_zero(self) -> bool {
        self.sign() == Ordering::Equal
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Leaf values other than numbers and strings do not count as a stored metric.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Float)),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Self::Integer(value) => Some(Numeric::Integer(*value)),
            Self::Float(value) => Some(Numeric::Float(*value)),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Formats a unix timestamp as an ISO calendar date (UTC).
pub fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

const FLOAT_DISPLAY_SCALE: f64 = 100.0;

fn round_to_display(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = (value * FLOAT_DISPLAY_SCALE).round() / FLOAT_DISPLAY_SCALE;
    // Collapse -0.0 so a vanished difference never prints a sign.
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_owned()
    }
}
