#![warn(missing_docs)]
//! # cloud-risk-analysis
//!
//! ## Purpose
//! Derives display aggregates and chart specifications from classified log
//! entries.
//!
//! ## Responsibilities
//! - Parse saved log exports into [`LogEntry`] lists.
//! - Partition entries into rule-based and custom-based groups.
//! - Count entries per risk level for each group.
//! - Build one [`ChartSpec`] per [`ChartMode`].
//!
//! ## Data flow
//! Backend entries -> [`partition`] -> [`RiskBreakdown`] -> [`build_chart`] ->
//! terminal renderer.
//!
//! ## Ownership and lifetimes
//! [`Partition`] borrows the entry slice it was built from; aggregates and
//! chart specs are small owned values, recomputed on every render.
//!
//! ## Error model
//! Only parsing can fail ([`AnalysisError`]). Aggregation is total: unknown
//! risk labels are skipped, never reported.
//!
//! ## Security and privacy notes
//! Operates on classification output only; no credentials pass through here.

mod chart;

use cloud_risk_core::{LogEntry, RiskLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chart::{
    CUSTOM_COLOR, ChartMode, ChartSpec, PieSlice, RULE_COLOR, Series, SeriesKind, build_chart,
};

/// Reason substring marking an entry as custom-rule classified.
pub const CUSTOM_MARKER: &str = "custom";

/// Origin of a classification, inferred from its reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskType {
    /// Matched a built-in backend rule.
    Rule,
    /// Matched a user-defined custom rule.
    Custom,
}

/// Classifies an entry by case-insensitive search for `"custom"` in its reason.
pub fn risk_type(entry: &LogEntry) -> RiskType {
    if entry.reason.to_lowercase().contains(CUSTOM_MARKER) {
        RiskType::Custom
    } else {
        RiskType::Rule
    }
}

/// Entries split by [`RiskType`], preserving input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    /// Rule-based entries.
    pub rule: Vec<&'a LogEntry>,
    /// Custom-based entries.
    pub custom: Vec<&'a LogEntry>,
}

/// Splits entries into rule and custom groups.
pub fn partition(entries: &[LogEntry]) -> Partition<'_> {
    let mut split = Partition::default();
    for entry in entries {
        match risk_type(entry) {
            RiskType::Custom => split.custom.push(entry),
            RiskType::Rule => split.rule.push(entry),
        }
    }
    split
}

/// Per-level entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RiskCounts {
    /// Low-risk entries.
    pub low: u64,
    /// Medium-risk entries.
    pub medium: u64,
    /// High-risk entries.
    pub high: u64,
}

impl RiskCounts {
    /// Counts entries per level; entries with unknown labels are skipped.
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut counts = Self::default();
        for level in entries.into_iter().filter_map(LogEntry::risk_level) {
            *counts.slot(level) += 1;
        }
        counts
    }

    /// Count for one level.
    pub fn get(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }

    /// Sum over all levels.
    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high
    }

    fn slot(&mut self, level: RiskLevel) -> &mut u64 {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::High => &mut self.high,
        }
    }
}

/// Aggregates backing every chart mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    /// Number of rule-based entries, including unknown labels.
    pub rule_entries: u64,
    /// Number of custom-based entries, including unknown labels.
    pub custom_entries: u64,
    /// Per-level counts of rule-based entries.
    pub rule: RiskCounts,
    /// Per-level counts of custom-based entries.
    pub custom: RiskCounts,
}

impl RiskBreakdown {
    /// Partitions and counts `entries`.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let split = partition(entries);
        Self {
            rule_entries: split.rule.len() as u64,
            custom_entries: split.custom.len() as u64,
            rule: RiskCounts::tally(split.rule.iter().copied()),
            custom: RiskCounts::tally(split.custom.iter().copied()),
        }
    }

    /// One row per risk level, in ascending level order.
    pub fn rows(&self) -> [LevelRow; 3] {
        RiskLevel::ALL.map(|level| LevelRow {
            risk_level: level,
            rule_based: self.rule.get(level),
            custom_based: self.custom.get(level),
        })
    }
}

/// Counts for one risk level across both groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRow {
    /// Level this row describes.
    pub risk_level: RiskLevel,
    /// Rule-based count.
    #[serde(rename = "RuleBased")]
    pub rule_based: u64,
    /// Custom-based count.
    #[serde(rename = "CustomBased")]
    pub custom_based: u64,
}

impl LevelRow {
    /// Combined count.
    pub fn total(&self) -> u64 {
        self.rule_based + self.custom_based
    }
}

/// Parses a saved log export.
///
/// Accepts a bare JSON array of entries or an object carrying `logs` or
/// `results`.
///
/// # Errors
/// Returns [`AnalysisError::Decode`] for invalid JSON and
/// [`AnalysisError::InvalidExport`] for objects without an entry list.
pub fn parse_log_entries(raw: &str) -> Result<Vec<LogEntry>, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(AnalysisError::Decode)?;

    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut object) => object
            .remove("logs")
            .or_else(|| object.remove("results"))
            .ok_or_else(|| {
                AnalysisError::InvalidExport("object has no logs or results field".to_string())
            })?,
        _ => {
            return Err(AnalysisError::InvalidExport(
                "export must be an array or object".to_string(),
            ));
        }
    };

    serde_json::from_value(list).map_err(AnalysisError::Decode)
}

/// Analysis errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// JSON decode failure.
    #[error("log export decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// JSON was valid but not a recognizable export.
    #[error("invalid log export: {0}")]
    InvalidExport(String),
}
