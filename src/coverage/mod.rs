//! Coverage reports joined onto size listings.
//!
//! A report names files relative to a source root and gives each a line
//! rate in `[0, 1]`. Reconciliation attaches those rates to the records
//! whose normalized path equals `source_root/filename`; report entries for
//! files that are not in the listing are skipped.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{clamp_value, types::RecordSet};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid JSON coverage report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid Cobertura XML report: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("class {filename:?} has a non-numeric line-rate {raw:?}")]
    BadRate { filename: String, raw: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// Path relative to the report's source root
    pub filename: String,
    pub line_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    #[serde(default)]
    pub source_root: String,
    pub files: Vec<FileCoverage>,
}

impl CoverageReport {
    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a Cobertura `coverage.xml`. The first `<source>` is the root and
    /// each `<class>` with `filename` and `line-rate` attributes is one file.
    pub fn from_cobertura_xml(text: &str) -> Result<Self, ReportError> {
        // coverage.py and gcovr emit a DOCTYPE pointing at the Cobertura DTD
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;

        let source_root = doc
            .descendants()
            .find(|n| n.has_tag_name("source"))
            .and_then(|n| n.text())
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let mut files = Vec::new();
        for class in doc.descendants().filter(|n| n.has_tag_name("class")) {
            let filename = class.attribute("filename");
            let (Some(filename), Some(raw)) = (filename, class.attribute("line-rate")) else {
                continue;
            };
            let line_rate = raw.trim().parse::<f64>().map_err(|_| ReportError::BadRate {
                filename: filename.to_string(),
                raw: raw.to_string(),
            })?;
            files.push(FileCoverage {
                filename: filename.to_string(),
                line_rate,
            });
        }

        Ok(Self { source_root, files })
    }

    /// Rates keyed by normalized `source_root/filename`. A file listed more
    /// than once keeps its last rate; rates are clamped into `[0, 1]`.
    pub fn rates_by_path(&self) -> HashMap<String, f64> {
        let mut rates = HashMap::with_capacity(self.files.len());
        for file in &self.files {
            let rate = if file.line_rate.is_nan() {
                tracing::warn!("Dropping NaN line rate for {}", file.filename);
                continue;
            } else {
                clamp_value(file.line_rate, &file.filename)
            };
            rates.insert(join_source_path(&self.source_root, &file.filename), rate);
        }
        rates
    }
}

/// Load a report, picking the format from the first non-blank character.
pub fn load_report(path: &Path) -> Result<CoverageReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read coverage report {}", path.display()))?;
    let parsed = if text.trim_start().starts_with('{') {
        CoverageReport::from_json(&text)
    } else {
        CoverageReport::from_cobertura_xml(&text)
    };
    let report =
        parsed.with_context(|| format!("Failed to parse coverage report {}", path.display()))?;

    tracing::info!(
        "Loaded coverage report: {} files under '{}'",
        report.files.len(),
        report.source_root
    );
    Ok(report)
}

/// Outcome of joining a report onto a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Records that received a value
    pub matched: usize,
    /// Distinct report paths that matched no record
    pub skipped: usize,
}

/// Attach report rates to matching records. Pure join on path identity:
/// applying the same report again yields the same values.
pub fn reconcile(set: &mut RecordSet, report: &CoverageReport) -> ReconcileSummary {
    let rates = report.rates_by_path();
    set.value_aware = true;

    let mut matched = 0;
    let mut hit: HashSet<&str> = HashSet::new();
    for record in &mut set.records {
        if let Some((key, &rate)) = rates.get_key_value(&normalize_path(&record.path)) {
            record.value = Some(rate);
            hit.insert(key.as_str());
            matched += 1;
        }
    }

    let summary = ReconcileSummary {
        matched,
        skipped: rates.len() - hit.len(),
    };
    tracing::debug!(
        "Reconciled coverage: {} of {} records matched, {} report files skipped",
        summary.matched,
        set.len(),
        summary.skipped
    );
    summary
}

/// Collapse separators (`/` or `\`), drop empty and `.` segments, keep a
/// leading `/`.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with(['/', '\\']);
    let joined = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn join_source_path(root: &str, relative: &str) -> String {
    if root.is_empty() {
        normalize_path(relative)
    } else {
        normalize_path(&format!("{root}/{relative}"))
    }
}
