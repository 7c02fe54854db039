pub mod types;

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

use self::types::{Record, RecordSet};

/// `[[ label ]]` switches the listing from sizes to overlay values.
static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[(.*)\]\]$").expect("delimiter pattern is valid"));

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line {line_no}: size is not a number: {line:?}")]
    MalformedSize { line_no: usize, line: String },

    #[error("line {line_no}: size must not be negative: {line:?}")]
    NegativeSize { line_no: usize, line: String },
}

/// Parse a single listing line into a record.
///
/// Accepted shapes are `<number> <path>`, a bare `<path>` (size 1) and a
/// blank line (empty-path record). A line that splits into `token rest`
/// where `token` is not a finite number is rejected rather than coerced.
pub fn parse_line(line_no: usize, line: &str) -> Result<Record, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Record::new("", 0.0));
    }

    let Some((token, rest)) = line.split_once(char::is_whitespace) else {
        return Ok(Record::new(line, 1.0));
    };

    let size: f64 = match token.parse() {
        Ok(n) if f64::is_finite(n) => n,
        _ => {
            return Err(ParseError::MalformedSize {
                line_no,
                line: line.to_string(),
            })
        }
    };
    if size < 0.0 {
        return Err(ParseError::NegativeSize {
            line_no,
            line: line.to_string(),
        });
    }

    Ok(Record::new(rest.trim_start(), size))
}

/// Parse a full listing, including an optional overlay section.
///
/// Lines before the first `[[...]]` delimiter declare sizes; a repeated
/// path keeps its first position and takes the latest size. Lines after it
/// carry values in the size column: they update the matching record, or
/// append a zero-size record for a path that was never sized.
pub fn parse_records(text: &str) -> Result<RecordSet, ParseError> {
    let mut set = RecordSet::default();
    // Path → slot in `set.records`, scoped to this parse.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut overlay = false;
    let mut overlay_lines = 0usize;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;

        if let Some(caps) = DELIMITER.captures(raw.trim()) {
            let label = caps[1].trim().to_string();
            tracing::debug!("Overlay section '{}' starts at line {}", label, line_no);
            overlay = true;
            set.value_aware = true;
            set.overlay_label = Some(label);
            continue;
        }

        let record = parse_line(line_no, raw)?;
        if record.is_blank() {
            continue;
        }

        if overlay {
            overlay_lines += 1;
            apply_overlay(&mut set, &mut index, record);
        } else if let Some(&slot) = index.get(&record.path) {
            set.records[slot].size = record.size;
        } else {
            index.insert(record.path.clone(), set.records.len());
            set.records.push(record);
        }
    }

    tracing::info!(
        "Parsed {} records ({} overlay lines, value_aware={})",
        set.len(),
        overlay_lines,
        set.value_aware
    );

    Ok(set)
}

fn apply_overlay(set: &mut RecordSet, index: &mut HashMap<String, usize>, record: Record) {
    let value = clamp_value(record.size, &record.path);
    match index.get(&record.path) {
        Some(&slot) => set.records[slot].value = Some(value),
        None => {
            tracing::debug!("Overlay value for unsized path '{}'", record.path);
            index.insert(record.path.clone(), set.records.len());
            set.records.push(Record::new(record.path, 0.0).with_value(value));
        }
    }
}

/// Clamp an overlay or coverage value into `[0, 1]`, warning when it was outside.
pub(crate) fn clamp_value(value: f64, path: &str) -> f64 {
    if (0.0..=1.0).contains(&value) {
        return value;
    }
    tracing::warn!("Clamping value {} for '{}' into [0, 1]", value, path);
    value.clamp(0.0, 1.0)
}

/// Read and parse a listing file.
pub fn read_records(path: &Path) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read listing {}", path.display()))?;
    parse_records(&text).with_context(|| format!("Failed to parse listing {}", path.display()))
}
