/// One row of a size listing, collected before tree construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `/`-delimited path. Empty for the synthetic root / blank lines.
    pub path: String,
    /// Size of the entry (1 for a bare path with no numeric prefix)
    pub size: f64,
    /// Overlay value (e.g. coverage ratio in `[0, 1]`), if one is known
    pub value: Option<f64>,
}

impl Record {
    pub fn new(path: impl Into<String>, size: f64) -> Self {
        Self {
            path: path.into(),
            size,
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Blank lines parse to an empty-path record that never becomes a node.
    pub fn is_blank(&self) -> bool {
        self.path.is_empty()
    }
}

/// Ordered records produced by one parse, plus set-level value tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub records: Vec<Record>,
    /// True once an overlay section or coverage report has been applied.
    /// Every node of a value-aware tree reports `hasValues`, even when its
    /// own value is unknown.
    pub value_aware: bool,
    /// Payload of the last `[[...]]` delimiter (legend caption for renderers)
    pub overlay_label: Option<String>,
}

impl RecordSet {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, path: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.path == path)
    }
}
