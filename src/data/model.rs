use std::fmt;

// ---------------------------------------------------------------------------
// RawRecord – one entry of the `statevector` column
// ---------------------------------------------------------------------------

/// A single measurement: the label of the observed state (usually a bitstring
/// such as `"0101"`). Labels are opaque and compared by exact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub state_label: String,
}

impl RawRecord {
    pub fn new(state_label: impl Into<String>) -> Self {
        Self {
            state_label: state_label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FrequencyRow / FrequencyTable – aggregated counts
// ---------------------------------------------------------------------------

/// A distinct state label together with the number of times it was measured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequencyRow {
    pub state_label: String,
    /// Always ≥ 1.
    pub count: u64,
}

impl FrequencyRow {
    pub fn new(state_label: impl Into<String>, count: u64) -> Self {
        Self {
            state_label: state_label.into(),
            count,
        }
    }
}

/// Output of the aggregation stage.
///
/// `total_records` is the number of raw records the rows were built from, so
/// the sum of all counts equals it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    pub rows: Vec<FrequencyRow>,
    pub total_records: u64,
}

impl FrequencyTable {
    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// SortOrder / SelectionResult – what the exporter and UI consume
// ---------------------------------------------------------------------------

/// Direction of the frequency sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Descending => write!(f, "Descending"),
            SortOrder::Ascending => write!(f, "Ascending"),
        }
    }
}

/// The ordered, truncated rows plus the parameters that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub rows: Vec<FrequencyRow>,
    pub order: SortOrder,
    /// Effective N after clamping (0 only when the input set was empty).
    pub top_n: usize,
}

impl SelectionResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Heading shared by the on-screen chart and the PNG export.
    pub fn title(&self) -> String {
        format!("Top-{} state frequencies", self.top_n)
    }

    /// Largest count in the selection, 0 when empty.
    pub fn max_count(&self) -> u64 {
        self.rows.iter().map(|r| r.count).max().unwrap_or(0)
    }
}
