use thiserror::Error;

use crate::config::AppConfig;
use crate::data::aggregate::aggregate;
use crate::data::error::{FilterError, LoadError, LoadWarning};
use crate::data::filter::apply_filter;
use crate::data::loader::load_bytes;
use crate::data::model::{FrequencyTable, SelectionResult, SortOrder};
use crate::data::select::select_top;
use crate::export::{export_all, ExportError, Exports};

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// The user's control values for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Wildcard filter; empty keeps every state.
    pub pattern: String,
    pub order: SortOrder,
    pub top_n: usize,
}

impl Default for PipelineRequest {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            order: SortOrder::Descending,
            top_n: 10,
        }
    }
}

/// Everything the presentation layer shows after one run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Records in the upload.
    pub total_records: u64,
    /// Distinct labels before filtering.
    pub distinct_states: usize,
    /// Distinct labels that passed the filter.
    pub matched_states: usize,
    pub selection: SelectionResult,
    pub exports: Exports,
    pub warnings: Vec<LoadWarning>,
    /// Set when the pattern was rejected; the selection is then unfiltered.
    pub filter_error: Option<FilterError>,
}

impl PipelineOutput {
    /// Non-fatal notices for the status line, warnings first.
    pub fn notices(&self) -> Vec<String> {
        let mut out: Vec<String> = self.warnings.iter().map(|w| w.user_message()).collect();
        if let Some(e) = &self.filter_error {
            out.push(e.user_message());
        }
        out
    }
}

/// A run that produced nothing to show.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PipelineError {
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Load(e) => e.user_message(),
            PipelineError::Export(e) => e.user_message(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Load → aggregate → filter → select → export, all from the raw upload.
pub fn run(
    bytes: &[u8],
    request: &PipelineRequest,
    config: &AppConfig,
) -> Result<PipelineOutput, PipelineError> {
    let loaded = load_bytes(bytes, &config.limits)?;
    let table = aggregate(&loaded.records);
    log::debug!(
        "aggregated {} records into {} states",
        table.total_records,
        table.len()
    );

    let mut output = analyze(&table, request, config)?;
    output.warnings = loaded.warnings;
    Ok(output)
}

/// The stages after aggregation. Never mutates `table`.
pub fn analyze(
    table: &FrequencyTable,
    request: &PipelineRequest,
    config: &AppConfig,
) -> Result<PipelineOutput, PipelineError> {
    let filtered = apply_filter(table, &request.pattern, config.limits.filter_size_limit);
    let selection = select_top(
        &filtered.rows,
        request.order,
        request.top_n,
        config.limits.max_top_n,
    );
    let exports = export_all(&selection, &config.chart)?;

    Ok(PipelineOutput {
        total_records: table.total_records,
        distinct_states: table.len(),
        matched_states: filtered.rows.len(),
        selection,
        exports,
        warnings: Vec::new(),
        filter_error: filtered.error,
    })
}
