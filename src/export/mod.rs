/// Export layer: turns a [`SelectionResult`] into downloadable artifacts.
///
/// * `table` – CSV (`top_states.csv`)
/// * `chart` – PNG bar chart (`states_histogram.png`)
pub mod chart;
pub mod table;

use thiserror::Error;

use crate::config::ChartConfig;
use crate::data::model::SelectionResult;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("flushing CSV buffer: {0}")]
    Flush(String),
}

impl ExportError {
    pub fn user_message(&self) -> String {
        "The table could not be exported.".to_string()
    }
}

/// An exported file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Both artifacts for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exports {
    pub table: Artifact,
    pub chart: Artifact,
}

/// Build the CSV and PNG artifacts. Chart problems never fail this call.
pub fn export_all(
    selection: &SelectionResult,
    chart_config: &ChartConfig,
) -> Result<Exports, ExportError> {
    let table = Artifact {
        file_name: table::CSV_FILE_NAME,
        mime: table::CSV_MIME,
        bytes: table::to_csv(selection)?,
    };
    let chart = Artifact {
        file_name: chart::PNG_FILE_NAME,
        mime: chart::PNG_MIME,
        bytes: chart::render_png(selection, chart_config),
    };
    log::debug!(
        "exported {} rows: {} CSV bytes, {} PNG bytes",
        selection.len(),
        table.bytes.len(),
        chart.bytes.len()
    );
    Ok(Exports { table, chart })
}
