use crate::data::model::SelectionResult;

use super::ExportError;

/// Default download name of the tabular export.
pub const CSV_FILE_NAME: &str = "top_states.csv";
pub const CSV_MIME: &str = "text/csv";

/// Column headers of the tabular export.
pub const CSV_HEADER: [&str; 2] = ["State", "Count"];

/// Encode the selection as CSV: a `State,Count` header, then one line per row
/// in selection order. An empty selection yields the header alone.
pub fn to_csv(selection: &SelectionResult) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in &selection.rows {
        writer.write_record([row.state_label.as_str(), row.count.to_string().as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FrequencyRow, SortOrder};
    use pretty_assertions::assert_eq;

    fn selection(rows: Vec<FrequencyRow>) -> SelectionResult {
        let top_n = rows.len();
        SelectionResult {
            rows,
            order: SortOrder::Descending,
            top_n,
        }
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let sel = selection(vec![FrequencyRow::new("00", 3), FrequencyRow::new("01", 2)]);
        let bytes = to_csv(&sel).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "State,Count\n00,3\n01,2\n");
    }

    #[test]
    fn empty_selection_is_header_only() {
        let bytes = to_csv(&SelectionResult::default()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "State,Count\n");
    }

    #[test]
    fn labels_with_delimiters_are_quoted() {
        let sel = selection(vec![FrequencyRow::new("a,b", 1)]);
        let text = String::from_utf8(to_csv(&sel).unwrap()).unwrap();
        assert_eq!(text, "State,Count\n\"a,b\",1\n");

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "a,b");
    }
}
