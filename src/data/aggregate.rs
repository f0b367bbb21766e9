use std::collections::HashMap;

use super::model::{FrequencyRow, FrequencyTable, RawRecord};

/// Count the occurrences of every distinct state label.
///
/// Labels are grouped by exact value. Rows come out by descending count, then
/// label, which keeps the table stable across runs; callers that need a
/// particular order go through [`super::select::select_top`].
pub fn aggregate(records: &[RawRecord]) -> FrequencyTable {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for rec in records {
        *counts.entry(rec.state_label.as_str()).or_default() += 1;
    }

    let mut rows: Vec<FrequencyRow> = counts
        .into_iter()
        .map(|(label, count)| FrequencyRow::new(label, count))
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.state_label.cmp(&b.state_label))
    });

    FrequencyTable {
        rows,
        total_records: records.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(labels: &[&str]) -> Vec<RawRecord> {
        labels.iter().map(|l| RawRecord::new(*l)).collect()
    }

    #[test]
    fn counts_each_label() {
        let table = aggregate(&records(&["00", "01", "00", "10", "00", "01"]));
        assert_eq!(
            table.rows,
            vec![
                FrequencyRow::new("00", 3),
                FrequencyRow::new("01", 2),
                FrequencyRow::new("10", 1),
            ]
        );
        assert_eq!(table.total_records, 6);
    }

    #[test]
    fn counts_sum_to_record_count() {
        let input = records(&["a", "b", "a", "c", "c", "c", "d"]);
        let table = aggregate(&input);
        let sum: u64 = table.rows.iter().map(|r| r.count).sum();
        assert_eq!(sum, input.len() as u64);
        assert!(table.rows.iter().all(|r| r.count >= 1));
    }

    #[test]
    fn labels_compared_exactly() {
        let table = aggregate(&records(&["ab", "AB", " ab", "ab"]));
        assert_eq!(table.len(), 3);
        let ab = table.rows.iter().find(|r| r.state_label == "ab").unwrap();
        assert_eq!(ab.count, 2);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = aggregate(&[]);
        assert!(table.rows.is_empty());
        assert_eq!(table.total_records, 0);
    }
}
