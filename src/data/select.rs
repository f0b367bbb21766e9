use std::cmp::Ordering;

use super::model::{FrequencyRow, SelectionResult, SortOrder};

/// Upper bound of the top-N selector for `len` available rows.
///
/// Returns 0 only when there are no rows at all.
pub fn max_top_n(len: usize, cap: usize) -> usize {
    len.min(cap.max(1))
}

/// Clamp a requested N to `[1, min(cap, len)]` (0 for an empty set).
pub fn clamp_top_n(requested: usize, len: usize, cap: usize) -> usize {
    let upper = max_top_n(len, cap);
    if upper == 0 {
        0
    } else {
        requested.clamp(1, upper)
    }
}

/// Sort by count in the given direction and keep the first N rows.
///
/// Equal counts are ordered by label ascending in both directions, so the
/// same input always produces the same selection.
pub fn select_top(
    rows: &[FrequencyRow],
    order: SortOrder,
    requested_n: usize,
    cap: usize,
) -> SelectionResult {
    let top_n = clamp_top_n(requested_n, rows.len(), cap);

    let mut sorted: Vec<FrequencyRow> = rows.to_vec();
    sorted.sort_by(|a, b| compare(a, b, order));
    sorted.truncate(top_n);

    SelectionResult {
        rows: sorted,
        order,
        top_n,
    }
}

fn compare(a: &FrequencyRow, b: &FrequencyRow, order: SortOrder) -> Ordering {
    let by_count = match order {
        SortOrder::Ascending => a.count.cmp(&b.count),
        SortOrder::Descending => b.count.cmp(&a.count),
    };
    by_count.then_with(|| a.state_label.cmp(&b.state_label))
}
